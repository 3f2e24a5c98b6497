// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config = parse_config(path, &contents)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(path: &Path, contents: &str) -> Result<Config> {
    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?
        }
        _ => serde_json::from_str(contents).context("Failed to parse JSON config")?,
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::{create_load_balancer, ConfigError};
    use std::io::Write;

    const YAML: &str = r#"
listen: "127.0.0.1:9100"
backend_timeout_secs: 2
backends:
  - { address: "localhost:8000", weight: 2 }
  - { address: "localhost:8001", weight: 1 }
"#;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_yaml() {
        let file = write_temp(".yaml", YAML);
        let config = load_config(file.path()).await.unwrap();

        assert_eq!(config.listen, "127.0.0.1:9100".parse::<std::net::SocketAddr>().unwrap());
        assert_eq!(config.backend_timeout().as_secs(), 2);
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.backends[1].address, "localhost:8001");
        assert_eq!(config.backends[1].weight, 1);
    }

    #[tokio::test]
    async fn test_load_json_with_defaults() {
        let file = write_temp(
            ".json",
            r#"{"backends": [{"address": "localhost:8000", "weight": 3}]}"#,
        );
        let config = load_config(file.path()).await.unwrap();

        assert_eq!(config.listen, "0.0.0.0:9000".parse::<std::net::SocketAddr>().unwrap());
        assert_eq!(config.backend_timeout().as_secs(), 5);
    }

    #[tokio::test]
    async fn test_zero_timeout_rejected() {
        let file = write_temp(
            ".yaml",
            "backend_timeout_secs: 0\nbackends:\n  - { address: \"localhost:8000\", weight: 1 }\n",
        );
        let err = load_config(file.path()).await.unwrap_err();
        assert!(
            matches!(err.downcast_ref::<SettingsError>(), Some(SettingsError::ZeroTimeout)),
            "{err}"
        );
    }

    #[tokio::test]
    async fn test_invalid_backends_rejected_by_load_balancer() {
        let file = write_temp(
            ".yml",
            "backends:\n  - { address: \"localhost:8000\", weight: 0 }\n",
        );
        let config = load_config(file.path()).await.unwrap();
        let err = create_load_balancer(&config).err().unwrap();
        assert!(matches!(err, ConfigError::NonPositiveWeight { weight: 0, .. }), "{err}");

        let file = write_temp(".yml", "backends: []\n");
        let config = load_config(file.path()).await.unwrap();
        assert!(matches!(create_load_balancer(&config), Err(ConfigError::EmptyBackends)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_config("/nonexistent/lb.yaml").await.unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
