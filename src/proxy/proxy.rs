// ────────────────────────────────
// src/proxy/proxy.rs
// Forwards each request to the backend chosen by the load balancer
// ────────────────────────────────

use crate::load_balancer::LoadBalancer;
use hyper::{Body, Request, Response, StatusCode};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub struct Proxy {
    balancer: Arc<dyn LoadBalancer>,
    client: Client,
}

impl Proxy {
    /// Outbound connections are not pooled; each request opens its own and the
    /// connection is dropped with the response.
    pub fn new(
        balancer: Arc<dyn LoadBalancer>,
        backend_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(backend_timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { balancer, client })
    }

    /// The incoming method, path, headers and body are ignored: the backend
    /// always receives a plain `GET /`, and the client gets the backend status
    /// with a fixed `"<address> responded\n"` body.
    pub async fn handle(&self, _req: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let target = self.balancer.next_backend();
        tracing::debug!(target = target.address(), "forwarding request");

        let status = {
            let response = self
                .client
                .get(target.url().clone())
                .send()
                .await
                .map_err(|source| ProxyError::BackendUnreachable {
                    target: target.address().to_string(),
                    source,
                })?;
            response.status()
        };

        Response::builder()
            .status(status)
            .body(Body::from(format!("{} responded\n", target.address())))
            .map_err(ProxyError::Response)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Failed to reach backend server {target}: {source}")]
    BackendUnreachable {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build response: {0}")]
    Response(#[source] hyper::http::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::BackendUnreachable { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Convert ProxyError to Hyper Response for error handling
impl From<ProxyError> for Response<Body> {
    fn from(err: ProxyError) -> Self {
        let mut response = Response::new(Body::from(format!("{err}\n")));
        *response.status_mut() = err.status();
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::{BackendRegistry, WeightedSelector};
    use std::net::TcpListener;

    fn unused_address() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    }

    fn proxy_for(address: &str) -> Proxy {
        let registry = BackendRegistry::new([(address, 1)]).unwrap();
        let selector = Arc::new(WeightedSelector::new(registry).unwrap());
        Proxy::new(selector, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_bad_gateway() {
        let address = unused_address();
        let proxy = proxy_for(&address);

        let err = proxy.handle(Request::new(Body::empty())).await.unwrap_err();
        assert!(matches!(
            err,
            ProxyError::BackendUnreachable { ref target, .. } if *target == address
        ));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let response: Response<Body> = err.into();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.starts_with(&format!("Failed to reach backend server {address}: ")), "{body}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_relays_status_with_fixed_body() {
        let mut backend = mockito::Server::new_async().await;
        let mock = backend
            .mock("GET", "/")
            .with_status(404)
            .with_body("ignored")
            .create_async()
            .await;

        let address = backend.host_with_port();
        let proxy = proxy_for(&address);

        let req = Request::builder()
            .method("POST")
            .uri("/some/path?q=1")
            .body(Body::from("payload"))
            .unwrap();
        let response = proxy.handle(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(body, format!("{address} responded\n").as_bytes());
        mock.assert_async().await;
    }
}
