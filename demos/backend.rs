//! demos/backend.rs
//! Trivial backend for trying the balancer locally.
//! Run: cargo run --bin backend -- <port>

use hyper::{
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server,
};
use std::{convert::Infallible, net::SocketAddr};
use tracing::info;

async fn handle(req: Request<Body>, port: u16) -> Result<Response<Body>, Infallible> {
    let msg = format!("Hello from backend server on port {port}");
    info!(method = %req.method(), path = req.uri().path(), "{}", msg);
    Ok(Response::new(Body::from(msg)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let port: u16 = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "8000".into())
        .parse()?;

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let make_svc = make_service_fn(move |_conn| async move {
        Ok::<_, Infallible>(service_fn(move |req| handle(req, port)))
    });

    info!("Starting backend server on http://{}", addr);
    Server::try_bind(&addr)?.serve(make_svc).await?;
    Ok(())
}
