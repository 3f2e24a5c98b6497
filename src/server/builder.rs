// ────────────────────────────────
// src/server/builder.rs
// ────────────────────────────────
use crate::server::listener::{bind_tcp, ServerError};
use hyper::{server::conn::Http, Body, Request, Response};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::Service;

/// A server that has not bound its socket yet. `bind` is the only way forward;
/// there is no way back from [`Listening`].
pub struct ServerBuilder<H> {
    addr: SocketAddr,
    handler: H,
}

impl<H> ServerBuilder<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    pub fn new(addr: SocketAddr, handler: H) -> Self {
        Self { addr, handler }
    }

    pub async fn bind(self) -> Result<Listening<H>, ServerError> {
        let listener = bind_tcp(self.addr).await?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr: self.addr, source })?;
        tracing::info!("HTTP server listening on {}", local_addr);

        Ok(Listening {
            listener,
            local_addr,
            handler: self.handler,
        })
    }

    /// Bind and accept connections until the process is killed.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.bind().await?.run().await;
        Ok(())
    }
}

/// A bound server.
pub struct Listening<H> {
    listener: TcpListener,
    local_addr: SocketAddr,
    handler: H,
}

impl<H> Listening<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn run(self) {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(err) => {
                    // Usually fd exhaustion; back off instead of spinning.
                    tracing::warn!(%err, "failed to accept connection");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    continue;
                }
            };
            let svc = self.handler.clone();

            // One Tokio task per connection.
            tokio::spawn(async move {
                let http = Http::new();
                if let Err(err) = http.serve_connection(stream, svc).await {
                    tracing::warn!(%peer, %err, "connection error");
                }
            });
        }
    }
}
