use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{Instrument, info};

use crate::http::response::ResponseBuilder;
use crate::http::session::Session;
use crate::router::Router;

/// Owns the listening socket and spawns one session per connection.
pub struct Server {
    listener: TcpListener,
    responses: ResponseBuilder,
}

impl Server {
    /// Binds `port` on all IPv4 interfaces.
    pub async fn bind(port: u16) -> anyhow::Result<Self> {
        Self::bind_addr((Ipv4Addr::UNSPECIFIED, port)).await
    }

    pub async fn bind_addr(addr: impl ToSocketAddrs) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .context("failed to bind listener")?;

        Ok(Self {
            listener,
            responses: ResponseBuilder::new(),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until accepting fails.
    ///
    /// Sessions are spawned without waiting on them and without any cap on
    /// how many run at once. An accept error ends the loop and is returned.
    pub async fn run(self, router: Arc<Router>) -> anyhow::Result<()> {
        info!("Listening on {}", self.local_addr()?);

        loop {
            let (socket, peer) = self
                .listener
                .accept()
                .await
                .context("failed to accept connection")?;
            info!("Accepted connection from {}", peer);

            let session = Session::new(socket, Arc::clone(&router), self.responses);
            tokio::spawn(
                session
                    .run()
                    .instrument(tracing::info_span!("session", peer = %peer)),
            );
        }
    }
}
