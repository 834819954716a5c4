use std::sync::Arc;

use webcore::config::Config;
use webcore::server::Server;
use webcore::site;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let port_arg = std::env::args().nth(1);
    let cfg = Config::load()?.with_port_arg(port_arg.as_deref())?;

    let router = Arc::new(site::build_router(&cfg));
    let server = Server::bind(cfg.port).await?;

    tokio::select! {
        res = server.run(router) => {
            if let Err(e) = &res {
                tracing::error!(error = %e, "Server stopped");
            }
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
