use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use tokio::signal;
use tracing::info;

use folio_core::Settings;

use crate::routes::create_router;
use crate::state::AppState;

pub struct Server {
    state: AppState,
    addr: SocketAddr,
}

impl Server {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let host: IpAddr = settings
            .server
            .host
            .parse()
            .with_context(|| format!("invalid HOST value: {}", settings.server.host))?;
        let addr = SocketAddr::new(host, settings.server.port);
        let state = AppState::new(settings).await?;
        Ok(Self { state, addr })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let router = create_router(self.state);

        // Tuned socket options: fast rebinds across restarts and OS-level
        // keepalive on long-lived connections.
        let socket = if self.addr.is_ipv6() {
            tokio::net::TcpSocket::new_v6()
        } else {
            tokio::net::TcpSocket::new_v4()
        }
        .context("failed to create socket")?;
        let _ = socket.set_reuseaddr(true);
        let _ = socket.set_keepalive(true);
        socket
            .bind(self.addr)
            .with_context(|| format!("failed to bind {}", self.addr))?;
        let listener = socket.listen(1024).context("failed to listen")?;

        info!("Server listening on http://{}", self.addr);
        info!("  GET  /api/health - health check");
        info!("  POST /api/auth/login - obtain a session token");
        info!("  GET  /api/projects | /api/skills | /api/experiences - public content");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
