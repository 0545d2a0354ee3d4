//! `MatchforgeServer` builder and serve loop.
//!
//! This is the entry point for running a matchmaking server. It ties the
//! layers together: HTTP adapter → matchmaker → pool and room registries,
//! plus the two background loops.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::handler::router;
use crate::{MatchConfig, Matchmaker, MatchforgeError, RoomIdSource, UuidRoomIds};

/// Builder for configuring and starting a Matchforge server.
///
/// # Example
///
/// ```rust,no_run
/// use matchforge::prelude::*;
///
/// # async fn start() -> Result<(), MatchforgeError> {
/// let server = MatchforgeServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct MatchforgeServerBuilder {
    bind_addr: String,
    config: MatchConfig,
    room_ids: Box<dyn RoomIdSource>,
}

impl MatchforgeServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            config: MatchConfig::default(),
            room_ids: Box::new(UuidRoomIds),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the matchmaker configuration.
    pub fn config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the room id generator.
    pub fn room_ids(mut self, source: impl RoomIdSource) -> Self {
        self.room_ids = Box::new(source);
        self
    }

    /// Binds the listener and builds the matchmaker.
    ///
    /// Background loops are not started until [`MatchforgeServer::run`].
    pub async fn build(self) -> Result<MatchforgeServer, MatchforgeError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        let matchmaker = Arc::new(Matchmaker::with_room_ids(self.config, self.room_ids));
        Ok(MatchforgeServer {
            listener,
            matchmaker,
        })
    }
}

impl Default for MatchforgeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound, not yet running, Matchforge server.
pub struct MatchforgeServer {
    listener: TcpListener,
    matchmaker: Arc<Matchmaker>,
}

impl MatchforgeServer {
    /// Creates a new builder.
    pub fn builder() -> MatchforgeServerBuilder {
        MatchforgeServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The engine behind this server, for in-process inspection.
    pub fn matchmaker(&self) -> Arc<Matchmaker> {
        Arc::clone(&self.matchmaker)
    }

    /// Serves until Ctrl-C.
    pub async fn run(self) -> Result<(), MatchforgeError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Starts the background loops and serves HTTP until `shutdown`
    /// resolves, then stops the loops.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), MatchforgeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.listener.local_addr()?;
        let tasks = self.matchmaker.spawn_background();
        let app = router(Arc::clone(&self.matchmaker));

        tracing::info!(%addr, "matchforge server running");

        let served = axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        tasks.shutdown().await;
        tracing::info!("matchforge server stopped");
        served.map_err(MatchforgeError::Io)
    }
}
