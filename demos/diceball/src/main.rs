//! Diceball matchmaking server.
//!
//! Players open the game page, join with a name, and poll until they are
//! seated opposite someone. The game itself runs elsewhere; this process
//! only hands out rooms.
//!
//! ```text
//! MATCHFORGE_ADDR=0.0.0.0:8080  listen address
//! RUST_LOG=info                 log filter
//! ```

use matchforge::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), MatchforgeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("MATCHFORGE_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let server = MatchforgeServer::builder()
        .bind(&addr)
        .config(MatchConfig::default())
        .build()
        .await?;

    tracing::info!(addr = %server.local_addr()?, "diceball matchmaking ready");
    server.run().await
}
