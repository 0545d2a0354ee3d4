//! # Matchforge
//!
//! First-come-first-served two-player matchmaking for clients that poll.
//!
//! Clients join with an id of their choosing, a background loop pairs the
//! two oldest waiting players into a room once per tick, and each client
//! learns its opponent by polling its status. The first poll after the
//! match returns the result and reaps the player; a slower loop prunes
//! rooms whose players are gone.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use matchforge::prelude::*;
//!
//! # async fn start() -> Result<(), MatchforgeError> {
//! let server = MatchforgeServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .config(MatchConfig::default())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```
//!
//! The engine can also be driven directly, without HTTP:
//!
//! ```rust
//! use matchforge::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), MatchforgeError> {
//! let mm = Matchmaker::new(MatchConfig::default());
//! mm.join("A").await?;
//! mm.join("B").await?;
//! mm.run_matching_tick().await?;
//! assert!(matches!(mm.poll("A").await?, PollResponse::Matched { .. }));
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod handler;
mod ids;
mod matchmaker;
mod server;
mod tasks;

pub use config::{MatchConfig, PairingPolicy};
pub use error::{ErrorKind, MatchforgeError};
pub use handler::router;
pub use ids::{RoomIdSource, UuidRoomIds};
pub use matchmaker::Matchmaker;
pub use server::{MatchforgeServer, MatchforgeServerBuilder};
pub use tasks::BackgroundTasks;

pub mod prelude {
    pub use crate::{
        BackgroundTasks, ErrorKind, MatchConfig, MatchforgeError, MatchforgeServer,
        Matchmaker, PairingPolicy, RoomIdSource, UuidRoomIds,
    };
    pub use matchforge_pool::{MatchOutcome, RejoinPolicy};
    pub use matchforge_protocol::{
        CancelResponse, JoinResponse, PlayerId, PollResponse, RoomEntry, RoomId, Snapshot,
        Status, WaitingPlayerEntry,
    };
}
