//! Background loops: matching and room cleanup.
//!
//! Each loop owns a [`TickScheduler`] and a shutdown receiver. A failed
//! iteration is logged and the loop carries on; only the shutdown signal
//! ends it.

use std::sync::Arc;

use matchforge_tick::TickScheduler;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::Matchmaker;

/// Handles to the running background loops.
///
/// Dropping this without calling [`shutdown`](Self::shutdown) closes the
/// signal channel, which also stops both loops.
pub struct BackgroundTasks {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    /// Signals both loops to stop and waits for them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "background task ended abnormally");
            }
        }
        tracing::debug!("background tasks stopped");
    }

    /// `true` while every loop is still running.
    pub fn is_running(&self) -> bool {
        self.handles.iter().all(|h| !h.is_finished())
    }
}

impl Matchmaker {
    /// Spawns the matching loop and the cleanup loop on the current runtime.
    pub fn spawn_background(self: &Arc<Self>) -> BackgroundTasks {
        let (shutdown, signal) = watch::channel(false);
        let handles = vec![
            tokio::spawn(matching_loop(Arc::clone(self), signal.clone())),
            tokio::spawn(cleanup_loop(Arc::clone(self), signal)),
        ];
        tracing::info!(
            match_interval_ms = self.config().match_interval.as_millis() as u64,
            cleanup_interval_s = self.config().cleanup_interval.as_secs(),
            pairing = ?self.config().pairing,
            "background tasks started"
        );
        BackgroundTasks { shutdown, handles }
    }
}

async fn matching_loop(matchmaker: Arc<Matchmaker>, mut shutdown: watch::Receiver<bool>) {
    let mut scheduler = TickScheduler::new(matchmaker.config().matching_tick());

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            tick = scheduler.wait_for_tick() => {
                match matchmaker.run_matching_tick().await {
                    Ok(0) => {}
                    Ok(created) => tracing::trace!(tick = tick.tick, created, "matching tick"),
                    Err(e) => tracing::warn!(tick = tick.tick, error = %e, "matching tick failed"),
                }
                scheduler.record_tick_end();
            }
        }
    }
}

async fn cleanup_loop(matchmaker: Arc<Matchmaker>, mut shutdown: watch::Receiver<bool>) {
    let mut scheduler = TickScheduler::new(matchmaker.config().cleanup_tick());

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = scheduler.wait_for_tick() => {
                matchmaker.run_cleanup().await;
                scheduler.record_tick_end();
            }
        }
    }
}
