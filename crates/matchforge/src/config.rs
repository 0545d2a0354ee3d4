//! Matchmaker configuration.

use std::time::Duration;

use matchforge_pool::RejoinPolicy;
use matchforge_tick::TickConfig;

/// How many pairs the matching loop forms per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingPolicy {
    /// At most one pair per tick. A burst of 2n joins takes n ticks to
    /// clear; the oldest pair still always goes first.
    #[default]
    OncePerTick,
    /// Pair repeatedly until fewer than two players wait. Lower latency
    /// under bursts, same FIFO order.
    Drain,
}

/// Settings for the matchmaking engine and its background tasks.
///
/// The intervals are tunables, not contracts; tests shrink them freely.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Period of the matching loop. Zero disables it.
    pub match_interval: Duration,

    /// Period of the room cleanup pass. Zero disables it.
    pub cleanup_interval: Duration,

    pub pairing: PairingPolicy,

    /// What a join does when the id is already registered.
    pub rejoin: RejoinPolicy,

    /// Random delay (upper bound) before each loop's first tick.
    pub tick_jitter: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_interval: Duration::from_secs(1),
            cleanup_interval: Duration::from_secs(5 * 60),
            pairing: PairingPolicy::default(),
            rejoin: RejoinPolicy::default(),
            tick_jitter: Duration::ZERO,
        }
    }
}

impl MatchConfig {
    /// Fix values that would make the loops misbehave.
    ///
    /// - `tick_jitter` is capped at the shorter enabled interval.
    pub fn validated(mut self) -> Self {
        let shortest = [self.match_interval, self.cleanup_interval]
            .into_iter()
            .filter(|d| !d.is_zero())
            .min();
        if let Some(cap) = shortest {
            if self.tick_jitter > cap {
                tracing::warn!(
                    jitter_ms = self.tick_jitter.as_millis() as u64,
                    cap_ms = cap.as_millis() as u64,
                    "tick_jitter exceeds interval, clamping"
                );
                self.tick_jitter = cap;
            }
        }
        self
    }

    /// Scheduler settings for the matching loop.
    pub fn matching_tick(&self) -> TickConfig {
        TickConfig {
            initial_jitter: self.tick_jitter,
            ..TickConfig::every(self.match_interval)
        }
    }

    /// Scheduler settings for the cleanup loop.
    pub fn cleanup_tick(&self) -> TickConfig {
        TickConfig {
            initial_jitter: self.tick_jitter,
            ..TickConfig::every(self.cleanup_interval)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_intervals() {
        let cfg = MatchConfig::default();
        assert_eq!(cfg.match_interval, Duration::from_secs(1));
        assert_eq!(cfg.cleanup_interval, Duration::from_secs(300));
        assert_eq!(cfg.pairing, PairingPolicy::OncePerTick);
        assert_eq!(cfg.rejoin, RejoinPolicy::Reject);
    }

    #[test]
    fn test_validated_clamps_jitter_to_shortest_interval() {
        let cfg = MatchConfig {
            tick_jitter: Duration::from_secs(10),
            ..MatchConfig::default()
        }
        .validated();
        assert_eq!(cfg.tick_jitter, Duration::from_secs(1));
    }

    #[test]
    fn test_validated_ignores_disabled_intervals() {
        let cfg = MatchConfig {
            match_interval: Duration::ZERO,
            tick_jitter: Duration::from_secs(10),
            ..MatchConfig::default()
        }
        .validated();
        assert_eq!(cfg.tick_jitter, Duration::from_secs(10));
    }

    #[test]
    fn test_tick_configs_follow_intervals() {
        let cfg = MatchConfig::default();
        assert_eq!(cfg.matching_tick().period(), Some(Duration::from_secs(1)));
        assert_eq!(cfg.cleanup_tick().period(), Some(Duration::from_secs(300)));
    }
}
