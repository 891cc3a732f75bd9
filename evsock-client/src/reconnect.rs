//! Reconnection strategies for automatic reconnection
//!
//! When the connection drops unexpectedly, the strategy determines how long
//! to wait before the next attempt and when to give up. Once a strategy
//! gives up, the socket emits a terminal `reconnect_failed` event and stops;
//! resuming requires a manual `connect()`.
//!
//! # Built-in Strategies
//!
//! - **ExponentialBackoff**: doubling delays starting from a base (default)
//! - **FixedDelay**: constant delay between attempts
//! - **NoReconnect**: give up immediately on the first disconnect
//!
//! # Custom Strategies
//!
//! Implement the `ReconnectionStrategy` trait to create custom behavior.
//!
//! # Examples
//!
//! ```rust
//! use evsock_client::ExponentialBackoff;
//! use std::time::Duration;
//!
//! // Default: 1s base doubling up to 30s, max 5 attempts
//! let default = ExponentialBackoff::default();
//!
//! // Custom: 100ms base, unbounded attempts
//! let custom = ExponentialBackoff::new(
//!     Duration::from_millis(100),
//!     Duration::from_secs(60),
//! );
//! ```

use std::time::Duration;

/// Trait for reconnection strategies
///
/// The strategy is consulted once per reconnect attempt until either the
/// connection is re-established or the strategy returns `None` to give up.
/// `reset()` is called after a successful connection so accumulated state
/// (attempt counters) starts fresh on the next disconnect.
pub trait ReconnectionStrategy: Send + Sync {
    /// Returns the delay before the next reconnection attempt
    ///
    /// `attempt` is the number of attempts already made (0-indexed: the
    /// first consultation after a disconnect passes 0).
    ///
    /// - `Some(duration)`: wait this long, then attempt to reconnect
    /// - `None`: give up; no further attempts are made
    fn next_delay(&mut self, attempt: u32) -> Option<Duration>;

    /// Reset the strategy state after a successful connection
    fn reset(&mut self);
}

/// Exponential backoff reconnection strategy with optional jitter
///
/// The delay for attempt `n` (1-indexed) is `base × 2^(n−1)`, capped at
/// `max_delay`.
pub struct ExponentialBackoff {
    base_delay: Duration,
    max_delay: Duration,
    max_attempts: Option<u32>,
    jitter: bool,
    current_attempt: u32,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff strategy with unbounded attempts
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
            max_attempts: None,
            jitter: false,
            current_attempt: 0,
        }
    }

    /// Set the maximum number of attempts before giving up
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Enable jitter to prevent thundering herd on shared backends
    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }
}

impl Default for ExponentialBackoff {
    /// Default policy: 1s base delay doubling up to 30s, max 5 attempts
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_secs(30)).with_max_attempts(5)
    }
}

impl ReconnectionStrategy for ExponentialBackoff {
    fn next_delay(&mut self, attempt: u32) -> Option<Duration> {
        self.current_attempt = attempt;

        if let Some(max) = self.max_attempts {
            if attempt >= max {
                return None;
            }
        }

        // base_delay * 2^attempt, capped at max_delay. The doubling
        // saturates so unbounded attempt counts cannot overflow.
        let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
        let scaled = (self.base_delay.as_millis() as u64).saturating_mul(factor);
        let delay = std::cmp::min(scaled, self.max_delay.as_millis() as u64);

        let mut final_delay = Duration::from_millis(delay);

        // Random extra 0-25% of the delay
        if self.jitter {
            use rand::Rng;
            let jitter_ms = rand::thread_rng().gen_range(0..=(delay / 4));
            final_delay = Duration::from_millis(delay + jitter_ms);
        }

        Some(final_delay)
    }

    fn reset(&mut self) {
        self.current_attempt = 0;
    }
}

/// Constant-delay strategy, useful in tests where backoff growth only
/// slows things down
pub struct FixedDelay {
    delay: Duration,
    max_attempts: Option<u32>,
}

impl FixedDelay {
    /// Create a strategy that always waits `delay` between attempts
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    /// Limit the number of attempts before giving up
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

impl ReconnectionStrategy for FixedDelay {
    fn next_delay(&mut self, attempt: u32) -> Option<Duration> {
        match self.max_attempts {
            Some(max) if attempt >= max => None,
            _ => Some(self.delay),
        }
    }

    // Stateless; the attempt counter lives with the caller
    fn reset(&mut self) {}
}

/// Strategy that gives up on the first disconnect
pub struct NoReconnect;

impl ReconnectionStrategy for NoReconnect {
    fn next_delay(&mut self, _attempt: u32) -> Option<Duration> {
        None
    }

    fn reset(&mut self) {}
}
