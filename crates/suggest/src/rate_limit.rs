//! Anti-spam cooldown between accepted submissions.
//!
//! A single window is shared by the whole client: once a submission is let
//! through, the next one has to wait `min_interval`. This is advisory
//! throttling in the client, not a protection of the backends.
//!
//! [`RateLimiter::can_send`] checks *and* commits: an allowed answer already
//! starts the next window, whether or not the caller goes on to submit. A
//! denied answer leaves the window untouched.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// Cooldown used by the reference web client.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(60);

static GLOBAL_LIMITER: Lazy<Arc<RateLimiter>> =
    Lazy::new(|| Arc::new(RateLimiter::new(RateLimitConfig::default())));

/// Configuration for the submission cooldown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Minimum time between two accepted submissions, in milliseconds on the wire.
    #[serde(with = "crate::serde_millis", default = "default_min_interval")]
    pub min_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl RateLimitConfig {
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }
}

fn default_min_interval() -> Duration {
    DEFAULT_MIN_INTERVAL
}

/// Time source for the limiter.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Monotonic wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Handy for deterministic tests.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|p| p.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|p| p.into_inner());
        self.origin + offset
    }
}

/// Answer of [`RateLimiter::can_send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Permit granted; the cooldown window restarted at this call.
    Allowed,
    /// Still cooling down. `wait_secs` is the remaining time rounded up, always >= 1.
    Denied { wait_secs: u64 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }

    /// Message shown to the visitor when denied.
    pub fn message(&self) -> Option<String> {
        match self {
            RateDecision::Allowed => None,
            RateDecision::Denied { wait_secs } => Some(format!(
                "Veuillez attendre {wait_secs} secondes avant d'envoyer une nouvelle suggestion."
            )),
        }
    }
}

/// Counters exposed for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimiterStats {
    pub total_checks: u64,
    pub total_rejected: u64,
}

/// Single global cooldown gate.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    last_accepted: Mutex<Option<Instant>>,
    total_checks: AtomicU64,
    total_rejected: AtomicU64,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            last_accepted: Mutex::new(None),
            total_checks: AtomicU64::new(0),
            total_rejected: AtomicU64::new(0),
        }
    }

    /// Process-wide limiter with the default 60 second cooldown.
    pub fn global() -> Arc<RateLimiter> {
        Arc::clone(&GLOBAL_LIMITER)
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Checks the cooldown and, when allowed, consumes the permit.
    pub fn can_send(&self) -> RateDecision {
        let now = self.clock.now();
        let mut last = self.lock_last();
        self.total_checks.fetch_add(1, Ordering::SeqCst);

        if let Some(previous) = *last {
            let elapsed = now.saturating_duration_since(previous);
            if elapsed < self.config.min_interval {
                let wait_secs = ceil_secs(self.config.min_interval - elapsed);
                self.total_rejected.fetch_add(1, Ordering::SeqCst);
                debug!(wait_secs, "submission_cooldown_active");
                return RateDecision::Denied { wait_secs };
            }
        }

        *last = Some(now);
        RateDecision::Allowed
    }

    /// Forgets the last accepted submission, reopening the gate.
    pub fn reset(&self) {
        *self.lock_last() = None;
    }

    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            total_checks: self.total_checks.load(Ordering::SeqCst),
            total_rejected: self.total_rejected.load(Ordering::SeqCst),
        }
    }

    fn lock_last(&self) -> MutexGuard<'_, Option<Instant>> {
        self.last_accepted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn ceil_secs(remaining: Duration) -> u64 {
    let whole = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        whole + 1
    } else {
        whole
    }
}
