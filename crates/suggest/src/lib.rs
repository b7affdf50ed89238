//! Airdrop Checker suggestion intake
//!
//! Everything a suggestion goes through before anything leaves the process:
//! the user form is checked field by field, then the submission cooldown is
//! consulted.
//!
//! - [`validate`] - pure, all-or-nothing structural checks on a [`SuggestionInput`]
//! - [`RateLimiter`] - one global cooldown between accepted submissions
//!
//! ## Example
//!
//! ```
//! use suggest::{validate, RateLimiter, RateLimitConfig, SuggestionInput};
//!
//! let input = SuggestionInput::new(
//!     "Zeta",
//!     "A new layer-2 rollup project",
//!     "https://zeta.example",
//! );
//! assert!(validate(&input).is_valid());
//!
//! let limiter = RateLimiter::new(RateLimitConfig::default());
//! assert!(limiter.can_send().is_allowed());
//! assert!(!limiter.can_send().is_allowed());
//! ```

pub mod rate_limit;
mod serde_millis;
mod types;
mod validate;

pub use crate::rate_limit::{
    Clock, ManualClock, RateDecision, RateLimitConfig, RateLimiter, RateLimiterStats, SystemClock,
};
pub use crate::types::SuggestionInput;
pub use crate::validate::{
    is_valid_email, is_valid_url, validate, ValidationError, ValidationReport,
    MIN_DESCRIPTION_CHARS, MIN_PROJECT_NAME_CHARS,
};
