//! Workspace umbrella crate for the Airdrop Checker integration layer.
//!
//! A visitor's airdrop suggestion goes through [`SubmissionPipeline`]:
//! validation, the client-wide cooldown, persistence, then an email to the
//! administrator. The member crates hold the pieces:
//!
//! - `suggest` - input type, validator, rate limiter
//! - `notify` - EmailJS delivery, outcome classification, delivery stats
//! - `store` - Supabase/PostgREST and in-memory persistence, change feed
//!
//! ```
//! use airdrop_relay::{
//!     EmailConfig, MemoryStore, NotificationDispatcher, RateLimitConfig, RateLimiter,
//!     SubmissionPipeline, SubmissionStatus, SuggestionInput,
//! };
//! # use airdrop_relay::{DeliveryFailure, DeliveryReceipt, DeliveryService, TemplateParams};
//! use std::sync::Arc;
//!
//! # struct Offline;
//! # #[async_trait::async_trait]
//! # impl DeliveryService for Offline {
//! #     async fn send(&self, _: &str, _: &str, _: &TemplateParams)
//! #         -> Result<DeliveryReceipt, DeliveryFailure> {
//! #         Err(DeliveryFailure::network())
//! #     }
//! # }
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher = NotificationDispatcher::new(EmailConfig::default(), Arc::new(Offline));
//! let pipeline = SubmissionPipeline::new(Arc::new(MemoryStore::new()), dispatcher)
//!     .with_rate_limiter(Arc::new(RateLimiter::new(RateLimitConfig::default())));
//!
//! let input = SuggestionInput::new("Zeta", "A new layer-2 rollup project", "https://zeta.example");
//! let result = pipeline.submit(&input).await;
//! assert!(result.persisted);
//! assert_eq!(result.status, SubmissionStatus::SavedNotNotified);
//! # }
//! ```

mod config;
mod pipeline;
pub mod telemetry;

pub use crate::config::{AppConfig, ConfigError, ConfigWarning, PipelineConfig};
pub use crate::pipeline::{
    MSG_DELIVERED, MSG_PERSISTENCE_FAILED, MSG_SAVED_NOT_NOTIFIED, SetupError, Stage,
    SubmissionPipeline, SubmissionResult, SubmissionStatus,
};

pub use notify::{
    DeliveryFailure, DeliveryReceipt, DeliveryService, EmailConfig, EmailJsClient, EmailStats,
    NotificationDispatcher, NotificationError, NotificationOutcome, StatsTracker, TemplateParams,
};
pub use store::{
    Airdrop, AirdropChanges, AirdropFilter, AirdropStatus, AirdropStore, ChangeEvent, ChangeFeed,
    ChangeKind, ChangeSource, MemoryStore, NewAirdrop, NewSuggestion, RecordId, RestStore,
    StatusCounts, StoreConfig, StoreError, Subscription, Suggestion, SuggestionStore, Table,
};
pub use suggest::{
    Clock, ManualClock, RateDecision, RateLimitConfig, RateLimiter, SuggestionInput,
    ValidationError, ValidationReport, validate,
};
