//! Airdrop Checker notifications
//!
//! Emails the administrator when a visitor suggests an airdrop and, when
//! asked, sends the visitor a confirmation. Delivery goes through EmailJS;
//! the crate only builds template variables, calls the service and classifies
//! what comes back.
//!
//! - [`NotificationDispatcher`] - builds the message, sends it, classifies the outcome
//! - [`DeliveryService`] - the delivery collaborator; [`EmailJsClient`] talks to the REST API
//! - [`StatsTracker`] - delivered/failed counters for admin notifications
//!
//! Failures never bubble up as errors: callers get a [`NotificationOutcome`]
//! whose error detail renders as a message fit for the end user.
//!
//! ## Example
//!
//! ```no_run
//! use notify::{EmailConfig, EmailJsClient, NotificationDispatcher};
//! use std::sync::Arc;
//! use suggest::SuggestionInput;
//!
//! # async fn run() -> Result<(), reqwest::Error> {
//! let cfg = EmailConfig {
//!     service_id: "service_abc123".into(),
//!     template_id: "template_suggestion".into(),
//!     public_key: "pk_live_0123".into(),
//!     ..Default::default()
//! };
//! let client = Arc::new(EmailJsClient::new(&cfg)?);
//! let dispatcher = NotificationDispatcher::new(cfg, client);
//!
//! let input = SuggestionInput::new("Zeta", "A new layer-2 rollup project", "https://zeta.example");
//! let outcome = dispatcher.notify_admin(&input).await;
//! if let Some(err) = outcome.error_detail() {
//!     eprintln!("{err}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;

mod delivery;
mod dispatcher;
mod stats;

pub use crate::config::EmailConfig;
pub use crate::delivery::{DeliveryReceipt, DeliveryService, EmailJsClient, TemplateParams};
pub use crate::dispatcher::{
    admin_template_params, confirmation_template_params, NotificationDispatcher,
    NotificationOutcome, CRITERIA_NOT_SPECIFIED, EMAIL_NOT_PROVIDED,
};
pub use crate::error::{DeliveryFailure, NotificationError};
pub use crate::stats::{EmailStats, StatsTracker};
