use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};

use notify::{EmailJsClient, NotificationDispatcher, NotificationError, NotificationOutcome};
use store::{NewSuggestion, RestStore, StoreError, Suggestion, SuggestionStore};
use suggest::{RateDecision, RateLimiter, SuggestionInput, validate};

use crate::config::{AppConfig, PipelineConfig};

/// Shown when the suggestion was saved and the administrator notified.
pub const MSG_DELIVERED: &str = "Merci ! Votre suggestion a été envoyée.";
/// Shown when the suggestion was saved but the notification failed.
pub const MSG_SAVED_NOT_NOTIFIED: &str = "Suggestion enregistrée mais erreur d'envoi email.";
/// Shown when the suggestion could not be saved.
pub const MSG_PERSISTENCE_FAILED: &str = "Erreur lors de l'enregistrement.";

/// Stage a submission reached before it terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    RateChecking,
    Persisting,
    Notifying,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::RateChecking => "rate_checking",
            Stage::Persisting => "persisting",
            Stage::Notifying => "notifying",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// End-to-end verdict of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Saved and the administrator was notified.
    Delivered,
    /// Saved, but the administrator notification failed.
    SavedNotNotified,
    Invalid,
    RateLimited,
    PersistenceFailed,
}

impl SubmissionStatus {
    /// The submission reached the store.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Delivered | SubmissionStatus::SavedNotNotified
        )
    }
}

/// Outcome handed back to the caller. `errors` carries user-facing text for
/// terminal failures; a failed notification shows up in `notified` and
/// `notification_error` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResult {
    pub status: SubmissionStatus,
    /// Last stage entered. [`Stage::Done`] for every saved submission.
    pub stage: Stage,
    pub persisted: bool,
    pub notified: bool,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_error: Option<NotificationError>,
}

impl SubmissionResult {
    fn rejected(status: SubmissionStatus, stage: Stage, errors: Vec<String>) -> Self {
        Self {
            status,
            stage,
            persisted: false,
            notified: false,
            errors,
            record: None,
            notification_error: None,
        }
    }

    /// Single line to show the submitter.
    pub fn message(&self) -> String {
        match self.status {
            SubmissionStatus::Delivered => MSG_DELIVERED.to_string(),
            SubmissionStatus::SavedNotNotified => MSG_SAVED_NOT_NOTIFIED.to_string(),
            SubmissionStatus::PersistenceFailed => MSG_PERSISTENCE_FAILED.to_string(),
            SubmissionStatus::Invalid | SubmissionStatus::RateLimited => self.errors.join("\n"),
        }
    }
}

/// Errors raised while wiring a pipeline from [`AppConfig`].
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to build the email client: {0}")]
    Email(#[from] reqwest::Error),
    #[error("failed to build the store client: {0}")]
    Store(#[from] StoreError),
}

/// Validate, throttle, persist, then notify. Every stage is terminal on
/// failure except notification, which only downgrades the result.
pub struct SubmissionPipeline {
    store: Arc<dyn SuggestionStore>,
    dispatcher: NotificationDispatcher,
    limiter: Arc<RateLimiter>,
    config: PipelineConfig,
}

impl SubmissionPipeline {
    /// Pipeline sharing the process-wide [`RateLimiter::global`].
    pub fn new(store: Arc<dyn SuggestionStore>, dispatcher: NotificationDispatcher) -> Self {
        Self {
            store,
            dispatcher,
            limiter: RateLimiter::global(),
            config: PipelineConfig::default(),
        }
    }

    /// Wires the hosted store and EmailJS from configuration. The limiter is
    /// private to this pipeline and uses the configured interval.
    pub fn from_config(config: &AppConfig) -> Result<Self, SetupError> {
        let store = Arc::new(RestStore::new(config.store.clone())?);
        let client = Arc::new(EmailJsClient::new(&config.email)?);
        let dispatcher = NotificationDispatcher::new(config.email.clone(), client);
        Ok(Self::new(store, dispatcher)
            .with_rate_limiter(Arc::new(RateLimiter::new(config.rate_limit)))
            .with_config(config.pipeline.clone()))
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub async fn submit(&self, input: &SuggestionInput) -> SubmissionResult {
        let span = info_span!("submission.run", project = %input.project_name.trim());
        self.run(input).instrument(span).await
    }

    async fn run(&self, input: &SuggestionInput) -> SubmissionResult {
        let report = validate(input);
        if !report.is_valid() {
            let errors = report.messages();
            info!(errors = errors.len(), "submission_rejected");
            return SubmissionResult::rejected(SubmissionStatus::Invalid, Stage::Validating, errors);
        }

        if let decision @ RateDecision::Denied { wait_secs } = self.limiter.can_send() {
            info!(wait_secs, "submission_rate_limited");
            return SubmissionResult::rejected(
                SubmissionStatus::RateLimited,
                Stage::RateChecking,
                decision.message().into_iter().collect(),
            );
        }

        let row = NewSuggestion::from(input);
        let record = match self.store.create_suggestion(&row).await {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "suggestion_persist_failed");
                return SubmissionResult::rejected(
                    SubmissionStatus::PersistenceFailed,
                    Stage::Persisting,
                    vec![MSG_PERSISTENCE_FAILED.to_string()],
                );
            }
        };
        info!(id = record.id, "suggestion_persisted");

        let outcome = self.dispatcher.notify_admin(input).await;

        if self.config.confirm_submitter {
            if let Some(NotificationOutcome::Failed(err)) = self
                .dispatcher
                .notify_user(input.contact_email(), &record.project_name)
                .await
            {
                warn!(error = %err, "submitter_confirmation_failed");
            }
        }

        let (status, notification_error) = match outcome {
            NotificationOutcome::Delivered => (SubmissionStatus::Delivered, None),
            NotificationOutcome::Failed(err) => (SubmissionStatus::SavedNotNotified, Some(err)),
        };
        SubmissionResult {
            status,
            stage: Stage::Done,
            persisted: true,
            notified: notification_error.is_none(),
            errors: Vec::new(),
            record: Some(record),
            notification_error,
        }
    }
}
