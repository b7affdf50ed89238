use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{info, warn};

use suggest::SuggestionInput;

use crate::{
    DeliveryService, EmailConfig, EmailStats, NotificationError, StatsTracker, TemplateParams,
};

/// Shown in place of a missing submitter address.
pub const EMAIL_NOT_PROVIDED: &str = "Non fourni";
/// Shown in place of missing criteria notes.
pub const CRITERIA_NOT_SPECIFIED: &str = "Non spécifié";

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered,
    Failed(NotificationError),
}

impl NotificationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, NotificationOutcome::Delivered)
    }

    pub fn error_detail(&self) -> Option<&NotificationError> {
        match self {
            NotificationOutcome::Delivered => None,
            NotificationOutcome::Failed(err) => Some(err),
        }
    }
}

/// Sends suggestion emails and feeds admin delivery outcomes into a [`StatsTracker`].
pub struct NotificationDispatcher {
    config: EmailConfig,
    service: Arc<dyn DeliveryService>,
    stats: Arc<StatsTracker>,
}

impl NotificationDispatcher {
    /// Dispatcher recording into the process-wide [`StatsTracker::global`].
    pub fn new(config: EmailConfig, service: Arc<dyn DeliveryService>) -> Self {
        if !config.is_configured() {
            warn!("emailjs_not_configured: notifications will not be sent");
        }
        Self {
            config,
            service,
            stats: StatsTracker::global(),
        }
    }

    pub fn with_stats(mut self, stats: Arc<StatsTracker>) -> Self {
        self.stats = stats;
        self
    }

    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    pub fn stats(&self) -> EmailStats {
        self.stats.snapshot()
    }

    /// Emails the administrator about `suggestion`. Every call is recorded
    /// exactly once in the stats, whatever the outcome.
    pub async fn notify_admin(&self, suggestion: &SuggestionInput) -> NotificationOutcome {
        let outcome = self.deliver_admin(suggestion).await;
        self.stats.record(&outcome);
        outcome
    }

    async fn deliver_admin(&self, suggestion: &SuggestionInput) -> NotificationOutcome {
        if !self.config.is_configured() {
            warn!(project = %suggestion.project_name, "notification_skipped_unconfigured");
            return NotificationOutcome::Failed(NotificationError::InvalidConfiguration);
        }

        let params = admin_template_params(suggestion, &self.config.admin_email, Local::now());
        match self
            .service
            .send(&self.config.service_id, &self.config.template_id, &params)
            .await
        {
            Ok(receipt) => {
                info!(
                    project = %suggestion.project_name,
                    status = receipt.status,
                    "notification_sent"
                );
                NotificationOutcome::Delivered
            }
            Err(failure) => {
                let err = failure.classify();
                warn!(
                    project = %suggestion.project_name,
                    status = ?failure.status,
                    error = %err,
                    "notification_failed"
                );
                NotificationOutcome::Failed(err)
            }
        }
    }

    /// Best-effort confirmation to the submitter. Returns `None` without doing
    /// anything when no address was given. Never touches the stats.
    pub async fn notify_user(
        &self,
        email: Option<&str>,
        project_name: &str,
    ) -> Option<NotificationOutcome> {
        let email = email.map(str::trim).filter(|e| !e.is_empty())?;

        if !self.config.is_configured() {
            return Some(NotificationOutcome::Failed(
                NotificationError::InvalidConfiguration,
            ));
        }

        let params = confirmation_template_params(email, project_name, Local::now());
        let outcome = match self
            .service
            .send(
                &self.config.service_id,
                &self.config.confirmation_template_id,
                &params,
            )
            .await
        {
            Ok(_) => {
                info!(project = %project_name, "confirmation_sent");
                NotificationOutcome::Delivered
            }
            Err(failure) => {
                let err = failure.classify();
                warn!(project = %project_name, error = %err, "confirmation_failed");
                NotificationOutcome::Failed(err)
            }
        };
        Some(outcome)
    }
}

/// Variables of the administrator notification template.
pub fn admin_template_params(
    suggestion: &SuggestionInput,
    admin_email: &str,
    submitted_at: DateTime<Local>,
) -> TemplateParams {
    let mut params = TemplateParams::new();
    params.insert("project_name".into(), suggestion.project_name.clone());
    params.insert("description".into(), suggestion.description.clone());
    params.insert("official_link".into(), suggestion.official_link.clone());
    params.insert(
        "user_email".into(),
        suggestion
            .contact_email()
            .unwrap_or(EMAIL_NOT_PROVIDED)
            .to_string(),
    );
    params.insert(
        "criteria_notes".into(),
        suggestion
            .criteria_notes()
            .unwrap_or(CRITERIA_NOT_SPECIFIED)
            .to_string(),
    );
    params.insert(
        "submission_date".into(),
        submitted_at.format(DATE_FORMAT).to_string(),
    );
    params.insert("to_email".into(), admin_email.to_string());
    params
}

/// Variables of the submitter confirmation template.
pub fn confirmation_template_params(
    email: &str,
    project_name: &str,
    confirmed_at: DateTime<Local>,
) -> TemplateParams {
    let mut params = TemplateParams::new();
    params.insert("user_email".into(), email.to_string());
    params.insert("project_name".into(), project_name.to_string());
    params.insert(
        "confirmation_date".into(),
        confirmed_at.format(DATE_FORMAT).to_string(),
    );
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeliveryFailure, DeliveryReceipt};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingService {
        calls: Mutex<Vec<(String, String, TemplateParams)>>,
        failure: Option<DeliveryFailure>,
    }

    impl RecordingService {
        fn failing(failure: DeliveryFailure) -> Self {
            Self {
                failure: Some(failure),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, String, TemplateParams)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DeliveryService for RecordingService {
        async fn send(
            &self,
            service_id: &str,
            template_id: &str,
            params: &TemplateParams,
        ) -> Result<DeliveryReceipt, DeliveryFailure> {
            self.calls.lock().unwrap().push((
                service_id.to_string(),
                template_id.to_string(),
                params.clone(),
            ));
            match &self.failure {
                Some(failure) => Err(failure.clone()),
                None => Ok(DeliveryReceipt {
                    status: 200,
                    text: "OK".into(),
                }),
            }
        }
    }

    fn configured() -> EmailConfig {
        EmailConfig {
            service_id: "service_abc123".into(),
            template_id: "template_suggestion".into(),
            public_key: "pk_live_0123".into(),
            admin_email: "admin@airdrop.example".into(),
            ..Default::default()
        }
    }

    fn suggestion() -> SuggestionInput {
        SuggestionInput::new(
            "Zeta",
            "A new layer-2 rollup project",
            "https://zeta.example",
        )
    }

    fn dispatcher(config: EmailConfig, service: Arc<RecordingService>) -> NotificationDispatcher {
        NotificationDispatcher::new(config, service).with_stats(Arc::new(StatsTracker::new()))
    }

    #[test]
    fn admin_params_fill_defaults_for_missing_optionals() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let params = admin_template_params(&suggestion(), "admin@airdrop.example", at);
        assert_eq!(params["project_name"], "Zeta");
        assert_eq!(params["official_link"], "https://zeta.example");
        assert_eq!(params["user_email"], EMAIL_NOT_PROVIDED);
        assert_eq!(params["criteria_notes"], CRITERIA_NOT_SPECIFIED);
        assert_eq!(params["submission_date"], "09/03/2024 14:05:07");
        assert_eq!(params["to_email"], "admin@airdrop.example");
    }

    #[test]
    fn admin_params_carry_optionals_when_present() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let input = suggestion()
            .with_email("me@zeta.example")
            .with_criteria("bridge before June");
        let params = admin_template_params(&input, "admin@airdrop.example", at);
        assert_eq!(params["user_email"], "me@zeta.example");
        assert_eq!(params["criteria_notes"], "bridge before June");
    }

    #[tokio::test]
    async fn delivered_notification_is_counted() {
        let service = Arc::new(RecordingService::default());
        let dispatcher = dispatcher(configured(), service.clone());

        let outcome = dispatcher.notify_admin(&suggestion()).await;
        assert!(outcome.is_success());

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "service_abc123");
        assert_eq!(calls[0].1, "template_suggestion");
        assert_eq!(dispatcher.stats().sent, 1);
        assert_eq!(dispatcher.stats().failed, 0);
    }

    #[tokio::test]
    async fn failed_notification_is_classified_and_counted() {
        let service = Arc::new(RecordingService::failing(DeliveryFailure::new(
            Some(402),
            Some("quota".into()),
        )));
        let dispatcher = dispatcher(configured(), service);

        let outcome = dispatcher.notify_admin(&suggestion()).await;
        assert_eq!(
            outcome,
            NotificationOutcome::Failed(NotificationError::QuotaExceeded)
        );
        let stats = dispatcher.stats();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.last_error, Some(NotificationError::QuotaExceeded));
    }

    #[tokio::test]
    async fn unconfigured_dispatcher_skips_service_but_records_failure() {
        let service = Arc::new(RecordingService::default());
        let dispatcher = dispatcher(EmailConfig::default(), service.clone());

        let outcome = dispatcher.notify_admin(&suggestion()).await;
        assert_eq!(
            outcome.error_detail(),
            Some(&NotificationError::InvalidConfiguration)
        );
        assert!(service.calls().is_empty());
        assert_eq!(dispatcher.stats().failed, 1);
    }

    #[tokio::test]
    async fn user_confirmation_without_email_is_a_no_op() {
        let service = Arc::new(RecordingService::default());
        let dispatcher = dispatcher(configured(), service.clone());

        assert!(dispatcher.notify_user(None, "Zeta").await.is_none());
        assert!(dispatcher.notify_user(Some("  "), "Zeta").await.is_none());
        assert!(service.calls().is_empty());
        assert_eq!(dispatcher.stats(), EmailStats::default());
    }

    #[tokio::test]
    async fn user_confirmation_uses_its_own_template_and_skips_stats() {
        let service = Arc::new(RecordingService::failing(DeliveryFailure::network()));
        let dispatcher = dispatcher(configured(), service.clone());

        let outcome = dispatcher
            .notify_user(Some("me@zeta.example"), "Zeta")
            .await
            .unwrap();
        assert_eq!(outcome, NotificationOutcome::Failed(NotificationError::Network));

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "template_confirmation");
        assert_eq!(calls[0].2["user_email"], "me@zeta.example");
        assert_eq!(calls[0].2["project_name"], "Zeta");
        assert!(calls[0].2.contains_key("confirmation_date"));
        assert_eq!(dispatcher.stats(), EmailStats::default());
    }
}
