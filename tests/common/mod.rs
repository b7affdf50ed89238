//! Fakes and builders shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use airdrop_relay::{
    DeliveryFailure, DeliveryReceipt, DeliveryService, EmailConfig, ManualClock, MemoryStore,
    NewSuggestion, NotificationDispatcher, PipelineConfig, RateLimitConfig, RateLimiter,
    RecordId, StatsTracker, StoreError, SubmissionPipeline, Suggestion, SuggestionInput,
    SuggestionStore, TemplateParams,
};

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub service_id: String,
    pub template_id: String,
    pub params: TemplateParams,
}

/// Delivery service that records every call and answers with a fixed result.
#[derive(Default)]
pub struct RecordingDelivery {
    sent: Mutex<Vec<SentEmail>>,
    failure: Option<DeliveryFailure>,
}

impl RecordingDelivery {
    pub fn failing(failure: DeliveryFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryService for RecordingDelivery {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<DeliveryReceipt, DeliveryFailure> {
        self.sent.lock().unwrap().push(SentEmail {
            service_id: service_id.to_string(),
            template_id: template_id.to_string(),
            params: params.clone(),
        });
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(DeliveryReceipt {
                status: 200,
                text: "OK".into(),
            }),
        }
    }
}

/// Memory store that counts inserts, optionally refusing them.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    creates: AtomicUsize,
    refuse_with: Option<StoreError>,
}

impl CountingStore {
    pub fn refusing(err: StoreError) -> Self {
        Self {
            refuse_with: Some(err),
            ..Default::default()
        }
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestionStore for CountingStore {
    async fn create_suggestion(&self, row: &NewSuggestion) -> Result<Suggestion, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        match &self.refuse_with {
            Some(err) => Err(err.clone()),
            None => self.inner.create_suggestion(row).await,
        }
    }

    async fn list_suggestions(&self) -> Result<Vec<Suggestion>, StoreError> {
        self.inner.list_suggestions().await
    }

    async fn mark_suggestion_processed(&self, id: RecordId) -> Result<Suggestion, StoreError> {
        self.inner.mark_suggestion_processed(id).await
    }
}

pub struct Harness {
    pub pipeline: SubmissionPipeline,
    pub store: Arc<CountingStore>,
    pub delivery: Arc<RecordingDelivery>,
    pub clock: Arc<ManualClock>,
    pub stats: Arc<StatsTracker>,
}

impl Harness {
    pub fn new(store: CountingStore, delivery: RecordingDelivery) -> Self {
        Self::with_config(store, delivery, PipelineConfig::default())
    }

    pub fn with_config(
        store: CountingStore,
        delivery: RecordingDelivery,
        config: PipelineConfig,
    ) -> Self {
        let store = Arc::new(store);
        let delivery = Arc::new(delivery);
        let clock = Arc::new(ManualClock::new());
        let stats = Arc::new(StatsTracker::new());

        let dispatcher = NotificationDispatcher::new(email_config(), delivery.clone())
            .with_stats(stats.clone());
        let limiter = RateLimiter::with_clock(RateLimitConfig::default(), clock.clone());
        let pipeline = SubmissionPipeline::new(store.clone(), dispatcher)
            .with_rate_limiter(Arc::new(limiter))
            .with_config(config);

        Self {
            pipeline,
            store,
            delivery,
            clock,
            stats,
        }
    }
}

pub fn email_config() -> EmailConfig {
    EmailConfig {
        service_id: "service_abc123".into(),
        template_id: "template_suggestion".into(),
        public_key: "pk_live_0123".into(),
        admin_email: "admin@airdrop.example".into(),
        ..Default::default()
    }
}

/// The reference submission: required fields set, optional ones blank.
pub fn zeta() -> SuggestionInput {
    SuggestionInput::new(
        "Zeta",
        "A new layer-2 rollup project",
        "https://zeta.example",
    )
    .with_email("")
    .with_criteria("")
}
