//! Shared limiter and stats under a multi-threaded runtime.

mod common;

use std::sync::Arc;

use airdrop_relay::{
    DeliveryFailure, NotificationDispatcher, NotificationError, StatsTracker, SubmissionStatus,
};
use common::{CountingStore, Harness, RecordingDelivery, email_config, zeta};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_get_one_permit() {
    let h = Arc::new(Harness::new(
        CountingStore::default(),
        RecordingDelivery::default(),
    ));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.pipeline.submit(&zeta()).await.status })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    let delivered = statuses
        .iter()
        .filter(|s| **s == SubmissionStatus::Delivered)
        .count();
    let limited = statuses
        .iter()
        .filter(|s| **s == SubmissionStatus::RateLimited)
        .count();
    assert_eq!(delivered, 1);
    assert_eq!(limited, 15);
    assert_eq!(h.store.create_calls(), 1);
    assert_eq!(h.delivery.call_count(), 1);

    let limiter = h.pipeline.rate_limiter().stats();
    assert_eq!(limiter.total_checks, 16);
    assert_eq!(limiter.total_rejected, 15);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stats_stay_exact_under_parallel_dispatch() {
    let stats = Arc::new(StatsTracker::new());
    let ok = Arc::new(
        NotificationDispatcher::new(email_config(), Arc::new(RecordingDelivery::default()))
            .with_stats(stats.clone()),
    );
    let failing = Arc::new(
        NotificationDispatcher::new(
            email_config(),
            Arc::new(RecordingDelivery::failing(DeliveryFailure::new(
                Some(404),
                None,
            ))),
        )
        .with_stats(stats.clone()),
    );

    let mut handles = Vec::new();
    for i in 0..40 {
        let dispatcher = if i % 4 == 0 {
            Arc::clone(&failing)
        } else {
            Arc::clone(&ok)
        };
        handles.push(tokio::spawn(async move {
            dispatcher.notify_admin(&zeta()).await
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let snapshot = stats.snapshot();
    assert_eq!(snapshot.sent, 30);
    assert_eq!(snapshot.failed, 10);
    assert_eq!(snapshot.last_error, Some(NotificationError::NotFound));
}
