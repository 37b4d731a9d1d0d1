//! Logging setup and in-process counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Install the global fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Counters for user-facing write traffic
#[derive(Debug, Default)]
pub struct Metrics {
    comments_created: AtomicU64,
    honeypot_rejections: AtomicU64,
    likes_recorded: AtomicU64,
    progress_saved: AtomicU64,
    seed_requests: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment_created(&self) {
        self.comments_created.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "comments_created", "Metric incremented");
    }

    pub fn honeypot_rejected(&self) {
        self.honeypot_rejections.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "honeypot_rejections", "Metric incremented");
    }

    pub fn like_recorded(&self) {
        self.likes_recorded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "likes_recorded", "Metric incremented");
    }

    pub fn progress_saved(&self) {
        self.progress_saved.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "progress_saved", "Metric incremented");
    }

    pub fn seed_requested(&self) {
        self.seed_requests.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "seed_requests", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            comments_created: self.comments_created.load(Ordering::Relaxed),
            honeypot_rejections: self.honeypot_rejections.load(Ordering::Relaxed),
            likes_recorded: self.likes_recorded.load(Ordering::Relaxed),
            progress_saved: self.progress_saved.load(Ordering::Relaxed),
            seed_requests: self.seed_requests.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub comments_created: u64,
    pub honeypot_rejections: u64,
    pub likes_recorded: u64,
    pub progress_saved: u64,
    pub seed_requests: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_increments() {
        let metrics = Metrics::new();
        metrics.comment_created();
        metrics.comment_created();
        metrics.honeypot_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.comments_created, 2);
        assert_eq!(snapshot.honeypot_rejections, 1);
        assert_eq!(snapshot.likes_recorded, 0);
    }
}
