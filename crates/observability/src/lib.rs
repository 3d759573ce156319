use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    steps_advanced_total: AtomicU64,
    navigation_blocked_total: AtomicU64,
    drafts_saved_total: AtomicU64,
    plans_confirmed_total: AtomicU64,
    generations_started_total: AtomicU64,
    generations_completed_total: AtomicU64,
    generations_cancelled_total: AtomicU64,
    persistence_failures_total: AtomicU64,
    currency_fallback_total: AtomicU64,
    total_generation_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub steps_advanced_total: u64,
    pub navigation_blocked_total: u64,
    pub drafts_saved_total: u64,
    pub plans_confirmed_total: u64,
    pub generations_started_total: u64,
    pub generations_completed_total: u64,
    pub generations_cancelled_total: u64,
    pub persistence_failures_total: u64,
    pub currency_fallback_total: u64,
    pub avg_generation_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a navigation attempt. Blocked moves are counted separately
    /// from successful ones.
    pub fn record_navigation(&self, advanced: bool) {
        if advanced {
            self.steps_advanced_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.navigation_blocked_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn inc_draft_saved(&self) {
        self.drafts_saved_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_plan_confirmed(&self) {
        self.plans_confirmed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_generation_started(&self) {
        self.generations_started_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_generation(&self, duration: Duration) {
        self.generations_completed_total.fetch_add(1, Ordering::Relaxed);
        self.total_generation_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn inc_generation_cancelled(&self) {
        self.generations_cancelled_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_persistence_failure(&self) {
        self.persistence_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_currency_fallback(&self) {
        self.currency_fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let completed = self.generations_completed_total.load(Ordering::Relaxed);
        let generation_millis = self.total_generation_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            steps_advanced_total: self.steps_advanced_total.load(Ordering::Relaxed),
            navigation_blocked_total: self.navigation_blocked_total.load(Ordering::Relaxed),
            drafts_saved_total: self.drafts_saved_total.load(Ordering::Relaxed),
            plans_confirmed_total: self.plans_confirmed_total.load(Ordering::Relaxed),
            generations_started_total: self.generations_started_total.load(Ordering::Relaxed),
            generations_completed_total: completed,
            generations_cancelled_total: self.generations_cancelled_total.load(Ordering::Relaxed),
            persistence_failures_total: self.persistence_failures_total.load(Ordering::Relaxed),
            currency_fallback_total: self.currency_fallback_total.load(Ordering::Relaxed),
            avg_generation_millis: if completed == 0 {
                0.0
            } else {
                generation_millis as f64 / completed as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,wayfarer_api=info,wayfarer_planner=info,wayfarer_currency=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
        tracing::info!(service = service_name, "tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_averages_completed_generations() {
        let metrics = AppMetrics::default();
        metrics.record_navigation(true);
        metrics.record_navigation(false);
        metrics.record_navigation(false);
        metrics.observe_generation(Duration::from_millis(100));
        metrics.observe_generation(Duration::from_millis(300));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.steps_advanced_total, 1);
        assert_eq!(snapshot.navigation_blocked_total, 2);
        assert_eq!(snapshot.generations_completed_total, 2);
        assert_eq!(snapshot.avg_generation_millis, 200.0);
    }
}
