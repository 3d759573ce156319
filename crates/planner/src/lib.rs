pub mod budget;
pub mod error;
pub mod flow;
pub mod generation;
pub mod registry;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{TimeDelta, Utc};
use tracing::{info, instrument};
use wayfarer_core::{AiGeneratedContent, FlowKind, TripParameters};
use wayfarer_currency::{
    CurrencyRequest, CurrencyResponse, CurrencyService, HttpRateProvider, RateProvider,
};
use wayfarer_observability::AppMetrics;
use wayfarer_storage::{PersistedPlan, PlanRepository};

pub use budget::{display_budget, BudgetDisplay};
pub use error::PlannerError;
pub use flow::FlowSession;
pub use generation::{GenerationConfig, GenerationHandle};
pub use registry::SessionRegistry;
pub use session::{NavigationOutcome, PlanningSession, SessionView};

/// Idle time after which an abandoned wizard is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Entry point shared by the HTTP API and the CLI.
pub struct TripPlanner<S, P = HttpRateProvider> {
    store: Arc<S>,
    currency: Arc<CurrencyService<P>>,
    sessions: Arc<SessionRegistry<S>>,
    metrics: Arc<AppMetrics>,
    config: GenerationConfig,
    session_ttl: Duration,
}

impl<S, P> Clone for TripPlanner<S, P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            currency: Arc::clone(&self.currency),
            sessions: Arc::clone(&self.sessions),
            metrics: Arc::clone(&self.metrics),
            config: self.config,
            session_ttl: self.session_ttl,
        }
    }
}

impl<S, P> TripPlanner<S, P>
where
    S: PlanRepository,
    P: RateProvider,
{
    pub fn new(
        store: Arc<S>,
        currency: CurrencyService<P>,
        metrics: Arc<AppMetrics>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            store,
            currency: Arc::new(currency),
            sessions: Arc::new(SessionRegistry::default()),
            metrics,
            config,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    pub fn has_currency_upstream(&self) -> bool {
        self.currency.has_upstream()
    }

    pub fn sessions(&self) -> &SessionRegistry<S> {
        &self.sessions
    }

    #[instrument(skip(self))]
    pub fn open_session(&self, flow: FlowKind, user_id: &str) -> PlanningSession<S> {
        self.metrics.inc_request();
        self.purge_expired_sessions();
        let session = PlanningSession::new(
            flow,
            user_id,
            Arc::clone(&self.store),
            Arc::clone(&self.metrics),
            self.config,
        );
        self.sessions.insert(session.clone());
        info!(session_id = %session.id(), flow = flow.as_code(), "session opened");
        session
    }

    /// Drops sessions idle for longer than the configured TTL.
    pub fn purge_expired_sessions(&self) -> u64 {
        let ttl = TimeDelta::from_std(self.session_ttl).unwrap_or(TimeDelta::MAX);
        let removed = self.sessions.purge_expired(Utc::now(), ttl);
        if removed > 0 {
            info!(removed, "expired sessions purged");
        }
        removed
    }

    pub fn session(&self, session_id: &str) -> Result<PlanningSession<S>, PlannerError> {
        self.sessions.get(session_id)
    }

    pub fn close_session(&self, session_id: &str) -> Result<(), PlannerError> {
        self.sessions.remove(session_id)?;
        info!(session_id, "session closed");
        Ok(())
    }

    pub async fn list_plans(&self, user_id: &str) -> Result<Vec<PersistedPlan>> {
        self.metrics.inc_request();
        self.store.list_for_user(user_id).await
    }

    /// Stateless synthesis. Falls back to the configured seed, then entropy.
    pub fn synthesize(&self, params: &TripParameters, seed: Option<u64>) -> AiGeneratedContent {
        self.metrics.inc_request();
        generation::run_synthesizer(params, Utc::now(), seed.or(self.config.seed))
    }

    pub async fn exchange(&self, request: CurrencyRequest) -> Result<CurrencyResponse, PlannerError> {
        self.metrics.inc_request();
        let response = self.currency.handle(request).await?;
        if response.is_fallback() {
            self.metrics.inc_currency_fallback();
        }
        Ok(response)
    }

    /// Budget of the session's generated itinerary in `currency`, if any
    /// itinerary exists yet.
    pub async fn session_budget(
        &self,
        session_id: &str,
        currency: &str,
    ) -> Result<Option<BudgetDisplay>, PlannerError> {
        let session = self.session(session_id)?;
        let estimate = session
            .generated_content()
            .map(|content| content.budget_estimate);
        match estimate {
            Some(estimate) => Ok(Some(
                display_budget(&self.currency, &estimate, currency, &self.metrics).await,
            )),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use wayfarer_core::{DateRange, Interest};
    use wayfarer_currency::RateSource;
    use wayfarer_storage::MemoryStore;

    use super::*;

    fn planner() -> TripPlanner<MemoryStore> {
        TripPlanner::new(
            Arc::new(MemoryStore::new()),
            CurrencyService::offline(),
            AppMetrics::shared(),
            GenerationConfig::immediate(9),
        )
    }

    #[tokio::test]
    async fn sessions_open_and_close() {
        let planner = planner();
        let session = planner.open_session(FlowKind::Advanced, "u-1");
        assert_eq!(planner.sessions().len(), 1);
        assert_eq!(planner.session(session.id()).unwrap().flow(), FlowKind::Advanced);

        planner.close_session(session.id()).unwrap();
        assert!(planner.sessions().is_empty());
        assert_eq!(
            planner.session(session.id()).unwrap_err().code(),
            "session_not_found"
        );
    }

    #[tokio::test]
    async fn opening_a_session_purges_expired_ones() {
        let planner = planner().with_session_ttl(Duration::ZERO);
        let stale = planner.open_session(FlowKind::Quick, "u-1");
        assert_eq!(planner.session_ttl(), Duration::ZERO);

        let fresh = planner.open_session(FlowKind::Quick, "u-2");
        assert!(planner.session(stale.id()).is_err());
        assert_eq!(planner.sessions().len(), 1);
        assert_eq!(planner.sessions().get(fresh.id()).unwrap().id(), fresh.id());
    }

    #[tokio::test]
    async fn synthesize_uses_configured_seed() {
        let planner = planner();
        let params = TripParameters {
            destination: Some("Tokyo".to_string()),
            dates: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 6, 1),
                NaiveDate::from_ymd_opt(2024, 6, 5),
            ),
            interests: vec![Interest::Food],
            ..TripParameters::default()
        };
        let first = planner.synthesize(&params, None);
        let second = planner.synthesize(&params, None);
        assert_eq!(first.weather_forecast, second.weather_forecast);
        assert_eq!(first.days.len(), 5);
    }

    #[tokio::test]
    async fn exchange_counts_fallbacks() {
        let planner = planner();
        let response = planner
            .exchange(CurrencyRequest::Convert {
                amount: 10.0,
                from_currency: "USD".to_string(),
                to_currency: "JPY".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.meta.source, RateSource::Fallback);
        assert_eq!(planner.metrics().snapshot().currency_fallback_total, 1);
    }
}
