use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use wayfarer_core::{
    confirm_snapshot, draft_snapshot, AiGeneratedContent, FlowKind, GenerationStatus, PlanError,
    TripParameters, TripPlan, UserPreferences, WorkflowSnapshot,
};
use wayfarer_observability::AppMetrics;
use wayfarer_storage::{PersistedPlan, PlanRepository};

use crate::error::PlannerError;
use crate::flow::{Command, FlowSession};
use crate::generation::{run_synthesizer, GenerationConfig, GenerationHandle};

struct SessionState {
    user_id: String,
    flow: FlowSession,
    plan: Option<TripPlan>,
    generation: Option<CancellationToken>,
    /// Bumped whenever a generation run is started or cancelled so a stale
    /// task cannot touch the workflow.
    epoch: u64,
    touched_at: DateTime<Utc>,
}

impl SessionState {
    fn apply(&mut self, command: Command) {
        let placeholder = FlowSession::new(self.flow.kind());
        let flow = std::mem::replace(&mut self.flow, placeholder);
        self.flow = flow.reduce(command);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub user_id: String,
    pub workflow: WorkflowSnapshot,
    pub generation_message: &'static str,
    pub plan: Option<TripPlan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationOutcome {
    pub moved: bool,
    pub session: SessionView,
}

/// One user's pass through a wizard. Cheap to clone; clones share state.
///
/// Every mutation takes the session lock, including the background
/// generation task when it attaches content, so a draft saved while the
/// itinerary is being generated never loses the attached result.
///
/// Drafts and confirmations are serialized by a separate async lock. The
/// session's plan only changes once the store has accepted the snapshot.
pub struct PlanningSession<S> {
    id: String,
    state: Arc<Mutex<SessionState>>,
    lifecycle: Arc<tokio::sync::Mutex<()>>,
    store: Arc<S>,
    metrics: Arc<AppMetrics>,
    config: GenerationConfig,
}

impl<S> Clone for PlanningSession<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            state: Arc::clone(&self.state),
            lifecycle: Arc::clone(&self.lifecycle),
            store: Arc::clone(&self.store),
            metrics: Arc::clone(&self.metrics),
            config: self.config,
        }
    }
}

impl<S> fmt::Debug for PlanningSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanningSession")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S> PlanningSession<S>
where
    S: PlanRepository,
{
    pub fn new(
        flow: FlowKind,
        user_id: &str,
        store: Arc<S>,
        metrics: Arc<AppMetrics>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            state: Arc::new(Mutex::new(SessionState {
                user_id: user_id.trim().to_string(),
                flow: FlowSession::new(flow),
                plan: None,
                generation: None,
                epoch: 0,
                touched_at: Utc::now(),
            })),
            lifecycle: Arc::new(tokio::sync::Mutex::new(())),
            store,
            metrics,
            config,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn flow(&self) -> FlowKind {
        self.state.lock().flow.kind()
    }

    pub fn plan(&self) -> Option<TripPlan> {
        self.state.lock().plan.clone()
    }

    pub fn generated_content(&self) -> Option<AiGeneratedContent> {
        self.state.lock().flow.ai_content().cloned()
    }

    pub fn is_generating(&self) -> bool {
        self.state.lock().flow.is_generating()
    }

    /// When the session was opened or last looked up.
    pub fn last_touched(&self) -> DateTime<Utc> {
        self.state.lock().touched_at
    }

    pub(crate) fn touch_at(&self, now: DateTime<Utc>) {
        let mut state = self.state.lock();
        if now > state.touched_at {
            state.touched_at = now;
        }
    }

    pub fn view(&self) -> SessionView {
        let state = self.state.lock();
        self.view_of(&state)
    }

    fn view_of(&self, state: &SessionState) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            user_id: state.user_id.clone(),
            workflow: state.flow.snapshot(),
            generation_message: state.flow.generation().message(),
            plan: state.plan.clone(),
        }
    }

    /// Applies a flow-specific tagged action such as
    /// `{"type": "toggle_interest", "interest": "food"}`.
    pub fn edit(&self, action: serde_json::Value) -> Result<SessionView, PlannerError> {
        let mut state = self.state.lock();
        if state.flow.is_generating() {
            return Err(PlanError::GenerationInProgress.into());
        }
        let edited = state.flow.clone().edit_json(action)?;
        state.flow = edited;
        Ok(self.view_of(&state))
    }

    pub fn apply_preferences(&self, prefs: &UserPreferences) -> Result<SessionView, PlannerError> {
        let mut state = self.state.lock();
        if state.flow.is_generating() {
            return Err(PlanError::GenerationInProgress.into());
        }
        let applied = state.flow.clone().apply_preferences(prefs)?;
        state.flow = applied;
        debug!(session_id = %self.id, "preferences applied");
        Ok(self.view_of(&state))
    }

    pub fn next(&self) -> NavigationOutcome {
        self.navigate(Command::Next)
    }

    pub fn prev(&self) -> NavigationOutcome {
        self.navigate(Command::Prev)
    }

    pub fn goto(&self, index: usize) -> NavigationOutcome {
        self.navigate(Command::Goto(index))
    }

    fn navigate(&self, command: Command) -> NavigationOutcome {
        let mut state = self.state.lock();
        let before = state.flow.step_index();
        state.apply(command);
        let after = state.flow.step_index();

        let moved = before != after;
        self.metrics.record_navigation(moved);
        if moved {
            debug!(session_id = %self.id, from = before, to = after, "step changed");
        } else {
            debug!(session_id = %self.id, step = before, "navigation blocked");
        }

        NavigationOutcome {
            moved,
            session: self.view_of(&state),
        }
    }

    /// Starts the background generation task. Must be called from within a
    /// Tokio runtime.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn start_generation(&self) -> Result<GenerationHandle, PlanError> {
        let mut state = self.state.lock();
        if state.flow.is_generating() {
            return Err(PlanError::GenerationInProgress);
        }
        if let Some(step) = state.flow.first_invalid_step() {
            return Err(PlanError::ValidationFailed {
                step: step.to_string(),
            });
        }

        let params = state.flow.form_data().trip_parameters();
        state.apply(Command::GenerationStarted);
        state.epoch += 1;

        let token = CancellationToken::new();
        state.generation = Some(token.clone());
        let (tx, rx) = watch::channel(state.flow.generation());

        tokio::spawn(drive_generation(
            self.id.clone(),
            Arc::clone(&self.state),
            Arc::clone(&self.metrics),
            self.config,
            state.epoch,
            token.clone(),
            tx,
            params,
        ));

        self.metrics.inc_generation_started();
        info!(flow = state.flow.kind().as_code(), "generation started");
        Ok(GenerationHandle::new(token, rx))
    }

    /// Cancels the running generation and returns the workflow to idle.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn cancel_generation(&self) -> Result<SessionView, PlanError> {
        let mut state = self.state.lock();
        if !state.flow.is_generating() {
            return Err(PlanError::NotGenerating);
        }

        if let Some(token) = state.generation.take() {
            token.cancel();
        }
        state.apply(Command::GenerationCancelled);
        state.epoch += 1;

        self.metrics.inc_generation_cancelled();
        info!("generation cancelled");
        Ok(self.view_of(&state))
    }

    /// Rejected while generation runs; the caller has to cancel first.
    pub fn close(&self) -> Result<(), PlanError> {
        if self.is_generating() {
            return Err(PlanError::GenerationInProgress);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn save_draft(&self) -> Result<PersistedPlan, PlanError> {
        let _serial = self.lifecycle.lock().await;
        let plan = {
            let state = self.state.lock();
            draft_snapshot(
                state.plan.as_ref(),
                &state.user_id,
                state.flow.form_data(),
                state.flow.ai_content().cloned(),
                Utc::now(),
            )
        };

        let persisted = self.persist(&plan).await?;
        self.commit(&persisted.plan);
        self.metrics.inc_draft_saved();
        info!(plan_id = %persisted.plan.id, revision = persisted.revision, "draft saved");
        Ok(persisted)
    }

    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn confirm_plan(&self) -> Result<PersistedPlan, PlanError> {
        let _serial = self.lifecycle.lock().await;
        let plan = {
            let state = self.state.lock();
            confirm_snapshot(
                state.plan.as_ref(),
                &state.user_id,
                state.flow.form_data(),
                state.flow.ai_content().cloned(),
                Utc::now(),
            )
        };

        let persisted = self.persist(&plan).await?;
        self.commit(&persisted.plan);
        self.metrics.inc_plan_confirmed();
        info!(plan_id = %persisted.plan.id, revision = persisted.revision, "plan confirmed");
        Ok(persisted)
    }

    /// Adopts a stored snapshot as the session's plan. Content a generation
    /// run attached while the store was busy is carried over.
    fn commit(&self, stored: &TripPlan) {
        let mut state = self.state.lock();
        let mut plan = stored.clone();
        if let Some(content) = state.flow.ai_content() {
            if plan.ai_content.as_ref() != Some(content) {
                plan.ai_content = Some(content.clone());
                plan.updated_at = Utc::now();
            }
        }
        state.plan = Some(plan);
    }

    async fn persist(&self, plan: &TripPlan) -> Result<PersistedPlan, PlanError> {
        self.store.save(plan).await.map_err(|err| {
            self.metrics.inc_persistence_failure();
            warn!(plan_id = %plan.id, error = %err, "plan persistence failed");
            PlanError::PersistenceFailed(format!("{:#}", err))
        })
    }
}

const MIN_TICK: std::time::Duration = std::time::Duration::from_millis(1);

#[allow(clippy::too_many_arguments)]
async fn drive_generation(
    session_id: String,
    state: Arc<Mutex<SessionState>>,
    metrics: Arc<AppMetrics>,
    config: GenerationConfig,
    epoch: u64,
    token: CancellationToken,
    progress: watch::Sender<GenerationStatus>,
    params: TripParameters,
) {
    let started = Instant::now();
    let mut ticker = tokio::time::interval(config.tick.max(MIN_TICK));
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                let status = settle_cancelled(&session_id, &state, &metrics, epoch);
                let _ = progress.send(status);
                return;
            }
            _ = ticker.tick() => {}
        }

        let status = {
            let mut state = state.lock();
            if state.epoch != epoch {
                return;
            }
            state.apply(Command::GenerationTick(config.step));
            state.flow.generation()
        };
        let _ = progress.send(status);
        if status.is_complete() {
            break;
        }
    }

    let content = run_synthesizer(&params, Utc::now(), config.seed);

    let status = {
        let mut guard = state.lock();
        if guard.epoch != epoch || token.is_cancelled() {
            None
        } else {
            let days = content.days.len();
            let now = Utc::now();
            if let Some(plan) = guard.plan.as_mut() {
                plan.ai_content = Some(content.clone());
                plan.updated_at = now;
            }
            guard.apply(Command::GenerationFinished(Box::new(content)));
            guard.generation = None;
            info!(session_id = %session_id, days, "itinerary attached");
            Some(guard.flow.generation())
        }
    };

    match status {
        Some(status) => {
            metrics.observe_generation(started.elapsed());
            let _ = progress.send(status);
        }
        None => {
            let status = settle_cancelled(&session_id, &state, &metrics, epoch);
            let _ = progress.send(status);
        }
    }
}

/// Returns the workflow to idle after the token fired, unless
/// `cancel_generation` already did.
fn settle_cancelled(
    session_id: &str,
    state: &Mutex<SessionState>,
    metrics: &AppMetrics,
    epoch: u64,
) -> GenerationStatus {
    let mut state = state.lock();
    if state.epoch != epoch {
        return GenerationStatus::default();
    }
    if state.flow.is_generating() {
        state.apply(Command::GenerationCancelled);
        state.generation = None;
        state.epoch += 1;
        metrics.inc_generation_cancelled();
        info!(session_id, "generation cancelled");
    }
    state.flow.generation()
}
