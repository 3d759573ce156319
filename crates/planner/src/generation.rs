use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use wayfarer_core::{synthesize, synthesize_seeded, AiGeneratedContent, GenerationStatus, TripParameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Delay between progress ticks.
    pub tick: Duration,
    /// Percent added per tick.
    pub step: u8,
    /// Fixed seed for the synthesizer; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(50),
            step: 5,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Ticks as fast as the runtime allows. Used by tests and the CLI.
    pub fn immediate(seed: u64) -> Self {
        Self {
            tick: Duration::from_millis(1),
            step: 25,
            seed: Some(seed),
        }
    }
}

/// Caller's side of a running generation: progress stream plus cancel.
#[derive(Debug, Clone)]
pub struct GenerationHandle {
    token: CancellationToken,
    progress: watch::Receiver<GenerationStatus>,
}

impl GenerationHandle {
    pub(crate) fn new(token: CancellationToken, progress: watch::Receiver<GenerationStatus>) -> Self {
        Self { token, progress }
    }

    pub fn status(&self) -> GenerationStatus {
        *self.progress.borrow()
    }

    pub fn progress(&self) -> watch::Receiver<GenerationStatus> {
        self.progress.clone()
    }

    /// Stops the task before it attaches content. The workflow falls back to
    /// its idle generation state.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once generation has stopped, either finished or cancelled.
    pub async fn wait(mut self) -> GenerationStatus {
        loop {
            let status = *self.progress.borrow_and_update();
            if !status.is_generating {
                return status;
            }
            if self.progress.changed().await.is_err() {
                return *self.progress.borrow();
            }
        }
    }
}

pub(crate) fn run_synthesizer(
    params: &TripParameters,
    now: DateTime<Utc>,
    seed: Option<u64>,
) -> AiGeneratedContent {
    match seed {
        Some(seed) => synthesize_seeded(params, now, seed),
        None => synthesize(params, now, &mut rand::rng()),
    }
}
