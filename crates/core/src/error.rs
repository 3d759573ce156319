use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("step `{step}` is not complete")]
    ValidationFailed { step: String },
    #[error("failed to persist plan: {0}")]
    PersistenceFailed(String),
    #[error("itinerary generation failed: {0}")]
    GenerationFailed(String),
    #[error("itinerary generation is still running")]
    GenerationInProgress,
    #[error("no itinerary generation is running")]
    NotGenerating,
    #[error("cannot move plan from `{from}` to `{to}`")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl PlanError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => "validation_failed",
            Self::PersistenceFailed(_) => "persistence_failed",
            Self::GenerationFailed(_) => "generation_failed",
            Self::GenerationInProgress => "generation_in_progress",
            Self::NotGenerating => "not_generating",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }
}
