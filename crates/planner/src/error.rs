use thiserror::Error;
use wayfarer_core::PlanError;
use wayfarer_currency::CurrencyError;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Currency(#[from] CurrencyError),
    #[error("invalid {flow} action: {message}")]
    InvalidAction { flow: &'static str, message: String },
    #[error("session `{0}` not found")]
    SessionNotFound(String),
}

impl PlannerError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Plan(err) => err.code(),
            Self::Currency(CurrencyError::Upstream(_)) => "currency_upstream",
            Self::Currency(_) => "invalid_currency_request",
            Self::InvalidAction { .. } => "invalid_action",
            Self::SessionNotFound(_) => "session_not_found",
        }
    }
}
