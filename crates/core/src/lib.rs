pub mod advanced;
mod catalog;
pub mod content;
pub mod error;
pub mod generation;
pub mod models;
pub mod plan;
pub mod preferences;
pub mod quick;
pub mod steps;
pub mod synthesizer;
pub mod validation;
pub mod workflow;

pub use advanced::{AdvancedAction, AdvancedTripFormData};
pub use content::*;
pub use error::PlanError;
pub use generation::{GenerationStatus, GENERATION_MESSAGES};
pub use models::*;
pub use plan::{confirm_snapshot, draft_snapshot, PlanFormData, TripPlan};
pub use preferences::{merge_preferences, UserPreferences};
pub use quick::{QuickAction, QuickTripFormData};
pub use steps::{AdvancedStep, FlowKind, PlanningStep, QuickStep};
pub use synthesizer::{synthesize, synthesize_seeded, TripParameters};
pub use workflow::{AdvancedFlow, Flow, QuickFlow, WorkflowAction, WorkflowSnapshot, WorkflowState};

/// Destinations with hand-written itinerary content.
pub fn known_destinations() -> Vec<&'static str> {
    catalog::known_destinations().collect()
}
