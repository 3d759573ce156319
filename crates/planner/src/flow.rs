use wayfarer_core::validation::{first_invalid_advanced_step, first_invalid_quick_step};
use wayfarer_core::{
    AdvancedAction, AdvancedFlow, AiGeneratedContent, FlowKind, GenerationStatus, PlanFormData,
    QuickAction, QuickFlow, UserPreferences, WorkflowAction, WorkflowSnapshot, WorkflowState,
};

use crate::error::PlannerError;

/// Flow-independent workflow commands.
#[derive(Debug, Clone)]
pub(crate) enum Command {
    Next,
    Prev,
    Goto(usize),
    GenerationStarted,
    GenerationTick(u8),
    GenerationFinished(Box<AiGeneratedContent>),
    GenerationCancelled,
}

impl Command {
    fn into_action<A>(self) -> WorkflowAction<A> {
        match self {
            Command::Next => WorkflowAction::Next,
            Command::Prev => WorkflowAction::Prev,
            Command::Goto(index) => WorkflowAction::Goto(index),
            Command::GenerationStarted => WorkflowAction::GenerationStarted,
            Command::GenerationTick(step) => WorkflowAction::GenerationTick { step },
            Command::GenerationFinished(content) => WorkflowAction::GenerationFinished(content),
            Command::GenerationCancelled => WorkflowAction::GenerationCancelled,
        }
    }
}

/// The workflow behind one session, either wizard.
#[derive(Debug, Clone)]
pub enum FlowSession {
    Quick(WorkflowState<QuickFlow>),
    Advanced(WorkflowState<AdvancedFlow>),
}

impl FlowSession {
    pub fn new(kind: FlowKind) -> Self {
        match kind {
            FlowKind::Quick => Self::Quick(WorkflowState::new()),
            FlowKind::Advanced => Self::Advanced(WorkflowState::new()),
        }
    }

    pub fn kind(&self) -> FlowKind {
        match self {
            Self::Quick(_) => FlowKind::Quick,
            Self::Advanced(_) => FlowKind::Advanced,
        }
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        match self {
            Self::Quick(state) => state.snapshot(),
            Self::Advanced(state) => state.snapshot(),
        }
    }

    pub fn step_index(&self) -> usize {
        match self {
            Self::Quick(state) => state.step_index(),
            Self::Advanced(state) => state.step_index(),
        }
    }

    pub fn generation(&self) -> GenerationStatus {
        match self {
            Self::Quick(state) => state.generation(),
            Self::Advanced(state) => state.generation(),
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generation().is_generating
    }

    pub fn is_ready(&self) -> bool {
        match self {
            Self::Quick(state) => state.is_ready(),
            Self::Advanced(state) => state.is_ready(),
        }
    }

    pub fn ai_content(&self) -> Option<&AiGeneratedContent> {
        match self {
            Self::Quick(state) => state.ai_content(),
            Self::Advanced(state) => state.ai_content(),
        }
    }

    pub fn form_data(&self) -> PlanFormData {
        match self {
            Self::Quick(state) => PlanFormData::Quick(state.data().clone()),
            Self::Advanced(state) => PlanFormData::Advanced(state.data().clone()),
        }
    }

    /// Id of the earliest step that blocks generation.
    pub fn first_invalid_step(&self) -> Option<&'static str> {
        match self {
            Self::Quick(state) => {
                first_invalid_quick_step(state.data()).map(|step| step.descriptor().id)
            }
            Self::Advanced(state) => {
                first_invalid_advanced_step(state.data()).map(|step| step.descriptor().id)
            }
        }
    }

    pub(crate) fn reduce(self, command: Command) -> Self {
        match self {
            Self::Quick(state) => Self::Quick(state.reduce(command.into_action())),
            Self::Advanced(state) => Self::Advanced(state.reduce(command.into_action())),
        }
    }

    /// Decodes a flow-specific tagged action and applies it.
    pub fn edit_json(self, action: serde_json::Value) -> Result<Self, PlannerError> {
        match self {
            Self::Quick(state) => {
                let action: QuickAction =
                    serde_json::from_value(action).map_err(|err| PlannerError::InvalidAction {
                        flow: FlowKind::Quick.as_code(),
                        message: err.to_string(),
                    })?;
                Ok(Self::Quick(state.edit(action)))
            }
            Self::Advanced(state) => {
                let action: AdvancedAction =
                    serde_json::from_value(action).map_err(|err| PlannerError::InvalidAction {
                        flow: FlowKind::Advanced.as_code(),
                        message: err.to_string(),
                    })?;
                Ok(Self::Advanced(state.edit(action)))
            }
        }
    }

    pub fn apply_preferences(self, prefs: &UserPreferences) -> Result<Self, PlannerError> {
        match self {
            Self::Quick(state) => Ok(Self::Quick(state.apply_preferences(prefs))),
            Self::Advanced(_) => Err(PlannerError::InvalidAction {
                flow: FlowKind::Advanced.as_code(),
                message: "saved preferences only apply to the quick flow".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_actions_for_the_active_flow() {
        let flow = FlowSession::new(FlowKind::Quick)
            .edit_json(json!({"type": "set_destination", "destination": {"name": "Paris"}}))
            .unwrap();
        assert_eq!(flow.snapshot().form_data["destination"]["name"], "Paris");
        assert_eq!(flow.first_invalid_step(), Some("dates"));

        let err = FlowSession::new(FlowKind::Advanced)
            .edit_json(json!({"type": "set_destination", "destination": {"name": "Paris"}}))
            .unwrap_err();
        assert_eq!(err.code(), "invalid_action");
    }

    #[test]
    fn commands_reach_both_flows() {
        let quick = FlowSession::new(FlowKind::Quick).reduce(Command::Goto(99));
        assert_eq!(quick.step_index(), 4);

        let advanced = FlowSession::new(FlowKind::Advanced)
            .reduce(Command::Goto(99))
            .reduce(Command::Prev);
        assert_eq!(advanced.step_index(), 8);
        assert!(FlowSession::new(FlowKind::Advanced)
            .apply_preferences(&UserPreferences::default())
            .is_err());
    }
}
