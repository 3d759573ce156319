use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::advanced::{AdvancedAction, AdvancedTripFormData};
use crate::content::AiGeneratedContent;
use crate::generation::GenerationStatus;
use crate::quick::{QuickAction, QuickTripFormData};
use crate::steps::{AdvancedStep, FlowKind, PlanningStep, QuickStep};
use crate::validation;

/// Binds a step registry to the form data its validators understand.
pub trait Flow {
    type Data: Clone + Debug + Default + PartialEq + Serialize + DeserializeOwned;
    type Action: Clone + Debug + DeserializeOwned;

    const KIND: FlowKind;

    fn steps() -> &'static [PlanningStep] {
        Self::KIND.steps()
    }

    fn is_step_valid(index: usize, data: &Self::Data) -> bool;

    fn is_ready(data: &Self::Data) -> bool;

    fn apply(data: Self::Data, action: Self::Action) -> Self::Data;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuickFlow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvancedFlow;

impl Flow for QuickFlow {
    type Data = QuickTripFormData;
    type Action = QuickAction;

    const KIND: FlowKind = FlowKind::Quick;

    fn is_step_valid(index: usize, data: &Self::Data) -> bool {
        QuickStep::from_index(index)
            .map(|step| validation::validate_quick_step(step, data))
            .unwrap_or(false)
    }

    fn is_ready(data: &Self::Data) -> bool {
        validation::is_quick_ready(data)
    }

    fn apply(data: Self::Data, action: Self::Action) -> Self::Data {
        data.apply(action)
    }
}

impl Flow for AdvancedFlow {
    type Data = AdvancedTripFormData;
    type Action = AdvancedAction;

    const KIND: FlowKind = FlowKind::Advanced;

    fn is_step_valid(index: usize, data: &Self::Data) -> bool {
        AdvancedStep::from_index(index)
            .map(|step| validation::validate_advanced_step(step, data))
            .unwrap_or(false)
    }

    fn is_ready(data: &Self::Data) -> bool {
        validation::is_ready_to_generate(data)
    }

    fn apply(data: Self::Data, action: Self::Action) -> Self::Data {
        data.apply(action)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowAction<A> {
    Edit(A),
    Next,
    Prev,
    Goto(usize),
    GenerationStarted,
    GenerationTick { step: u8 },
    GenerationFinished(Box<AiGeneratedContent>),
    GenerationCancelled,
    Reset,
}

/// Step cursor plus form data for one flow.
///
/// The cursor is clamped to `[0, steps.len() - 1]` for both flows. Edits and
/// navigation are ignored while generation is running.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "F::Data: Serialize"))]
pub struct WorkflowState<F: Flow> {
    step_index: usize,
    data: F::Data,
    generation: GenerationStatus,
    ai_content: Option<AiGeneratedContent>,
    has_applied_preferences: bool,
}

impl<F: Flow> Default for WorkflowState<F> {
    fn default() -> Self {
        Self {
            step_index: 0,
            data: F::Data::default(),
            generation: GenerationStatus::default(),
            ai_content: None,
            has_applied_preferences: false,
        }
    }
}

impl<F: Flow> WorkflowState<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: F::Data) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn current_step(&self) -> &'static PlanningStep {
        &F::steps()[self.step_index]
    }

    pub fn step_count(&self) -> usize {
        F::steps().len()
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index + 1 == self.step_count()
    }

    pub fn data(&self) -> &F::Data {
        &self.data
    }

    pub fn generation(&self) -> GenerationStatus {
        self.generation
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_generating
    }

    pub fn ai_content(&self) -> Option<&AiGeneratedContent> {
        self.ai_content.as_ref()
    }

    pub fn has_applied_preferences(&self) -> bool {
        self.has_applied_preferences
    }

    pub fn is_current_step_valid(&self) -> bool {
        F::is_step_valid(self.step_index, &self.data)
    }

    pub fn is_ready(&self) -> bool {
        F::is_ready(&self.data)
    }

    pub fn reduce(self, action: WorkflowAction<F::Action>) -> Self {
        match action {
            WorkflowAction::Edit(edit) => self.edit(edit),
            WorkflowAction::Next => self.next(),
            WorkflowAction::Prev => self.prev(),
            WorkflowAction::Goto(index) => self.goto(index),
            WorkflowAction::GenerationStarted => self.generation_started(),
            WorkflowAction::GenerationTick { step } => self.generation_tick(step),
            WorkflowAction::GenerationFinished(content) => self.generation_finished(*content),
            WorkflowAction::GenerationCancelled => self.generation_cancelled(),
            WorkflowAction::Reset => Self::default(),
        }
    }

    pub fn edit(mut self, action: F::Action) -> Self {
        if self.generation.is_generating {
            return self;
        }
        self.data = F::apply(self.data, action);
        self
    }

    /// Advances one step when the active step validates; otherwise a no-op.
    pub fn next(mut self) -> Self {
        if self.generation.is_generating || !self.is_current_step_valid() {
            return self;
        }
        self.step_index = (self.step_index + 1).min(self.step_count() - 1);
        self
    }

    pub fn prev(mut self) -> Self {
        if self.generation.is_generating {
            return self;
        }
        self.step_index = self.step_index.saturating_sub(1);
        self
    }

    /// Jumps without validation. Out-of-range targets land on the last step.
    pub fn goto(mut self, index: usize) -> Self {
        if self.generation.is_generating {
            return self;
        }
        self.step_index = index.min(self.step_count() - 1);
        self
    }

    fn generation_started(mut self) -> Self {
        self.generation = GenerationStatus::started();
        self
    }

    fn generation_tick(mut self, step: u8) -> Self {
        if self.generation.is_generating {
            self.generation = self.generation.advanced(step);
        }
        self
    }

    fn generation_finished(mut self, content: AiGeneratedContent) -> Self {
        self.generation = GenerationStatus::finished();
        self.ai_content = Some(content);
        self
    }

    fn generation_cancelled(mut self) -> Self {
        self.generation = GenerationStatus::default();
        self
    }

    pub(crate) fn replace_data(mut self, data: F::Data) -> Self {
        self.data = data;
        self
    }

    pub(crate) fn mark_preferences_applied(mut self) -> Self {
        self.has_applied_preferences = true;
        self
    }
}

/// Read-only view of a workflow for callers that do not know the flow type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub flow: FlowKind,
    pub step_index: usize,
    pub step_id: String,
    pub step_count: usize,
    pub current_step_valid: bool,
    pub ready: bool,
    pub generation: GenerationStatus,
    pub has_applied_preferences: bool,
    pub has_ai_content: bool,
    pub form_data: serde_json::Value,
}

impl<F: Flow> WorkflowState<F> {
    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            flow: F::KIND,
            step_index: self.step_index,
            step_id: self.current_step().id.to_string(),
            step_count: self.step_count(),
            current_step_valid: self.is_current_step_valid(),
            ready: self.is_ready(),
            generation: self.generation,
            has_applied_preferences: self.has_applied_preferences,
            has_ai_content: self.ai_content.is_some(),
            form_data: serde_json::to_value(&self.data).unwrap_or(serde_json::Value::Null),
        }
    }
}
