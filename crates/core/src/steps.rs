use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanningStep {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub optional: bool,
}

impl PlanningStep {
    const fn required(id: &'static str, title: &'static str, subtitle: &'static str) -> Self {
        Self {
            id,
            title,
            subtitle: Some(subtitle),
            optional: false,
        }
    }

    const fn skippable(id: &'static str, title: &'static str, subtitle: &'static str) -> Self {
        Self {
            id,
            title,
            subtitle: Some(subtitle),
            optional: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Quick,
    Advanced,
}

impl FlowKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "quick" | "quick_trip" | "quick-trip" => Some(Self::Quick),
            "advanced" | "advanced_trip" | "advanced-trip" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Advanced => "advanced",
        }
    }

    pub fn steps(self) -> &'static [PlanningStep] {
        match self {
            Self::Quick => &QUICK_STEPS,
            Self::Advanced => &ADVANCED_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickStep {
    Destination,
    Dates,
    Style,
    Travelers,
    Generate,
}

impl QuickStep {
    pub const ALL: [QuickStep; 5] = [
        Self::Destination,
        Self::Dates,
        Self::Style,
        Self::Travelers,
        Self::Generate,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static PlanningStep {
        &QUICK_STEPS[self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancedStep {
    TripType,
    Destinations,
    Dates,
    Travelers,
    Budget,
    Interests,
    Pace,
    Accommodation,
    Transportation,
    Review,
}

impl AdvancedStep {
    pub const ALL: [AdvancedStep; 10] = [
        Self::TripType,
        Self::Destinations,
        Self::Dates,
        Self::Travelers,
        Self::Budget,
        Self::Interests,
        Self::Pace,
        Self::Accommodation,
        Self::Transportation,
        Self::Review,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static PlanningStep {
        &ADVANCED_STEPS[self.index()]
    }
}

pub static QUICK_STEPS: [PlanningStep; 5] = [
    PlanningStep::required("destination", "Where to?", "Pick the place you want to visit"),
    PlanningStep::required("dates", "When?", "Choose your travel dates"),
    PlanningStep::required("style", "Trip style", "Who is coming and what you enjoy"),
    PlanningStep::required("travelers", "Travelers", "How many people are going"),
    PlanningStep::required("generate", "Your trip", "We build your itinerary"),
];

pub static ADVANCED_STEPS: [PlanningStep; 10] = [
    PlanningStep::required("trip-type", "Trip type", "Round trip, one way or multi-city"),
    PlanningStep::required("destinations", "Destinations", "Origin and every stop on the way"),
    PlanningStep::required("dates", "Dates", "Travel window, flexibility and blackout dates"),
    PlanningStep::required("travelers", "Travelers", "Adults, children and special needs"),
    PlanningStep::required("budget", "Budget", "How much you plan to spend"),
    PlanningStep::required("interests", "Interests", "Pick between 3 and 5 interests"),
    PlanningStep::required("pace", "Pace", "How full each day should be"),
    PlanningStep::skippable("accommodation", "Accommodation", "Where you want to stay"),
    PlanningStep::skippable("transportation", "Transportation", "How you want to get around"),
    PlanningStep::required("review", "Review", "Check everything and generate"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registries_match_step_enums() {
        assert_eq!(FlowKind::Quick.steps().len(), QuickStep::ALL.len());
        assert_eq!(FlowKind::Advanced.steps().len(), AdvancedStep::ALL.len());
        assert_eq!(QuickStep::Generate.descriptor().id, "generate");
        assert_eq!(AdvancedStep::Transportation.descriptor().id, "transportation");
    }

    #[test]
    fn only_accommodation_and_transportation_are_optional() {
        let optional = ADVANCED_STEPS
            .iter()
            .filter(|step| step.optional)
            .map(|step| step.id)
            .collect::<Vec<_>>();
        assert_eq!(optional, vec!["accommodation", "transportation"]);
        assert!(QUICK_STEPS.iter().all(|step| !step.optional));
    }
}
