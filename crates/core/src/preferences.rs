use serde::{Deserialize, Serialize};

use crate::models::{CompanionType, TravelerCounts, TripStyle};
use crate::quick::{QuickTripFormData, MAX_TRIP_STYLES};
use crate::workflow::{QuickFlow, WorkflowState};

/// Saved traveller preferences supplied from outside the flow, e.g. a user
/// profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub companion: Option<CompanionType>,
    #[serde(default)]
    pub trip_styles: Vec<TripStyle>,
    pub travelers: Option<TravelerCounts>,
}

/// Merges preferences into the quick form. Absent fields leave the form
/// untouched; styles are de-duplicated and truncated to the style cap.
pub fn merge_preferences(mut form: QuickTripFormData, prefs: &UserPreferences) -> QuickTripFormData {
    if let Some(companion) = prefs.companion {
        form.companion = Some(companion);
    }
    if !prefs.trip_styles.is_empty() {
        let mut styles = Vec::with_capacity(MAX_TRIP_STYLES);
        for style in &prefs.trip_styles {
            if styles.len() == MAX_TRIP_STYLES {
                break;
            }
            if !styles.contains(style) {
                styles.push(*style);
            }
        }
        form.styles = styles;
    }
    if let Some(travelers) = prefs.travelers {
        form.travelers = travelers.clamped();
    }
    form
}

impl WorkflowState<QuickFlow> {
    /// Applies preferences and raises `has_applied_preferences`. Calling it
    /// again merges again; callers decide whether a repeat is wanted.
    pub fn apply_preferences(self, prefs: &UserPreferences) -> Self {
        if self.is_generating() {
            return self;
        }
        let merged = merge_preferences(self.data().clone(), prefs);
        self.replace_data(merged).mark_preferences_applied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_are_truncated_to_cap() {
        let prefs = UserPreferences {
            companion: Some(CompanionType::Family),
            trip_styles: vec![
                TripStyle::Nature,
                TripStyle::Nature,
                TripStyle::Culture,
                TripStyle::Foodie,
                TripStyle::Relaxation,
                TripStyle::Shopping,
            ],
            travelers: Some(TravelerCounts::new(2, 2, 0)),
        };
        let state = WorkflowState::<QuickFlow>::new().apply_preferences(&prefs);
        let form = state.data();
        assert_eq!(form.styles.len(), MAX_TRIP_STYLES);
        assert_eq!(form.styles[0], TripStyle::Nature);
        assert!(!form.styles.contains(&TripStyle::Shopping));
        assert_eq!(form.companion, Some(CompanionType::Family));
        assert_eq!(form.travelers.children, 2);
        assert!(state.has_applied_preferences());
    }

    #[test]
    fn empty_preferences_keep_existing_values() {
        let form = QuickTripFormData {
            companion: Some(CompanionType::Solo),
            styles: vec![TripStyle::Adventure],
            ..QuickTripFormData::default()
        };
        let merged = merge_preferences(form.clone(), &UserPreferences::default());
        assert_eq!(merged, form);
    }

    #[test]
    fn flag_does_not_block_repeat_calls() {
        let first = UserPreferences {
            companion: Some(CompanionType::Couple),
            ..UserPreferences::default()
        };
        let second = UserPreferences {
            companion: Some(CompanionType::Friends),
            ..UserPreferences::default()
        };
        let state = WorkflowState::<QuickFlow>::new()
            .apply_preferences(&first)
            .apply_preferences(&second);
        assert_eq!(state.data().companion, Some(CompanionType::Friends));
    }
}
