//! Per-step predicates. Every function here is pure: it only reads the form
//! snapshot it is handed.

use crate::advanced::{AdvancedTripFormData, TripType, MAX_INTERESTS, MIN_INTERESTS};
use crate::quick::QuickTripFormData;
use crate::steps::{AdvancedStep, QuickStep};

pub fn is_quick_destination_valid(form: &QuickTripFormData) -> bool {
    form.destination.is_some()
}

pub fn is_quick_dates_valid(form: &QuickTripFormData) -> bool {
    form.dates.start.is_some() && form.dates.end.is_some()
}

pub fn is_quick_style_valid(form: &QuickTripFormData) -> bool {
    form.companion.is_some() && !form.styles.is_empty()
}

pub fn is_quick_travelers_valid(form: &QuickTripFormData) -> bool {
    form.travelers.adults >= 1
}

pub fn is_quick_ready(form: &QuickTripFormData) -> bool {
    is_quick_destination_valid(form)
        && is_quick_dates_valid(form)
        && is_quick_style_valid(form)
        && is_quick_travelers_valid(form)
}

pub fn validate_quick_step(step: QuickStep, form: &QuickTripFormData) -> bool {
    match step {
        QuickStep::Destination => is_quick_destination_valid(form),
        QuickStep::Dates => is_quick_dates_valid(form),
        QuickStep::Style => is_quick_style_valid(form),
        QuickStep::Travelers => is_quick_travelers_valid(form),
        QuickStep::Generate => is_quick_ready(form),
    }
}

pub fn is_trip_type_valid(_form: &AdvancedTripFormData) -> bool {
    true
}

pub fn is_destinations_valid(form: &AdvancedTripFormData) -> bool {
    let origin_ok = form.trip_type == TripType::OneWay || form.origin.is_some();
    origin_ok
        && form
            .destinations
            .iter()
            .any(|stop| stop.location.is_some())
}

pub fn is_dates_valid(form: &AdvancedTripFormData) -> bool {
    form.dates.range.start.is_some()
        && (form.trip_type == TripType::OneWay || form.dates.range.end.is_some())
}

pub fn is_travelers_valid(form: &AdvancedTripFormData) -> bool {
    form.travelers.adults >= 1
}

pub fn is_budget_valid(form: &AdvancedTripFormData) -> bool {
    form.budget.amount > 0.0
}

pub fn is_interests_valid(form: &AdvancedTripFormData) -> bool {
    (MIN_INTERESTS..=MAX_INTERESTS).contains(&form.interests.len())
}

pub fn is_pace_valid(_form: &AdvancedTripFormData) -> bool {
    true
}

pub fn is_accommodation_valid(form: &AdvancedTripFormData) -> bool {
    form.accommodation.skip || form.accommodation.accommodation_type.is_some()
}

pub fn is_transportation_valid(form: &AdvancedTripFormData) -> bool {
    form.transportation.skip || form.transportation.mode.is_some()
}

/// Composite gate for the review step. Recomputed on every call because any
/// earlier step may have been revisited and edited.
pub fn is_ready_to_generate(form: &AdvancedTripFormData) -> bool {
    is_trip_type_valid(form)
        && is_destinations_valid(form)
        && is_dates_valid(form)
        && is_travelers_valid(form)
        && is_budget_valid(form)
        && is_interests_valid(form)
}

pub fn validate_advanced_step(step: AdvancedStep, form: &AdvancedTripFormData) -> bool {
    match step {
        AdvancedStep::TripType => is_trip_type_valid(form),
        AdvancedStep::Destinations => is_destinations_valid(form),
        AdvancedStep::Dates => is_dates_valid(form),
        AdvancedStep::Travelers => is_travelers_valid(form),
        AdvancedStep::Budget => is_budget_valid(form),
        AdvancedStep::Interests => is_interests_valid(form),
        AdvancedStep::Pace => is_pace_valid(form),
        AdvancedStep::Accommodation => is_accommodation_valid(form),
        AdvancedStep::Transportation => is_transportation_valid(form),
        AdvancedStep::Review => is_ready_to_generate(form),
    }
}

/// First step of the generate gate that fails, in registry order.
pub fn first_invalid_quick_step(form: &QuickTripFormData) -> Option<QuickStep> {
    QuickStep::ALL
        .into_iter()
        .filter(|step| *step != QuickStep::Generate)
        .find(|step| !validate_quick_step(*step, form))
}

pub fn first_invalid_advanced_step(form: &AdvancedTripFormData) -> Option<AdvancedStep> {
    [
        AdvancedStep::TripType,
        AdvancedStep::Destinations,
        AdvancedStep::Dates,
        AdvancedStep::Travelers,
        AdvancedStep::Budget,
        AdvancedStep::Interests,
    ]
    .into_iter()
    .find(|step| !validate_advanced_step(*step, form))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::advanced::AdvancedAction;
    use crate::models::{Interest, Location};

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn ready_form() -> AdvancedTripFormData {
        let mut form = AdvancedTripFormData::default()
            .apply(AdvancedAction::SetOrigin {
                origin: Some(Location::named("London")),
            })
            .apply(AdvancedAction::SetDestinationLocation {
                id: "stop-1".to_string(),
                location: Some(Location::named("Paris")),
            })
            .apply(AdvancedAction::SetDates {
                start: Some(date("2024-06-01")),
                end: Some(date("2024-06-05")),
            })
            .apply(AdvancedAction::SetBudgetAmount { amount: 1500.0 });
        for interest in [Interest::Art, Interest::Food, Interest::History] {
            form = form.apply(AdvancedAction::ToggleInterest { interest });
        }
        form
    }

    #[test]
    fn budget_requires_positive_amount() {
        let form = AdvancedTripFormData::default();
        assert!(!is_budget_valid(&form));
        let form = form.apply(AdvancedAction::SetBudgetAmount { amount: 0.01 });
        assert!(is_budget_valid(&form));
    }

    #[test]
    fn one_way_needs_no_origin_or_end_date() {
        let form = AdvancedTripFormData::default()
            .apply(AdvancedAction::SetTripType {
                trip_type: TripType::OneWay,
            })
            .apply(AdvancedAction::SetDestinationLocation {
                id: "stop-1".to_string(),
                location: Some(Location::named("Lisbon")),
            })
            .apply(AdvancedAction::SetDates {
                start: Some(date("2024-06-01")),
                end: None,
            });
        assert!(is_destinations_valid(&form));
        assert!(is_dates_valid(&form));

        let round_trip = form.apply(AdvancedAction::SetTripType {
            trip_type: TripType::RoundTrip,
        });
        assert!(!is_destinations_valid(&round_trip));
        assert!(!is_dates_valid(&round_trip));
    }

    #[test]
    fn interests_need_three_to_five() {
        let mut form = AdvancedTripFormData::default();
        for interest in [Interest::Art, Interest::Food] {
            form = form.apply(AdvancedAction::ToggleInterest { interest });
        }
        assert!(!is_interests_valid(&form));
        form = form.apply(AdvancedAction::ToggleInterest {
            interest: Interest::Music,
        });
        assert!(is_interests_valid(&form));
    }

    #[test]
    fn skip_satisfies_optional_steps() {
        let form = AdvancedTripFormData::default();
        assert!(!is_accommodation_valid(&form));
        assert!(!is_transportation_valid(&form));

        let form = form.apply(AdvancedAction::SkipAccommodation);
        assert!(is_accommodation_valid(&form));
        assert!(!is_transportation_valid(&form));
    }

    #[test]
    fn ready_gate_tracks_later_edits() {
        let form = ready_form();
        assert!(is_ready_to_generate(&form));
        assert_eq!(first_invalid_advanced_step(&form), None);

        let form = form.apply(AdvancedAction::ToggleInterest {
            interest: Interest::Art,
        });
        assert!(!is_ready_to_generate(&form));
        assert_eq!(
            first_invalid_advanced_step(&form),
            Some(AdvancedStep::Interests)
        );
    }

    #[test]
    fn optional_steps_do_not_block_ready_gate() {
        let form = ready_form();
        assert!(!is_accommodation_valid(&form));
        assert!(validate_advanced_step(AdvancedStep::Review, &form));
    }

    #[test]
    fn quick_style_needs_companion_and_style() {
        use crate::models::{CompanionType, TripStyle};
        use crate::quick::QuickAction;

        let form = QuickTripFormData::default().apply(QuickAction::ToggleStyle {
            style: TripStyle::Foodie,
        });
        assert!(!is_quick_style_valid(&form));
        let form = form.apply(QuickAction::SetCompanion {
            companion: Some(CompanionType::Couple),
        });
        assert!(is_quick_style_valid(&form));
        assert_eq!(first_invalid_quick_step(&form), Some(QuickStep::Destination));
    }
}
