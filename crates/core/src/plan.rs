use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advanced::AdvancedTripFormData;
use crate::content::AiGeneratedContent;
use crate::error::PlanError;
use crate::models::{DateRange, LinkedBookings, PlanStatus, PlanType};
use crate::quick::QuickTripFormData;
use crate::synthesizer::TripParameters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flow", content = "data", rename_all = "snake_case")]
pub enum PlanFormData {
    Quick(QuickTripFormData),
    Advanced(AdvancedTripFormData),
    Imported,
}

impl PlanFormData {
    pub fn plan_type(&self) -> PlanType {
        match self {
            Self::Quick(_) => PlanType::Quick,
            Self::Advanced(_) => PlanType::Advanced,
            Self::Imported => PlanType::Imported,
        }
    }

    pub fn trip_parameters(&self) -> TripParameters {
        match self {
            Self::Quick(form) => TripParameters::from(form),
            Self::Advanced(form) => TripParameters::from(form),
            Self::Imported => TripParameters::default(),
        }
    }

    fn destination_label(&self) -> Option<String> {
        match self {
            Self::Quick(form) => form.destination_name().map(str::to_string),
            Self::Advanced(form) => {
                let names = form
                    .destinations
                    .iter()
                    .filter_map(|stop| stop.location.as_ref())
                    .map(|location| location.name.as_str())
                    .collect::<Vec<_>>();
                (!names.is_empty()).then(|| names.join(" → "))
            }
            Self::Imported => None,
        }
    }

    fn dates(&self) -> DateRange {
        match self {
            Self::Quick(form) => form.dates,
            Self::Advanced(form) => form.dates.range,
            Self::Imported => DateRange::default(),
        }
    }

    fn bookings(&self) -> Option<&LinkedBookings> {
        match self {
            Self::Advanced(form) => Some(&form.bookings),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub id: String,
    pub user_id: String,
    pub plan_type: PlanType,
    pub status: PlanStatus,
    pub name: String,
    pub form_data: PlanFormData,
    pub ai_content: Option<AiGeneratedContent>,
    pub bookings: LinkedBookings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl TripPlan {
    pub fn imported(
        user_id: &str,
        name: &str,
        ai_content: Option<AiGeneratedContent>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            plan_type: PlanType::Imported,
            status: PlanStatus::Planned,
            name: name.trim().to_string(),
            form_data: PlanFormData::Imported,
            ai_content,
            bookings: LinkedBookings::default(),
            created_at: now,
            updated_at: now,
            confirmed_at: None,
        }
    }

    /// Moves the plan along its lifecycle. `confirmed_at` is stamped only on
    /// the first move into `Confirmed` and is never cleared afterwards.
    pub fn transition(&mut self, to: PlanStatus, now: DateTime<Utc>) -> Result<(), PlanError> {
        use PlanStatus::*;

        let allowed = matches!(
            (self.status, to),
            (Draft, Planned)
                | (Draft, Confirmed)
                | (Planned, Confirmed)
                | (Confirmed, Confirmed)
                | (Confirmed, Completed)
                | (Draft | Planned | Confirmed, Cancelled)
        );
        if !allowed {
            return Err(PlanError::InvalidTransition {
                from: self.status.as_code(),
                to: to.as_code(),
            });
        }

        if to == Confirmed && self.confirmed_at.is_none() {
            self.confirmed_at = Some(now);
        }
        self.status = to;
        self.updated_at = now;
        Ok(())
    }
}

/// Draft snapshot of the current form. Reuses identity from `existing` when
/// present. A plan that was already confirmed stays confirmed.
pub fn draft_snapshot(
    existing: Option<&TripPlan>,
    user_id: &str,
    form_data: PlanFormData,
    ai_content: Option<AiGeneratedContent>,
    now: DateTime<Utc>,
) -> TripPlan {
    let status = match existing.map(|plan| plan.status) {
        Some(PlanStatus::Confirmed) => PlanStatus::Confirmed,
        _ => PlanStatus::Draft,
    };
    snapshot(existing, user_id, form_data, ai_content, status, now)
}

/// Confirmed snapshot. Confirming twice keeps the id and the original
/// `confirmed_at`; only `updated_at` moves.
pub fn confirm_snapshot(
    existing: Option<&TripPlan>,
    user_id: &str,
    form_data: PlanFormData,
    ai_content: Option<AiGeneratedContent>,
    now: DateTime<Utc>,
) -> TripPlan {
    let mut plan = snapshot(existing, user_id, form_data, ai_content, PlanStatus::Confirmed, now);
    if plan.confirmed_at.is_none() {
        plan.confirmed_at = Some(now);
    }
    plan
}

pub fn default_plan_name(form_data: &PlanFormData) -> String {
    let destination = form_data
        .destination_label()
        .unwrap_or_else(|| "Untitled".to_string());
    match form_data.dates().start {
        Some(start) => format!("{} · {}", destination, start.format("%b %Y")),
        None => format!("{destination} trip"),
    }
}

fn snapshot(
    existing: Option<&TripPlan>,
    user_id: &str,
    form_data: PlanFormData,
    ai_content: Option<AiGeneratedContent>,
    status: PlanStatus,
    now: DateTime<Utc>,
) -> TripPlan {
    let bookings = form_data
        .bookings()
        .cloned()
        .or_else(|| existing.map(|plan| plan.bookings.clone()))
        .unwrap_or_default();
    let ai_content = ai_content.or_else(|| existing.and_then(|plan| plan.ai_content.clone()));

    match existing {
        Some(plan) => TripPlan {
            id: plan.id.clone(),
            user_id: plan.user_id.clone(),
            plan_type: form_data.plan_type(),
            status,
            name: plan.name.clone(),
            form_data,
            ai_content,
            bookings,
            created_at: plan.created_at,
            updated_at: now,
            confirmed_at: plan.confirmed_at,
        },
        None => TripPlan {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            plan_type: form_data.plan_type(),
            status,
            name: default_plan_name(&form_data),
            form_data,
            ai_content,
            bookings,
            created_at: now,
            updated_at: now,
            confirmed_at: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, TimeZone};

    use super::*;
    use crate::models::Location;
    use crate::quick::QuickAction;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn quick_form() -> PlanFormData {
        PlanFormData::Quick(
            QuickTripFormData::default()
                .apply(QuickAction::SetDestination {
                    destination: Some(Location::named("Tokyo")),
                })
                .apply(QuickAction::SetDates {
                    start: NaiveDate::from_ymd_opt(2024, 6, 1),
                    end: NaiveDate::from_ymd_opt(2024, 6, 4),
                }),
        )
    }

    #[test]
    fn draft_allocates_identity_once() {
        let first = draft_snapshot(None, "u-1", quick_form(), None, t0());
        assert_eq!(first.status, PlanStatus::Draft);
        assert_eq!(first.name, "Tokyo · Jun 2024");

        let later = t0() + Duration::minutes(5);
        let second = draft_snapshot(Some(&first), "u-1", quick_form(), None, later);
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, t0());
        assert_eq!(second.updated_at, later);
    }

    #[test]
    fn confirm_twice_keeps_id_and_first_confirmation() {
        let draft = draft_snapshot(None, "u-1", quick_form(), None, t0());
        let confirmed = confirm_snapshot(Some(&draft), "u-1", quick_form(), None, t0());
        assert_eq!(confirmed.status, PlanStatus::Confirmed);
        assert_eq!(confirmed.confirmed_at, Some(t0()));

        let later = t0() + Duration::hours(1);
        let again = confirm_snapshot(Some(&confirmed), "u-1", quick_form(), None, later);
        assert_eq!(again.id, draft.id);
        assert_eq!(again.confirmed_at, Some(t0()));
        assert_eq!(again.updated_at, later);
    }

    #[test]
    fn draft_after_confirm_stays_confirmed() {
        let confirmed = confirm_snapshot(None, "u-1", quick_form(), None, t0());
        let draft = draft_snapshot(Some(&confirmed), "u-1", quick_form(), None, t0());
        assert_eq!(draft.status, PlanStatus::Confirmed);
        assert!(draft.confirmed_at.is_some());
    }

    #[test]
    fn transitions_follow_lifecycle() {
        let mut plan = draft_snapshot(None, "u-1", quick_form(), None, t0());
        plan.transition(PlanStatus::Planned, t0()).unwrap();
        plan.transition(PlanStatus::Confirmed, t0()).unwrap();
        plan.transition(PlanStatus::Completed, t0()).unwrap();
        assert!(plan.confirmed_at.is_some());

        let error = plan.transition(PlanStatus::Draft, t0()).unwrap_err();
        assert_eq!(error.code(), "invalid_transition");
        assert!(plan.transition(PlanStatus::Cancelled, t0()).is_err());
    }

    #[test]
    fn imported_plans_start_planned() {
        let plan = TripPlan::imported("u-2", " Lisbon notes ", None, t0());
        assert_eq!(plan.plan_type, PlanType::Imported);
        assert_eq!(plan.status, PlanStatus::Planned);
        assert_eq!(plan.name, "Lisbon notes");
    }
}
