use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::advanced::{AdvancedTripFormData, TripType};
use crate::catalog::{self, ActivityTemplate, DayTemplate, DestinationProfile};
use crate::content::{
    AiGeneratedContent, BudgetBreakdown, BudgetEstimate, CostRange, DayPlan, EmergencyContact,
    LocalPhrase, MealSuggestion, PlannedActivity, WeatherCondition, WeatherForecast,
};
use crate::models::{DateRange, Interest};
use crate::quick::QuickTripFormData;

pub const BUDGET_PER_DAY: f64 = 150.0;
pub const BUDGET_MIN_PER_DAY: f64 = 100.0;
pub const BUDGET_MAX_PER_DAY: f64 = 200.0;
pub const MAX_TRIP_DAYS: u32 = 60;
const DEFAULT_BASE_HIGH_C: i32 = 21;

/// Everything the synthesizer reads from either form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripParameters {
    pub destination: Option<String>,
    pub dates: DateRange,
    pub interests: Vec<Interest>,
    pub travelers: u32,
    pub has_children: bool,
    pub currency: String,
    /// Length to assume when only a start date is known.
    pub open_ended_days: Option<u32>,
}

impl Default for TripParameters {
    fn default() -> Self {
        Self {
            destination: None,
            dates: DateRange::default(),
            interests: Vec::new(),
            travelers: 1,
            has_children: false,
            currency: "USD".to_string(),
            open_ended_days: None,
        }
    }
}

impl From<&QuickTripFormData> for TripParameters {
    fn from(form: &QuickTripFormData) -> Self {
        let mut interests = Vec::new();
        for style in &form.styles {
            let interest = style.as_interest();
            if !interests.contains(&interest) {
                interests.push(interest);
            }
        }
        Self {
            destination: form.destination_name().map(str::to_string),
            dates: form.dates,
            interests,
            travelers: form.travelers.total(),
            has_children: form.travelers.children + form.travelers.infants > 0,
            currency: "USD".to_string(),
            open_ended_days: form.duration.days(),
        }
    }
}

impl From<&AdvancedTripFormData> for TripParameters {
    fn from(form: &AdvancedTripFormData) -> Self {
        let open_ended_days = match form.trip_type {
            TripType::OneWay => Some(form.total_nights().saturating_add(1)),
            _ => None,
        };
        Self {
            destination: form.primary_destination().map(|location| location.name.clone()),
            dates: form.dates.range,
            interests: form.interests.clone(),
            travelers: form.travelers.total(),
            has_children: !form.travelers.child_ages.is_empty() || form.travelers.infants > 0,
            currency: form.budget.currency.clone(),
            open_ended_days,
        }
    }
}

/// Number of days the itinerary covers and the date of day one. The span
/// never runs past the last representable date.
pub fn trip_span(params: &TripParameters, today: NaiveDate) -> (NaiveDate, u32) {
    let (start, days) = match (params.dates.start, params.dates.end) {
        (Some(start), Some(end)) => {
            let days = u32::try_from((end - start).num_days().max(0)).unwrap_or(u32::MAX);
            (start, days.saturating_add(1))
        }
        (Some(start), None) => (start, params.open_ended_days.unwrap_or(1)),
        _ => (today, 1),
    };
    (start, days.clamp(1, MAX_TRIP_DAYS.min(days_until_max(start))))
}

/// Days from `start` through `NaiveDate::MAX`, inclusive. Always at least 1.
fn days_until_max(start: NaiveDate) -> u32 {
    let remaining = (NaiveDate::MAX - start).num_days().saturating_add(1);
    u32::try_from(remaining).unwrap_or(u32::MAX).max(1)
}

fn day_date(start: NaiveDate, day_index: u32) -> NaiveDate {
    start
        .checked_add_days(Days::new(u64::from(day_index)))
        .unwrap_or(NaiveDate::MAX)
}

/// Template used for `day_index` in a trip of `trip_days` days: arrival
/// first, departure last, and the three exploration templates in rotation.
pub fn template_slot(day_index: u32, trip_days: u32) -> TemplateSlot {
    if day_index == 0 {
        TemplateSlot::Arrival
    } else if day_index + 1 == trip_days {
        TemplateSlot::Departure
    } else {
        TemplateSlot::Exploration(((day_index - 1) % 3) as usize + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSlot {
    Arrival,
    Departure,
    /// 1-based exploration template number.
    Exploration(usize),
}

pub fn synthesize_seeded(
    params: &TripParameters,
    now: DateTime<Utc>,
    seed: u64,
) -> AiGeneratedContent {
    let mut rng = StdRng::seed_from_u64(seed);
    synthesize(params, now, &mut rng)
}

pub fn synthesize<R: Rng + ?Sized>(
    params: &TripParameters,
    now: DateTime<Utc>,
    rng: &mut R,
) -> AiGeneratedContent {
    let (start, trip_days) = trip_span(params, now.date_naive());
    let destination = params
        .destination
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("your destination");
    let profile = catalog::destination_profile(destination);

    let weather_forecast = forecast(start, trip_days, profile, rng);

    let days = (0..trip_days)
        .map(|day_index| {
            let template = match template_slot(day_index, trip_days) {
                TemplateSlot::Arrival => &catalog::ARRIVAL_DAY,
                TemplateSlot::Departure => &catalog::DEPARTURE_DAY,
                TemplateSlot::Exploration(number) => match profile {
                    Some(profile) => &profile.exploration[number - 1],
                    None => &catalog::GENERIC_EXPLORATION[number - 1],
                },
            };
            build_day(
                template,
                day_index,
                day_date(start, day_index),
                destination,
                &params.interests,
                weather_forecast.get(day_index as usize).cloned(),
            )
        })
        .collect::<Vec<_>>();

    let has_rain = weather_forecast
        .iter()
        .any(|day| day.condition == WeatherCondition::LightRain);

    AiGeneratedContent {
        days,
        safety_tips: safety_tips(profile),
        packing_list: packing_list(params, has_rain),
        cultural_tips: profile
            .map(|profile| profile.cultural_tips)
            .unwrap_or(catalog::GENERIC_CULTURAL_TIPS)
            .iter()
            .map(|tip| tip.to_string())
            .collect(),
        local_phrases: profile
            .map(|profile| profile.phrases)
            .unwrap_or(catalog::GENERIC_PHRASES)
            .iter()
            .map(|(phrase, translation, pronunciation)| LocalPhrase {
                phrase: phrase.to_string(),
                translation: translation.to_string(),
                pronunciation: pronunciation.to_string(),
            })
            .collect(),
        weather_forecast,
        budget_estimate: budget_estimate(trip_days, &params.currency),
        emergency_contacts: profile
            .map(|profile| profile.emergency_contacts)
            .unwrap_or(catalog::GENERIC_EMERGENCY)
            .iter()
            .map(|(name, number)| EmergencyContact {
                name: name.to_string(),
                number: number.to_string(),
            })
            .collect(),
        generated_at: now,
        confidence_score: confidence(params, profile.is_some()),
    }
}

pub fn budget_estimate(trip_days: u32, currency: &str) -> BudgetEstimate {
    let days = f64::from(trip_days);
    BudgetEstimate {
        currency: currency.to_string(),
        per_day: BUDGET_PER_DAY,
        total: CostRange::new(days * BUDGET_MIN_PER_DAY, days * BUDGET_MAX_PER_DAY),
        breakdown: BudgetBreakdown {
            accommodation: CostRange::new(50.0, 100.0).scaled(days),
            food: CostRange::new(30.0, 60.0).scaled(days),
            activities: CostRange::new(20.0, 50.0).scaled(days),
            transport: CostRange::new(10.0, 30.0).scaled(days),
            misc: CostRange::new(10.0, 20.0).scaled(days),
        },
    }
}

fn build_day(
    template: &DayTemplate,
    day_index: u32,
    date: NaiveDate,
    destination: &str,
    interests: &[Interest],
    weather: Option<WeatherForecast>,
) -> DayPlan {
    let day_number = day_index + 1;
    let activities = template
        .activities
        .iter()
        .map(|activity| instantiate_activity(activity, day_number, destination))
        .collect::<Vec<_>>();
    let meals = template
        .meals
        .iter()
        .map(|meal| MealSuggestion {
            meal_type: meal.meal_type,
            suggestion: fill(meal.suggestion, destination),
            estimated_cost: meal.estimated_cost,
        })
        .collect::<Vec<_>>();

    let mut notes = template
        .notes
        .iter()
        .map(|note| fill(note, destination))
        .collect::<Vec<_>>();
    if day_index > 0 && !interests.is_empty() {
        let interest = interests[(day_index as usize - 1) % interests.len()];
        notes.push(format!(
            "Leave some time for {} around {}.",
            interest.label(),
            destination
        ));
    }
    if let Some(forecast) = &weather {
        if forecast.condition == WeatherCondition::LightRain {
            notes.push("Rain is possible; keep an indoor alternative in mind.".to_string());
        }
    }

    let estimated_cost = activities
        .iter()
        .filter_map(|activity| activity.cost)
        .sum::<f64>()
        + meals.iter().map(|meal| meal.estimated_cost).sum::<f64>();

    DayPlan {
        day_number,
        date,
        title: fill(template.title, destination),
        activities,
        meals,
        notes,
        weather,
        estimated_cost,
    }
}

fn instantiate_activity(
    template: &ActivityTemplate,
    day_number: u32,
    destination: &str,
) -> PlannedActivity {
    let (hour, minute) = template.start;
    let start_time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
    let end_time = start_time + Duration::minutes(i64::from(template.duration_minutes));
    PlannedActivity {
        id: format!("{}-day{}", template.key, day_number),
        activity_type: template.activity_type,
        title: fill(template.title, destination),
        description: fill(template.description, destination),
        start_time,
        end_time,
        duration_minutes: template.duration_minutes,
        location: fill(template.location, destination),
        cost: template.cost,
        tips: template.tips.iter().map(|tip| fill(tip, destination)).collect(),
        booking_required: template.booking_required,
    }
}

fn forecast<R: Rng + ?Sized>(
    start: NaiveDate,
    trip_days: u32,
    profile: Option<&DestinationProfile>,
    rng: &mut R,
) -> Vec<WeatherForecast> {
    let base_high = profile
        .map(|profile| profile.base_high_c)
        .unwrap_or(DEFAULT_BASE_HIGH_C);
    (0..trip_days)
        .map(|day_index| {
            let condition = WeatherCondition::CYCLE[day_index as usize % 3];
            let high_c = base_high + rng.random_range(-3..=5);
            let low_c = high_c - rng.random_range(6..=10);
            let precipitation_chance = match condition {
                WeatherCondition::Sunny => rng.random_range(0..=15),
                WeatherCondition::PartlyCloudy => rng.random_range(10..=40),
                WeatherCondition::LightRain => rng.random_range(50..=90),
            };
            WeatherForecast {
                date: day_date(start, day_index),
                condition,
                high_c,
                low_c,
                precipitation_chance,
            }
        })
        .collect()
}

fn safety_tips(profile: Option<&DestinationProfile>) -> Vec<String> {
    let mut tips = catalog::GENERIC_SAFETY_TIPS
        .iter()
        .map(|tip| tip.to_string())
        .collect::<Vec<_>>();
    if let Some(profile) = profile {
        tips.extend(profile.safety_tips.iter().map(|tip| tip.to_string()));
    }
    tips
}

fn packing_list(params: &TripParameters, has_rain: bool) -> Vec<String> {
    let mut items = vec![
        "Passport and travel documents",
        "Phone charger and universal adapter",
        "Comfortable walking shoes",
        "Reusable water bottle",
        "Basic first-aid kit",
    ];
    if has_rain {
        items.push("Compact umbrella or rain jacket");
    }
    for interest in &params.interests {
        let extra = match interest {
            Interest::Beaches => Some("Swimwear and sunscreen"),
            Interest::Nature | Interest::Adventure => Some("Hiking shoes and a day pack"),
            Interest::Photography => Some("Camera, spare batteries and memory cards"),
            Interest::Nightlife | Interest::Music => Some("One smart evening outfit"),
            Interest::Wellness => Some("Swimsuit for spa facilities"),
            _ => None,
        };
        if let Some(extra) = extra {
            if !items.contains(&extra) {
                items.push(extra);
            }
        }
    }
    if params.has_children {
        items.push("Snacks and entertainment for the kids");
    }
    items.into_iter().map(str::to_string).collect()
}

fn confidence(params: &TripParameters, known_destination: bool) -> f32 {
    let mut score: f32 = if known_destination { 0.92 } else { 0.75 };
    if params.dates.start.is_none() {
        score -= 0.1;
    }
    if params.interests.is_empty() {
        score -= 0.05;
    }
    score.clamp(0.0, 1.0)
}

fn fill(text: &str, destination: &str) -> String {
    text.replace("{destination}", destination)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn params(destination: &str, start: &str, end: &str) -> TripParameters {
        TripParameters {
            destination: Some(destination.to_string()),
            dates: DateRange::new(Some(date(start)), Some(date(end))),
            interests: vec![Interest::Food, Interest::Art],
            ..TripParameters::default()
        }
    }

    #[test]
    fn three_day_trip_has_arrival_and_departure() {
        let content = synthesize_seeded(&params("Paris", "2024-06-01", "2024-06-03"), now(), 7);
        assert_eq!(content.days.len(), 3);
        assert_eq!(content.days[0].title, "Arrival Day");
        assert_eq!(content.days[1].title, "Iconic Paris");
        assert_eq!(content.days[2].title, "Departure Day");
        assert_eq!(content.days[2].date, date("2024-06-03"));
    }

    #[test]
    fn exploration_templates_cycle() {
        let slots = (0..7).map(|day| template_slot(day, 7)).collect::<Vec<_>>();
        assert_eq!(
            slots,
            vec![
                TemplateSlot::Arrival,
                TemplateSlot::Exploration(1),
                TemplateSlot::Exploration(2),
                TemplateSlot::Exploration(3),
                TemplateSlot::Exploration(1),
                TemplateSlot::Exploration(2),
                TemplateSlot::Departure,
            ]
        );

        let content = synthesize_seeded(&params("Tokyo", "2024-06-01", "2024-06-07"), now(), 1);
        assert_eq!(content.days[1].title, content.days[4].title);
    }

    #[test]
    fn activity_ids_are_unique_across_days() {
        let content = synthesize_seeded(&params("Nowhere", "2024-06-01", "2024-06-10"), now(), 3);
        let mut ids = content
            .days
            .iter()
            .flat_map(|day| day.activities.iter().map(|activity| activity.id.clone()))
            .collect::<Vec<_>>();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert!(content.days[1].activities[0].id.ends_with("-day2"));
    }

    #[test]
    fn unknown_destination_uses_generic_templates() {
        let content = synthesize_seeded(&params("Reykjavik", "2024-06-01", "2024-06-03"), now(), 3);
        assert_eq!(content.days[1].title, "Exploring Reykjavik");
        assert_eq!(content.local_phrases[0].phrase, "Hello");
        assert!(content.confidence_score < 0.8);
    }

    #[test]
    fn budget_scales_with_trip_length() {
        let content = synthesize_seeded(&params("Paris", "2024-06-01", "2024-06-05"), now(), 9);
        let budget = &content.budget_estimate;
        assert_eq!(budget.per_day, 150.0);
        assert_eq!(budget.total, CostRange::new(500.0, 1000.0));
        assert_eq!(budget.breakdown.accommodation, CostRange::new(250.0, 500.0));
        assert_eq!(budget.breakdown.misc, CostRange::new(50.0, 100.0));
    }

    #[test]
    fn missing_dates_fall_back_to_one_day_today() {
        let content = synthesize_seeded(&TripParameters::default(), now(), 5);
        assert_eq!(content.days.len(), 1);
        assert_eq!(content.days[0].date, date("2024-05-20"));
        assert_eq!(content.days[0].title, "Arrival Day");
    }

    #[test]
    fn trips_starting_at_the_calendar_edge_are_truncated() {
        let last = NaiveDate::MAX;
        let trip = TripParameters {
            dates: DateRange::new(last.pred_opt(), None),
            open_ended_days: Some(14),
            ..TripParameters::default()
        };
        let content = synthesize_seeded(&trip, now(), 3);
        assert_eq!(content.days.len(), 2);
        assert_eq!(content.days[1].date, last);
        assert_eq!(content.weather_forecast[1].date, last);
        assert_eq!(content.days[1].title, "Departure Day");

        let single = TripParameters {
            dates: DateRange::new(Some(last), Some(last)),
            ..TripParameters::default()
        };
        assert_eq!(trip_span(&single, date("2024-05-20")), (last, 1));
    }

    #[test]
    fn same_seed_same_output() {
        let trip = params("Barcelona", "2024-06-01", "2024-06-06");
        assert_eq!(
            synthesize_seeded(&trip, now(), 42),
            synthesize_seeded(&trip, now(), 42)
        );
    }

    #[test]
    fn weather_follows_fixed_condition_cycle() {
        let content = synthesize_seeded(&params("Paris", "2024-06-01", "2024-06-04"), now(), 11);
        let conditions = content
            .weather_forecast
            .iter()
            .map(|day| day.condition)
            .collect::<Vec<_>>();
        assert_eq!(
            conditions,
            vec![
                WeatherCondition::Sunny,
                WeatherCondition::PartlyCloudy,
                WeatherCondition::LightRain,
                WeatherCondition::Sunny,
            ]
        );
        for day in &content.weather_forecast {
            assert!(day.low_c < day.high_c);
            assert!(day.precipitation_chance <= 90);
        }
        assert!(content
            .packing_list
            .iter()
            .any(|item| item.contains("umbrella")));
    }

    #[test]
    fn one_way_trip_uses_nights_for_length() {
        use crate::advanced::{AdvancedAction, AdvancedTripFormData};

        let form = AdvancedTripFormData::default()
            .apply(AdvancedAction::SetTripType {
                trip_type: TripType::OneWay,
            })
            .apply(AdvancedAction::SetDestinationNights {
                id: "stop-1".to_string(),
                nights: 3,
            })
            .apply(AdvancedAction::SetDates {
                start: Some(date("2024-06-01")),
                end: None,
            });
        let content = synthesize_seeded(&TripParameters::from(&form), now(), 2);
        assert_eq!(content.days.len(), 4);

        let at_edge = form.apply(AdvancedAction::SetDates {
            start: Some(NaiveDate::MAX),
            end: None,
        });
        let content = synthesize_seeded(&TripParameters::from(&at_edge), now(), 2);
        assert_eq!(content.days.len(), 1);
        assert_eq!(content.days[0].date, NaiveDate::MAX);
    }
}
