use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{toggle_capped, CompanionType, DateRange, Location, TravelerCounts, TripStyle};

pub const MAX_TRIP_STYLES: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPreset {
    Weekend,
    ShortBreak,
    Week,
    TwoWeeks,
    #[default]
    Custom,
}

impl DurationPreset {
    pub fn days(self) -> Option<u32> {
        match self {
            Self::Weekend => Some(3),
            Self::ShortBreak => Some(5),
            Self::Week => Some(7),
            Self::TwoWeeks => Some(14),
            Self::Custom => None,
        }
    }

    pub fn for_days(days: u32) -> Self {
        match days {
            3 => Self::Weekend,
            5 => Self::ShortBreak,
            7 => Self::Week,
            14 => Self::TwoWeeks,
            _ => Self::Custom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickTripFormData {
    pub destination: Option<Location>,
    pub dates: DateRange,
    pub duration: DurationPreset,
    pub flexible_dates: bool,
    pub companion: Option<CompanionType>,
    pub styles: Vec<TripStyle>,
    pub travelers: TravelerCounts,
}

impl Default for QuickTripFormData {
    fn default() -> Self {
        Self {
            destination: None,
            dates: DateRange::default(),
            duration: DurationPreset::default(),
            flexible_dates: false,
            companion: None,
            styles: Vec::new(),
            travelers: TravelerCounts::new(1, 0, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuickAction {
    SetDestination {
        destination: Option<Location>,
    },
    SetDates {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    SetDurationPreset {
        preset: DurationPreset,
    },
    SetFlexibleDates {
        flexible: bool,
    },
    SetCompanion {
        companion: Option<CompanionType>,
    },
    ToggleStyle {
        style: TripStyle,
    },
    SetTravelers {
        travelers: TravelerCounts,
    },
}

impl QuickTripFormData {
    pub fn apply(mut self, action: QuickAction) -> Self {
        match action {
            QuickAction::SetDestination { destination } => {
                self.destination = destination;
            }
            QuickAction::SetDates { start, end } => {
                self.dates = DateRange::new(start, end);
                self.duration = self
                    .dates
                    .trip_days()
                    .map(DurationPreset::for_days)
                    .unwrap_or(self.duration);
            }
            QuickAction::SetDurationPreset { preset } => {
                self.duration = preset;
                if let (Some(start), Some(days)) = (self.dates.start, preset.days()) {
                    let span = Days::new(u64::from(days.saturating_sub(1)));
                    if let Some(end) = start.checked_add_days(span) {
                        self.dates.end = Some(end);
                    }
                }
            }
            QuickAction::SetFlexibleDates { flexible } => {
                self.flexible_dates = flexible;
            }
            QuickAction::SetCompanion { companion } => {
                self.companion = companion;
            }
            QuickAction::ToggleStyle { style } => {
                toggle_capped(&mut self.styles, style, MAX_TRIP_STYLES);
            }
            QuickAction::SetTravelers { travelers } => {
                self.travelers = travelers.clamped();
            }
        }
        self
    }

    pub fn destination_name(&self) -> Option<&str> {
        self.destination.as_ref().map(|location| location.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn fifth_style_evicts_the_oldest() {
        let mut form = QuickTripFormData::default();
        for style in [
            TripStyle::Culture,
            TripStyle::Foodie,
            TripStyle::Nature,
            TripStyle::Romantic,
            TripStyle::Shopping,
        ] {
            form = form.apply(QuickAction::ToggleStyle { style });
        }
        assert_eq!(
            form.styles,
            vec![
                TripStyle::Foodie,
                TripStyle::Nature,
                TripStyle::Romantic,
                TripStyle::Shopping
            ]
        );
    }

    #[test]
    fn toggling_a_selected_style_removes_it() {
        let form = QuickTripFormData::default()
            .apply(QuickAction::ToggleStyle {
                style: TripStyle::Foodie,
            })
            .apply(QuickAction::ToggleStyle {
                style: TripStyle::Foodie,
            });
        assert!(form.styles.is_empty());
    }

    #[test]
    fn duration_preset_moves_end_date() {
        let form = QuickTripFormData::default()
            .apply(QuickAction::SetDates {
                start: Some(date("2024-06-01")),
                end: None,
            })
            .apply(QuickAction::SetDurationPreset {
                preset: DurationPreset::Week,
            });
        assert_eq!(form.dates.end, Some(date("2024-06-07")));
        assert_eq!(form.dates.trip_days(), Some(7));
    }

    #[test]
    fn duration_preset_past_the_calendar_end_keeps_end_date() {
        let start = NaiveDate::MAX.pred_opt().unwrap();
        let form = QuickTripFormData::default()
            .apply(QuickAction::SetDates {
                start: Some(start),
                end: Some(start),
            })
            .apply(QuickAction::SetDurationPreset {
                preset: DurationPreset::TwoWeeks,
            });
        assert_eq!(form.duration, DurationPreset::TwoWeeks);
        assert_eq!(form.dates.end, Some(start));
    }

    #[test]
    fn explicit_dates_pick_matching_preset() {
        let form = QuickTripFormData::default().apply(QuickAction::SetDates {
            start: Some(date("2024-06-01")),
            end: Some(date("2024-06-03")),
        });
        assert_eq!(form.duration, DurationPreset::Weekend);
    }

    #[test]
    fn travelers_are_clamped() {
        let form = QuickTripFormData::default().apply(QuickAction::SetTravelers {
            travelers: TravelerCounts {
                adults: 0,
                children: 2,
                infants: 0,
            },
        });
        assert_eq!(form.travelers.adults, 1);
        assert_eq!(form.travelers.children, 2);
    }
}
