use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Location {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

/// Inclusive calendar range. Either end may still be unset while the user is
/// filling in the dates step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }.normalized()
    }

    /// Swaps the bounds when the end precedes the start.
    pub fn normalized(self) -> Self {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => Self {
                start: Some(end),
                end: Some(start),
            },
            _ => self,
        }
    }

    pub fn trip_days(&self) -> Option<u32> {
        let (start, end) = (self.start?, self.end?);
        let days = (end - start).num_days().max(0) as u32;
        Some(days + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanionType {
    Solo,
    Couple,
    Family,
    Friends,
    Business,
}

impl CompanionType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "solo" | "alone" => Some(Self::Solo),
            "couple" | "partner" => Some(Self::Couple),
            "family" | "kids" => Some(Self::Family),
            "friends" | "group" => Some(Self::Friends),
            "business" | "work" => Some(Self::Business),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStyle {
    Relaxation,
    Adventure,
    Culture,
    Foodie,
    Nature,
    Nightlife,
    Romantic,
    Shopping,
}

impl TripStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "relaxation" | "relax" | "chill" => Some(Self::Relaxation),
            "adventure" => Some(Self::Adventure),
            "culture" | "cultural" => Some(Self::Culture),
            "foodie" | "food" => Some(Self::Foodie),
            "nature" | "outdoors" => Some(Self::Nature),
            "nightlife" => Some(Self::Nightlife),
            "romantic" | "romance" => Some(Self::Romantic),
            "shopping" => Some(Self::Shopping),
            _ => None,
        }
    }

    /// Interest the synthesizer uses for a quick-flow style.
    pub fn as_interest(self) -> Interest {
        match self {
            Self::Relaxation => Interest::Wellness,
            Self::Adventure => Interest::Adventure,
            Self::Culture => Interest::History,
            Self::Foodie => Interest::Food,
            Self::Nature => Interest::Nature,
            Self::Nightlife => Interest::Nightlife,
            Self::Romantic => Interest::Art,
            Self::Shopping => Interest::Shopping,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interest {
    History,
    Art,
    Food,
    Nightlife,
    Nature,
    Beaches,
    Shopping,
    Adventure,
    Wellness,
    Photography,
    Architecture,
    Music,
}

impl Interest {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "history" | "museums" => Some(Self::History),
            "art" | "galleries" => Some(Self::Art),
            "food" | "cuisine" | "foodie" => Some(Self::Food),
            "nightlife" => Some(Self::Nightlife),
            "nature" | "hiking" => Some(Self::Nature),
            "beaches" | "beach" => Some(Self::Beaches),
            "shopping" => Some(Self::Shopping),
            "adventure" => Some(Self::Adventure),
            "wellness" | "spa" => Some(Self::Wellness),
            "photography" => Some(Self::Photography),
            "architecture" => Some(Self::Architecture),
            "music" => Some(Self::Music),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::History => "history",
            Self::Art => "art",
            Self::Food => "local food",
            Self::Nightlife => "nightlife",
            Self::Nature => "nature",
            Self::Beaches => "beaches",
            Self::Shopping => "shopping",
            Self::Adventure => "adventure",
            Self::Wellness => "wellness",
            Self::Photography => "photography",
            Self::Architecture => "architecture",
            Self::Music => "live music",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelerCounts {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl TravelerCounts {
    pub const MAX_ADULTS: u32 = 16;
    pub const MAX_CHILDREN: u32 = 10;
    pub const MAX_INFANTS: u32 = 4;

    pub fn new(adults: u32, children: u32, infants: u32) -> Self {
        Self {
            adults,
            children,
            infants,
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            adults: self.adults.clamp(1, Self::MAX_ADULTS),
            children: self.children.min(Self::MAX_CHILDREN),
            infants: self.infants.min(Self::MAX_INFANTS),
        }
    }

    pub fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Quick,
    Advanced,
    Imported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    Planned,
    Confirmed,
    Completed,
    Cancelled,
}

impl PlanStatus {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Planned => "planned",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "planned" => Some(Self::Planned),
            "confirmed" => Some(Self::Confirmed),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Flight,
    Hotel,
    Activity,
    CarRental,
    Train,
}

/// Booking ids linked to a plan, grouped by booking type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedBookings(BTreeMap<BookingType, Vec<String>>);

impl LinkedBookings {
    pub fn ids(&self, kind: BookingType) -> &[String] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns false when the id was already linked.
    pub fn link(&mut self, kind: BookingType, id: impl Into<String>) -> bool {
        let id = id.into();
        let ids = self.0.entry(kind).or_default();
        if ids.contains(&id) {
            return false;
        }
        ids.push(id);
        true
    }

    pub fn unlink(&mut self, kind: BookingType, id: &str) -> bool {
        let Some(ids) = self.0.get_mut(&kind) else {
            return false;
        };
        let before = ids.len();
        ids.retain(|existing| existing != id);
        let removed = ids.len() != before;
        if ids.is_empty() {
            self.0.remove(&kind);
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Toggles `value` in an insertion-ordered set capped at `cap`. When the set
/// is full the oldest entry is evicted before the new one is appended.
pub(crate) fn toggle_capped<T: PartialEq>(items: &mut Vec<T>, value: T, cap: usize) {
    if let Some(position) = items.iter().position(|item| *item == value) {
        items.remove(position);
        return;
    }
    if cap == 0 {
        return;
    }
    while items.len() >= cap {
        items.remove(0);
    }
    items.push(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn date_range_swaps_reversed_bounds() {
        let range = DateRange::new(Some(date("2024-06-05")), Some(date("2024-06-01")));
        assert_eq!(range.start, Some(date("2024-06-01")));
        assert_eq!(range.trip_days(), Some(5));
    }

    #[test]
    fn toggle_capped_evicts_oldest() {
        let mut items = vec![1, 2, 3];
        toggle_capped(&mut items, 4, 3);
        assert_eq!(items, vec![2, 3, 4]);
        toggle_capped(&mut items, 3, 3);
        assert_eq!(items, vec![2, 4]);
    }

    #[test]
    fn linked_bookings_are_keyed_by_type() {
        let mut bookings = LinkedBookings::default();
        assert!(bookings.link(BookingType::Hotel, "h-1"));
        assert!(!bookings.link(BookingType::Hotel, "h-1"));
        bookings.link(BookingType::Flight, "f-1");
        assert_eq!(bookings.ids(BookingType::Hotel), ["h-1".to_string()]);
        assert!(bookings.unlink(BookingType::Flight, "f-1"));
        assert!(bookings.ids(BookingType::Flight).is_empty());
        assert_eq!(bookings.total(), 1);
    }

    #[test]
    fn traveler_counts_clamp_to_bounds() {
        let counts = TravelerCounts::new(0, 40, 9);
        assert_eq!(counts, TravelerCounts::new(1, 10, 4));
    }
}
