use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{toggle_capped, BookingType, DateRange, Interest, LinkedBookings, Location};

pub const MIN_INTERESTS: usize = 3;
pub const MAX_INTERESTS: usize = 5;
pub const MAX_DESTINATIONS: usize = 8;
pub const MAX_NIGHTS_PER_STOP: u32 = 30;
pub const MAX_FLEXIBILITY_DAYS: u8 = 7;
pub const MAX_CHILDREN: usize = 10;
pub const MAX_CHILD_AGE: u8 = 17;
pub const MAX_HOTEL_ROOMS: u32 = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    #[default]
    RoundTrip,
    OneWay,
    MultiCity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationStop {
    pub id: String,
    pub location: Option<Location>,
    pub nights: u32,
}

impl DestinationStop {
    fn empty(seq: usize) -> Self {
        Self {
            id: format!("stop-{seq}"),
            location: None,
            nights: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedDates {
    pub range: DateRange,
    pub flexible: bool,
    pub flexibility_days: u8,
    pub blackout_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialRequirement {
    WheelchairAccess,
    DietaryRestrictions,
    PetFriendly,
    MedicalNeeds,
    StrollerFriendly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelerRoster {
    pub adults: u32,
    pub child_ages: Vec<u8>,
    pub infants: u32,
    pub special_requirements: Vec<SpecialRequirement>,
}

impl Default for TravelerRoster {
    fn default() -> Self {
        Self {
            adults: 2,
            child_ages: Vec::new(),
            infants: 0,
            special_requirements: Vec::new(),
        }
    }
}

impl TravelerRoster {
    pub const MAX_ADULTS: u32 = 16;
    pub const MAX_INFANTS: u32 = 4;

    pub fn total(&self) -> u32 {
        self.adults + self.child_ages.len() as u32 + self.infants
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub amount: f64,
    pub currency: String,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            amount: 0.0,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingStyle {
    Budget,
    #[default]
    Moderate,
    Luxury,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPriority {
    #[default]
    Balanced,
    Accommodation,
    Experiences,
    Food,
    Shopping,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Relaxed,
    #[default]
    Moderate,
    Packed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePreference {
    EarlyBird,
    #[default]
    Balanced,
    NightOwl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationType {
    Hotel,
    BoutiqueHotel,
    Apartment,
    Hostel,
    Resort,
    Villa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPriority {
    CityCenter,
    NearAttractions,
    Quiet,
    Beachfront,
    NearTransit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amenity {
    Wifi,
    Pool,
    Gym,
    Spa,
    Breakfast,
    Parking,
    Kitchen,
    AirConditioning,
}

/// Room and guest counts for a hotel search. Every room needs at least one
/// adult, so `adults >= rooms` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelGuests {
    rooms: u32,
    adults: u32,
    children: u32,
}

impl Default for HotelGuests {
    fn default() -> Self {
        Self {
            rooms: 1,
            adults: 2,
            children: 0,
        }
    }
}

impl HotelGuests {
    pub fn rooms(&self) -> u32 {
        self.rooms
    }

    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    /// Raising rooms lifts adults with it; lowering rooms leaves adults alone.
    pub fn set_rooms(&mut self, rooms: u32) {
        self.rooms = rooms.clamp(1, MAX_HOTEL_ROOMS);
        if self.adults < self.rooms {
            self.adults = self.rooms;
        }
    }

    pub fn set_adults(&mut self, adults: u32) {
        self.adults = adults.clamp(self.rooms, TravelerRoster::MAX_ADULTS.max(self.rooms));
    }

    pub fn set_children(&mut self, children: u32) {
        self.children = children.min(MAX_CHILDREN as u32);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccommodationPreferences {
    pub accommodation_type: Option<AccommodationType>,
    pub star_ratings: Vec<u8>,
    pub location_priority: Option<LocationPriority>,
    pub amenities: Vec<Amenity>,
    pub guests: HotelGuests,
    pub skip: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Flight,
    Train,
    Car,
    Bus,
    Mixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightPreferences {
    pub cabin_class: CabinClass,
    pub max_stops: u8,
    pub direct_only: bool,
    pub preferred_airlines: Vec<String>,
}

impl FlightPreferences {
    pub const MAX_STOPS: u8 = 2;

    fn normalized(mut self) -> Self {
        self.max_stops = self.max_stops.min(Self::MAX_STOPS);
        if self.direct_only {
            self.max_stops = 0;
        }
        self.preferred_airlines = self
            .preferred_airlines
            .into_iter()
            .map(|airline| airline.trim().to_string())
            .filter(|airline| !airline.is_empty())
            .collect();
        self.preferred_airlines.dedup();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalTransport {
    PublicTransit,
    RentalCar,
    Taxi,
    Walking,
    Bicycle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportationPreferences {
    pub mode: Option<TransportMode>,
    pub flight: FlightPreferences,
    pub local_transport: Vec<LocalTransport>,
    pub skip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedTripFormData {
    pub trip_type: TripType,
    pub origin: Option<Location>,
    pub destinations: Vec<DestinationStop>,
    pub dates: AdvancedDates,
    pub travelers: TravelerRoster,
    pub budget: Budget,
    pub spending_style: SpendingStyle,
    pub budget_priority: BudgetPriority,
    pub interests: Vec<Interest>,
    pub pace: Pace,
    pub time_preference: TimePreference,
    pub accommodation: AccommodationPreferences,
    pub transportation: TransportationPreferences,
    pub bookings: LinkedBookings,
}

impl Default for AdvancedTripFormData {
    fn default() -> Self {
        Self {
            trip_type: TripType::default(),
            origin: None,
            destinations: vec![DestinationStop::empty(1)],
            dates: AdvancedDates::default(),
            travelers: TravelerRoster::default(),
            budget: Budget::default(),
            spending_style: SpendingStyle::default(),
            budget_priority: BudgetPriority::default(),
            interests: Vec::new(),
            pace: Pace::default(),
            time_preference: TimePreference::default(),
            accommodation: AccommodationPreferences::default(),
            transportation: TransportationPreferences::default(),
            bookings: LinkedBookings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdvancedAction {
    SetTripType { trip_type: TripType },
    SetOrigin { origin: Option<Location> },
    AddDestination,
    RemoveDestination { id: String },
    SetDestinationLocation { id: String, location: Option<Location> },
    SetDestinationNights { id: String, nights: u32 },
    MoveDestination { id: String, to_index: usize },
    SetDates { start: Option<NaiveDate>, end: Option<NaiveDate> },
    SetFlexibility { flexible: bool, days: u8 },
    ToggleBlackoutDate { date: NaiveDate },
    SetAdults { adults: u32 },
    AddChild { age: u8 },
    SetChildAge { index: usize, age: u8 },
    RemoveChild { index: usize },
    SetInfants { infants: u32 },
    ToggleSpecialRequirement { requirement: SpecialRequirement },
    SetBudgetAmount { amount: f64 },
    SetCurrency { currency: String },
    SetSpendingStyle { style: SpendingStyle },
    SetBudgetPriority { priority: BudgetPriority },
    ToggleInterest { interest: Interest },
    SetPace { pace: Pace },
    SetTimePreference { preference: TimePreference },
    SetAccommodationType { accommodation_type: AccommodationType },
    ToggleStarRating { stars: u8 },
    SetLocationPriority { priority: LocationPriority },
    ToggleAmenity { amenity: Amenity },
    SetHotelRooms { rooms: u32 },
    SetHotelAdults { adults: u32 },
    SetHotelChildren { children: u32 },
    SkipAccommodation,
    SetTransportMode { mode: TransportMode },
    SetFlightPreferences { flight: FlightPreferences },
    ToggleLocalTransport { transport: LocalTransport },
    SkipTransportation,
    LinkBooking { booking_type: BookingType, id: String },
    UnlinkBooking { booking_type: BookingType, id: String },
}

impl AdvancedTripFormData {
    pub fn apply(mut self, action: AdvancedAction) -> Self {
        match action {
            AdvancedAction::SetTripType { trip_type } => {
                self.trip_type = trip_type;
                if trip_type != TripType::MultiCity {
                    self.destinations.truncate(1);
                }
            }
            AdvancedAction::SetOrigin { origin } => self.origin = origin,
            AdvancedAction::AddDestination => {
                let allowed = match self.trip_type {
                    TripType::MultiCity => MAX_DESTINATIONS,
                    _ => 1,
                };
                if self.destinations.len() < allowed {
                    let seq = self.next_stop_seq();
                    self.destinations.push(DestinationStop::empty(seq));
                }
            }
            AdvancedAction::RemoveDestination { id } => {
                self.destinations.retain(|stop| stop.id != id);
                if self.destinations.is_empty() {
                    let seq = self.next_stop_seq();
                    self.destinations.push(DestinationStop::empty(seq));
                }
            }
            AdvancedAction::SetDestinationLocation { id, location } => {
                if let Some(stop) = self.stop_mut(&id) {
                    stop.location = location;
                }
            }
            AdvancedAction::SetDestinationNights { id, nights } => {
                if let Some(stop) = self.stop_mut(&id) {
                    stop.nights = nights.clamp(1, MAX_NIGHTS_PER_STOP);
                }
            }
            AdvancedAction::MoveDestination { id, to_index } => {
                if let Some(from) = self.destinations.iter().position(|stop| stop.id == id) {
                    let stop = self.destinations.remove(from);
                    let to = to_index.min(self.destinations.len());
                    self.destinations.insert(to, stop);
                }
            }
            AdvancedAction::SetDates { start, end } => {
                self.dates.range = DateRange::new(start, end);
            }
            AdvancedAction::SetFlexibility { flexible, days } => {
                self.dates.flexible = flexible;
                self.dates.flexibility_days = if flexible {
                    days.min(MAX_FLEXIBILITY_DAYS)
                } else {
                    0
                };
            }
            AdvancedAction::ToggleBlackoutDate { date } => {
                if let Some(position) = self.dates.blackout_dates.iter().position(|d| *d == date) {
                    self.dates.blackout_dates.remove(position);
                } else {
                    self.dates.blackout_dates.push(date);
                    self.dates.blackout_dates.sort();
                }
            }
            AdvancedAction::SetAdults { adults } => {
                self.travelers.adults = adults.clamp(1, TravelerRoster::MAX_ADULTS);
            }
            AdvancedAction::AddChild { age } => {
                if self.travelers.child_ages.len() < MAX_CHILDREN {
                    self.travelers.child_ages.push(age.min(MAX_CHILD_AGE));
                }
            }
            AdvancedAction::SetChildAge { index, age } => {
                if let Some(slot) = self.travelers.child_ages.get_mut(index) {
                    *slot = age.min(MAX_CHILD_AGE);
                }
            }
            AdvancedAction::RemoveChild { index } => {
                if index < self.travelers.child_ages.len() {
                    self.travelers.child_ages.remove(index);
                }
            }
            AdvancedAction::SetInfants { infants } => {
                self.travelers.infants = infants.min(TravelerRoster::MAX_INFANTS);
            }
            AdvancedAction::ToggleSpecialRequirement { requirement } => {
                toggle_capped(
                    &mut self.travelers.special_requirements,
                    requirement,
                    usize::MAX,
                );
            }
            AdvancedAction::SetBudgetAmount { amount } => {
                self.budget.amount = if amount.is_finite() {
                    amount.max(0.0)
                } else {
                    0.0
                };
            }
            AdvancedAction::SetCurrency { currency } => {
                let code = currency.trim().to_uppercase();
                if code.len() == 3 && code.chars().all(|ch| ch.is_ascii_alphabetic()) {
                    self.budget.currency = code;
                }
            }
            AdvancedAction::SetSpendingStyle { style } => self.spending_style = style,
            AdvancedAction::SetBudgetPriority { priority } => self.budget_priority = priority,
            AdvancedAction::ToggleInterest { interest } => {
                toggle_capped(&mut self.interests, interest, MAX_INTERESTS);
            }
            AdvancedAction::SetPace { pace } => self.pace = pace,
            AdvancedAction::SetTimePreference { preference } => {
                self.time_preference = preference;
            }
            AdvancedAction::SetAccommodationType { accommodation_type } => {
                self.accommodation.accommodation_type = Some(accommodation_type);
                self.accommodation.skip = false;
            }
            AdvancedAction::ToggleStarRating { stars } => {
                if (1..=5).contains(&stars) {
                    toggle_capped(&mut self.accommodation.star_ratings, stars, 5);
                    self.accommodation.star_ratings.sort_unstable();
                    self.accommodation.skip = false;
                }
            }
            AdvancedAction::SetLocationPriority { priority } => {
                self.accommodation.location_priority = Some(priority);
                self.accommodation.skip = false;
            }
            AdvancedAction::ToggleAmenity { amenity } => {
                toggle_capped(&mut self.accommodation.amenities, amenity, usize::MAX);
                self.accommodation.skip = false;
            }
            AdvancedAction::SetHotelRooms { rooms } => {
                self.accommodation.guests.set_rooms(rooms);
                self.accommodation.skip = false;
            }
            AdvancedAction::SetHotelAdults { adults } => {
                self.accommodation.guests.set_adults(adults);
                self.accommodation.skip = false;
            }
            AdvancedAction::SetHotelChildren { children } => {
                self.accommodation.guests.set_children(children);
                self.accommodation.skip = false;
            }
            AdvancedAction::SkipAccommodation => self.accommodation.skip = true,
            AdvancedAction::SetTransportMode { mode } => {
                self.transportation.mode = Some(mode);
                self.transportation.skip = false;
            }
            AdvancedAction::SetFlightPreferences { flight } => {
                self.transportation.flight = flight.normalized();
                self.transportation.skip = false;
            }
            AdvancedAction::ToggleLocalTransport { transport } => {
                toggle_capped(
                    &mut self.transportation.local_transport,
                    transport,
                    usize::MAX,
                );
                self.transportation.skip = false;
            }
            AdvancedAction::SkipTransportation => self.transportation.skip = true,
            AdvancedAction::LinkBooking { booking_type, id } => {
                self.bookings.link(booking_type, id);
            }
            AdvancedAction::UnlinkBooking { booking_type, id } => {
                self.bookings.unlink(booking_type, &id);
            }
        }
        self
    }

    /// First stop with a chosen location; drives destination-specific content.
    pub fn primary_destination(&self) -> Option<&Location> {
        self.destinations
            .iter()
            .find_map(|stop| stop.location.as_ref())
    }

    pub fn total_nights(&self) -> u32 {
        self.destinations
            .iter()
            .fold(0u32, |total, stop| total.saturating_add(stop.nights))
    }

    fn stop_mut(&mut self, id: &str) -> Option<&mut DestinationStop> {
        self.destinations.iter_mut().find(|stop| stop.id == id)
    }

    fn next_stop_seq(&self) -> usize {
        self.destinations
            .iter()
            .filter_map(|stop| stop.id.strip_prefix("stop-")?.parse::<usize>().ok())
            .max()
            .unwrap_or(0)
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with_interests(interests: &[Interest]) -> AdvancedTripFormData {
        interests
            .iter()
            .fold(AdvancedTripFormData::default(), |form, interest| {
                form.apply(AdvancedAction::ToggleInterest {
                    interest: *interest,
                })
            })
    }

    #[test]
    fn sixth_interest_evicts_the_first() {
        let form = form_with_interests(&[
            Interest::History,
            Interest::Art,
            Interest::Food,
            Interest::Nature,
            Interest::Music,
        ]);
        assert_eq!(form.interests.len(), 5);

        let form = form.apply(AdvancedAction::ToggleInterest {
            interest: Interest::Beaches,
        });
        assert_eq!(form.interests.len(), 5);
        assert_eq!(form.interests[0], Interest::Art);
        assert_eq!(form.interests.last(), Some(&Interest::Beaches));
        assert!(!form.interests.contains(&Interest::History));
    }

    #[test]
    fn raising_rooms_lifts_adults_but_lowering_does_not() {
        let form = AdvancedTripFormData::default()
            .apply(AdvancedAction::SetHotelRooms { rooms: 3 });
        assert_eq!(form.accommodation.guests.rooms(), 3);
        assert!(form.accommodation.guests.adults() >= 3);

        let form = form.apply(AdvancedAction::SetHotelRooms { rooms: 1 });
        assert_eq!(form.accommodation.guests.rooms(), 1);
        assert_eq!(form.accommodation.guests.adults(), 3);
    }

    #[test]
    fn hotel_adults_cannot_drop_below_rooms() {
        let form = AdvancedTripFormData::default()
            .apply(AdvancedAction::SetHotelRooms { rooms: 2 })
            .apply(AdvancedAction::SetHotelAdults { adults: 1 });
        assert_eq!(form.accommodation.guests.adults(), 2);
    }

    #[test]
    fn concrete_choice_clears_skip_flags_independently() {
        let form = AdvancedTripFormData::default()
            .apply(AdvancedAction::SkipAccommodation)
            .apply(AdvancedAction::SkipTransportation);
        assert!(form.accommodation.skip && form.transportation.skip);

        let form = form.apply(AdvancedAction::SetAccommodationType {
            accommodation_type: AccommodationType::Hotel,
        });
        assert!(!form.accommodation.skip);
        assert!(form.transportation.skip);
    }

    #[test]
    fn multi_city_allows_more_stops_and_switch_back_truncates() {
        let form = AdvancedTripFormData::default().apply(AdvancedAction::AddDestination);
        assert_eq!(form.destinations.len(), 1);

        let form = form
            .apply(AdvancedAction::SetTripType {
                trip_type: TripType::MultiCity,
            })
            .apply(AdvancedAction::AddDestination)
            .apply(AdvancedAction::AddDestination);
        assert_eq!(form.destinations.len(), 3);
        assert_eq!(form.destinations[2].id, "stop-3");

        let form = form.apply(AdvancedAction::SetTripType {
            trip_type: TripType::RoundTrip,
        });
        assert_eq!(form.destinations.len(), 1);
    }

    #[test]
    fn removing_last_stop_leaves_an_empty_one() {
        let form = AdvancedTripFormData::default().apply(AdvancedAction::RemoveDestination {
            id: "stop-1".to_string(),
        });
        assert_eq!(form.destinations.len(), 1);
        assert!(form.destinations[0].location.is_none());
    }

    #[test]
    fn move_destination_reorders_stops() {
        let form = AdvancedTripFormData::default()
            .apply(AdvancedAction::SetTripType {
                trip_type: TripType::MultiCity,
            })
            .apply(AdvancedAction::AddDestination)
            .apply(AdvancedAction::MoveDestination {
                id: "stop-2".to_string(),
                to_index: 0,
            });
        assert_eq!(form.destinations[0].id, "stop-2");
    }

    #[test]
    fn budget_and_currency_are_normalized() {
        let form = AdvancedTripFormData::default()
            .apply(AdvancedAction::SetBudgetAmount { amount: -20.0 })
            .apply(AdvancedAction::SetCurrency {
                currency: " eur ".to_string(),
            })
            .apply(AdvancedAction::SetCurrency {
                currency: "euro".to_string(),
            });
        assert_eq!(form.budget.amount, 0.0);
        assert_eq!(form.budget.currency, "EUR");
    }

    #[test]
    fn direct_only_forces_zero_stops() {
        let form = AdvancedTripFormData::default().apply(AdvancedAction::SetFlightPreferences {
            flight: FlightPreferences {
                cabin_class: CabinClass::Business,
                max_stops: 2,
                direct_only: true,
                preferred_airlines: vec![" ".to_string(), "KLM".to_string()],
            },
        });
        assert_eq!(form.transportation.flight.max_stops, 0);
        assert_eq!(form.transportation.flight.preferred_airlines, vec!["KLM"]);
    }

    #[test]
    fn bookings_link_through_actions() {
        let form = AdvancedTripFormData::default().apply(AdvancedAction::LinkBooking {
            booking_type: BookingType::Hotel,
            id: "bk-9".to_string(),
        });
        assert_eq!(form.bookings.ids(BookingType::Hotel).len(), 1);
    }
}
