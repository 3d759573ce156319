use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Transport,
    Accommodation,
    Sightseeing,
    Dining,
    Culture,
    Outdoor,
    Shopping,
    Leisure,
    Nightlife,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedActivity {
    pub id: String,
    pub activity_type: ActivityType,
    pub title: String,
    pub description: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: u32,
    pub location: String,
    pub cost: Option<f64>,
    pub tips: Vec<String>,
    pub booking_required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub meal_type: MealType,
    pub suggestion: String,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Sunny,
    PartlyCloudy,
    LightRain,
}

impl WeatherCondition {
    /// Fixed rotation used by the forecast.
    pub const CYCLE: [WeatherCondition; 3] = [Self::Sunny, Self::PartlyCloudy, Self::LightRain];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::LightRain => "Light Rain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub date: NaiveDate,
    pub condition: WeatherCondition,
    pub high_c: i32,
    pub low_c: i32,
    pub precipitation_chance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day_number: u32,
    pub date: NaiveDate,
    pub title: String,
    pub activities: Vec<PlannedActivity>,
    pub meals: Vec<MealSuggestion>,
    pub notes: Vec<String>,
    pub weather: Option<WeatherForecast>,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
}

impl CostRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            min: self.min * factor,
            max: self.max * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub accommodation: CostRange,
    pub food: CostRange,
    pub activities: CostRange,
    pub transport: CostRange,
    pub misc: CostRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEstimate {
    pub currency: String,
    pub per_day: f64,
    pub total: CostRange,
    pub breakdown: BudgetBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPhrase {
    pub phrase: String,
    pub translation: String,
    pub pronunciation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiGeneratedContent {
    pub days: Vec<DayPlan>,
    pub safety_tips: Vec<String>,
    pub packing_list: Vec<String>,
    pub cultural_tips: Vec<String>,
    pub local_phrases: Vec<LocalPhrase>,
    pub weather_forecast: Vec<WeatherForecast>,
    pub budget_estimate: BudgetEstimate,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub generated_at: DateTime<Utc>,
    pub confidence_score: f32,
}

impl AiGeneratedContent {
    pub fn trip_days(&self) -> usize {
        self.days.len()
    }

    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|day| day.activities.len()).sum()
    }

    pub fn estimated_activity_cost(&self) -> f64 {
        self.days.iter().map(|day| day.estimated_cost).sum()
    }
}
