use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile of the app user owning the puppies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
}

/// Profile of a single puppy.
///
/// `age` carries the birth date as the backing store records it
/// (a plain `YYYY-MM-DD` string, not interpreted locally).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuppyProfile {
    pub name: String,
    pub species: String,
    pub age: String,
    pub weight: f64,
}

/// One walk entry under a puppy's record collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkRecord {
    #[serde(rename = "dayStamp")]
    pub day_stamp: DateTime<Utc>,
}

/// Current conditions, reduced to what the app displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub condition_id: u32,
    pub temperature_c: f64,
}

/// One day of the multi-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub condition_id: u32,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    /// Weekday name localized to the forecast location's UTC offset.
    pub weekday: String,
}
