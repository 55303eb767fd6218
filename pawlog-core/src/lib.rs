//! Core library for the `pawlog` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - A thin façade over the hosted document store (user, puppy, walk records)
//! - A thin façade over the weather API (current conditions, daily forecast)
//!
//! It is used by `pawlog-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod weather;

pub use config::{Config, StoreConfig, WeatherConfig};
pub use error::{Error, Result};
pub use model::{CurrentWeather, DailyForecast, PuppyProfile, UserProfile, WalkRecord};
pub use store::{DocumentStore, Fields, StoreRef};
pub use weather::WeatherClient;
