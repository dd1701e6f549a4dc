//! Core library for the `skycast` weather lookup app.
//!
//! This crate defines:
//! - Configuration handling (API key, default city, timings)
//! - The WeatherAPI.com client (city search + 7-day forecast)
//! - The last-viewed-city store
//! - The debounced search / fetch orchestration for the home screen
//!
//! It is used by `skycast-cli`, but can also be reused by other frontends.

pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod home;
pub mod model;
pub mod store;

pub use client::{WeatherApiClient, WeatherClient};
pub use config::Config;
pub use debounce::Debouncer;
pub use error::{ClientError, StoreError};
pub use home::{HomeController, ScreenState};
pub use model::{
    FORECAST_DAYS, LocationCandidate, WeatherQuery, WeatherReport,
};
pub use store::{CityStore, FileCityStore};
