use crate::{
    error::ClientError,
    model::{LocationCandidate, WeatherQuery, WeatherReport},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

pub use weatherapi::WeatherApiClient;

/// Read-only weather provider operations consumed by the home controller.
///
/// Both calls are single-shot: no retry happens at this layer. Responses may
/// settle in any order relative to issuance; ordering is the caller's
/// problem.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Free-text city search. Candidates come back in provider order.
    async fn lookup_locations(&self, city: &str)
    -> Result<Vec<LocationCandidate>, ClientError>;

    /// Current conditions plus a multi-day forecast for one city.
    async fn fetch_forecast(&self, query: &WeatherQuery) -> Result<WeatherReport, ClientError>;
}
