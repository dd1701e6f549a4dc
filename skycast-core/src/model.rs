use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of forecast days requested for every fetch.
pub const FORECAST_DAYS: u8 = 7;

/// Parameters for one forecast fetch. Built per request, never persisted.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub city: String,
    pub days: u8,
}

impl WeatherQuery {
    /// A standard 7-day query for `city`.
    pub fn for_city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            days: FORECAST_DAYS,
        }
    }
}

/// One row of a location search result. Provider order is preserved and
/// duplicates are possible; neither is adjusted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub country: Option<String>,
}

impl LocationCandidate {
    /// "Paris, France", or just "Paris" when the provider omits the country.
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Forecast payload as returned by the provider.
///
/// The provider payload is loosely typed, so every field down the tree is
/// optional and read defensively. Values are passed through for display
/// without normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: Option<LocationInfo>,
    pub current: Option<CurrentConditions>,
    pub forecast: Option<Forecast>,
}

impl WeatherReport {
    /// Days in provider order; empty when the forecast block is missing.
    pub fn days(&self) -> &[DayForecast] {
        self.forecast
            .as_ref()
            .map(|f| f.forecastday.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: Option<f64>,
    pub condition: Option<Condition>,
    pub wind_kph: Option<f64>,
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Condition {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub forecastday: Vec<DayForecast>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: Option<NaiveDate>,
    pub day: Option<DaySummary>,
    pub astro: Option<Astro>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySummary {
    pub avgtemp_c: Option<f64>,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Astro {
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_for_city_requests_seven_days() {
        let q = WeatherQuery::for_city("Astana");
        assert_eq!(q.city, "Astana");
        assert_eq!(q.days, 7);
    }

    #[test]
    fn candidate_display_name_with_and_without_country() {
        let with = LocationCandidate {
            name: "Paris".into(),
            country: Some("France".into()),
        };
        assert_eq!(with.display_name(), "Paris, France");

        let without = LocationCandidate {
            name: "Paris".into(),
            country: None,
        };
        assert_eq!(without.display_name(), "Paris");
    }

    #[test]
    fn report_days_is_empty_without_forecast_block() {
        let report = WeatherReport::default();
        assert!(report.days().is_empty());
    }
}
