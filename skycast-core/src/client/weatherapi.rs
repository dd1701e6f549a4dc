use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::Config,
    error::ClientError,
    model::{LocationCandidate, WeatherQuery, WeatherReport},
};

use super::WeatherClient;

/// HTTP client for WeatherAPI.com.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            base_url,
            http,
        })
    }

    /// Build a client from config; fails if no API key has been configured.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let api_key = config.api_key().ok_or(ClientError::MissingApiKey)?;
        Self::new(
            api_key.to_owned(),
            config.base_url.clone(),
            config.request_timeout(),
        )
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);

        let res = self.http.get(&url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    /// `GET /search.json?q=<city>`. An empty `city` is sent as-is;
    /// WeatherAPI answers it with an empty array.
    async fn lookup_locations(
        &self,
        city: &str,
    ) -> Result<Vec<LocationCandidate>, ClientError> {
        tracing::debug!(city, "looking up locations");

        let rows: Vec<WaSearchRow> = self
            .get_json("search.json", &[("key", self.api_key.as_str()), ("q", city)])
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| LocationCandidate {
                name: row.name,
                country: row.country,
            })
            .collect())
    }

    /// `GET /forecast.json?q=<city>&days=<n>`. The payload is deserialized
    /// directly into the pass-through report shape.
    async fn fetch_forecast(&self, query: &WeatherQuery) -> Result<WeatherReport, ClientError> {
        tracing::debug!(city = %query.city, days = query.days, "fetching forecast");

        let days = query.days.to_string();
        self.get_json(
            "forecast.json",
            &[
                ("key", self.api_key.as_str()),
                ("q", query.city.as_str()),
                ("days", days.as_str()),
            ],
        )
        .await
    }
}

#[derive(Debug, Deserialize)]
struct WaSearchRow {
    name: String,
    country: Option<String>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Cut on a char boundary; a multibyte character straddling MAX must
    // not panic the error path.
    let cut = body
        .char_indices()
        .take_while(|(i, _)| *i <= MAX)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0);
    format!("{}...", &body[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"[
        {"id": 803267, "name": "London", "region": "City of London, Greater London", "country": "United Kingdom", "lat": 51.52, "lon": -0.11, "url": "london-city-of-london-greater-london-united-kingdom"},
        {"id": 315398, "name": "London", "region": "Ontario", "country": "Canada", "lat": 42.98, "lon": -81.25, "url": "london-ontario-canada"}
    ]"#;

    const FORECAST_FIXTURE: &str = r#"{
        "location": {"name": "Astana", "country": "Kazakhstan"},
        "current": {
            "temp_c": -3.0,
            "condition": {"text": "Light snow"},
            "wind_kph": 20.2,
            "humidity": 86
        },
        "forecast": {
            "forecastday": [
                {
                    "date": "2026-08-23",
                    "day": {"avgtemp_c": -1.5, "condition": {"text": "Overcast"}},
                    "astro": {"sunrise": "06:12 AM", "sunset": "08:01 PM"}
                }
            ]
        }
    }"#;

    #[test]
    fn search_rows_decode_in_provider_order() {
        let rows: Vec<WaSearchRow> = serde_json::from_str(SEARCH_FIXTURE).expect("decodes");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "London");
        assert_eq!(rows[0].country.as_deref(), Some("United Kingdom"));
        assert_eq!(rows[1].country.as_deref(), Some("Canada"));
    }

    #[test]
    fn forecast_fixture_decodes_into_report() {
        let report: WeatherReport = serde_json::from_str(FORECAST_FIXTURE).expect("decodes");

        let location = report.location.as_ref().expect("location present");
        assert_eq!(location.name.as_deref(), Some("Astana"));

        let current = report.current.as_ref().expect("current present");
        assert_eq!(current.temp_c, Some(-3.0));
        assert_eq!(
            current.condition.as_ref().and_then(|c| c.text.as_deref()),
            Some("Light snow")
        );

        let days = report.days();
        assert_eq!(days.len(), 1);
        assert_eq!(
            days[0].astro.as_ref().and_then(|a| a.sunrise.as_deref()),
            Some("06:12 AM")
        );
    }

    #[test]
    fn report_with_missing_blocks_still_decodes() {
        let report: WeatherReport =
            serde_json::from_str(r#"{"location": {"name": "Oslo"}}"#).expect("decodes");
        assert!(report.current.is_none());
        assert!(report.days().is_empty());
    }

    #[test]
    fn truncate_body_caps_long_payloads() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert!(truncated.len() < long.len());
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncate_body_cuts_on_char_boundaries() {
        // 'é' spans bytes 199..201, straddling the truncation point.
        let long = format!("{}é{}", "x".repeat(199), "y".repeat(50));
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated, format!("{}...", "x".repeat(199)));
    }

    #[test]
    fn from_config_requires_api_key() {
        let cfg = Config::default();
        let err = WeatherApiClient::from_config(&cfg).unwrap_err();
        assert!(matches!(err, ClientError::MissingApiKey));
    }
}
