//! api.weather.gov observation source

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;
use wxtrend_core::{to_canonical, LatestObservation, ObservationSource, SourceError, UnitGroup};

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";
pub const DEFAULT_STATION: &str = "KANE";
pub const DEFAULT_USER_AGENT: &str = "get-weather";

/// Fetches observations for a single NWS station
pub struct NwsSource {
    client: Client,
    observations_url: Url,
    user_agent: String,
}

impl NwsSource {
    pub fn new(base_url: &str, station: &str, user_agent: &str) -> Result<Self, SourceError> {
        if station.is_empty() || user_agent.is_empty() {
            return Err(SourceError::Config(
                "station and user agent must be set".into(),
            ));
        }
        let mut observations_url = Url::parse(base_url)
            .map_err(|e| SourceError::Config(format!("invalid base url {}: {}", base_url, e)))?;
        // Append below any base path; each segment is percent-encoded
        observations_url
            .path_segments_mut()
            .map_err(|_| SourceError::Config(format!("base url {} cannot take a path", base_url)))?
            .pop_if_empty()
            .extend(["stations", station, "observations"]);
        let client = Client::builder()
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Ok(Self {
            client,
            observations_url,
            user_agent: user_agent.to_string(),
        })
    }

    pub fn observations_url(&self) -> &Url {
        &self.observations_url
    }
}

#[async_trait::async_trait]
impl ObservationSource for NwsSource {
    fn name(&self) -> &str {
        "nws"
    }

    #[instrument(skip(self), fields(url = %self.observations_url))]
    async fn latest(&self) -> Result<LatestObservation, SourceError> {
        let resp = self
            .client
            .get(self.observations_url.clone())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/geo+json")
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        debug!("Received {} bytes of observations", body.len());
        parse_latest(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationCollection {
    #[serde(default)]
    features: Vec<ObservationFeature>,
}

#[derive(Debug, Deserialize)]
struct ObservationFeature {
    properties: ObservationProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ObservationProperties {
    temperature: Quantity,
    dewpoint: Quantity,
    #[serde(rename = "windSpeed")]
    wind_speed: Quantity,
    #[serde(rename = "precipitationLast6Hours")]
    precipitation_last_6_hours: Quantity,
    #[serde(rename = "windChill")]
    wind_chill: Quantity,
    #[serde(rename = "heatIndex")]
    heat_index: Quantity,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Quantity {
    #[serde(rename = "unitCode")]
    unit_code: Option<String>,
    value: Option<f64>,
}

impl Quantity {
    fn canonical(&self, group: UnitGroup) -> Result<Option<f64>, SourceError> {
        self.value
            .map(|v| to_canonical(v, self.unit_code.as_deref(), group))
            .transpose()
            .map_err(|e| SourceError::Payload(e.to_string()))
    }
}

/// Parse an observations collection and take the newest (first) feature
pub fn parse_latest(body: &str) -> Result<LatestObservation, SourceError> {
    let collection: ObservationCollection =
        serde_json::from_str(body).map_err(|e| SourceError::Payload(e.to_string()))?;
    let newest = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Payload("no observations for station".into()))?;
    let p = newest.properties;

    Ok(LatestObservation {
        temperature: p.temperature.canonical(UnitGroup::Temperature)?,
        dewpoint: p.dewpoint.canonical(UnitGroup::Temperature)?,
        wind_speed: p.wind_speed.canonical(UnitGroup::Speed)?,
        precipitation_last_6_hours: p
            .precipitation_last_6_hours
            .canonical(UnitGroup::Precipitation)?,
        wind_chill: p.wind_chill.canonical(UnitGroup::Temperature)?,
        heat_index: p.heat_index.canonical(UnitGroup::Temperature)?,
    })
}
