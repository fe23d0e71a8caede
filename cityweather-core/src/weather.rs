use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::error::{LookupError, truncate_body};
use crate::model::{Coordinates, WeatherReading};

const OPENWEATHER_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Weather data provider, queried by place name or by coordinates.
///
/// Both operations are single-shot: no retry, no caching, no deduplication of
/// identical in-flight requests.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn fetch_by_place_name(&self, name: &str) -> Result<WeatherReading, LookupError>;
    async fn fetch_by_coordinates(&self, coords: Coordinates)
    -> Result<WeatherReading, LookupError>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn fetch(&self, query: &[(&str, String)]) -> Result<WeatherReading, LookupError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(query)
            // no `units` parameter: the payload stays in Kelvin and is
            // converted only at render time
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, "weather request rejected");
            return Err(LookupError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwReading = serde_json::from_str(&body)?;
        parsed.try_into_reading()
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn fetch_by_place_name(&self, name: &str) -> Result<WeatherReading, LookupError> {
        self.fetch(&[("q", name.to_string())]).await
    }

    async fn fetch_by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherReading, LookupError> {
        self.fetch(&[
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
        ])
        .await
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwReading {
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
    sys: OwSys,
}

impl OwReading {
    fn try_into_reading(self) -> Result<WeatherReading, LookupError> {
        let condition = self
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(WeatherReading {
            condition,
            temperature_k: self.main.temp,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            sunrise: unix_to_utc(self.sys.sunrise)?,
            sunset: unix_to_utc(self.sys.sunset)?,
        })
    }
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, LookupError> {
    DateTime::from_timestamp(ts, 0).ok_or(LookupError::Timestamp(ts))
}
