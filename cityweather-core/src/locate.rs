use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};

use crate::error::{Error, LookupError, truncate_body};
use crate::model::{Coordinates, PlaceSelection};

const IP_API_BASE: &str = "http://ip-api.com";
const GEOCODE_BASE: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Source of the user's current position, behind a permission gate.
#[async_trait]
pub trait GeolocationService: Send + Sync + Debug {
    async fn permission(&self) -> PermissionStatus;
    async fn current_position(&self) -> Result<Coordinates, LookupError>;
}

/// Keyless IP-based position lookup via ip-api.com.
///
/// The permission gate is the persisted consent flag from
/// [`crate::Settings`]; without it the service reports `Denied` and never
/// issues a position request.
#[derive(Debug, Clone)]
pub struct IpLocator {
    consent: bool,
    base_url: String,
    http: Client,
}

impl IpLocator {
    pub fn new(consent: bool) -> Self {
        Self::with_base_url(consent, IP_API_BASE.to_string())
    }

    pub fn with_base_url(consent: bool, base_url: String) -> Self {
        Self {
            consent,
            base_url,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

#[async_trait]
impl GeolocationService for IpLocator {
    async fn permission(&self) -> PermissionStatus {
        if self.consent {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    async fn current_position(&self) -> Result<Coordinates, LookupError> {
        let url = format!("{}/json", self.base_url);

        let res = self.http.get(&url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, "position request rejected");
            return Err(LookupError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: IpApiResponse = serde_json::from_str(&body)?;

        if parsed.status != "success" {
            let message = parsed.message.unwrap_or(parsed.status);
            tracing::debug!(%message, "position provider error");
            return Err(LookupError::Provider(message));
        }

        match (parsed.lat, parsed.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(LookupError::NoMatch),
        }
    }
}

/// Coordinates → city name, via OpenWeather's reverse geocoding endpoint.
/// Shares the weather provider credential.
#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    api_key: String,
    base_url: String,
    http: Client,
}

impl ReverseGeocoder {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GEOCODE_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    pub async fn city_name(&self, coords: Coordinates) -> Result<String, LookupError> {
        let url = format!("{}/geo/1.0/reverse", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("limit", "1".to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, "reverse geocode request rejected");
            return Err(LookupError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: Vec<GeoEntry> = serde_json::from_str(&body)?;

        parsed
            .into_iter()
            .map(|e| e.name)
            .find(|name| !name.is_empty())
            .ok_or(LookupError::NoMatch)
    }
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
}

/// Terminal outcomes of a location resolution, short of outright failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Granted(PlaceSelection),
    Denied,
}

/// Permission → position fix → reverse geocode, strictly in that order; each
/// stage gates the next. An empty reverse-geocode result is surfaced exactly
/// like any other failure in the chain.
#[derive(Debug)]
pub struct LocationResolver {
    geolocation: Arc<dyn GeolocationService>,
    geocoder: ReverseGeocoder,
}

impl LocationResolver {
    pub fn new(geolocation: Arc<dyn GeolocationService>, geocoder: ReverseGeocoder) -> Self {
        Self {
            geolocation,
            geocoder,
        }
    }

    pub async fn resolve(&self) -> Result<ResolveOutcome, Error> {
        match self.geolocation.permission().await {
            PermissionStatus::Denied => Ok(ResolveOutcome::Denied),
            PermissionStatus::Granted => {
                let position = self.geolocation.current_position().await?;
                let city = self.geocoder.city_name(position).await?;
                tracing::debug!(%city, "resolved current location");
                Ok(ResolveOutcome::Granted(PlaceSelection::new(city)))
            }
        }
    }
}
