use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, LookupError, truncate_body};
use crate::model::PlaceSelection;

const PLACES_BASE: &str = "https://maps.googleapis.com/maps/api/place";

/// Autocomplete queries fire only once the input reaches this length.
pub const MIN_QUERY_LEN: usize = 2;

/// One autocomplete suggestion, identified by its provider place id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceCandidate {
    pub description: String,
    pub place_id: String,
}

impl std::fmt::Display for PlaceCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

/// Incremental place lookup against the Google Places HTTP API.
#[derive(Debug, Clone)]
pub struct PlaceSearch {
    api_key: String,
    base_url: String,
    http: Client,
}

impl PlaceSearch {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, PLACES_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    /// Fetch autocomplete candidates for a partial input.
    ///
    /// Inputs shorter than [`MIN_QUERY_LEN`] return an empty list without
    /// touching the network.
    pub async fn suggest(&self, input: &str) -> Result<Vec<PlaceCandidate>, LookupError> {
        if input.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let url = format!("{}/autocomplete/json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("input", input),
                ("language", "en"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, "autocomplete request rejected");
            return Err(LookupError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: GpAutocompleteResponse = serde_json::from_str(&body)?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed
                .predictions
                .into_iter()
                .map(|p| PlaceCandidate {
                    description: p.description,
                    place_id: p.place_id,
                })
                .collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => {
                tracing::debug!(status = other, "autocomplete provider error");
                Err(LookupError::Provider(other.to_string()))
            }
        }
    }

    /// Resolve a chosen candidate to its locality-level name.
    ///
    /// Candidates whose address breakdown has no locality component are
    /// rejected with [`Error::Selection`]; there is no fallback to a broader
    /// granularity such as region or country.
    pub async fn select(&self, candidate: &PlaceCandidate) -> Result<PlaceSelection, Error> {
        let url = format!("{}/details/json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("place_id", candidate.place_id.as_str()),
                ("fields", "address_component"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(LookupError::from)?;

        let status = res.status();
        let body = res.text().await.map_err(LookupError::from)?;

        if !status.is_success() {
            tracing::debug!(%status, "place details request rejected");
            return Err(LookupError::Status {
                status,
                body: truncate_body(&body),
            }
            .into());
        }

        let parsed: GpDetailsResponse =
            serde_json::from_str(&body).map_err(LookupError::from)?;

        if parsed.status != "OK" {
            tracing::debug!(status = %parsed.status, "place details provider error");
            return Err(LookupError::Provider(parsed.status).into());
        }

        let components = parsed
            .result
            .map(|r| r.address_components)
            .unwrap_or_default();

        locality_from_components(&components)
            .map(PlaceSelection::new)
            .ok_or(Error::Selection)
    }
}

/// Pick the locality-level component out of a structured address breakdown.
fn locality_from_components(components: &[GpAddressComponent]) -> Option<String> {
    components
        .iter()
        .find(|c| c.types.iter().any(|t| t == "locality"))
        .map(|c| c.long_name.clone())
}

#[derive(Debug, Deserialize)]
struct GpPrediction {
    description: String,
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct GpAutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<GpPrediction>,
}

#[derive(Debug, Deserialize)]
struct GpAddressComponent {
    long_name: String,
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GpDetailsResult {
    #[serde(default)]
    address_components: Vec<GpAddressComponent>,
}

#[derive(Debug, Deserialize)]
struct GpDetailsResponse {
    status: String,
    result: Option<GpDetailsResult>,
}
