use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::Error;
use crate::model::{PlaceSelection, WeatherReading};
use crate::units::UnitPreference;
use crate::weather::WeatherApi;

/// Render-ready projection of a weather reading for one place.
///
/// The temperature is already converted to whole display degrees using the
/// unit snapshot taken when the fetch completed; a later preference change
/// does not rewrite an existing card.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub place: String,
    pub condition: String,
    pub temperature: i32,
    pub unit_symbol: &'static str,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl WeatherCard {
    fn from_reading(
        place: &PlaceSelection,
        reading: &WeatherReading,
        unit: UnitPreference,
    ) -> Self {
        Self {
            place: place.name().to_string(),
            condition: reading.condition.clone(),
            temperature: unit.convert_kelvin(reading.temperature_k),
            unit_symbol: unit.symbol(),
            humidity_pct: reading.humidity_pct,
            wind_speed_mps: reading.wind_speed_mps,
            sunrise: reading.sunrise,
            sunset: reading.sunset,
        }
    }
}

/// Detail-screen lifecycle. While `Loading` no reading is visible; a failed
/// fetch renders nothing further and offers no retry affordance.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading,
    Rendered(WeatherCard),
    Errored(&'static str),
}

#[derive(Debug)]
struct Inner {
    state: DetailState,
    latest_request: u64,
}

/// Drives "fetch weather for a place, convert per the unit snapshot, render
/// or report failure". Revisiting a place always refetches; nothing is
/// cached between visits.
#[derive(Debug, Clone)]
pub struct DetailViewModel {
    api: Arc<dyn WeatherApi>,
    inner: Arc<Mutex<Inner>>,
}

impl DetailViewModel {
    pub fn new(api: Arc<dyn WeatherApi>) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(Inner {
                state: DetailState::Idle,
                latest_request: 0,
            })),
        }
    }

    pub fn state(&self) -> DetailState {
        self.inner.lock().state.clone()
    }

    /// Fetch and render weather for `place`.
    ///
    /// Each call claims a fresh request token; a completion whose token has
    /// been superseded by a newer call is discarded, so a slow response for a
    /// previously-viewed place can never overwrite the current one.
    pub async fn show(&self, place: &PlaceSelection, unit: UnitPreference) -> DetailState {
        let token = {
            let mut inner = self.inner.lock();
            inner.latest_request += 1;
            inner.state = DetailState::Loading;
            inner.latest_request
        };

        let result = self.api.fetch_by_place_name(place.name()).await;

        let mut inner = self.inner.lock();
        if inner.latest_request != token {
            tracing::debug!(place = place.name(), "discarding superseded weather response");
            return inner.state.clone();
        }

        inner.state = match result {
            Ok(reading) => {
                DetailState::Rendered(WeatherCard::from_reading(place, &reading, unit))
            }
            Err(err) => {
                tracing::debug!(error = %err, place = place.name(), "weather fetch failed");
                DetailState::Errored(Error::Lookup(err).user_message())
            }
        };

        inner.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::model::Coordinates;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use tokio::sync::oneshot;

    fn reading(kelvin: f64) -> WeatherReading {
        WeatherReading {
            condition: "clear sky".into(),
            temperature_k: kelvin,
            humidity_pct: 40,
            wind_speed_mps: 3.2,
            sunrise: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            sunset: Utc.timestamp_opt(1_700_040_000, 0).unwrap(),
        }
    }

    #[derive(Debug)]
    struct FailingApi;

    #[async_trait]
    impl WeatherApi for FailingApi {
        async fn fetch_by_place_name(
            &self,
            _name: &str,
        ) -> Result<WeatherReading, LookupError> {
            Err(LookupError::NoMatch)
        }

        async fn fetch_by_coordinates(
            &self,
            _coords: Coordinates,
        ) -> Result<WeatherReading, LookupError> {
            Err(LookupError::NoMatch)
        }
    }

    #[derive(Debug)]
    struct FixedApi(f64);

    #[async_trait]
    impl WeatherApi for FixedApi {
        async fn fetch_by_place_name(
            &self,
            _name: &str,
        ) -> Result<WeatherReading, LookupError> {
            Ok(reading(self.0))
        }

        async fn fetch_by_coordinates(
            &self,
            _coords: Coordinates,
        ) -> Result<WeatherReading, LookupError> {
            Ok(reading(self.0))
        }
    }

    /// Blocks the "slow" place until released, signalling entry first.
    #[derive(Debug)]
    struct GatedApi {
        entered: Mutex<Option<oneshot::Sender<()>>>,
        release: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl WeatherApi for GatedApi {
        async fn fetch_by_place_name(
            &self,
            name: &str,
        ) -> Result<WeatherReading, LookupError> {
            if name == "slow" {
                if let Some(tx) = self.entered.lock().take() {
                    let _ = tx.send(());
                }
                let rx = self.release.lock().await.take();
                if let Some(rx) = rx {
                    let _ = rx.await;
                }
                Ok(reading(250.0))
            } else {
                Ok(reading(300.15))
            }
        }

        async fn fetch_by_coordinates(
            &self,
            _coords: Coordinates,
        ) -> Result<WeatherReading, LookupError> {
            Err(LookupError::NoMatch)
        }
    }

    #[tokio::test]
    async fn successful_fetch_renders_converted_card() {
        let vm = DetailViewModel::new(Arc::new(FixedApi(300.15)));
        let place = PlaceSelection::new("Springfield");

        let state = vm.show(&place, UnitPreference::Metric).await;
        let DetailState::Rendered(card) = state else {
            panic!("expected rendered state");
        };

        assert_eq!(card.place, "Springfield");
        assert_eq!(card.temperature, 27);
        assert_eq!(card.unit_symbol, "°C");
        assert_eq!(card.humidity_pct, 40);
    }

    #[tokio::test]
    async fn imperial_snapshot_converts_to_fahrenheit() {
        let vm = DetailViewModel::new(Arc::new(FixedApi(300.15)));
        let place = PlaceSelection::new("Springfield");

        let state = vm.show(&place, UnitPreference::Imperial).await;
        let DetailState::Rendered(card) = state else {
            panic!("expected rendered state");
        };

        assert_eq!(card.temperature, 81);
        assert_eq!(card.unit_symbol, "°F");
    }

    #[tokio::test]
    async fn failed_fetch_errors_with_a_single_generic_message() {
        let vm = DetailViewModel::new(Arc::new(FailingApi));
        let place = PlaceSelection::new("Nowhere");

        let state = vm.show(&place, UnitPreference::Metric).await;

        let DetailState::Errored(message) = state else {
            panic!("expected errored state");
        };
        assert_eq!(message, Error::Lookup(LookupError::NoMatch).user_message());
        assert!(matches!(vm.state(), DetailState::Errored(_)));
    }

    #[tokio::test]
    async fn revisiting_a_place_refetches() {
        let vm = DetailViewModel::new(Arc::new(FixedApi(280.15)));
        let place = PlaceSelection::new("Springfield");

        vm.show(&place, UnitPreference::Metric).await;
        let state = vm.show(&place, UnitPreference::Metric).await;

        let DetailState::Rendered(card) = state else {
            panic!("expected rendered state");
        };
        assert_eq!(card.temperature, 7);
    }

    #[tokio::test]
    async fn late_response_for_superseded_request_is_discarded() {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();

        let api = Arc::new(GatedApi {
            entered: Mutex::new(Some(entered_tx)),
            release: tokio::sync::Mutex::new(Some(release_rx)),
        });
        let vm = DetailViewModel::new(api);

        let slow = tokio::spawn({
            let vm = vm.clone();
            async move {
                vm.show(&PlaceSelection::new("slow"), UnitPreference::Metric)
                    .await
            }
        });

        // The slow request must hold its token before the fast one starts.
        entered_rx.await.expect("slow fetch entered");

        let state = vm
            .show(&PlaceSelection::new("fast"), UnitPreference::Metric)
            .await;
        let DetailState::Rendered(card) = state else {
            panic!("expected rendered state");
        };
        assert_eq!(card.place, "fast");

        release_tx.send(()).expect("release slow fetch");
        slow.await.expect("slow task");

        let DetailState::Rendered(card) = vm.state() else {
            panic!("expected rendered state");
        };
        assert_eq!(card.place, "fast");
        assert_eq!(card.temperature, 27);
    }
}
