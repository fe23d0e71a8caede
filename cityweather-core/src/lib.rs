//! Core library for the `cityweather` app.
//!
//! This crate defines:
//! - Settings handling, including the persisted temperature unit
//! - Clients for the weather, place-search and geolocation providers
//! - The location-resolution chain and the detail-screen view model
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries or services.

pub mod detail;
pub mod error;
pub mod locate;
pub mod model;
pub mod places;
pub mod settings;
pub mod units;
pub mod weather;

pub use detail::{DetailState, DetailViewModel, WeatherCard};
pub use error::{Error, LookupError};
pub use locate::{
    GeolocationService, IpLocator, LocationResolver, PermissionStatus, ResolveOutcome,
    ReverseGeocoder,
};
pub use model::{Coordinates, PlaceSelection, WeatherReading};
pub use places::{PlaceCandidate, PlaceSearch};
pub use settings::Settings;
pub use units::UnitPreference;
pub use weather::{OpenWeatherClient, WeatherApi};
