use chrono::{DateTime, Utc};

/// Place display name carried from the home screen into the detail screen.
///
/// Created when the user picks a search result or completes a location
/// resolution; it is the only parameter a screen transition carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceSelection(String);

impl PlaceSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One weather snapshot, fetched fresh per detail-screen visit.
///
/// The temperature is kept in Kelvin; display conversion happens in
/// [`crate::units::UnitPreference::convert_kelvin`] and never mutates the
/// reading, so the same snapshot could be redisplayed under a different unit
/// without refetching.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub condition: String,
    pub temperature_k: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}
