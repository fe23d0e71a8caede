use serde::{Deserialize, Serialize};

/// User-selectable temperature unit. Persisted as part of [`crate::Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    /// Flip between the two units. Toggling twice is a no-op.
    pub fn toggle(self) -> Self {
        match self {
            UnitPreference::Metric => UnitPreference::Imperial,
            UnitPreference::Imperial => UnitPreference::Metric,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnitPreference::Metric => "°C",
            UnitPreference::Imperial => "°F",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitPreference::Metric => "Celsius",
            UnitPreference::Imperial => "Fahrenheit",
        }
    }

    /// Convert an absolute (Kelvin) temperature to a whole display degree.
    ///
    /// Readings are stored in Kelvin and only converted here, at render time,
    /// so the stored value never changes when the preference does.
    pub fn convert_kelvin(self, kelvin: f64) -> i32 {
        let value = match self {
            UnitPreference::Metric => kelvin - 273.15,
            UnitPreference::Imperial => (kelvin - 273.15) * 1.8 + 32.0,
        };
        value.round() as i32
    }
}

impl std::fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_an_involution() {
        assert_eq!(UnitPreference::Metric.toggle(), UnitPreference::Imperial);
        assert_eq!(UnitPreference::Imperial.toggle(), UnitPreference::Metric);
        assert_eq!(UnitPreference::Metric.toggle().toggle(), UnitPreference::Metric);
    }

    #[test]
    fn converts_kelvin_to_celsius() {
        assert_eq!(UnitPreference::Metric.convert_kelvin(300.15), 27);
        assert_eq!(UnitPreference::Metric.convert_kelvin(273.15), 0);
    }

    #[test]
    fn converts_kelvin_to_fahrenheit() {
        // 300.15 K = 27 °C = 80.6 °F, rounded to 81
        assert_eq!(UnitPreference::Imperial.convert_kelvin(300.15), 81);
        assert_eq!(UnitPreference::Imperial.convert_kelvin(273.15), 32);
    }

    #[test]
    fn rounds_to_nearest_whole_degree() {
        // 300.0 K = 26.85 °C; 299.0 K = 25.85 °C
        assert_eq!(UnitPreference::Metric.convert_kelvin(300.0), 27);
        assert_eq!(UnitPreference::Metric.convert_kelvin(299.0), 26);
        // 299.5 K = 26.35 °C
        assert_eq!(UnitPreference::Metric.convert_kelvin(299.5), 26);
    }

    #[test]
    fn default_is_metric() {
        assert_eq!(UnitPreference::default(), UnitPreference::Metric);
    }

    #[test]
    fn symbols_match_units() {
        assert_eq!(UnitPreference::Metric.symbol(), "°C");
        assert_eq!(UnitPreference::Imperial.symbol(), "°F");
    }
}
