//! Unit normalization to metric.
//!
//! Sources report in whatever units the station owner picked. Everything is
//! converted to °C, mm and km/h before it reaches a [`crate::StationReading`].

use serde::{Deserialize, Serialize};

/// Miles per hour to km/h factor.
pub const KMH_PER_MPH: f64 = 1.60934;

/// Inches to millimetres factor.
pub const MM_PER_INCH: f64 = 25.4;

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn inches_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * KMH_PER_MPH
}

/// The physical quantity a value measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Temperature,
    Precipitation,
    WindSpeed,
}

/// A unit token recognised next to a scraped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Celsius,
    Fahrenheit,
    Millimetres,
    Inches,
    KilometresPerHour,
    MilesPerHour,
}

impl Unit {
    /// Parse a unit token as it appears on a page (`°F`, `Km/h`, `km/hr`,
    /// `mph`, `in`, …). Case-insensitive.
    pub fn from_token(token: &str) -> Option<Unit> {
        let t: String = token
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '°' && *c != 'º')
            .collect::<String>()
            .to_ascii_lowercase();
        match t.as_str() {
            "c" => Some(Unit::Celsius),
            "f" => Some(Unit::Fahrenheit),
            "mm" => Some(Unit::Millimetres),
            "in" | "inch" | "inches" => Some(Unit::Inches),
            "km/h" | "km/hr" | "kmh" | "kph" => Some(Unit::KilometresPerHour),
            "mph" => Some(Unit::MilesPerHour),
            _ => None,
        }
    }

    pub fn quantity(self) -> Quantity {
        match self {
            Unit::Celsius | Unit::Fahrenheit => Quantity::Temperature,
            Unit::Millimetres | Unit::Inches => Quantity::Precipitation,
            Unit::KilometresPerHour | Unit::MilesPerHour => Quantity::WindSpeed,
        }
    }

    /// Convert `value` expressed in this unit to the metric unit of its quantity.
    pub fn to_metric(self, value: f64) -> f64 {
        match self {
            Unit::Fahrenheit => fahrenheit_to_celsius(value),
            Unit::Inches => inches_to_mm(value),
            Unit::MilesPerHour => mph_to_kmh(value),
            Unit::Celsius | Unit::Millimetres | Unit::KilometresPerHour => value,
        }
    }
}

/// Convert a value whose unit token may be missing. No token means the
/// value is already metric.
pub fn normalize(value: f64, unit: Option<Unit>) -> f64 {
    match unit {
        Some(u) => u.to_metric(value),
        None => value,
    }
}

/// Unit system inferred from a single page-wide label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Infer the system from a temperature label such as `°F` or `°C`.
    ///
    /// Only an explicit `F` switches to imperial; anything else, including a
    /// missing label, is treated as metric.
    pub fn from_temperature_label(label: Option<&str>) -> UnitSystem {
        match label {
            Some(l) if l.contains('F') => UnitSystem::Imperial,
            _ => UnitSystem::Metric,
        }
    }

    /// The unit this system uses for `quantity`.
    pub fn unit_for(self, quantity: Quantity) -> Unit {
        match (self, quantity) {
            (UnitSystem::Metric, Quantity::Temperature) => Unit::Celsius,
            (UnitSystem::Metric, Quantity::Precipitation) => Unit::Millimetres,
            (UnitSystem::Metric, Quantity::WindSpeed) => Unit::KilometresPerHour,
            (UnitSystem::Imperial, Quantity::Temperature) => Unit::Fahrenheit,
            (UnitSystem::Imperial, Quantity::Precipitation) => Unit::Inches,
            (UnitSystem::Imperial, Quantity::WindSpeed) => Unit::MilesPerHour,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_fahrenheit_fixed_points() {
        assert!(close(fahrenheit_to_celsius(32.0), 0.0));
        assert!(close(fahrenheit_to_celsius(212.0), 100.0));
    }

    #[test]
    fn test_inches_and_mph() {
        assert!(close(inches_to_mm(1.0), 25.4));
        assert!(close(mph_to_kmh(1.0), 1.60934));
    }

    #[test]
    fn test_unit_tokens() {
        assert_eq!(Unit::from_token("°F"), Some(Unit::Fahrenheit));
        assert_eq!(Unit::from_token("° C"), Some(Unit::Celsius));
        assert_eq!(Unit::from_token("Km/h"), Some(Unit::KilometresPerHour));
        assert_eq!(Unit::from_token("km/hr"), Some(Unit::KilometresPerHour));
        assert_eq!(Unit::from_token("MPH"), Some(Unit::MilesPerHour));
        assert_eq!(Unit::from_token("in"), Some(Unit::Inches));
        assert_eq!(Unit::from_token("hPa"), None);
    }

    #[test]
    fn test_normalize_defaults_to_metric() {
        assert!(close(normalize(12.5, None), 12.5));
        assert!(close(normalize(50.0, Some(Unit::Fahrenheit)), 10.0));
        assert!(close(normalize(10.0, Some(Unit::KilometresPerHour)), 10.0));
    }

    #[test]
    fn test_unit_system_from_label() {
        assert_eq!(
            UnitSystem::from_temperature_label(Some("°F")),
            UnitSystem::Imperial
        );
        assert_eq!(
            UnitSystem::from_temperature_label(Some("°C")),
            UnitSystem::Metric
        );
        assert_eq!(UnitSystem::from_temperature_label(None), UnitSystem::Metric);
        assert_eq!(
            UnitSystem::Imperial.unit_for(Quantity::Precipitation),
            Unit::Inches
        );
    }
}
