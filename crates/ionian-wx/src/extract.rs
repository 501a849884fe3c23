//! Numeric extraction from scraped text.
//!
//! Pages render values as free text ("14.2 °C", "35 Km/h", "0,4mm"). These
//! helpers pull the numbers out and pair them with an adjacent unit token.

use crate::units::{self, Quantity, Unit};
use regex::Regex;
use std::sync::OnceLock;

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+\.\d+").expect("decimal regex is valid"))
}

fn quantity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(-?\d+(?:[.,]\d+)?)\s*([°º]\s*[cf]\b|mm\b|km/hr?\b|kmh\b|kph\b|mph\b|inch(?:es)?\b|in\b)?",
        )
        .expect("quantity regex is valid")
    })
}

/// Every `digits.digits` number in `text` (with an optional leading `-`),
/// in order of appearance. Integers are not matched.
pub fn decimal_values(text: &str) -> Vec<f64> {
    decimal_re()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Parse a bare number, tolerating thousands separators and surrounding
/// whitespace (`"1,024.5 "`).
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// First number in `text` that measures `quantity`, with its unit token.
///
/// A number followed by a unit of another quantity is skipped. A number
/// without any unit token is accepted with `None`.
pub fn find_quantity_with_unit(text: &str, quantity: Quantity) -> Option<(f64, Option<Unit>)> {
    for caps in quantity_re().captures_iter(text) {
        let unit = caps.get(2).and_then(|m| Unit::from_token(m.as_str()));
        if let Some(u) = unit {
            if u.quantity() != quantity {
                continue;
            }
        }
        let raw = caps.get(1)?.as_str().replace(',', ".");
        if let Ok(value) = raw.parse::<f64>() {
            return Some((value, unit));
        }
    }
    None
}

/// First value in `text` measuring `quantity`, converted to metric.
pub fn find_quantity(text: &str, quantity: Quantity) -> Option<f64> {
    find_quantity_with_unit(text, quantity).map(|(v, unit)| units::normalize(v, unit))
}

/// Like [`find_quantity`], but only numbers carrying a unit token of
/// `quantity` count. Times and counters next to the value are skipped.
pub fn find_tagged_quantity(text: &str, quantity: Quantity) -> Option<f64> {
    quantity_re().captures_iter(text).find_map(|caps| {
        let unit = caps.get(2).and_then(|m| Unit::from_token(m.as_str()))?;
        if unit.quantity() != quantity {
            return None;
        }
        let value = caps.get(1)?.as_str().replace(',', ".").parse::<f64>().ok()?;
        Some(unit.to_metric(value))
    })
}

/// Collapse runs of whitespace (including the non-breaking spaces some
/// vendors sprinkle into table cells) into single spaces.
pub fn normalize_ws(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
