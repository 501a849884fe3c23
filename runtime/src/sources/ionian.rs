//! ionianweather.gr network feed.
//!
//! One JSON document covers the whole network; `stats` maps a station name
//! to its day record. Only allow-listed station codes are reported.

use super::{Collection, Source, SourceKind};
use crate::acquisition::http_client::HttpClient;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use ionian_wx::directory::{Station, IONIAN_CODES};
use ionian_wx::extract::parse_number;
use ionian_wx::report::{rule, value_or_placeholder};
use ionian_wx::{Observation, ReadingStatus, ScrapeError, ScrapeResult, StationReading};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub const BASE_URL: &str = "https://ionianweather.gr";

const TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    stats: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct FeedStation {
    #[serde(default)]
    code: Option<String>,
    #[serde(rename = "Max Temperature", default, deserialize_with = "lenient_number")]
    max_temp: Option<f64>,
    #[serde(rename = "Min Temperature", default, deserialize_with = "lenient_number")]
    min_temp: Option<f64>,
    #[serde(rename = "Rain By Day", default, deserialize_with = "lenient_number")]
    rain: Option<f64>,
    #[serde(rename = "Gust KlmPerHour", default, deserialize_with = "lenient_number")]
    gust: Option<f64>,
}

/// Accepts `12.5`, `"12.5"`, `null` or garbage (as `None`).
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_number(&s),
        _ => None,
    })
}

/// Readings for the allow-listed codes in a feed document.
///
/// Stations appear sorted by name, followed by a `NotAvailable` placeholder
/// for every allow-listed code the feed did not contain.
pub fn parse_stats(body: &str, allow: &[&str]) -> ScrapeResult<Vec<StationReading>> {
    let feed: Feed = serde_json::from_str(body)?;
    let stats = feed
        .stats
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ScrapeError::Payload("the 'stats' key is missing or empty".into()))?;

    let mut readings = Vec::new();
    for (name, value) in stats {
        let Ok(station) = serde_json::from_value::<FeedStation>(value) else {
            continue;
        };
        let Some(code) = station.code.filter(|c| allow.contains(&c.as_str())) else {
            continue;
        };
        let obs = Observation {
            high_temp_c: station.max_temp,
            low_temp_c: station.min_temp,
            rain_mm: station.rain,
            gust_kmh: station.gust,
        };
        readings.push(if obs.is_empty() {
            StationReading::placeholder(code, name, ReadingStatus::NotAvailable)
        } else {
            StationReading::ok(code, name, obs)
        });
    }

    for code in allow {
        if !readings.iter().any(|r| r.station_id() == *code) {
            readings.push(StationReading::placeholder(
                *code,
                *code,
                ReadingStatus::NotAvailable,
            ));
        }
    }
    Ok(readings)
}

pub struct IonianSource {
    http: HttpClient,
    base_url: String,
    allow: &'static [&'static str],
}

impl IonianSource {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: BASE_URL.to_string(),
            allow: IONIAN_CODES,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn url(&self) -> String {
        super::join_url(&self.base_url, "stations/stas.html")
    }

    async fn fetch(&self) -> ScrapeResult<Vec<StationReading>> {
        let body = self
            .http
            .get(&self.url(), TIMEOUT_MS)
            .await?
            .into_success_body()?;
        parse_stats(&body, self.allow)
    }

    fn failure_line(&self, failure: &ScrapeError) -> String {
        match failure {
            ScrapeError::Network(_) | ScrapeError::HttpStatus { .. } => format!(
                "NETWORK ERROR: Could not reach {}. Details: {failure}",
                self.url()
            ),
            _ => format!("SCRIPT ERROR: An unexpected error occurred: {failure}"),
        }
    }
}

fn render_row(r: &StationReading) -> String {
    if r.status().is_ok() {
        format!(
            "{:<20} {:<6} {:>9} {:>9} {:>6} {:>6}\n",
            r.display_name(),
            r.station_id(),
            value_or_placeholder(r.high_temp_c(), ""),
            value_or_placeholder(r.low_temp_c(), ""),
            value_or_placeholder(r.rain_mm(), ""),
            value_or_placeholder(r.gust_kmh(), ""),
        )
    } else {
        format!(
            "{:<20} {:<6} {:>9}\n",
            r.display_name(),
            r.station_id(),
            r.status().label()
        )
    }
}

#[async_trait]
impl Source for IonianSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Ionian
    }

    /// Feed names are unknown until fetched, so each code stands in for its name.
    fn stations(&self) -> Vec<Station> {
        self.allow.iter().map(|code| Station::new(code, code)).collect()
    }

    async fn collect(&self) -> Collection {
        info!("fetching {}...", self.url());
        match self.fetch().await {
            Ok(readings) => Collection::new(readings),
            Err(e) => {
                warn!("{}", self.failure_line(&e));
                Collection::all_failed(&self.stations(), e)
            }
        }
    }

    fn render(&self, collection: &Collection, at: DateTime<Local>) -> String {
        let mut out = String::new();
        if let Some(failure) = &collection.failure {
            out.push_str(&format!(
                "\n[{}] {}\n",
                at.format("%Y-%m-%d %H:%M:%S"),
                self.failure_line(failure)
            ));
        }
        let outcome = if collection.ok_count() > 0 {
            "Success"
        } else {
            "Failed"
        };
        out.push_str(&format!(
            "\n\n--- Extract {outcome}: {} ---\n",
            at.format("%H:%M:%S")
        ));
        out.push_str(&format!(
            "{:<20} {:<6} {:>9} {:>9} {:>6} {:>6}\n",
            "station", "code", "Max Temp", "Min Temp", "Rain", "Gust"
        ));
        for r in &collection.readings {
            out.push_str(&render_row(r));
        }
        out.push_str(&rule('=', 50));
        out.push('\n');
        out
    }
}
