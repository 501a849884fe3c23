//! Core data types for station readings and scrape failures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one station scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    Ok,
    Offline,
    IncompleteData,
    Error,
    NotAvailable,
}

impl ReadingStatus {
    /// Label written into the report for this status.
    pub fn label(self) -> &'static str {
        match self {
            ReadingStatus::Ok => "OK",
            ReadingStatus::Offline => "Offline",
            ReadingStatus::IncompleteData => "Incomplete Data",
            ReadingStatus::Error => "Error",
            ReadingStatus::NotAvailable => "N/A",
        }
    }

    pub fn is_ok(self) -> bool {
        self == ReadingStatus::Ok
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The metric values extracted for a station. Every field is optional on
/// its own; a missing field is rendered as a placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Day high in °C.
    pub high_temp_c: Option<f64>,
    /// Day low in °C.
    pub low_temp_c: Option<f64>,
    /// Rain today in mm.
    pub rain_mm: Option<f64>,
    /// Max wind gust in km/h.
    pub gust_kmh: Option<f64>,
}

impl Observation {
    /// Number of fields that carry a value.
    pub fn field_count(&self) -> usize {
        [
            self.high_temp_c,
            self.low_temp_c,
            self.rain_mm,
            self.gust_kmh,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }
}

/// One station's reading for one run.
///
/// Numeric fields are only ever set when the status is [`ReadingStatus::Ok`];
/// the constructors are the only way to build a reading, so a failed station
/// can never carry stale numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReading {
    station_id: String,
    display_name: String,
    status: ReadingStatus,
    #[serde(flatten)]
    observation: Observation,
}

impl StationReading {
    /// A successful reading.
    pub fn ok(
        station_id: impl Into<String>,
        display_name: impl Into<String>,
        observation: Observation,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            display_name: display_name.into(),
            status: ReadingStatus::Ok,
            observation,
        }
    }

    /// A placeholder reading with no numeric fields.
    pub fn placeholder(
        station_id: impl Into<String>,
        display_name: impl Into<String>,
        status: ReadingStatus,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            display_name: display_name.into(),
            status,
            observation: Observation::default(),
        }
    }

    /// Fold a scrape result into a reading. Errors become placeholders with
    /// the status their error class maps to.
    pub fn from_result(
        station_id: impl Into<String>,
        display_name: impl Into<String>,
        result: ScrapeResult<Observation>,
    ) -> Self {
        match result {
            Ok(observation) => Self::ok(station_id, display_name, observation),
            Err(e) => Self::placeholder(station_id, display_name, e.status()),
        }
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn status(&self) -> ReadingStatus {
        self.status
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn high_temp_c(&self) -> Option<f64> {
        self.observation.high_temp_c
    }

    pub fn low_temp_c(&self) -> Option<f64> {
        self.observation.low_temp_c
    }

    pub fn rain_mm(&self) -> Option<f64> {
        self.observation.rain_mm
    }

    pub fn gust_kmh(&self) -> Option<f64> {
        self.observation.gust_kmh
    }
}

/// Errors that can occur while scraping a source.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScrapeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Expected anchor missing: {0}")]
    Structure(String),

    #[error("Incomplete data: found {found} of {expected} values")]
    Incomplete { found: usize, expected: usize },

    #[error("Malformed payload: {0}")]
    Payload(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ScrapeError {
    /// The reading status a station degrades to for this error.
    pub fn status(&self) -> ReadingStatus {
        match self {
            ScrapeError::Structure(_) => ReadingStatus::Offline,
            ScrapeError::Incomplete { .. } => ReadingStatus::IncompleteData,
            ScrapeError::Network(_)
            | ScrapeError::HttpStatus { .. }
            | ScrapeError::Payload(_)
            | ScrapeError::Browser(_)
            | ScrapeError::Unknown(_) => ReadingStatus::Error,
        }
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(e: serde_json::Error) -> Self {
        ScrapeError::Payload(e.to_string())
    }
}

/// Convenience result type.
pub type ScrapeResult<T> = Result<T, ScrapeError>;
