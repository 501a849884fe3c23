//! Weather sources.
//!
//! Each source fetches one external site, turns it into one
//! [`StationReading`] per configured station and formats its own report
//! section. `collect` never fails: every error is folded into placeholder
//! readings so the report accounts for every station.

pub mod html;
pub mod ionian;
pub mod meteociel;
pub mod meteoclub;
pub mod penteli;
pub mod weathercloud;
pub mod widget;
pub mod wunderground;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use clap::ValueEnum;
use ionian_wx::directory::Station;
use ionian_wx::{ScrapeError, StationReading};
use serde::Serialize;

pub use ionian::IonianSource;
pub use meteociel::MeteocielSource;
pub use meteoclub::MeteoclubSource;
pub use penteli::PenteliSource;
pub use weathercloud::WeathercloudSource;
pub use wunderground::WundergroundSource;

/// Identifies a source on the command line and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Wunderground,
    Meteoclub,
    Penteli,
    Meteociel,
    Weathercloud,
    Ionian,
}

impl SourceKind {
    /// All sources in run order.
    pub const ALL: [SourceKind; 6] = [
        SourceKind::Wunderground,
        SourceKind::Meteoclub,
        SourceKind::Penteli,
        SourceKind::Meteociel,
        SourceKind::Weathercloud,
        SourceKind::Ionian,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Wunderground => "wunderground",
            SourceKind::Meteoclub => "meteoclub",
            SourceKind::Penteli => "penteli",
            SourceKind::Meteociel => "meteociel",
            SourceKind::Weathercloud => "weathercloud",
            SourceKind::Ionian => "ionian",
        }
    }

    /// Whether this source needs a browser.
    pub fn needs_browser(self) -> bool {
        matches!(self, SourceKind::Penteli | SourceKind::Weathercloud)
    }
}

/// What one source produced in a run.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Exactly one reading per configured station.
    pub readings: Vec<StationReading>,
    /// A source-wide failure (browser would not start, feed unreachable).
    pub failure: Option<ScrapeError>,
}

impl Collection {
    pub fn new(readings: Vec<StationReading>) -> Self {
        Self {
            readings,
            failure: None,
        }
    }

    pub fn failed(readings: Vec<StationReading>, failure: ScrapeError) -> Self {
        Self {
            readings,
            failure: Some(failure),
        }
    }

    /// An `Error` placeholder for every station in `stations`.
    pub fn all_failed(stations: &[Station], failure: ScrapeError) -> Self {
        let readings = stations
            .iter()
            .map(|s| StationReading::placeholder(s.id, s.name, failure.status()))
            .collect();
        Self::failed(readings, failure)
    }

    /// Readings with status OK.
    pub fn ok_count(&self) -> usize {
        self.readings.iter().filter(|r| r.status().is_ok()).count()
    }
}

/// A weather source adapter.
#[async_trait]
pub trait Source: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// The stations this source reports on, in report order.
    fn stations(&self) -> Vec<Station>;

    /// Fetch and parse every configured station.
    async fn collect(&self) -> Collection;

    /// Format the report section for `collection`. `at` is the wall-clock
    /// time the section is written.
    fn render(&self, collection: &Collection, at: DateTime<Local>) -> String;
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
