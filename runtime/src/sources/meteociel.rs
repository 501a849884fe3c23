//! meteociel.fr live observations for one SYNOP station.
//!
//! The day summary is a yellow table: the first row holds column labels,
//! the second the values. Columns move around between stations, so the
//! labels pick the cells.

use super::html::{element_text, selector};
use super::{Collection, Source, SourceKind};
use crate::acquisition::http_client::HttpClient;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use ionian_wx::directory::{self, Station, StationDirectory};
use ionian_wx::extract::find_quantity;
use ionian_wx::report::{rule, value_or_placeholder};
use ionian_wx::units::Quantity;
use ionian_wx::{Observation, ScrapeError, ScrapeResult, StationReading};
use scraper::Html;
use tracing::{info, warn};

pub const BASE_URL: &str = "https://www.meteociel.fr";

const TIMEOUT_MS: u64 = 10_000;

/// Used when the server does not declare a charset.
pub const DEFAULT_CHARSET: &str = "windows-1252";

const COLUMNS: [(&str, Quantity); 4] = [
    ("Température Maxi", Quantity::Temperature),
    ("Température Mini", Quantity::Temperature),
    ("Rafale maxi", Quantity::WindSpeed),
    ("Précipitations", Quantity::Precipitation),
];

pub struct MeteocielSource {
    http: HttpClient,
    base_url: String,
    directory: StationDirectory,
}

impl MeteocielSource {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: BASE_URL.to_string(),
            directory: directory::METEOCIEL,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn station_url(&self, code: &str) -> String {
        super::join_url(
            &self.base_url,
            &format!("temps-reel/obs_villes.php?code2={code}"),
        )
    }

    async fn fetch(&self, station: &Station) -> ScrapeResult<Observation> {
        let body = self
            .http
            .get_with_charset(&self.station_url(station.id), TIMEOUT_MS, DEFAULT_CHARSET)
            .await?
            .into_success_body()?;
        parse_summary(&body)
    }
}

/// Extract the reading from the observation page.
pub fn parse_summary(html: &str) -> ScrapeResult<Observation> {
    let document = Html::parse_document(html);
    let table = document
        .select(&selector(r##"table[bgcolor="#FFFF99"]"##))
        .next()
        .ok_or_else(|| ScrapeError::Structure("summary table not found".into()))?;

    let rows: Vec<_> = table.select(&selector("tr")).collect();
    if rows.len() < 2 {
        return Err(ScrapeError::Incomplete {
            found: rows.len(),
            expected: 2,
        });
    }

    let td = selector("td");
    let labels: Vec<String> = rows[0].select(&td).map(|c| element_text(&c)).collect();
    let cells: Vec<String> = rows[1].select(&td).map(|c| element_text(&c)).collect();

    let mut values = [None; 4];
    for (i, label) in labels.iter().enumerate() {
        let Some((slot, (_, quantity))) = COLUMNS
            .iter()
            .enumerate()
            .find(|(_, (name, _))| label.contains(name))
        else {
            continue;
        };
        values[slot] = cells
            .get(i)
            .and_then(|text| find_quantity(text, *quantity));
    }

    let obs = Observation {
        high_temp_c: values[0],
        low_temp_c: values[1],
        gust_kmh: values[2],
        rain_mm: values[3],
    };
    if obs.is_empty() {
        return Err(ScrapeError::Incomplete {
            found: 0,
            expected: COLUMNS.len(),
        });
    }
    Ok(obs)
}

#[async_trait]
impl Source for MeteocielSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Meteociel
    }

    fn stations(&self) -> Vec<Station> {
        self.directory.iter().copied().collect()
    }

    async fn collect(&self) -> Collection {
        let mut readings = Vec::with_capacity(self.directory.len());
        for station in self.directory.iter() {
            info!("fetching meteociel {}...", station.id);
            let result = self.fetch(station).await;
            if let Err(e) = &result {
                warn!("meteociel {}: {e}", station.id);
            }
            readings.push(StationReading::from_result(station.id, station.name, result));
        }
        Collection::new(readings)
    }

    fn render(&self, collection: &Collection, _at: DateTime<Local>) -> String {
        let mut out = String::new();
        for r in &collection.readings {
            out.push_str(&format!("\n\n--- Weather Data for {} ---\n", r.display_name()));
            out.push_str(&rule('-', 80));
            out.push('\n');
            if r.status().is_ok() {
                out.push_str(&format!(
                    "Max Temp: {} | Min Temp: {} | Rain Today: {} | Max Gust: {}\n",
                    value_or_placeholder(r.high_temp_c(), "°C"),
                    value_or_placeholder(r.low_temp_c(), "°C"),
                    value_or_placeholder(r.rain_mm(), "mm"),
                    value_or_placeholder(r.gust_kmh(), "km/h"),
                ));
            } else {
                out.push_str(&format!("Status: {}\n", r.status().label()));
            }
        }
        out
    }
}
