//! meteoclub.gr station page for Valaneio (Weather Display template).

use super::html::{element_text, label_cell, selector, value_after_label};
use super::{Collection, Source, SourceKind};
use crate::acquisition::http_client::HttpClient;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use ionian_wx::directory::{self, Station, StationDirectory};
use ionian_wx::extract::find_tagged_quantity;
use ionian_wx::report::{rule, value_or_placeholder};
use ionian_wx::units::Quantity;
use ionian_wx::{Observation, ScrapeError, ScrapeResult, StationReading};
use scraper::Html;
use tracing::{info, warn};

pub const BASE_URL: &str = "https://valanio-kerkyra.meteoclub.gr/";

const TIMEOUT_MS: u64 = 10_000;

const RAIN_LABEL: &str = "Today's Rain";
const WIND_LABEL: &str = "High Wind Speed";

pub struct MeteoclubSource {
    http: HttpClient,
    url: String,
    directory: StationDirectory,
}

impl MeteoclubSource {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            url: BASE_URL.to_string(),
            directory: directory::METEOCLUB,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    async fn fetch(&self) -> ScrapeResult<Observation> {
        let body = self
            .http
            .get(&self.url, TIMEOUT_MS)
            .await?
            .into_success_body()?;
        parse_page(&body)
    }
}

/// Extract the reading from the station page.
///
/// High and low sit in the first two paragraphs of the highlighted
/// left-aligned cell; rain and wind are in the cell after their label.
pub fn parse_page(html: &str) -> ScrapeResult<Observation> {
    let document = Html::parse_document(html);
    let mut obs = Observation::default();

    let temp_cell = document
        .select(&selector(r##"td[align="left"][bgcolor="#CCFFFF"]"##))
        .next();
    if let Some(cell) = temp_cell {
        let paragraphs: Vec<String> = cell
            .select(&selector("p"))
            .map(|p| element_text(&p))
            .collect();
        if paragraphs.len() >= 2 {
            obs.high_temp_c = find_tagged_quantity(&paragraphs[0], Quantity::Temperature);
            obs.low_temp_c = find_tagged_quantity(&paragraphs[1], Quantity::Temperature);
        }
    }

    obs.rain_mm = value_after_label(&document, RAIN_LABEL)
        .and_then(|text| find_tagged_quantity(&text, Quantity::Precipitation));
    obs.gust_kmh = value_after_label(&document, WIND_LABEL)
        .and_then(|text| find_tagged_quantity(&text, Quantity::WindSpeed));

    let anchored = temp_cell.is_some()
        || label_cell(&document, RAIN_LABEL).is_some()
        || label_cell(&document, WIND_LABEL).is_some();
    if !anchored {
        return Err(ScrapeError::Structure(
            "no temperature cell or rain/wind labels".into(),
        ));
    }
    if obs.is_empty() {
        return Err(ScrapeError::Incomplete {
            found: 0,
            expected: 4,
        });
    }
    Ok(obs)
}

#[async_trait]
impl Source for MeteoclubSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Meteoclub
    }

    fn stations(&self) -> Vec<Station> {
        self.directory.iter().copied().collect()
    }

    async fn collect(&self) -> Collection {
        let mut readings = Vec::with_capacity(self.directory.len());
        for station in self.directory.iter() {
            info!("fetching {}...", self.url);
            let result = self.fetch().await;
            if let Err(e) = &result {
                warn!("meteoclub {}: {e}", station.id);
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
                    "High Temp: {} | Low Temp: {} | Rain Today: {} | Max Wind Gust: {}\n",
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
