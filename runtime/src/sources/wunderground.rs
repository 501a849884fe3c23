//! Weather Underground PWS dashboards (static HTML, one page per station).
//!
//! The dashboard carries two `summary-table` blocks: the first holds
//! high/low/average temperature and the precipitation total, the second
//! the wind rows. Values are rendered in the station owner's units with a
//! `wu-label` span next to each `wu-value`.

use super::html::{element_text, selector};
use super::{Collection, Source, SourceKind};
use crate::acquisition::http_client::HttpClient;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use ionian_wx::directory::{self, Station, StationDirectory};
use ionian_wx::extract::{decimal_values, parse_number};
use ionian_wx::report::{padded_value, rule};
use ionian_wx::units::{Quantity, Unit, UnitSystem};
use ionian_wx::{Observation, ScrapeError, ScrapeResult, StationReading};
use scraper::Html;
use std::time::Duration;
use tracing::{info, warn};

pub const BASE_URL: &str = "https://www.wunderground.com";

const TIMEOUT_MS: u64 = 10_000;

/// Decimal values the first summary table must yield (high, low, avg, rain).
const MIN_SUMMARY_VALUES: usize = 4;

const TABLE_WIDTH: usize = 85;

pub struct WundergroundSource {
    http: HttpClient,
    base_url: String,
    directory: StationDirectory,
    delay: Duration,
}

impl WundergroundSource {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: BASE_URL.to_string(),
            directory: directory::WUNDERGROUND,
            delay: Duration::from_secs(1),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_directory(mut self, directory: StationDirectory) -> Self {
        self.directory = directory;
        self
    }

    /// Pause between two station requests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn station_url(&self, station_id: &str) -> String {
        super::join_url(&self.base_url, &format!("dashboard/pws/{station_id}"))
    }

    /// Fetch and parse one station. Never fails; errors become placeholders.
    pub async fn fetch_station(&self, station: &Station) -> StationReading {
        let url = self.station_url(station.id);
        let result = match self.http.get(&url, TIMEOUT_MS).await {
            Ok(resp) => resp
                .into_success_body()
                .and_then(|body| parse_dashboard(&body)),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            warn!("wunderground {}: {e}", station.id);
        }
        StationReading::from_result(station.id, station.name, result)
    }
}

/// Extract the reading from a dashboard page.
pub fn parse_dashboard(html: &str) -> ScrapeResult<Observation> {
    let document = Html::parse_document(html);
    let tables: Vec<_> = document.select(&selector(".summary-table")).collect();
    if tables.len() < 2 {
        return Err(ScrapeError::Structure(format!(
            "expected 2 summary-table blocks, found {}",
            tables.len()
        )));
    }

    // Table 1: temperatures and precipitation
    let summary = &tables[0];
    let values = decimal_values(&element_text(summary));
    if values.len() < MIN_SUMMARY_VALUES {
        return Err(ScrapeError::Incomplete {
            found: values.len(),
            expected: MIN_SUMMARY_VALUES,
        });
    }

    let label = summary
        .select(&selector("span.wu-unit-temperature"))
        .next()
        .and_then(|temp| temp.select(&selector("span.wu-label")).next())
        .map(|l| element_text(&l));
    let system = UnitSystem::from_temperature_label(label.as_deref());
    let temp_unit = system.unit_for(Quantity::Temperature);
    // The page-wide system also decides the rain unit.
    let rain_unit = system.unit_for(Quantity::Precipitation);

    let high = temp_unit.to_metric(values[0]);
    let low = temp_unit.to_metric(values[1]);
    let rain = rain_unit.to_metric(values[values.len() - 1]);

    // Table 2: wind
    let gust = tables[1]
        .select(&selector("tr"))
        .find(|row| element_text(row).contains("Wind Gust"))
        .and_then(|row| {
            let value = row
                .select(&selector("span.wu-value"))
                .next()
                .and_then(|v| parse_number(&element_text(&v)))?;
            let is_mph = row
                .select(&selector("span.wu-label"))
                .next()
                .map(|l| element_text(&l).contains("mph"))
                .unwrap_or(false);
            Some(if is_mph {
                Unit::MilesPerHour.to_metric(value)
            } else {
                value
            })
        });

    Ok(Observation {
        high_temp_c: Some(high),
        low_temp_c: Some(low),
        rain_mm: Some(rain),
        gust_kmh: gust,
    })
}

fn render_row(r: &StationReading) -> String {
    if r.status().is_ok() {
        format!(
            "{:<20} | {:<10} | {} | {} | {} | {}",
            r.display_name(),
            r.station_id(),
            padded_value(r.high_temp_c(), 5, "°C"),
            padded_value(r.low_temp_c(), 5, "°C"),
            padded_value(r.rain_mm(), 5, "mm"),
            padded_value(r.gust_kmh(), 5, "km/h"),
        )
    } else {
        format!(
            "{:<20} | {:<10} | {:^35}",
            r.display_name(),
            r.station_id(),
            r.status().label()
        )
    }
}

#[async_trait]
impl Source for WundergroundSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Wunderground
    }

    fn stations(&self) -> Vec<Station> {
        self.directory.iter().copied().collect()
    }

    async fn collect(&self) -> Collection {
        let mut readings = Vec::with_capacity(self.directory.len());
        for (i, station) in self.directory.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            info!("fetching {}...", station.id);
            let reading = self.fetch_station(station).await;
            info!("{}", render_row(&reading).trim_end());
            readings.push(reading);
        }
        Collection::new(readings)
    }

    fn render(&self, collection: &Collection, _at: DateTime<Local>) -> String {
        let mut out = String::new();
        out.push('\n');
        out.push_str(&rule('=', TABLE_WIDTH));
        out.push('\n');
        out.push_str(&format!(
            "{:<20} | {:<10} | {:<7} | {:<7} | {:<7} | {:<7}\n",
            "STATION NAME", "ID", "HIGH", "LOW", "RAIN", "GUST"
        ));
        out.push_str(&rule('-', TABLE_WIDTH));
        out.push('\n');
        for r in &collection.readings {
            out.push_str(&render_row(r));
            out.push('\n');
        }
        out.push_str(&rule('=', TABLE_WIDTH));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard(
        temp_label: &str,
        summary_values: &[&str],
        gust: &str,
        gust_label: &str,
    ) -> String {
        let cells: String = summary_values
            .iter()
            .map(|v| {
                format!(
                    r#"<td><span class="wu-unit-temperature"><span class="wu-value">{v}</span><span class="wu-label">{temp_label}</span></span></td>"#
                )
            })
            .collect();
        format!(
            r#"<html><body>
            <div class="summary-table"><table><tr>{cells}</tr></table></div>
            <div class="summary-table"><table>
                <tr><td>Wind Speed</td><td><span class="wu-value">4</span></td></tr>
                <tr><td>Wind Gust</td><td><span class="wu-value">{gust}</span><span class="wu-label">{gust_label}</span></td></tr>
            </table></div>
            </body></html>"#
        )
    }

    #[test]
    fn test_parse_metric_dashboard() {
        let html = dashboard("°C", &["21.4", "12.1", "16.8", "3.2"], "28.3", "km/h");
        let obs = parse_dashboard(&html).unwrap();
        assert_eq!(obs.high_temp_c, Some(21.4));
        assert_eq!(obs.low_temp_c, Some(12.1));
        assert_eq!(obs.rain_mm, Some(3.2));
        assert_eq!(obs.gust_kmh, Some(28.3));
    }

    #[test]
    fn test_parse_imperial_dashboard() {
        let html = dashboard("°F", &["212.0", "32.0", "100.0", "1.00"], "10", "mph");
        let obs = parse_dashboard(&html).unwrap();
        assert!((obs.high_temp_c.unwrap() - 100.0).abs() < 1e-9);
        assert!(obs.low_temp_c.unwrap().abs() < 1e-9);
        assert!((obs.rain_mm.unwrap() - 25.4).abs() < 1e-9);
        assert!((obs.gust_kmh.unwrap() - 16.0934).abs() < 1e-9);
    }

    #[test]
    fn test_sub_zero_low_keeps_its_sign() {
        let html = dashboard("°C", &["4.1", "-2.3", "0.9", "0.0"], "12.0", "km/h");
        let obs = parse_dashboard(&html).unwrap();
        assert_eq!(obs.high_temp_c, Some(4.1));
        assert_eq!(obs.low_temp_c, Some(-2.3));
        assert_eq!(obs.rain_mm, Some(0.0));

        let html = dashboard("°F", &["35.6", "-4.0", "20.0", "0.00"], "5", "mph");
        let obs = parse_dashboard(&html).unwrap();
        assert!((obs.low_temp_c.unwrap() + 20.0).abs() < 1e-9);
        assert!((obs.high_temp_c.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_summary_table_is_offline() {
        let html = r#"<html><body><div class="summary-table">only one</div></body></html>"#;
        let err = parse_dashboard(html).unwrap_err();
        assert_eq!(err.status(), ionian_wx::ReadingStatus::Offline);
    }

    #[test]
    fn test_two_values_is_incomplete() {
        let html = dashboard("°C", &["21.4", "12.1"], "5.0", "km/h");
        let err = parse_dashboard(&html).unwrap_err();
        assert_eq!(
            err,
            ScrapeError::Incomplete {
                found: 2,
                expected: 4
            }
        );
    }

    #[test]
    fn test_missing_gust_row_leaves_gust_empty() {
        let html = r#"<html><body>
            <div class="summary-table">20.0 10.0 15.0 0.0</div>
            <div class="summary-table"><table><tr><td>Wind Speed</td></tr></table></div>
            </body></html>"#;
        let obs = parse_dashboard(html).unwrap();
        assert_eq!(obs.high_temp_c, Some(20.0));
        assert_eq!(obs.gust_kmh, None);
    }

    #[test]
    fn test_gust_with_thousands_separator() {
        let html = dashboard("°C", &["1.0", "1.0", "1.0", "1.0"], "1,002.5", "km/h");
        assert_eq!(parse_dashboard(&html).unwrap().gust_kmh, Some(1002.5));
    }

    #[test]
    fn test_render_rows() {
        let src = WundergroundSource::new(HttpClient::new(1000));
        let collection = Collection::new(vec![
            StationReading::ok(
                "IKERKIRA2",
                "Arillas",
                Observation {
                    high_temp_c: Some(21.44),
                    low_temp_c: Some(9.0),
                    rain_mm: Some(0.0),
                    gust_kmh: None,
                },
            ),
            StationReading::placeholder("IAVLIO1", "Avliotes", ionian_wx::ReadingStatus::Offline),
        ]);
        let text = src.render(&collection, Local::now());
        assert!(text.contains(
            "Arillas              | IKERKIRA2  |  21.4 °C |   9.0 °C |   0.0 mm |   N/A km/h"
        ));
        assert!(text.contains("Avliotes             | IAVLIO1    |"));
        assert!(text.contains("Offline"));
        assert_eq!(text.lines().filter(|l| l.starts_with("====")).count(), 2);
    }
}
