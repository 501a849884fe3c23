//! meteo.gr station pages (rendered client-side).

use super::widget::{
    collect_widgets, Locator, Slot, WidgetField, WidgetPlan, WidgetTarget, WidgetTimeouts,
};
use super::{Collection, Source, SourceKind};
use crate::renderer::Launcher;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use ionian_wx::directory::{self, Station, StationDirectory};
use ionian_wx::report::{rule, value_or_placeholder};
use ionian_wx::StationReading;
use std::sync::Arc;

pub const BASE_URL: &str = "https://penteli.meteo.gr";

const FIELDS: [WidgetField; 4] = [
    WidgetField::new(
        Slot::HighTemp,
        Locator::XPath("(//span[contains(text(), 'High Temperature')]/parent::div/following-sibling::div//span)[1]"),
    ),
    WidgetField::new(
        Slot::LowTemp,
        Locator::XPath("(//span[contains(text(), 'High Temperature')]/parent::div/following-sibling::div//span)[2]"),
    ),
    WidgetField::new(
        Slot::Rain,
        Locator::XPath("//span[contains(text(), \"Today's Rain\")]/parent::div/following-sibling::div/span"),
    ),
    WidgetField::new(
        Slot::Gust,
        Locator::XPath("//span[contains(text(), 'High Wind Gust')]/parent::div/following-sibling::div/span"),
    ),
];

pub struct PenteliSource {
    launcher: Arc<dyn Launcher>,
    base_url: String,
    directory: StationDirectory,
    timeouts: WidgetTimeouts,
}

impl PenteliSource {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self {
            launcher,
            base_url: BASE_URL.to_string(),
            directory: directory::PENTELI,
            timeouts: WidgetTimeouts::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeouts(mut self, timeouts: WidgetTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn targets(&self) -> Vec<WidgetTarget> {
        self.directory
            .iter()
            .map(|s| WidgetTarget {
                station_id: s.id.to_string(),
                display_name: s.name.to_string(),
                url: super::join_url(&self.base_url, &format!("stations/{}/", s.id)),
            })
            .collect()
    }

    pub fn plan(&self) -> WidgetPlan {
        WidgetPlan {
            consent: false,
            fields: FIELDS.to_vec(),
            timeouts: self.timeouts,
        }
    }
}

fn row(name: &str, high: &str, low: &str, rain: &str, gust: &str) -> String {
    format!("{name:<18} | High: {high:>8} | Low: {low:>8} | Rain: {rain:>8} | Gust: {gust:>9}\n")
}

fn render_reading(r: &StationReading) -> String {
    if r.status().is_ok() {
        row(
            r.display_name(),
            &value_or_placeholder(r.high_temp_c(), "°C"),
            &value_or_placeholder(r.low_temp_c(), "°C"),
            &value_or_placeholder(r.rain_mm(), "mm"),
            &value_or_placeholder(r.gust_kmh(), "km/h"),
        )
    } else {
        format!("{:<18} | {:^59}\n", r.display_name(), r.status().label())
    }
}

#[async_trait]
impl Source for PenteliSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Penteli
    }

    fn stations(&self) -> Vec<Station> {
        self.directory.iter().copied().collect()
    }

    async fn collect(&self) -> Collection {
        collect_widgets(self.launcher.as_ref(), &self.targets(), &self.plan()).await
    }

    fn render(&self, collection: &Collection, _at: DateTime<Local>) -> String {
        let mut out = String::from("\n\n--- Summary ---\n");
        out.push_str(&row("Station", "Temp", "Temp", "Today", "Max"));
        out.push_str(&rule('-', 80));
        out.push('\n');
        for r in &collection.readings {
            out.push_str(&render_reading(r));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NoopLauncher;
    use ionian_wx::{Observation, ReadingStatus};

    #[test]
    fn test_targets_follow_directory() {
        let src = PenteliSource::new(Arc::new(NoopLauncher)).with_base_url("http://localhost:1/");
        let targets = src.targets();
        assert_eq!(targets.len(), 5);
        assert_eq!(targets[0].display_name, "Gouvia");
        assert_eq!(targets[0].url, "http://localhost:1/stations/kerkyra/");
        assert_eq!(targets[4].display_name, "MavroudiThesprot");
    }

    #[test]
    fn test_render_summary() {
        let src = PenteliSource::new(Arc::new(NoopLauncher));
        let collection = Collection::new(vec![
            StationReading::ok(
                "paxoi",
                "Paxoi",
                Observation {
                    high_temp_c: Some(24.0),
                    low_temp_c: Some(17.5),
                    rain_mm: None,
                    gust_kmh: Some(22.5),
                },
            ),
            StationReading::placeholder("petalia", "Petaleia", ReadingStatus::NotAvailable),
        ]);
        let text = src.render(&collection, Local::now());
        assert!(text.starts_with("\n\n--- Summary ---\nStation            | High:     Temp |"));
        assert!(text.contains(
            "Paxoi              | High:  24.0 °C | Low:  17.5 °C | Rain:      N/A | Gust: 22.5 km/h"
        ));
        assert!(text.contains("Petaleia           |"));
        assert!(text.contains("N/A"));
    }
}
