//! Weathercloud device dashboards. Values live in gauge widgets that are
//! filled in after load, behind a consent dialog.

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

pub const BASE_URL: &str = "https://app.weathercloud.net";

const FIELDS: [WidgetField; 3] = [
    WidgetField::new(Slot::HighTemp, Locator::Id("gauge-temp-max-day")),
    WidgetField::new(Slot::LowTemp, Locator::Id("gauge-temp-min-day")),
    WidgetField::new(Slot::Rain, Locator::Id("gauge-rain-min-day")),
];

const TABLE_WIDTH: usize = 65;

pub struct WeathercloudSource {
    launcher: Arc<dyn Launcher>,
    base_url: String,
    directory: StationDirectory,
    timeouts: WidgetTimeouts,
}

impl WeathercloudSource {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self {
            launcher,
            base_url: BASE_URL.to_string(),
            directory: directory::WEATHERCLOUD,
            timeouts: WidgetTimeouts::default(),
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
                url: super::join_url(&self.base_url, &format!("{}#current", s.id)),
            })
            .collect()
    }

    pub fn plan(&self) -> WidgetPlan {
        WidgetPlan {
            consent: true,
            fields: FIELDS.to_vec(),
            timeouts: self.timeouts,
        }
    }
}

fn render_reading(r: &StationReading) -> String {
    if r.status().is_ok() {
        format!(
            "{:<20} | {:<8} | {:<8} | {:<8}\n",
            r.display_name(),
            value_or_placeholder(r.high_temp_c(), ""),
            value_or_placeholder(r.low_temp_c(), ""),
            value_or_placeholder(r.rain_mm(), ""),
        )
    } else {
        format!("{:<20} | {:^30}\n", r.display_name(), r.status().label())
    }
}

#[async_trait]
impl Source for WeathercloudSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Weathercloud
    }

    fn stations(&self) -> Vec<Station> {
        self.directory.iter().copied().collect()
    }

    async fn collect(&self) -> Collection {
        collect_widgets(self.launcher.as_ref(), &self.targets(), &self.plan()).await
    }

    fn render(&self, collection: &Collection, _at: DateTime<Local>) -> String {
        let mut out = String::from("\n");
        out.push_str(&rule('=', TABLE_WIDTH));
        out.push('\n');
        out.push_str(&format!(
            "{:<20} | {:<8} | {:<8} | {:<8}\n",
            "LOCATION", "MAX", "MIN", "RAIN"
        ));
        out.push_str(&rule('-', TABLE_WIDTH));
        out.push('\n');
        for r in &collection.readings {
            out.push_str(&render_reading(r));
        }
        out.push_str(&rule('=', TABLE_WIDTH));
        out.push('\n');
        out
    }
}
