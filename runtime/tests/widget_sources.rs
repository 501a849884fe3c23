//! Browser-rendered sources driven through an in-memory renderer.

mod common;

use anyhow::{bail, Result};
use async_trait::async_trait;
use ionian_wx::directory::{Station, StationDirectory};
use ionian_wx::{ReadingStatus, ScrapeError};
use ionian_wx_runtime::renderer::{Launcher, NavigationResult, RenderContext, Renderer};
use ionian_wx_runtime::sources::{PenteliSource, Source, WeathercloudSource};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Counters {
    launches: AtomicUsize,
    shutdowns: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
    consent_clicks: AtomicUsize,
}

impl Counters {
    fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// A page: (script fragment, element text) pairs and whether a consent
/// button is showing.
#[derive(Clone, Default)]
struct FakePage {
    fields: Vec<(&'static str, &'static str)>,
    consent_button: bool,
}

struct FakeLauncher {
    pages: Arc<HashMap<String, FakePage>>,
    counters: Arc<Counters>,
    fail: bool,
}

impl FakeLauncher {
    fn new(pages: Vec<(&str, FakePage)>) -> Self {
        Self {
            pages: Arc::new(pages.into_iter().map(|(u, p)| (u.to_string(), p)).collect()),
            counters: Arc::new(Counters::default()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn Renderer>> {
        if self.fail {
            bail!("Chromium not found");
        }
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeRenderer {
            pages: Arc::clone(&self.pages),
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct FakeRenderer {
    pages: Arc<HashMap<String, FakePage>>,
    counters: Arc<Counters>,
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeContext {
            pages: Arc::clone(&self.pages),
            counters: Arc::clone(&self.counters),
            page: None,
        }))
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.counters.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        Counters::get(&self.counters.opened) - Counters::get(&self.counters.closed)
    }
}

struct FakeContext {
    pages: Arc<HashMap<String, FakePage>>,
    counters: Arc<Counters>,
    page: Option<FakePage>,
}

#[async_trait]
impl RenderContext for FakeContext {
    async fn navigate(&mut self, url: &str, _timeout_ms: u64) -> Result<NavigationResult> {
        match self.pages.get(url) {
            Some(page) => {
                self.page = Some(page.clone());
                Ok(NavigationResult {
                    final_url: url.to_string(),
                    load_time_ms: 1,
                })
            }
            None => bail!("net::ERR_NAME_NOT_RESOLVED at {url}"),
        }
    }

    async fn execute_js(&self, script: &str) -> Result<Value> {
        let Some(page) = &self.page else {
            return Ok(Value::Null);
        };
        if script.contains("querySelectorAll") {
            if page.consent_button {
                self.counters.consent_clicks.fetch_add(1, Ordering::SeqCst);
            }
            return Ok(Value::Bool(page.consent_button));
        }
        Ok(page
            .fields
            .iter()
            .find(|(key, _)| script.contains(key))
            .map(|(_, text)| Value::String(text.to_string()))
            .unwrap_or(Value::Null))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

const WC_STATIONS: &[Station] = &[
    Station::new("d100", "Full Gauges"),
    Station::new("d200", "Unreachable"),
    Station::new("d300", "Blank Gauges"),
];

#[tokio::test]
async fn test_weathercloud_one_session_for_all_stations() {
    let launcher = Arc::new(FakeLauncher::new(vec![
        (
            "http://wc.test/d100#current",
            FakePage {
                fields: vec![
                    ("gauge-temp-max-day", "71.6 °F"),
                    ("gauge-temp-min-day", "12,5 °C"),
                    ("gauge-rain-min-day", "0.3 mm"),
                ],
                consent_button: true,
            },
        ),
        ("http://wc.test/d300#current", FakePage::default()),
    ]));
    let counters = Arc::clone(&launcher.counters);

    let source = WeathercloudSource::new(launcher)
        .with_base_url("http://wc.test")
        .with_directory(StationDirectory::new("weathercloud", WC_STATIONS))
        .with_timeouts(common::quick_timeouts());

    let collection = source.collect().await;
    assert!(collection.failure.is_none());

    let statuses: Vec<_> = collection.readings.iter().map(|r| r.status()).collect();
    assert_eq!(
        statuses,
        vec![
            ReadingStatus::Ok,
            ReadingStatus::Error,
            ReadingStatus::NotAvailable
        ]
    );

    let full = &collection.readings[0];
    assert_eq!(full.display_name(), "Full Gauges");
    assert!((full.high_temp_c().unwrap() - 22.0).abs() < 1e-9);
    assert_eq!(full.low_temp_c(), Some(12.5));
    assert_eq!(full.rain_mm(), Some(0.3));
    assert_eq!(full.gust_kmh(), None);

    assert_eq!(Counters::get(&counters.launches), 1);
    assert_eq!(Counters::get(&counters.shutdowns), 1);
    assert_eq!(Counters::get(&counters.opened), 3);
    assert_eq!(Counters::get(&counters.closed), 3);
    assert_eq!(Counters::get(&counters.consent_clicks), 1);
}

#[tokio::test]
async fn test_browser_launch_failure_degrades_every_station() {
    let launcher = Arc::new(FakeLauncher::failing());
    let counters = Arc::clone(&launcher.counters);
    let source = PenteliSource::new(launcher).with_timeouts(common::quick_timeouts());

    let collection = source.collect().await;
    assert!(matches!(collection.failure, Some(ScrapeError::Browser(_))));
    assert_eq!(collection.readings.len(), 5);
    assert!(collection
        .readings
        .iter()
        .all(|r| r.status() == ReadingStatus::Error && r.observation().is_empty()));
    assert_eq!(Counters::get(&counters.shutdowns), 0);

    let section = source.render(&collection, chrono::Local::now());
    for name in ["Gouvia", "Paxoi", "Petaleia", "AcharaviEAA", "MavroudiThesprot"] {
        assert!(section.contains(name), "missing row for {name}");
    }
}

#[tokio::test]
async fn test_penteli_missing_fields_stay_empty() {
    let launcher = Arc::new(FakeLauncher::new(vec![
        (
            "http://penteli.test/stations/kerkyra/",
            FakePage {
                fields: vec![
                    ("//span)[1]", "31.2 °C"),
                    ("Today's Rain", "0.0 mm"),
                ],
                consent_button: false,
            },
        ),
        (
            "http://penteli.test/stations/paxoi/",
            FakePage {
                fields: vec![
                    ("//span)[1]", "29.0 °C"),
                    ("//span)[2]", "21.3 °C"),
                    ("Today's Rain", "2.2 mm"),
                    ("High Wind Gust", "20 Km/h"),
                ],
                consent_button: false,
            },
        ),
    ]));
    let counters = Arc::clone(&launcher.counters);
    let source = PenteliSource::new(launcher)
        .with_base_url("http://penteli.test")
        .with_timeouts(common::quick_timeouts());

    let collection = source.collect().await;
    assert_eq!(collection.readings.len(), 5);

    let gouvia = &collection.readings[0];
    assert_eq!(gouvia.status(), ReadingStatus::Ok);
    assert_eq!(gouvia.high_temp_c(), Some(31.2));
    assert_eq!(gouvia.low_temp_c(), None);
    assert_eq!(gouvia.rain_mm(), Some(0.0));
    assert_eq!(gouvia.gust_kmh(), None);

    let paxoi = &collection.readings[1];
    assert_eq!(paxoi.low_temp_c(), Some(21.3));
    assert_eq!(paxoi.gust_kmh(), Some(20.0));

    for r in &collection.readings[2..] {
        assert_eq!(r.status(), ReadingStatus::Error);
    }

    // no consent step on meteo.gr
    assert_eq!(Counters::get(&counters.consent_clicks), 0);
    assert_eq!(Counters::get(&counters.shutdowns), 1);
    assert_eq!(Counters::get(&counters.opened), Counters::get(&counters.closed));

    let section = source.render(&collection, chrono::Local::now());
    assert!(section.contains("Gouvia             | High:  31.2 °C | Low:      N/A"));
}
