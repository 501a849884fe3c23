//! `ionian-wx run` — one extraction pass over every source.

use crate::acquisition::http_client::HttpClient;
use crate::renderer::chromium::ChromiumLauncher;
use crate::renderer::{Launcher, NoopLauncher};
use crate::sources::{
    Collection, IonianSource, MeteocielSource, MeteoclubSource, PenteliSource, Source,
    SourceKind, WeathercloudSource, WundergroundSource,
};
use anyhow::{Context, Result};
use chrono::Local;
use futures::FutureExt;
use ionian_wx::{ReportWriter, ScrapeError, StationReading};
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Client-wide ceiling; each source sets its own shorter per-request timeout.
const HTTP_TIMEOUT_MS: u64 = 15_000;

/// Options for a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    /// Sources to run; empty means all.
    pub only: Vec<SourceKind>,
    /// Skip the browser; widget sources report errors.
    pub no_browser: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    report: &'a Path,
    readings: &'a [StationReading],
}

/// Instantiate the selected sources in run order.
pub fn build_sources(
    http: &HttpClient,
    launcher: Arc<dyn Launcher>,
    only: &[SourceKind],
) -> Vec<Box<dyn Source>> {
    SourceKind::ALL
        .iter()
        .copied()
        .filter(|kind| only.is_empty() || only.contains(kind))
        .map(|kind| -> Box<dyn Source> {
            match kind {
                SourceKind::Wunderground => Box::new(WundergroundSource::new(http.clone())),
                SourceKind::Meteoclub => Box::new(MeteoclubSource::new(http.clone())),
                SourceKind::Penteli => Box::new(PenteliSource::new(Arc::clone(&launcher))),
                SourceKind::Meteociel => Box::new(MeteocielSource::new(http.clone())),
                SourceKind::Weathercloud => {
                    Box::new(WeathercloudSource::new(Arc::clone(&launcher)))
                }
                SourceKind::Ionian => Box::new(IonianSource::new(http.clone())),
            }
        })
        .collect()
}

/// Text of a caught panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

/// Collect from `source`. A panic inside the source becomes an
/// [`ScrapeError::Unknown`] placeholder for each of its stations.
async fn collect_isolated(source: &dyn Source) -> Collection {
    match AssertUnwindSafe(source.collect()).catch_unwind().await {
        Ok(collection) => collection,
        Err(payload) => {
            let failure = ScrapeError::Unknown(panic_message(payload.as_ref()));
            Collection::all_failed(&source.stations(), failure)
        }
    }
}

/// Run `sources` one after another, appending each section to `report`.
///
/// Source failures, panics included, only degrade readings; an error here
/// means the report itself could not be written.
pub async fn run_sources(
    sources: &[Box<dyn Source>],
    report: &mut ReportWriter,
) -> Result<Vec<StationReading>> {
    let mut readings = Vec::new();
    for source in sources {
        let name = source.kind().name();
        info!("running {name}");
        let start = Instant::now();

        let collection = collect_isolated(source.as_ref()).await;
        if let Some(failure) = &collection.failure {
            warn!("{name}: {failure}");
        }
        let section = source.render(&collection, Local::now());
        report.append(&section).with_context(|| {
            format!(
                "failed to append {name} section to {}",
                report.path().display()
            )
        })?;

        info!(
            "{name}: {}/{} stations OK in {}ms",
            collection.ok_count(),
            collection.readings.len(),
            start.elapsed().as_millis()
        );
        readings.extend(collection.readings);
    }
    Ok(readings)
}

/// Run the extraction and write the report.
pub async fn run(opts: RunOptions) -> Result<()> {
    let started = Local::now();
    let mut report = ReportWriter::open(&opts.output_dir, started).with_context(|| {
        format!("failed to open report in {}", opts.output_dir.display())
    })?;
    report
        .append(&format!(
            "\nWeather data extracted at {}\n",
            started.format("%H:%M:%S")
        ))
        .with_context(|| format!("failed to write {}", report.path().display()))?;

    let http = HttpClient::new(HTTP_TIMEOUT_MS);
    let launcher: Arc<dyn Launcher> = if opts.no_browser {
        Arc::new(NoopLauncher)
    } else {
        Arc::new(ChromiumLauncher::default())
    };

    let sources = build_sources(&http, launcher, &opts.only);
    let readings = run_sources(&sources, &mut report).await?;

    if opts.json {
        let summary = RunSummary {
            report: report.path(),
            readings: &readings,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Results saved to: {}", report.path().display());
    }

    Ok(())
}
