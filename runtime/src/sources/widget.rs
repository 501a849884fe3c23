//! Shared driver for the browser-rendered sources.
//!
//! A widget source is a list of station pages plus a [`WidgetPlan`] saying
//! which elements hold which value. [`collect_widgets`] launches one
//! browser for the whole list, opens one tab per station and always shuts
//! the browser down before returning.

use super::Collection;
use crate::renderer::{Launcher, RenderContext, Renderer};
use ionian_wx::extract::find_quantity;
use ionian_wx::units::Quantity;
use ionian_wx::{Observation, ReadingStatus, ScrapeError, StationReading};
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How a field's element is found on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Id(&'static str),
    XPath(&'static str),
}

/// Build a script returning the element's visible text, or `null`.
pub fn text_script(locator: &Locator) -> String {
    let lookup = match locator {
        Locator::Id(id) => format!(
            "document.getElementById({})",
            Value::String((*id).to_string())
        ),
        Locator::XPath(xpath) => format!(
            "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            Value::String((*xpath).to_string())
        ),
    };
    format!(
        r#"(() => {{
  const el = {lookup};
  if (!el) return null;
  const text = (el.innerText || el.textContent || "").trim();
  return text.length ? text : null;
}})()"#
    )
}

/// Clicks the first visible consent button. Returns whether one was clicked.
const CONSENT_SCRIPT: &str = r#"(() => {
  const words = ["onsent", "gree", "ccept"];
  for (const b of document.querySelectorAll("button")) {
    const text = b.innerText || b.textContent || "";
    if (!b.disabled && b.offsetParent !== null && words.some((w) => text.includes(w))) {
      b.click();
      return true;
    }
  }
  return false;
})()"#;

/// Which reading field a widget feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    HighTemp,
    LowTemp,
    Rain,
    Gust,
}

impl Slot {
    pub fn quantity(self) -> Quantity {
        match self {
            Slot::HighTemp | Slot::LowTemp => Quantity::Temperature,
            Slot::Rain => Quantity::Precipitation,
            Slot::Gust => Quantity::WindSpeed,
        }
    }

    fn store(self, obs: &mut Observation, value: f64) {
        match self {
            Slot::HighTemp => obs.high_temp_c = Some(value),
            Slot::LowTemp => obs.low_temp_c = Some(value),
            Slot::Rain => obs.rain_mm = Some(value),
            Slot::Gust => obs.gust_kmh = Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WidgetField {
    pub slot: Slot,
    pub locator: Locator,
}

impl WidgetField {
    pub const fn new(slot: Slot, locator: Locator) -> Self {
        Self { slot, locator }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WidgetTimeouts {
    pub navigation: Duration,
    /// Per-field wait for text containing a digit.
    pub field: Duration,
    pub consent: Duration,
    /// Pause after a consent click.
    pub consent_settle: Duration,
    pub poll: Duration,
}

impl Default for WidgetTimeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            field: Duration::from_secs(15),
            consent: Duration::from_secs(5),
            consent_settle: Duration::from_secs(1),
            poll: Duration::from_millis(250),
        }
    }
}

/// One station page.
#[derive(Debug, Clone)]
pub struct WidgetTarget {
    pub station_id: String,
    pub display_name: String,
    pub url: String,
}

/// What to do on every page of a source.
#[derive(Debug, Clone)]
pub struct WidgetPlan {
    pub consent: bool,
    pub fields: Vec<WidgetField>,
    pub timeouts: WidgetTimeouts,
}

/// Poll `locator` until its text contains a digit. `None` on timeout.
pub async fn wait_for_text(
    ctx: &dyn RenderContext,
    locator: &Locator,
    timeout: Duration,
    poll: Duration,
) -> Option<String> {
    let script = text_script(locator);
    let deadline = Instant::now() + timeout;
    loop {
        match ctx.execute_js(&script).await {
            Ok(Value::String(text)) if text.chars().any(|c| c.is_ascii_digit()) => {
                return Some(text)
            }
            Ok(_) => {}
            Err(e) => debug!("reading {locator:?} failed: {e:#}"),
        }
        if Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(poll).await;
    }
}

/// Try to click away a consent dialog. Failures are ignored.
pub async fn dismiss_consent(ctx: &dyn RenderContext, timeouts: &WidgetTimeouts) -> bool {
    let deadline = Instant::now() + timeouts.consent;
    loop {
        if let Ok(Value::Bool(true)) = ctx.execute_js(CONSENT_SCRIPT).await {
            debug!("consent dialog dismissed");
            tokio::time::sleep(timeouts.consent_settle).await;
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(timeouts.poll).await;
    }
}

async fn scrape_page(
    ctx: &mut dyn RenderContext,
    target: &WidgetTarget,
    plan: &WidgetPlan,
) -> StationReading {
    let nav_ms = plan.timeouts.navigation.as_millis() as u64;
    match ctx.navigate(&target.url, nav_ms).await {
        Ok(nav) => debug!("loaded {} in {}ms", nav.final_url, nav.load_time_ms),
        Err(e) => {
            warn!("{}: {e:#}", target.url);
            return StationReading::placeholder(
                &target.station_id,
                &target.display_name,
                ReadingStatus::Error,
            );
        }
    }

    if plan.consent {
        dismiss_consent(ctx, &plan.timeouts).await;
    }

    let mut obs = Observation::default();
    for field in &plan.fields {
        let text =
            wait_for_text(ctx, &field.locator, plan.timeouts.field, plan.timeouts.poll).await;
        match text.as_deref().and_then(|t| find_quantity(t, field.slot.quantity())) {
            Some(value) => field.slot.store(&mut obs, value),
            None => debug!("{}: no value for {:?}", target.station_id, field.slot),
        }
    }

    if obs.is_empty() {
        StationReading::placeholder(
            &target.station_id,
            &target.display_name,
            ReadingStatus::NotAvailable,
        )
    } else {
        StationReading::ok(&target.station_id, &target.display_name, obs)
    }
}

async fn scrape_target(
    renderer: &dyn Renderer,
    target: &WidgetTarget,
    plan: &WidgetPlan,
) -> StationReading {
    let mut ctx = match renderer.new_context().await {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!("{}: could not open tab: {e:#}", target.station_id);
            return StationReading::placeholder(
                &target.station_id,
                &target.display_name,
                ReadingStatus::Error,
            );
        }
    };
    let reading = scrape_page(ctx.as_mut(), target, plan).await;
    if let Err(e) = ctx.close().await {
        debug!("closing tab for {}: {e:#}", target.station_id);
    }
    reading
}

/// Scrape every target in one browser session.
///
/// A browser that fails to start turns every target into an
/// [`ReadingStatus::Error`] placeholder and is reported as the collection's
/// failure.
pub async fn collect_widgets(
    launcher: &dyn Launcher,
    targets: &[WidgetTarget],
    plan: &WidgetPlan,
) -> Collection {
    let mut renderer = match launcher.launch().await {
        Ok(r) => r,
        Err(e) => {
            warn!("browser unavailable: {e:#}");
            let readings = targets
                .iter()
                .map(|t| {
                    StationReading::placeholder(
                        &t.station_id,
                        &t.display_name,
                        ReadingStatus::Error,
                    )
                })
                .collect();
            return Collection::failed(readings, ScrapeError::Browser(format!("{e:#}")));
        }
    };

    let mut readings = Vec::with_capacity(targets.len());
    for target in targets {
        info!("targeting {} ({})...", target.display_name, target.station_id);
        let reading = scrape_target(renderer.as_ref(), target, plan).await;
        if !reading.status().is_ok() {
            warn!("{}: {}", target.station_id, reading.status());
        }
        readings.push(reading);
    }

    if let Err(e) = renderer.shutdown().await {
        warn!("browser shutdown: {e:#}");
    }
    Collection::new(readings)
}
