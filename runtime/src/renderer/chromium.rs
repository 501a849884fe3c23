//! Chromium-based renderer using chromiumoxide.

use super::{Launcher, NavigationResult, RenderContext, Renderer};
use crate::acquisition::http_client::USER_AGENT;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Environment variable pointing at a Chromium/Chrome binary.
pub const CHROMIUM_PATH_ENV: &str = "IONIAN_WX_CHROMIUM_PATH";

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. IONIAN_WX_CHROMIUM_PATH env
    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Chrome for Testing unpacked under the user cache dir
    if let Some(cache) = dirs::cache_dir() {
        let base = cache.join("ionian-wx/chromium");
        let candidates = if cfg!(target_os = "macos") {
            vec![
                base.join("chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                base.join("chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
            ]
        } else {
            vec![base.join("chrome-linux64/chrome"), base.join("chrome")]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launches headless Chromium instances.
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    /// Explicit binary; discovered with [`find_chromium`] when unset.
    pub executable: Option<PathBuf>,
}

#[async_trait]
impl Launcher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn Renderer>> {
        let chrome_path = match &self.executable {
            Some(p) => p.clone(),
            None => find_chromium().with_context(|| {
                format!("Chromium not found. Install Chrome/Chromium or set {CHROMIUM_PATH_ENV}.")
            })?,
        };
        let renderer = ChromiumRenderer::new(chrome_path).await?;
        Ok(Box::new(renderer))
    }
}

/// Chromium-based renderer.
///
/// Dropping it without [`Renderer::shutdown`] still kills the browser
/// process (chromiumoxide kills an unclosed child on drop).
pub struct ChromiumRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumRenderer {
    /// Create a new ChromiumRenderer, launching a headless Chromium instance.
    pub async fn new(chrome_path: PathBuf) -> Result<Self> {
        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--window-size=1920,1080")
            .arg(format!("--user-agent={USER_AGENT}"))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // Drive the CDP connection
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        tracing::debug!("Chromium launched");

        Ok(Self {
            browser,
            handler,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        self.active_count.fetch_add(1, Ordering::Relaxed);

        Ok(Box::new(ChromiumContext {
            page,
            active_count: Arc::clone(&self.active_count),
        }))
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .context("failed to close Chromium")?;
        self.browser
            .wait()
            .await
            .context("failed to reap Chromium process")?;
        self.handler.abort();
        tracing::debug!("Chromium shut down");
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

impl Drop for ChromiumRenderer {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// A single Chromium page context.
pub struct ChromiumContext {
    page: Page,
    active_count: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult> {
        let start = Instant::now();

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(timeout_ms),
            self.page.goto(url),
        )
        .await;

        let load_time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(_response)) => {
                let final_url = self
                    .page
                    .url()
                    .await
                    .unwrap_or_default()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| url.to_string());

                Ok(NavigationResult {
                    final_url,
                    load_time_ms,
                })
            }
            Ok(Err(e)) => bail!("navigation failed: {e}"),
            Err(_) => bail!("navigation timed out after {timeout_ms}ms"),
        }
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate_expression(script)
            .await
            .context("JS execution failed")?;

        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        let _ = self.page.close().await;
        Ok(())
    }
}
