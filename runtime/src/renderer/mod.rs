//! Renderer abstraction for browser-based page rendering.
//!
//! Defines the `Launcher`, `Renderer` and `RenderContext` traits that
//! abstract over the browser engine (currently Chromium via chromiumoxide).
//! Widget sources receive a `Launcher`, start one renderer per run and shut
//! it down before returning.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of navigating to a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// Starts browser engines on demand.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Launch a fresh browser engine.
    async fn launch(&self) -> Result<Box<dyn Renderer>>;
}

/// A browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine and reap its process.
    async fn shutdown(&mut self) -> Result<()>;
    /// Number of currently active contexts.
    fn active_contexts(&self) -> usize;
}

/// A single browser context (tab) for rendering pages.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL with a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;
    /// Execute JavaScript in the page context and return the result.
    /// A `null`/`undefined` result comes back as `Value::Null`.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A launcher that never starts a browser, used for `--no-browser` runs.
///
/// Widget sources still run and report every station as an error
/// placeholder; the HTTP sources are unaffected.
pub struct NoopLauncher;

#[async_trait]
impl Launcher for NoopLauncher {
    async fn launch(&self) -> Result<Box<dyn Renderer>> {
        Err(anyhow::anyhow!("browser disabled (--no-browser)"))
    }
}
