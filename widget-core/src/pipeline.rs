//! One refresh cycle: config → base URL → body → snapshot → renderer.
//!
//! A cycle always ends with a snapshot. Failures at any stage are logged and
//! replaced by the widget's degraded snapshot.

use std::{fmt, marker::PhantomData};
use tracing::{debug, error, info, warn};

use crate::{
    config::{ConfigSource, RefreshSettings},
    endpoint::resolve_base_url,
    error::WidgetError,
    fetch::{Fetch, HttpFetcher},
    widget::Widget,
};

/// Consumes snapshots; all presentation lives behind this seam.
pub trait Renderer<S>: Send + Sync {
    fn render(&self, snapshot: &S);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Parsed,
    Failed,
    Rendered,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Idle => "idle",
            Stage::Fetching => "fetching",
            Stage::Parsed => "parsed",
            Stage::Failed => "failed",
            Stage::Rendered => "rendered",
        };
        f.write_str(s)
    }
}

/// Result of a cycle. `snapshot` is always renderable; `error` says why it
/// is a degraded one.
#[derive(Debug, Clone)]
pub struct Refreshed<S> {
    pub snapshot: S,
    pub error: Option<WidgetError>,
    pub stage: Stage,
}

impl<S> Refreshed<S> {
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Refresh pipeline for widget `W`. Holds no state between cycles.
#[derive(Debug)]
pub struct Pipeline<W: Widget, F: Fetch = HttpFetcher> {
    settings: RefreshSettings,
    fetcher: F,
    _widget: PhantomData<fn() -> W>,
}

impl<W: Widget> Pipeline<W, HttpFetcher> {
    /// Pipeline over HTTP with the widget's default settings.
    pub fn http() -> Result<Self, WidgetError> {
        let settings = W::ID.settings();
        let fetcher = HttpFetcher::new(&settings)?;
        Ok(Self::new(settings, fetcher))
    }
}

impl<W: Widget, F: Fetch> Pipeline<W, F> {
    pub fn new(settings: RefreshSettings, fetcher: F) -> Self {
        Self { settings, fetcher, _widget: PhantomData }
    }

    /// Run one cycle up to a snapshot.
    pub async fn refresh(&self, source: &dyn ConfigSource) -> Refreshed<W::Snapshot> {
        let widget = W::ID.as_str();
        debug!(widget, stage = %Stage::Idle, "refresh started");

        match self.fetch_and_build(source).await {
            Ok(snapshot) => {
                debug!(widget, stage = %Stage::Parsed, "refresh succeeded");
                Refreshed { snapshot, error: None, stage: Stage::Parsed }
            }
            Err(err) => {
                if err.is_not_configured() {
                    info!(widget, stage = %Stage::Failed, "no server configured");
                } else if err.is_network() {
                    warn!(widget, stage = %Stage::Failed, error = %err, "refresh degraded");
                } else {
                    error!(widget, stage = %Stage::Failed, error = %err, "unusable response body");
                }
                Refreshed { snapshot: W::degraded(&err), error: Some(err), stage: Stage::Failed }
            }
        }
    }

    /// Run one cycle and hand the snapshot to `renderer`.
    pub async fn refresh_and_render(
        &self,
        source: &dyn ConfigSource,
        renderer: &dyn Renderer<W::Snapshot>,
    ) -> Refreshed<W::Snapshot> {
        let mut refreshed = self.refresh(source).await;
        renderer.render(&refreshed.snapshot);
        refreshed.stage = Stage::Rendered;
        debug!(widget = W::ID.as_str(), stage = %Stage::Rendered, "snapshot rendered");
        refreshed
    }

    async fn fetch_and_build(&self, source: &dyn ConfigSource) -> Result<W::Snapshot, WidgetError> {
        let endpoint = source.endpoint();
        let base = resolve_base_url(&endpoint.host_or_url, &endpoint.port)?;
        let url = format!("{base}{}", W::request_path(&self.settings));

        debug!(widget = W::ID.as_str(), stage = %Stage::Fetching, url = %url, "fetching");
        let body = tokio::time::timeout(self.settings.total_timeout(), self.fetcher.get(&url))
            .await
            .map_err(|_| WidgetError::Timeout)??;

        W::build(&body, &self.settings)
    }
}
