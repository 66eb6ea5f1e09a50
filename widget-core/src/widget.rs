use crate::{RefreshSettings, WidgetError};
use serde::Serialize;
use std::fmt::Debug;

pub mod news;
pub mod weather;

pub use news::News;
pub use weather::Weather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetId {
    News,
    Weather,
}

impl WidgetId {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetId::News => "news",
            WidgetId::Weather => "weather",
        }
    }

    pub const fn all() -> &'static [WidgetId] {
        &[WidgetId::News, WidgetId::Weather]
    }

    pub fn settings(&self) -> RefreshSettings {
        match self {
            WidgetId::News => RefreshSettings::news(),
            WidgetId::Weather => RefreshSettings::weather(),
        }
    }
}

/// One home-screen widget: where it fetches from and how its body becomes a snapshot.
pub trait Widget: Send + Sync + Debug + 'static {
    type Snapshot: Debug + Clone + Serialize + Send + Sync;

    const ID: WidgetId;

    /// Path and query appended to the base URL.
    fn request_path(settings: &RefreshSettings) -> String;

    /// Parse a `200 OK` body.
    fn build(body: &[u8], settings: &RefreshSettings) -> Result<Self::Snapshot, WidgetError>;

    /// Snapshot shown when the cycle failed at any stage.
    fn degraded(err: &WidgetError) -> Self::Snapshot;
}
