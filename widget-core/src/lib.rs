//! Core library for the news and weather home-screen widgets.
//!
//! This crate defines:
//! - Endpoint resolution from the user's loosely formatted server address
//! - A bounded-timeout fetcher for the widget API
//! - Lenient JSON → snapshot builders for each widget
//! - The refresh pipeline that always ends in a renderable snapshot
//!
//! It is used by `widget-cli`, but can be embedded in any host that supplies
//! a [`ConfigSource`] and a [`Renderer`].

pub mod clamp;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod icon;
pub mod model;
pub mod pipeline;
pub mod widget;

pub use config::{Config, ConfigSource, DEFAULT_PORT, EndpointConfig, RefreshSettings};
pub use endpoint::resolve_base_url;
pub use error::WidgetError;
pub use fetch::{Fetch, HttpFetcher};
pub use model::{ForecastDay, NewsItem, NewsSnapshot, WeatherSnapshot};
pub use pipeline::{Pipeline, Refreshed, Renderer, Stage};
pub use widget::{News, Weather, Widget, WidgetId};
