use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    RefreshSettings, WidgetError,
    clamp::take_clamped,
    extract::{Transform, first_present, integer, non_null_text, text},
    model::{NewsItem, NewsSnapshot},
};

use super::{Widget, WidgetId};

pub const ARTICLES_PATH: &str = "/api/articles";

const UNTITLED: &str = "Untitled";

const ARTICLE_ID: &[(&str, Transform<i64>)] = &[("id", integer)];
const TITLE: &[(&str, Transform<String>)] = &[("title", text), ("source_title", text)];
const SOURCE: &[(&str, Transform<String>)] = &[("source_title", text), ("source", text)];
const PUBLISHED_AT: &[(&str, Transform<String>)] =
    &[("published_at", non_null_text), ("fetched_at", non_null_text)];
const IMAGE_URL: &[(&str, Transform<String>)] = &[("image_url", non_null_text)];

#[derive(Debug, Clone, Copy, Default)]
pub struct News;

impl Widget for News {
    type Snapshot = NewsSnapshot;

    const ID: WidgetId = WidgetId::News;

    fn request_path(settings: &RefreshSettings) -> String {
        format!("{ARTICLES_PATH}?page=1&limit={}", settings.max_items)
    }

    fn build(body: &[u8], settings: &RefreshSettings) -> Result<NewsSnapshot, WidgetError> {
        build_news(body, settings.max_items)
    }

    fn degraded(err: &WidgetError) -> NewsSnapshot {
        NewsSnapshot::unavailable(err)
    }
}

/// Parse an `/api/articles` body into at most `max_items` headlines.
///
/// Only a missing or non-array `items` fails the whole body; entries that
/// are not objects are skipped.
pub fn build_news(body: &[u8], max_items: usize) -> Result<NewsSnapshot, WidgetError> {
    let root: Value = serde_json::from_slice(body)?;

    let raw_items = root
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| WidgetError::MalformedResponse("missing `items` array".to_string()))?;

    let items: Vec<NewsItem> = raw_items
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let item = raw.as_object().map(news_item);
            if item.is_none() {
                warn!(index, "skipping malformed news item");
            }
            item
        })
        .collect();

    let items = take_clamped(items, max_items);
    debug!(received = raw_items.len(), kept = items.len(), "news snapshot built");

    Ok(NewsSnapshot { items, notice: None })
}

fn news_item(obj: &Map<String, Value>) -> NewsItem {
    NewsItem {
        id: first_present(obj, ARTICLE_ID).unwrap_or(0),
        title: first_present(obj, TITLE).unwrap_or_else(|| UNTITLED.to_string()),
        source: first_present(obj, SOURCE).map(blank_literal_null).unwrap_or_default(),
        published_at: first_present(obj, PUBLISHED_AT).unwrap_or_default(),
        image_url: first_present(obj, IMAGE_URL),
    }
}

/// The first present source wins; a literal `"null"` there blanks the field
/// rather than deferring to the next key.
fn blank_literal_null(source: String) -> String {
    if source.trim().eq_ignore_ascii_case("null") { String::new() } else { source }
}
