use chrono::NaiveDate;
use serde::Serialize;

use crate::{error::WidgetError, icon};

pub const CONFIGURE_PROMPT: &str = "Open app to configure server";
pub const NEWS_UNAVAILABLE: &str = "News unavailable";
pub const WEATHER_UNAVAILABLE: &str = "Weather data unavailable";
pub const LOADING: &str = "Loading…";
pub const RADAR_LINK_TEXT: &str = "View Radar Map →";
pub const WEATHER_LINK: &str = "news://weather";

/// One headline row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    /// Empty when the server gave no usable source.
    pub source: String,
    /// ISO-ish timestamp, empty when unknown.
    pub published_at: String,
    pub image_url: Option<String>,
}

impl NewsItem {
    /// The `YYYY-MM-DD` prefix of `published_at`, or `None` when it is too
    /// short or not a date.
    pub fn display_date(&self) -> Option<&str> {
        let prefix = self.published_at.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
        Some(prefix)
    }

    pub fn display_source(&self) -> Option<&str> {
        (!self.source.is_empty()).then_some(self.source.as_str())
    }

    /// Link that opens the article in the app.
    pub fn deep_link(&self) -> String {
        format!("news://article/{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NewsSnapshot {
    pub items: Vec<NewsItem>,
    /// Shown instead of the list when the cycle degraded.
    pub notice: Option<String>,
}

impl NewsSnapshot {
    pub fn unavailable(err: &WidgetError) -> Self {
        let notice = if err.is_not_configured() { CONFIGURE_PROMPT } else { NEWS_UNAVAILABLE };
        Self { items: Vec::new(), notice: Some(notice.to_string()) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    /// `YYYY-MM-DD` as sent by the server.
    pub date: String,
    pub max_temp: String,
    pub min_temp: String,
    pub icon: String,
}

impl ForecastDay {
    /// Short weekday label such as `Sat 6/1`; the raw date if it does not parse.
    pub fn display_date(&self) -> String {
        match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            Ok(date) => date.format("%a %-m/%-d").to_string(),
            Err(_) => self.date.clone(),
        }
    }

    pub fn high_label(&self) -> String {
        format!("H:{}°", self.max_temp)
    }

    pub fn low_label(&self) -> String {
        format!("L:{}°", self.min_temp)
    }
}

/// Render-ready weather state for one refresh cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WeatherSnapshot {
    pub location: Option<String>,
    pub report: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub current_temp: Option<String>,
    pub current_condition_icon: Option<String>,
    pub daily_forecast: Vec<ForecastDay>,
    /// Set only on degraded snapshots; overrides every other display rule.
    pub error: Option<String>,
}

impl WeatherSnapshot {
    pub fn unavailable(err: &WidgetError) -> Self {
        let message = if err.is_not_configured() { CONFIGURE_PROMPT } else { WEATHER_UNAVAILABLE };
        Self { error: Some(message.to_string()), ..Self::default() }
    }

    /// Placeholder shown while a cycle is in flight.
    pub fn loading() -> Self {
        Self { error: Some(LOADING.to_string()), ..Self::default() }
    }

    /// Headline line of the widget.
    ///
    /// With a current temperature: `icon temp°` followed by a short excerpt of
    /// the report. Without one: the first 100 characters of the report.
    /// Without either: a fixed placeholder.
    pub fn current_weather_text(&self) -> String {
        if let Some(message) = &self.error {
            return message.clone();
        }

        match (&self.current_temp, self.report.as_deref()) {
            (Some(temp), report) => {
                let icon = self.current_condition_icon.as_deref().unwrap_or(icon::GENERIC);
                let head = format!("{icon} {temp}°");
                match report.map(report_excerpt).filter(|e| !e.is_empty()) {
                    Some(excerpt) => format!("{head} · {excerpt}"),
                    None => head,
                }
            }
            (None, Some(report)) => ellipsize(report.trim(), 100),
            (None, None) => WEATHER_UNAVAILABLE.to_string(),
        }
    }

    pub fn show_forecast(&self) -> bool {
        self.error.is_none() && !self.daily_forecast.is_empty()
    }

    pub fn show_radar_link(&self) -> bool {
        self.error.is_none() && self.latitude.is_some() && self.longitude.is_some()
    }

    pub fn radar_link_text(&self) -> Option<&'static str> {
        self.show_radar_link().then_some(RADAR_LINK_TEXT)
    }

    pub fn open_link(&self) -> &'static str {
        WEATHER_LINK
    }
}

/// Text up to the first comma or sentence-ending period when that is within
/// 80 characters, otherwise the first 50 characters.
pub fn report_excerpt(report: &str) -> String {
    let report = report.trim();
    let chars: Vec<char> = report.chars().collect();

    let cut = chars.iter().enumerate().position(|(i, c)| match *c {
        ',' => true,
        '.' => chars.get(i + 1).is_none_or(|next| next.is_whitespace()),
        _ => false,
    });

    match cut {
        Some(n) if n <= 80 => chars[..n].iter().collect::<String>().trim_end().to_string(),
        _ => chars.iter().take(50).collect::<String>().trim_end().to_string(),
    }
}

/// First `max` characters, with `...` appended when something was cut.
pub fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
