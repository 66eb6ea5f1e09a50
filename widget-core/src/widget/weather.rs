use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    RefreshSettings, WidgetError,
    clamp::clamp_len,
    extract::{Transform, array_field, element, first_present, integer, non_null_text, number, text},
    icon::{self, weather_icon},
    model::{ForecastDay, WeatherSnapshot},
};

use super::{Widget, WidgetId};

pub const WEATHER_PATH: &str = "/api/weather";

const LOCATION: &[(&str, Transform<String>)] = &[("location", non_null_text)];
const REPORT: &[(&str, Transform<String>)] = &[("report", non_null_text)];
const LATITUDE: &[(&str, Transform<f64>)] = &[("latitude", number)];
const LONGITUDE: &[(&str, Transform<f64>)] = &[("longitude", number)];
const TEMPERATURE: &[(&str, Transform<String>)] = &[("temperature", temperature)];
const WEATHER_CODE: &[(&str, Transform<i64>)] =
    &[("weathercode", integer), ("weather_code", integer)];

const DAILY_TIME: &[&str] = &["time"];
const DAILY_MAX: &[&str] = &["temperature_2m_max"];
const DAILY_MIN: &[&str] = &["temperature_2m_min"];
const DAILY_CODE: &[&str] = &["weathercode", "weather_code"];

#[derive(Debug, Clone, Copy, Default)]
pub struct Weather;

impl Widget for Weather {
    type Snapshot = WeatherSnapshot;

    const ID: WidgetId = WidgetId::Weather;

    fn request_path(_settings: &RefreshSettings) -> String {
        WEATHER_PATH.to_string()
    }

    fn build(body: &[u8], settings: &RefreshSettings) -> Result<WeatherSnapshot, WidgetError> {
        build_weather(body, settings.max_items)
    }

    fn degraded(err: &WidgetError) -> WeatherSnapshot {
        WeatherSnapshot::unavailable(err)
    }
}

/// Parse an `/api/weather` body. Every field is optional; only a body that
/// is not a JSON object is rejected.
pub fn build_weather(body: &[u8], max_days: usize) -> Result<WeatherSnapshot, WidgetError> {
    let root: Value = serde_json::from_slice(body)?;
    let obj = root
        .as_object()
        .ok_or_else(|| WidgetError::MalformedResponse("expected a JSON object".to_string()))?;

    let forecast = obj.get("forecast").and_then(Value::as_object);
    let current = forecast.and_then(|f| f.get("current_weather")).and_then(Value::as_object);

    let (current_temp, current_condition_icon) = match current {
        Some(cw) => {
            let temp = first_present(cw, TEMPERATURE);
            let icon = match first_present(cw, WEATHER_CODE) {
                Some(code) => Some(weather_icon(code)),
                None => temp.as_ref().map(|_| icon::GENERIC),
            };
            (temp, icon.map(str::to_string))
        }
        None => (None, None),
    };

    let daily_forecast = forecast
        .and_then(|f| f.get("daily"))
        .and_then(Value::as_object)
        .map(|daily| forecast_days(daily, max_days))
        .unwrap_or_default();

    let snapshot = WeatherSnapshot {
        location: first_present(obj, LOCATION),
        report: first_present(obj, REPORT),
        latitude: first_present(obj, LATITUDE),
        longitude: first_present(obj, LONGITUDE),
        current_temp,
        current_condition_icon,
        daily_forecast,
        error: None,
    };

    debug!(
        location = snapshot.location.as_deref().unwrap_or("-"),
        days = snapshot.daily_forecast.len(),
        has_current = snapshot.current_temp.is_some(),
        "weather snapshot built"
    );

    Ok(snapshot)
}

/// Zip the four parallel daily arrays, stopping at the shortest one.
fn forecast_days(daily: &Map<String, Value>, max_days: usize) -> Vec<ForecastDay> {
    let (Some(times), Some(maxes), Some(mins), Some(codes)) = (
        array_field(daily, DAILY_TIME),
        array_field(daily, DAILY_MAX),
        array_field(daily, DAILY_MIN),
        array_field(daily, DAILY_CODE),
    ) else {
        return Vec::new();
    };

    let rows = clamp_len(max_days, &[times.len(), maxes.len(), mins.len(), codes.len()]);

    (0..rows)
        .map(|i| ForecastDay {
            date: element(times, i).and_then(text).unwrap_or_default(),
            max_temp: element(maxes, i).and_then(text).unwrap_or_default(),
            min_temp: element(mins, i).and_then(text).unwrap_or_default(),
            icon: element(codes, i).and_then(integer).map_or(icon::GENERIC, weather_icon).to_string(),
        })
        .collect()
}

/// Current temperature as display text; integral values lose their `.0`.
/// Forecast rows keep the server's text as is.
fn temperature(value: &Value) -> Option<String> {
    text(value).map(|t| format_temperature(&t))
}

pub fn format_temperature(raw: &str) -> String {
    let raw = raw.trim();
    raw.strip_suffix(".0").unwrap_or(raw).to_string()
}
