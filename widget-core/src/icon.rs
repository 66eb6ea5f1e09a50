//! WMO weather code → glyph shown on the widget.

pub const SUN: &str = "☀️";
pub const PARTLY_CLOUDY: &str = "🌤️";
pub const OVERCAST: &str = "☁️";
pub const FOG: &str = "🌫️";
pub const LIGHT_RAIN: &str = "🌦️";
pub const RAIN: &str = "🌧️";
pub const SNOW: &str = "❄️";
pub const THUNDERSTORM: &str = "⛈️";
/// Used for unknown codes and when no code was sent.
pub const GENERIC: &str = "🌡️";

/// Map a WMO weather code onto a glyph.
///
/// Rain showers (80–82) sit inside the snow block (71–86) of the code table
/// and are matched first.
pub fn weather_icon(code: i64) -> &'static str {
    match code {
        0 => SUN,
        1 | 2 => PARTLY_CLOUDY,
        3 => OVERCAST,
        45 | 48 => FOG,
        51..=57 => LIGHT_RAIN,
        61..=67 => RAIN,
        80..=82 => RAIN,
        71..=86 => SNOW,
        95..=99 => THUNDERSTORM,
        _ => GENERIC,
    }
}
