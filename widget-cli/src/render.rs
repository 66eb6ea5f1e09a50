use chrono::Local;
use serde::Serialize;
use widget_core::{NewsSnapshot, Renderer, WeatherSnapshot};

/// Prints snapshots to stdout, either as text blocks or as JSON.
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    json: bool,
}

impl TerminalRenderer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn render_weather(&self, snapshot: &WeatherSnapshot) {
        if self.json {
            print_json(snapshot);
        } else {
            println!("{}", format_weather(snapshot, &updated_at()));
        }
    }
}

impl Renderer<NewsSnapshot> for TerminalRenderer {
    fn render(&self, snapshot: &NewsSnapshot) {
        if self.json {
            print_json(snapshot);
        } else {
            println!("{}", format_news(snapshot, &updated_at()));
        }
    }
}

impl Renderer<WeatherSnapshot> for TerminalRenderer {
    fn render(&self, snapshot: &WeatherSnapshot) {
        self.render_weather(snapshot);
    }
}

fn updated_at() -> String {
    Local::now().format("%H:%M").to_string()
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::error!(error = %err, "failed to serialize snapshot"),
    }
}

pub fn format_news(snapshot: &NewsSnapshot, updated: &str) -> String {
    let mut out = format!("News (updated {updated})\n");

    if let Some(notice) = &snapshot.notice {
        out.push_str(&format!("  {notice}\n"));
        return out;
    }

    if snapshot.items.is_empty() {
        out.push_str("  No headlines yet.\n");
    }

    for item in &snapshot.items {
        out.push_str(&format!("  • {}\n", item.title));

        let meta: Vec<&str> = [item.display_source(), item.display_date()].into_iter().flatten().collect();
        if !meta.is_empty() {
            out.push_str(&format!("    {}\n", meta.join(" · ")));
        }
        out.push_str(&format!("    {}\n", item.deep_link()));
    }

    out
}

pub fn format_weather(snapshot: &WeatherSnapshot, updated: &str) -> String {
    let mut out = match &snapshot.location {
        Some(location) => format!("Weather: {location} (updated {updated})\n"),
        None => format!("Weather (updated {updated})\n"),
    };

    out.push_str(&format!("  {}\n", snapshot.current_weather_text()));

    if snapshot.show_forecast() {
        for day in &snapshot.daily_forecast {
            out.push_str(&format!(
                "  {:<9} {}  {:<8} {}\n",
                day.display_date(),
                day.icon,
                day.high_label(),
                day.low_label()
            ));
        }
    }

    if let Some(link) = snapshot.radar_link_text() {
        out.push_str(&format!("  {link} ({})\n", snapshot.open_link()));
    }

    out
}
