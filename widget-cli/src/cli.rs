use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use widget_core::{
    Config, ConfigSource, DEFAULT_PORT, News, Pipeline, Weather, WeatherSnapshot, WidgetError,
    WidgetId, resolve_base_url,
};

use crate::render::TerminalRenderer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "widget", version, about = "News and weather widgets in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the server the widgets read from.
    Configure {
        /// IP, hostname or URL. Prompted for when omitted.
        host: Option<String>,

        /// Port used when the address does not carry one.
        #[arg(long)]
        port: Option<String>,
    },

    /// Refresh once and print the result.
    Show {
        #[arg(value_enum, ignore_case = true, default_value_t = Selection::All)]
        widget: Selection,

        /// Print snapshots as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Refresh on a fixed schedule until interrupted.
    Watch {
        #[arg(value_enum, ignore_case = true, default_value_t = Selection::All)]
        widget: Selection,

        #[arg(long, default_value_t = 30)]
        interval_mins: u64,

        #[arg(long)]
        json: bool,
    },
}

/// Which widgets a command refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Selection {
    All,
    News,
    Weather,
}

impl Selection {
    fn widgets(self) -> &'static [WidgetId] {
        match self {
            Selection::All => WidgetId::all(),
            Selection::News => &[WidgetId::News],
            Selection::Weather => &[WidgetId::Weather],
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { host, port } => configure(host, port),
            Command::Show { widget, json } => {
                let config = Config::load()?;
                if let Some(hint) = setup_hint(&config) {
                    warn!("{hint}");
                }
                refresh(&config, widget.widgets(), &TerminalRenderer::new(json)).await
            }
            Command::Watch { widget, interval_mins, json } => {
                watch(widget.widgets(), interval_mins, &TerminalRenderer::new(json)).await
            }
        }
    }
}

fn setup_hint(config: &Config) -> Option<&'static str> {
    (!config.is_configured()).then_some("no server address stored, run `widget configure` first")
}

fn configure(host: Option<String>, port: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let (host, port) = match host {
        Some(host) => (host, port),
        None => {
            let host = inquire::Text::new("Server address:")
                .with_help_message("IP, hostname or URL, e.g. 192.168.1.20 or https://news.lan")
                .prompt()
                .context("Failed to read server address")?;
            let port = inquire::Text::new("Port:")
                .with_default(port.as_deref().unwrap_or(DEFAULT_PORT))
                .prompt()
                .context("Failed to read server port")?;
            (host, Some(port))
        }
    };

    config.set_server(host, port);
    let endpoint = config.endpoint();
    let base = match resolve_base_url(&endpoint.host_or_url, &endpoint.port) {
        Ok(base) => base,
        Err(WidgetError::NotConfigured) => anyhow::bail!("Server address must not be empty"),
        Err(err) => return Err(err.into()),
    };

    config.save()?;
    println!("Saved. Widgets will use {base}");
    Ok(())
}

/// One cycle per selected widget, run concurrently.
async fn refresh(
    config: &Config,
    widgets: &[WidgetId],
    renderer: &TerminalRenderer,
) -> anyhow::Result<()> {
    let news = Pipeline::<News>::http()?;
    let weather = Pipeline::<Weather>::http()?;

    let news_cycle = async {
        if widgets.contains(&WidgetId::News) {
            news.refresh_and_render(config, renderer).await;
        }
    };
    let weather_cycle = async {
        if widgets.contains(&WidgetId::Weather) {
            weather.refresh_and_render(config, renderer).await;
        }
    };

    tokio::join!(news_cycle, weather_cycle);
    Ok(())
}

async fn watch(
    widgets: &[WidgetId],
    interval_mins: u64,
    renderer: &TerminalRenderer,
) -> anyhow::Result<()> {
    let period = Duration::from_secs(interval_mins.max(1) * 60);
    info!(interval_mins = period.as_secs() / 60, "watching widgets, press Ctrl-C to stop");

    if widgets.contains(&WidgetId::Weather) {
        renderer.render_weather(&WeatherSnapshot::loading());
    }

    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Re-read every cycle: the address may change while we run.
                let config = Config::load().unwrap_or_else(|err| {
                    warn!(error = %err, "could not load config, treating server as unconfigured");
                    Config::default()
                });
                refresh(&config, widgets, renderer).await?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping");
                return Ok(());
            }
        }
    }
}
