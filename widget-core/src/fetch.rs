use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::{fmt::Debug, time::Duration};
use tracing::{debug, warn};

use crate::{config::RefreshSettings, error::WidgetError};

/// User agent string for widget requests.
pub const USER_AGENT: &str = concat!("news-widgets/", env!("CARGO_PKG_VERSION"));

/// Performs the single GET of a refresh cycle.
#[async_trait]
pub trait Fetch: Send + Sync + Debug {
    /// Body of a `200 OK` response to `url`.
    async fn get(&self, url: &str) -> Result<Vec<u8>, WidgetError>;
}

/// `reqwest`-backed fetcher bounded by a pipeline's timeouts.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(settings: &RefreshSettings) -> Result<Self, WidgetError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| WidgetError::IoError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, timeout: settings.total_timeout() })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, WidgetError> {
        debug!(url, timeout_secs = self.timeout.as_secs(), "sending request");

        // The response (and its pooled connection) is dropped on every return path.
        let res = self.http.get(url).timeout(self.timeout).send().await.map_err(classify)?;

        let status = res.status();
        if status != StatusCode::OK {
            warn!(url, %status, "request failed");
            return Err(WidgetError::HttpStatus(status.as_u16()));
        }

        let body = res.bytes().await.map_err(classify)?;
        debug!(url, bytes = body.len(), "response received");
        Ok(body.to_vec())
    }
}

fn classify(err: reqwest::Error) -> WidgetError {
    if err.is_timeout() {
        WidgetError::Timeout
    } else if err.is_connect() {
        WidgetError::Unreachable(err.to_string())
    } else {
        WidgetError::IoError(err.to_string())
    }
}
