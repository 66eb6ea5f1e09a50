//! Turns the loosely formatted server address a user typed into a base URL.

use reqwest::Url;
use tracing::{debug, warn};

use crate::{config::DEFAULT_PORT, error::WidgetError};

/// Resolve `host_or_url` + `port` into `scheme://host:port`.
///
/// - blank host ⇒ [`WidgetError::NotConfigured`]
/// - missing scheme ⇒ `http://` is prepended
/// - a port embedded in the host wins over `port`
/// - any path, query or fragment is dropped
///
/// When the address cannot be understood the scheme-prefixed input is
/// returned untouched; the fetch will then fail on its own terms.
pub fn resolve_base_url(host_or_url: &str, port: &str) -> Result<String, WidgetError> {
    let raw = host_or_url.trim();
    if raw.is_empty() {
        return Err(WidgetError::NotConfigured);
    }

    let with_scheme =
        if has_http_scheme(raw) { raw.to_string() } else { format!("http://{raw}") };

    match canonical_origin(&with_scheme, port) {
        Some(base) => {
            debug!(input = raw, base = %base, "resolved base url");
            Ok(base)
        }
        None => {
            warn!(input = raw, "could not parse server address, using it as-is");
            Ok(with_scheme)
        }
    }
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn canonical_origin(url: &str, configured_port: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let scheme = scheme.to_ascii_lowercase();

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let (host, embedded_port) = split_port(authority)?;
    if host.is_empty() {
        return None;
    }

    let port = match embedded_port {
        Some(p) => p.to_string(),
        None => configured_or_default(configured_port),
    };

    let base = format!("{scheme}://{host}:{port}");
    // Rejects bad hosts and out-of-range ports.
    Url::parse(&base).ok()?;
    Some(base)
}

/// Split `host[:port]`, keeping bracketed IPv6 literals intact.
/// `None` means the authority is not something we know how to read.
fn split_port(authority: &str) -> Option<(&str, Option<&str>)> {
    if authority.starts_with('[') {
        let end = authority.find(']')?;
        let (host, after) = authority.split_at(end + 1);
        return match after {
            "" | ":" => Some((host, None)),
            _ => {
                let port = after.strip_prefix(':')?;
                is_port(port).then_some((host, Some(port)))
            }
        };
    }

    match authority.rsplit_once(':') {
        None => Some((authority, None)),
        Some((host, _)) if host.contains(':') => None,
        Some((host, "")) => Some((host, None)),
        Some((host, port)) => is_port(port).then_some((host, Some(port))),
    }
}

fn is_port(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn configured_or_default(port: &str) -> String {
    let port = port.trim();
    if is_port(port) {
        port.to_string()
    } else {
        if !port.is_empty() {
            warn!(port, "configured port is not numeric, using {DEFAULT_PORT}");
        }
        DEFAULT_PORT.to_string()
    }
}
