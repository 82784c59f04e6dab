// src/core/net.rs
// HTTP plumbing shared by the portal session and the push channel.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::config::consts::USER_AGENT;

/// Client with a fresh, empty cookie jar. Every request made through it is
/// bounded by `timeout`.
pub fn session_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Cookie-less client for third-party endpoints.
pub fn plain_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Parse the portal base address. A bare host gets `http://` in front.
pub fn parse_base(host: &str) -> Result<Url, String> {
    let host = host.trim();
    if host.is_empty() {
        return Err(s!("empty"));
    }
    let with_scheme = if host.contains("://") { s!(host) } else { join!("http://", host) };
    let url = Url::parse(&with_scheme).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported address {url}"));
    }
    Ok(url)
}

/// Resolve an absolute portal path (e.g. `/jsxsd/xk/LoginToXk`) against the base.
pub fn endpoint(base: &Url, path: &str) -> Result<Url, String> {
    base.join(path).map_err(|e| e.to_string())
}
