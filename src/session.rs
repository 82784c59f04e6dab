// src/session.rs
//! The portal session: login, liveness probe, report fetch.
//!
//! No "expired" state is kept here. Whether the session is still good is
//! asked of the server every cycle (`is_authenticated`), never assumed from
//! the last successful call.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, Url};

use crate::config::consts::{LOGIN_PATH, PORTAL_TIMEOUT_SECS, PROBE_PATH, REPORT_PATH};
use crate::core::net;
use crate::error::{ConfigError, FetchError, LoginError};
use crate::specs::login;

/// Username/password pair. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login form payload: `base64(user)%%%base64(pass)`.
    pub fn encoded(&self) -> String {
        join!(
            &STANDARD.encode(self.username.as_bytes()),
            "%%%",
            &STANDARD.encode(self.password.as_bytes())
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// What the poller needs from the portal.
#[async_trait]
pub trait Portal: Send {
    /// Start a fresh session with `credentials`.
    async fn login(&mut self, credentials: &Credentials) -> Result<(), LoginError>;

    /// Best-effort check that the current session is still accepted.
    /// Errors count as "no".
    async fn is_authenticated(&mut self) -> bool;

    /// Raw report page. Call only with a live session.
    async fn fetch_report(&mut self) -> Result<String, FetchError>;
}

/// HTTP session against one portal.
pub struct SessionClient {
    login_url: Url,
    probe_url: Url,
    report_url: Url,
    timeout: Duration,
    client: Client,
}

impl SessionClient {
    pub fn new(base: &Url) -> Result<Self, ConfigError> {
        Self::with_timeout(base, Duration::from_secs(PORTAL_TIMEOUT_SECS))
    }

    pub fn with_timeout(base: &Url, timeout: Duration) -> Result<Self, ConfigError> {
        let url = |path: &str| {
            net::endpoint(base, path).map_err(|reason| ConfigError::BaseUrl {
                host: base.to_string(),
                reason,
            })
        };
        Ok(Self {
            login_url: url(LOGIN_PATH)?,
            probe_url: url(PROBE_PATH)?,
            report_url: url(REPORT_PATH)?,
            timeout,
            client: net::session_client(timeout).map_err(ConfigError::HttpClient)?,
        })
    }
}

#[async_trait]
impl Portal for SessionClient {
    async fn login(&mut self, credentials: &Credentials) -> Result<(), LoginError> {
        // New cookie jar; whatever the old session held is gone even if this login fails.
        self.client = net::session_client(self.timeout).map_err(LoginError::Transport)?;

        let form = [("encoded", credentials.encoded())];
        let sent = self.client.post(self.login_url.clone()).form(&form).send().await;
        let body = match sent {
            Ok(resp) => resp.text().await,
            Err(e) => Err(e),
        }
        .map_err(|e| if e.is_timeout() { LoginError::Timeout } else { LoginError::Transport(e) })?;

        if login::is_dashboard(&body) {
            logf!("Logged in as {}", credentials.username());
            return Ok(());
        }
        let reason = login::error_text(&body)
            .unwrap_or_else(|| s!("portal did not show the dashboard after login"));
        Err(LoginError::Rejected(reason))
    }

    async fn is_authenticated(&mut self) -> bool {
        let probe = async {
            let resp = self.client.get(self.probe_url.clone()).send().await?;
            resp.text().await
        };
        match probe.await {
            Ok(body) => !login::needs_login(&body),
            Err(e) => {
                logd!("Session probe failed: {e}");
                false
            }
        }
    }

    async fn fetch_report(&mut self) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(self.report_url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = resp.text().await.map_err(FetchError::from_reqwest)?;
        logd!("Report page ({} bytes):\n{}", body.len(), body);
        Ok(body)
    }
}
