// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Authentication endpoint unreachable, timed out, or credentials refused.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("login timed out, try again later")]
    Timeout,
    #[error("login request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("login rejected: {0}")]
    Rejected(String),
}

/// Report endpoint unreachable or timed out.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("report request timed out")]
    Timeout,
    #[error("report request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("report request returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

impl FetchError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() { FetchError::Timeout } else { FetchError::Transport(e) }
    }
}

/// The report page is not the table we expect.
/// An empty but well-formed table is not an error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("report table #{0} not found")]
    MissingTable(String),
    #[error("report table has no header row")]
    MissingHeader,
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One notification channel failed to deliver.
#[derive(Debug, Error)]
#[error("{channel} push failed: {reason}")]
pub struct PushNotificationError {
    pub channel: &'static str,
    pub reason: String,
}

impl PushNotificationError {
    pub fn new(channel: &'static str, reason: impl Into<String>) -> Self {
        Self { channel, reason: reason.into() }
    }
}

/// Anything that ends a poll cycle early.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("login error: {0}")]
    Login(#[from] LoginError),
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl CycleError {
    pub fn stage(&self) -> &'static str {
        match self {
            CycleError::Login(_) => "login",
            CycleError::Fetch(_) => "fetch",
            CycleError::Parse(_) => "parse",
        }
    }
}

/// Startup failures. These are the only errors that stop the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid fetch interval: {0}")]
    Interval(String),
    #[error("invalid portal address {host:?}: {reason}")]
    BaseUrl { host: String, reason: String },
    #[error("cannot build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("cannot set up logging: {0}")]
    Logging(String),
}
