// src/notify/mod.rs
//! Telling the user about new records.
//!
//! A `Dispatcher` owns zero or more `Channel`s picked at startup from the
//! config. Every channel is tried on every dispatch; a failing channel is
//! logged and reported, it never stops the others and never reaches the
//! poll loop as an error.

pub mod format;
pub mod server_chan;
pub mod toast;

use async_trait::async_trait;

use crate::config::Options;
use crate::error::{ConfigError, PushNotificationError};
use crate::record::Record;

pub use server_chan::ServerChan;
pub use toast::DesktopToast;

/// What channels deliver, already rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Short headline, e.g. "2 new grades posted"
    pub title: String,
    /// Markdown detail, one block per record
    pub body: String,
    pub count: usize,
}

impl Notification {
    pub fn for_records(records: &[Record], columns: &[String]) -> Self {
        Self {
            title: format::push_title(records.len()),
            body: format::push_markdown(records, columns),
            count: records.len(),
        }
    }
}

/// One delivery mechanism.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, note: &Notification) -> Result<(), PushNotificationError>;
}

/// Per-dispatch outcome.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: Vec<&'static str>,
    pub failed: Vec<PushNotificationError>,
}

impl DispatchReport {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Dispatcher {
    channels: Vec<Box<dyn Channel>>,
    columns: Vec<String>,
}

impl Dispatcher {
    pub fn new(columns: Vec<String>) -> Self {
        Self { channels: Vec::new(), columns }
    }

    pub fn with_channel(mut self, channel: impl Channel + 'static) -> Self {
        self.channels.push(Box::new(channel));
        self
    }

    /// Channels enabled in the config. A channel that cannot work here
    /// (toast off Windows, push without a key) is left out with a warning.
    pub fn from_options(opts: &Options) -> Result<Self, ConfigError> {
        let mut d = Dispatcher::new(opts.display_columns.clone());

        if opts.desktop_toast.enable {
            if DesktopToast::supported() {
                d = d.with_channel(DesktopToast::new());
            } else {
                logw!("Desktop toast is only available on Windows; toast notifications disabled");
            }
        }

        let sc = &opts.server_chan;
        if sc.enable {
            if sc.sckey.trim().is_empty() {
                logw!("Server Chan is enabled but `sckey` is empty; push disabled");
            } else {
                d = d.with_channel(ServerChan::new(&sc.endpoint, sc.sckey.trim())?);
            }
        }

        Ok(d)
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Try every channel, in order, regardless of how the others went.
    pub async fn dispatch(&self, records: &[Record]) -> DispatchReport {
        let mut report = DispatchReport::default();
        if self.channels.is_empty() {
            logf!("No notification channel enabled; skipping push");
            return report;
        }

        let note = Notification::for_records(records, &self.columns);
        logd!("Push body:\n{}", note.body);

        for ch in &self.channels {
            match ch.send(&note).await {
                Ok(()) => {
                    logf!("Notified via {}", ch.name());
                    report.delivered.push(ch.name());
                }
                Err(e) => {
                    loge!("Push error: {e}");
                    report.failed.push(e);
                }
            }
        }
        report
    }
}
