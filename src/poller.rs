// src/poller.rs
//! The poll loop.
//!
//! One cycle: make sure the session is live (log in if not), fetch and parse
//! the report, compare with the retained snapshot, notify about new rows,
//! retain the new snapshot. Nothing a cycle runs into stops the loop: login,
//! fetch, parse and push failures are logged and the next cycle is scheduled
//! as usual. The snapshot only changes after a fully successful fetch, so a
//! bad cycle never makes old rows look new later.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use chrono::Local;
use futures::FutureExt;
use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::diff::diff;
use crate::error::{ConfigError, CycleError, LoginError};
use crate::notify::format::console_message;
use crate::notify::{DispatchReport, Dispatcher};
use crate::record::{Record, Snapshot};
use crate::session::{Credentials, Portal};
use crate::specs::report::{self, ReportSpec};

/// Whole-minute bounds for the randomised delay between fetches.
/// Jitter keeps the polling cadence from looking mechanical to the portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalRange {
    min_secs: u64,
    max_secs: u64,
}

impl IntervalRange {
    pub fn new(min_minutes: i64, max_minutes: i64) -> Result<Self, ConfigError> {
        if min_minutes > max_minutes {
            return Err(ConfigError::Interval(format!(
                "minimum ({min_minutes}) is greater than maximum ({max_minutes})"
            )));
        }
        if min_minutes <= 0 || max_minutes <= 0 {
            return Err(ConfigError::Interval(s!("minutes must be positive")));
        }
        let secs = |m: i64| {
            (m as u64)
                .checked_mul(60)
                .ok_or_else(|| ConfigError::Interval(format!("{m} minutes is too long")))
        };
        Ok(Self { min_secs: secs(min_minutes)?, max_secs: secs(max_minutes)? })
    }

    /// Uniform in `[min, max]` seconds, both ends included.
    pub fn pick(&self, rng: &mut impl Rng) -> Duration {
        Duration::from_secs(rng.gen_range(self.min_secs..=self.max_secs))
    }

    pub fn min(&self) -> Duration {
        Duration::from_secs(self.min_secs)
    }

    pub fn max(&self) -> Duration {
        Duration::from_secs(self.max_secs)
    }
}

/// How one cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// First successful fetch: snapshot stored, nobody notified.
    Seeded { rows: usize },
    /// Nothing new since the last snapshot.
    Unchanged { rows: usize },
    /// New rows found and dispatched (see `report` for per-channel results).
    NewRecords { rows: usize, new: Vec<Record>, report: DispatchReport },
    /// Login, fetch or parse failed; snapshot untouched.
    Failed(CycleError),
    /// The cycle panicked; snapshot untouched.
    Crashed(String),
}

pub struct Poller<P> {
    portal: P,
    credentials: Credentials,
    dispatcher: Dispatcher,
    spec: ReportSpec,
    interval: IntervalRange,
    snapshot: Option<Snapshot>,
}

impl<P: Portal> Poller<P> {
    pub fn new(
        portal: P,
        credentials: Credentials,
        dispatcher: Dispatcher,
        spec: ReportSpec,
        interval: IntervalRange,
    ) -> Self {
        Self { portal, credentials, dispatcher, spec, interval, snapshot: None }
    }

    /// Start from a known snapshot instead of an observational first cycle.
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Rows seen as of the last successful fetch. `None` before the first one.
    pub fn snapshot(&self) -> Option<&[Record]> {
        self.snapshot.as_deref()
    }

    pub fn portal(&self) -> &P {
        &self.portal
    }

    async fn ensure_session(&mut self) -> Result<(), LoginError> {
        if self.portal.is_authenticated().await {
            return Ok(());
        }
        logf!("Not logged in; logging in as {}", self.credentials.username());
        self.portal.login(&self.credentials).await
    }

    async fn try_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        self.ensure_session().await?;

        let html_doc = self.portal.fetch_report().await?;
        let current = report::parse_doc(&html_doc, &self.spec)?;
        let rows = current.len();
        let columns = self.dispatcher.columns();

        let Some(previous) = self.snapshot.as_deref() else {
            logf!("Fetched {rows} grades:\n{}", console_message(&current, columns));
            self.snapshot = Some(current);
            return Ok(CycleOutcome::Seeded { rows });
        };

        let new = diff(previous, &current);
        let outcome = if new.is_empty() {
            logf!("Fetched {rows} grades, no new records");
            CycleOutcome::Unchanged { rows }
        } else {
            logf!(
                "Fetched {rows} grades, {} new:\n{}",
                new.len(),
                console_message(&new, columns)
            );
            let report = self.dispatcher.dispatch(&new).await;
            CycleOutcome::NewRecords { rows, new, report }
        };

        self.snapshot = Some(current);
        Ok(outcome)
    }

    /// One full cycle. Every failure, a panic included, is logged and folded
    /// into the outcome.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match AssertUnwindSafe(self.try_cycle()).catch_unwind().await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                loge!(stage = e.stage(), "{e}");
                CycleOutcome::Failed(e)
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                loge!("Unexpected error: {msg}");
                CycleOutcome::Crashed(msg)
            }
        }
    }

    /// One cycle that `shutdown` can cut short. `None` when it did.
    pub async fn run_once(&mut self, shutdown: &CancellationToken) -> Option<CycleOutcome> {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                logf!("Cycle abandoned");
                None
            }
            outcome = self.run_cycle() => Some(outcome),
        }
    }

    /// Poll until `shutdown` fires. Shutdown is honoured while sleeping and
    /// mid-cycle (the in-flight request, if any, is dropped).
    pub async fn run(&mut self, shutdown: CancellationToken) {
        loop {
            let delay = self.interval.pick(&mut rand::thread_rng());
            let next_at = Local::now()
                + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = self.run_cycle() => {}
            }

            logf!("Next fetch at {}", next_at.format("%H:%M:%S"));
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        logf!("Stopped polling");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s!(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        s!("panic with non-string payload")
    }
}
