// src/config/options.rs
use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

use super::consts::*;
use crate::core::net;
use crate::error::ConfigError;
use crate::poller::IntervalRange;
use crate::session::Credentials;
use crate::specs::report::ReportSpec;

/// Everything read from the config file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// Portal base address, e.g. `http://jwgl.xxxx.edu.cn/`
    pub host: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Minutes between fetches, picked at random in `[min, max]` each cycle.
    #[serde(default = "default_interval")]
    pub fetch_interval_range: (i64, i64),
    /// Columns shown in logs and pushes. The first one titles each pushed record.
    #[serde(default = "default_display_columns")]
    pub display_columns: Vec<String>,
    #[serde(default)]
    pub debug: bool,
    /// Empty string turns the log file off.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default)]
    pub report: ReportOptions,
    #[serde(default)]
    pub server_chan: ServerChanOptions,
    #[serde(default)]
    pub desktop_toast: ToastOptions,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportOptions {
    #[serde(default = "default_table_id")]
    pub table_id: String,
    /// Row-number column dropped from every record. Empty string keeps all columns.
    #[serde(default = "default_sequence_column")]
    pub sequence_column: String,
    #[serde(default = "default_empty_sentinel")]
    pub empty_sentinel: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            table_id: default_table_id(),
            sequence_column: default_sequence_column(),
            empty_sentinel: default_empty_sentinel(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerChanOptions {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub sckey: String,
    #[serde(default = "default_server_chan_endpoint")]
    pub endpoint: String,
}

impl Default for ServerChanOptions {
    fn default() -> Self {
        Self {
            enable: false,
            sckey: s!(),
            endpoint: default_server_chan_endpoint(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToastOptions {
    #[serde(default)]
    pub enable: bool,
}

fn default_interval() -> (i64, i64) {
    DEFAULT_INTERVAL_MINUTES
}

fn default_display_columns() -> Vec<String> {
    DEFAULT_DISPLAY_COLUMNS.iter().map(|c| s!(*c)).collect()
}

fn default_log_file() -> String {
    s!(DEFAULT_LOG_FILE)
}

fn default_table_id() -> String {
    s!(REPORT_TABLE_ID)
}

fn default_sequence_column() -> String {
    s!(SEQUENCE_COLUMN)
}

fn default_empty_sentinel() -> String {
    s!(NO_DATA_SENTINEL)
}

fn default_server_chan_endpoint() -> String {
    s!(SERVER_CHAN_ENDPOINT)
}

impl Options {
    /// `explicit` if given, else `config.local.toml` when present, else `config.toml`.
    pub fn locate(explicit: Option<PathBuf>) -> PathBuf {
        if let Some(p) = explicit {
            return p;
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() { local } else { PathBuf::from(CONFIG_FILE) }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn interval(&self) -> Result<IntervalRange, ConfigError> {
        let (min, max) = self.fetch_interval_range;
        IntervalRange::new(min, max)
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        net::parse_base(&self.host).map_err(|reason| ConfigError::BaseUrl {
            host: self.host.clone(),
            reason,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }

    pub fn report_spec(&self) -> ReportSpec {
        let seq = self.report.sequence_column.trim();
        ReportSpec {
            table_id: self.report.table_id.clone(),
            sequence_column: (!seq.is_empty()).then(|| s!(seq)),
            empty_sentinel: self.report.empty_sentinel.clone(),
        }
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        let p = self.log_file.trim();
        (!p.is_empty()).then(|| PathBuf::from(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Options, ConfigError> {
        Options::from_toml(text, Path::new("test.toml"))
    }

    #[test]
    fn minimal_file_gets_defaults() {
        let o = parse(r#"host = "http://jwgl.example.edu.cn/""#).unwrap();
        assert_eq!(o.fetch_interval_range, (5, 10));
        assert_eq!(o.display_columns[0], "课程名称");
        assert!(!o.debug);
        assert!(!o.server_chan.enable);
        assert_eq!(o.server_chan.endpoint, SERVER_CHAN_ENDPOINT);
        assert!(!o.desktop_toast.enable);
        assert_eq!(o.log_path(), Some(PathBuf::from("app.log")));

        let spec = o.report_spec();
        assert_eq!(spec.table_id, "dataList");
        assert_eq!(spec.sequence_column.as_deref(), Some("序号"));
    }

    #[test]
    fn full_file() {
        let o = parse(
            r#"
            host = "https://jwgl.example.edu.cn"
            username = "2020001"
            password = "hunter2"
            fetch_interval_range = [3, 7]
            display_columns = ["Course", "Grade"]
            debug = true
            log_file = ""

            [report]
            sequence_column = ""

            [server_chan]
            enable = true
            sckey = "SCU123"

            [desktop_toast]
            enable = true
            "#,
        )
        .unwrap();
        assert_eq!(o.fetch_interval_range, (3, 7));
        assert_eq!(o.display_columns, vec!["Course", "Grade"]);
        assert_eq!(o.log_path(), None);
        assert_eq!(o.report_spec().sequence_column, None);
        assert_eq!(o.server_chan.sckey, "SCU123");
        assert_eq!(o.credentials().username(), "2020001");
        assert_eq!(o.base_url().unwrap().as_str(), "https://jwgl.example.edu.cn/");
    }

    #[test]
    fn push_endpoint_defaults_with_or_without_table() {
        let bare = parse(r#"host = "x""#).unwrap();
        assert_eq!(bare.server_chan.endpoint, "https://sc.ftqq.com");

        let table = parse("host = \"x\"\n[server_chan]\nenable = true").unwrap();
        assert_eq!(table.server_chan.endpoint, "https://sc.ftqq.com");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse("host = \"x\"\nserver_chan_enable = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_host_is_rejected() {
        assert!(matches!(parse("username = \"a\""), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn bad_interval_surfaces_at_validation() {
        let o = parse("host = \"x\"\nfetch_interval_range = [10, 5]").unwrap();
        assert!(matches!(o.interval(), Err(ConfigError::Interval(_))));
    }
}
