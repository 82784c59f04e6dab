// src/config/consts.rs

// Portal endpoints (relative to the configured host)
pub const LOGIN_PATH: &str = "/jsxsd/xk/LoginToXk";
pub const PROBE_PATH: &str = "/jsxsd/framework/main.jsp";
pub const REPORT_PATH: &str = "/jsxsd/kscj/cjcx_list";
pub const PORTAL_TIMEOUT_SECS: u64 = 5;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/81.0.4044.92 Safari/537.36";

// Page markers
pub const DASHBOARD_MARKER: &str = "学生个人中心"; // <title> after a good login
pub const LOGIN_REQUIRED_MARKER: &str = "请先登录系统"; // probe page when the session is gone
pub const LOGIN_BOX_CLASS: &str = "dlmi"; // login form; errors show in red inside it

// Report table
pub const REPORT_TABLE_ID: &str = "dataList";
pub const SEQUENCE_COLUMN: &str = "序号";
pub const NO_DATA_SENTINEL: &str = "未查询到数据";

// Push
pub const SERVER_CHAN_ENDPOINT: &str = "https://sc.ftqq.com";
pub const PUSH_TIMEOUT_SECS: u64 = 10;
pub const TOAST_TIMEOUT_SECS: u64 = 10;

// Config / logs
pub const CONFIG_FILE: &str = "config.toml";
pub const LOCAL_CONFIG_FILE: &str = "config.local.toml"; // wins over CONFIG_FILE when present
pub const DEFAULT_LOG_FILE: &str = "app.log";

// Schedule (minutes)
pub const DEFAULT_INTERVAL_MINUTES: (i64, i64) = (5, 10);

pub const DEFAULT_DISPLAY_COLUMNS: &[&str] = &[
    "课程名称", "总成绩", "学分", "平时成绩", "期中成绩", "实验成绩", "期末成绩",
];
