// src/specs/login.rs
//! Reading the pages around authentication.
//!
//! - Login response: a good login lands on the personal dashboard, whose
//!   `<title>` carries the dashboard marker. Anything else is a failure; the
//!   login box then shows the reason in red (`.dlmi font[color=red]`).
//! - Liveness probe: once the session is gone the framework page asks the
//!   user to log in first.

use crate::config::consts::{DASHBOARD_MARKER, LOGIN_BOX_CLASS, LOGIN_REQUIRED_MARKER};
use crate::core::html::attr_value;
use crate::core::Markup;

pub fn is_dashboard(html_doc: &str) -> bool {
    Markup::new(html_doc)
        .title()
        .is_some_and(|t| t.contains(DASHBOARD_MARKER))
}

/// Red error text inside the login box, if the page has any.
pub fn error_text(html_doc: &str) -> Option<String> {
    let m = Markup::new(html_doc);
    let login_box = m.find_class(LOGIN_BOX_CLASS)?;

    let mut pos = login_box.open_end;
    while let Some(b) = m.next_block("font", pos, login_box.inner_end) {
        let red = attr_value(m.opener(b), "color").is_some_and(|c| c.eq_ignore_ascii_case("red"));
        if red {
            let text = m.text(b);
            if !text.is_empty() {
                return Some(text);
            }
        }
        pos = b.open_end;
    }
    None
}

pub fn needs_login(html_doc: &str) -> bool {
    html_doc.contains(LOGIN_REQUIRED_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DASHBOARD: &str = include_str!("../../tests/fixtures/dashboard_page.html");
    const LOGIN_FAILED: &str = include_str!("../../tests/fixtures/login_failed_page.html");

    #[test]
    fn dashboard_title_means_logged_in() {
        assert!(is_dashboard(DASHBOARD));
        assert!(!is_dashboard(LOGIN_FAILED));
        // Marker in the body only does not count.
        assert!(!is_dashboard("<title>登录</title><body>学生个人中心</body>"));
    }

    #[test]
    fn red_text_in_login_box() {
        assert_eq!(error_text(LOGIN_FAILED).as_deref(), Some("用户名或密码错误"));
        assert_eq!(error_text(DASHBOARD), None);
    }

    #[test]
    fn red_text_outside_login_box_is_ignored() {
        let doc = r#"<font color="red">banner</font><div class="dlmi"><font color=blue>x</font></div>"#;
        assert_eq!(error_text(doc), None);
    }

    #[test]
    fn red_text_after_login_box_is_ignored() {
        let doc = r#"<div class="dlmi"><div class="dl_box"><font color="blue">账号</font></div></div>
                     <div class="footer"><font color="red">请使用谷歌浏览器</font></div>"#;
        assert_eq!(error_text(doc), None);

        let with_error = doc.replace("color=\"blue\">账号", "color=\"red\">用户名或密码错误");
        assert_eq!(error_text(&with_error).as_deref(), Some("用户名或密码错误"));
    }

    #[test]
    fn login_required_marker() {
        assert!(needs_login("<script>alert('请先登录系统')</script>"));
        assert!(!needs_login(DASHBOARD));
    }
}
