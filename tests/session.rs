// tests/session.rs
use std::net::TcpListener;
use std::time::Duration;

use mockito::{Matcher, Server};
use reqwest::Url;

use score_watch::config::consts::{LOGIN_PATH, PROBE_PATH, REPORT_PATH};
use score_watch::error::{FetchError, LoginError};
use score_watch::session::{Credentials, Portal, SessionClient};

const DASHBOARD: &str = include_str!("fixtures/dashboard_page.html");
const LOGIN_FAILED: &str = include_str!("fixtures/login_failed_page.html");
const REPORT: &str = include_str!("fixtures/report_page.html");

fn client_for(server: &Server) -> SessionClient {
    let base = Url::parse(&server.url()).unwrap();
    SessionClient::new(&base).unwrap()
}

fn creds() -> Credentials {
    Credentials::new("2020001", "pa55")
}

#[tokio::test]
async fn login_posts_encoded_credentials() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", LOGIN_PATH)
        .match_body(Matcher::UrlEncoded("encoded".into(), creds().encoded()))
        .with_status(200)
        .with_body(DASHBOARD)
        .create_async()
        .await;

    let mut s = client_for(&server);
    s.login(&creds()).await.unwrap();
    m.assert_async().await;
}

#[tokio::test]
async fn rejected_login_carries_portal_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", LOGIN_PATH)
        .with_status(200)
        .with_body(LOGIN_FAILED)
        .create_async()
        .await;

    let mut s = client_for(&server);
    match s.login(&creds()).await {
        Err(LoginError::Rejected(msg)) => assert_eq!(msg, "用户名或密码错误"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn login_without_dashboard_or_message_is_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", LOGIN_PATH)
        .with_status(200)
        .with_body("<html><title>维护中</title></html>")
        .create_async()
        .await;

    let mut s = client_for(&server);
    assert!(matches!(s.login(&creds()).await, Err(LoginError::Rejected(_))));
}

#[tokio::test]
async fn silent_server_times_out() {
    // Accepts connections, never answers.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
    let mut s = SessionClient::with_timeout(&base, Duration::from_millis(200)).unwrap();

    assert!(matches!(s.login(&creds()).await, Err(LoginError::Timeout)));
    assert!(matches!(s.fetch_report().await, Err(FetchError::Timeout)));
    assert!(!s.is_authenticated().await);
    drop(listener);
}

#[tokio::test]
async fn liveness_check_reads_login_marker() {
    let mut server = Server::new_async().await;
    let live = server
        .mock("GET", PROBE_PATH)
        .with_status(200)
        .with_body("<html><title>学生个人中心</title></html>")
        .expect(1)
        .create_async()
        .await;

    let mut s = client_for(&server);
    assert!(s.is_authenticated().await);
    live.assert_async().await;
    live.remove_async().await;

    server
        .mock("GET", PROBE_PATH)
        .with_status(200)
        .with_body("<script>alert('请先登录系统');</script>")
        .create_async()
        .await;
    assert!(!s.is_authenticated().await);
}

#[tokio::test]
async fn unreachable_portal_counts_as_logged_out() {
    let base = Url::parse("http://127.0.0.1:1").unwrap();
    let mut s = SessionClient::with_timeout(&base, Duration::from_millis(500)).unwrap();
    assert!(!s.is_authenticated().await);
}

#[tokio::test]
async fn fetch_returns_page_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", REPORT_PATH)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(REPORT)
        .create_async()
        .await;

    let mut s = client_for(&server);
    let body = s.fetch_report().await.unwrap();
    assert!(body.contains("dataList"));
}

#[tokio::test]
async fn fetch_error_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", REPORT_PATH)
        .with_status(500)
        .create_async()
        .await;

    let mut s = client_for(&server);
    match s.fetch_report().await {
        Err(FetchError::Status(code)) => assert_eq!(code.as_u16(), 500),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn session_cookie_is_kept_after_login() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", LOGIN_PATH)
        .with_status(200)
        .with_header("set-cookie", "JSESSIONID=abc123; Path=/")
        .with_body(DASHBOARD)
        .create_async()
        .await;
    let report = server
        .mock("GET", REPORT_PATH)
        .match_header("cookie", "JSESSIONID=abc123")
        .with_status(200)
        .with_body(REPORT)
        .create_async()
        .await;

    let mut s = client_for(&server);
    s.login(&creds()).await.unwrap();
    s.fetch_report().await.unwrap();
    report.assert_async().await;
}

#[tokio::test]
async fn relogin_starts_a_fresh_cookie_jar() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", LOGIN_PATH)
        .with_status(200)
        .with_header("set-cookie", "JSESSIONID=old; Path=/")
        .with_body(DASHBOARD)
        .create_async()
        .await;

    let mut s = client_for(&server);
    s.login(&creds()).await.unwrap();
    server.reset_async().await;

    server
        .mock("POST", LOGIN_PATH)
        .match_header("cookie", Matcher::Missing)
        .with_status(200)
        .with_body(DASHBOARD)
        .create_async()
        .await;
    s.login(&creds()).await.unwrap();
}
