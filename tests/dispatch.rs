// tests/dispatch.rs
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mockito::{Matcher, Server};

use score_watch::error::PushNotificationError;
use score_watch::notify::{Channel, Dispatcher, Notification, ServerChan};
use score_watch::record;

#[derive(Clone, Default)]
struct Recorder {
    sent: Arc<Mutex<Vec<Notification>>>,
}

#[async_trait]
impl Channel for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    async fn send(&self, note: &Notification) -> Result<(), PushNotificationError> {
        self.sent.lock().unwrap().push(note.clone());
        Ok(())
    }
}

fn columns() -> Vec<String> {
    vec!["课程名称".into(), "总成绩".into()]
}

fn new_grade() -> Vec<score_watch::Record> {
    vec![record! { "课程名称" => "大学物理", "总成绩" => "90" }]
}

#[tokio::test]
async fn server_chan_delivers_on_errno_zero() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/SCU123.send")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("text".into(), "1 new grade posted".into()),
            Matcher::UrlEncoded("desp".into(), "#### 大学物理\n- **总成绩:** 90".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"errno":0,"errmsg":"success","dataset":"done"}"#)
        .create_async()
        .await;

    let d = Dispatcher::new(columns())
        .with_channel(ServerChan::new(&server.url(), "SCU123").unwrap());
    let report = d.dispatch(&new_grade()).await;

    m.assert_async().await;
    assert!(report.all_delivered());
    assert_eq!(report.delivered, vec!["Server Chan"]);
}

#[tokio::test]
async fn server_chan_errno_is_a_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/BAD.send")
        .with_status(200)
        .with_body(r#"{"errno":1024,"errmsg":"bad pushtoken"}"#)
        .create_async()
        .await;

    let ch = ServerChan::new(&server.url(), "BAD").unwrap();
    let note = Notification::for_records(&new_grade(), &columns());
    let err = ch.send(&note).await.unwrap_err();
    assert_eq!(err.channel, "Server Chan");
    assert!(err.reason.contains("bad pushtoken"), "{}", err.reason);
}

#[tokio::test]
async fn failing_channel_does_not_block_the_rest() {
    let recorder = Recorder::default();
    let unreachable =
        ServerChan::with_timeout("http://127.0.0.1:1", "SCU123", Duration::from_millis(500))
            .unwrap();

    let d = Dispatcher::new(columns())
        .with_channel(unreachable)
        .with_channel(recorder.clone());
    let report = d.dispatch(&new_grade()).await;

    assert_eq!(report.delivered, vec!["recorder"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].channel, "Server Chan");

    let sent = recorder.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].count, 1);
    assert!(sent[0].body.contains("大学物理"));
}

#[tokio::test]
async fn no_channels_is_a_quiet_success() {
    let d = Dispatcher::new(columns());
    assert!(d.is_empty());
    let report = d.dispatch(&new_grade()).await;
    assert!(report.delivered.is_empty());
    assert!(report.all_delivered());
}
