// src/notify/server_chan.rs
// Server Chan push: POST {text, desp} to {endpoint}/{key}.send.
// The reply is JSON; errno 0 means delivered, anything else carries errmsg.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{Channel, Notification};
use crate::config::consts::PUSH_TIMEOUT_SECS;
use crate::core::net;
use crate::error::{ConfigError, PushNotificationError};

const NAME: &str = "Server Chan";

#[derive(Debug, Deserialize)]
struct Reply {
    errno: i64,
    #[serde(default)]
    errmsg: String,
}

pub struct ServerChan {
    client: Client,
    url: Url,
}

impl ServerChan {
    pub fn new(endpoint: &str, sckey: &str) -> Result<Self, ConfigError> {
        Self::with_timeout(endpoint, sckey, Duration::from_secs(PUSH_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint: &str, sckey: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let raw = format!("{}/{}.send", endpoint.trim_end_matches('/'), sckey);
        let url = Url::parse(&raw).map_err(|e| ConfigError::BaseUrl {
            host: s!(endpoint),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client: net::plain_client(timeout).map_err(ConfigError::HttpClient)?,
            url,
        })
    }
}

#[async_trait]
impl Channel for ServerChan {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn send(&self, note: &Notification) -> Result<(), PushNotificationError> {
        let form = [("text", note.title.as_str()), ("desp", note.body.as_str())];
        let resp = self
            .client
            .post(self.url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| PushNotificationError::new(NAME, e.to_string()))?;

        let reply: Reply = resp
            .json()
            .await
            .map_err(|e| PushNotificationError::new(NAME, format!("unreadable reply: {e}")))?;
        logd!("Server Chan reply: {reply:?}");

        if reply.errno != 0 {
            return Err(PushNotificationError::new(
                NAME,
                format!("server returned errno {}: {}", reply.errno, reply.errmsg),
            ));
        }
        Ok(())
    }
}
