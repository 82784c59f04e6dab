// src/notify/toast.rs
// Windows desktop toast, shown through PowerShell and the WinRT toast API.
// Picked at startup only when `supported()`; elsewhere the channel is never built.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::{Channel, Notification};
use crate::config::consts::TOAST_TIMEOUT_SECS;
use crate::error::PushNotificationError;

const NAME: &str = "Desktop toast";

// PowerShell's own AppUserModelID, so no shortcut/registration is needed.
const APP_ID: &str = r"{1AC14E77-02E7-4E5D-B744-2EB1AE5198B7}\WindowsPowerShell\v1.0\powershell.exe";

pub struct DesktopToast {
    timeout: Duration,
}

impl DesktopToast {
    pub fn new() -> Self {
        Self { timeout: Duration::from_secs(TOAST_TIMEOUT_SECS) }
    }

    pub fn supported() -> bool {
        cfg!(target_os = "windows")
    }
}

impl Default for DesktopToast {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-quoted PowerShell literal.
fn ps_quote(s: &str) -> String {
    join!("'", &s.replace('\'', "''"), "'")
}

fn script(title: &str, message: &str) -> String {
    format!(
        "[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] > $null\n\
         $t = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02)\n\
         $x = $t.GetElementsByTagName('text')\n\
         $x.Item(0).AppendChild($t.CreateTextNode({title})) > $null\n\
         $x.Item(1).AppendChild($t.CreateTextNode({message})) > $null\n\
         $n = [Windows.UI.Notifications.ToastNotification]::new($t)\n\
         [Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier({app}).Show($n)\n",
        title = ps_quote(title),
        message = ps_quote(message),
        app = ps_quote(APP_ID),
    )
}

#[async_trait]
impl Channel for DesktopToast {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn send(&self, note: &Notification) -> Result<(), PushNotificationError> {
        let message = format!("{} course(s) have new grades. Go take a look.", note.count);
        let run = Command::new("powershell")
            .args(["-NoProfile", "-NonInteractive", "-Command"])
            .arg(script(&note.title, &message))
            .kill_on_drop(true)
            .output();

        let out = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| PushNotificationError::new(NAME, "timed out"))?
            .map_err(|e| PushNotificationError::new(NAME, format!("cannot start powershell: {e}")))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(PushNotificationError::new(
                NAME,
                format!("powershell exited with {}: {}", out.status, stderr.trim()),
            ));
        }
        Ok(())
    }
}
