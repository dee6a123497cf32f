use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::info;

use super::{ask_terminal, Notice, NoticeLevel, NotificationPresenter};

pub const DEFAULT_TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct Toast {
    notice: Notice,
    expires_at: Instant,
}

/// Transient, non-blocking notifications that dismiss themselves after a fixed
/// lifetime. A new toast replaces whatever is still showing.
#[derive(Debug)]
pub struct ToastPresenter {
    lifetime: Duration,
    auto_confirm: bool,
    current: Mutex<Option<Toast>>,
}

impl ToastPresenter {
    pub fn new(lifetime: Duration, auto_confirm: bool) -> Self {
        Self {
            lifetime,
            auto_confirm,
            current: Mutex::new(None),
        }
    }

    /// The toast still on screen, if it has not expired.
    pub fn active(&self) -> Option<Notice> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        match current.as_ref() {
            Some(toast) if Instant::now() < toast.expires_at => Some(toast.notice.clone()),
            Some(_) => {
                *current = None;
                None
            }
            None => None,
        }
    }
}

impl Default for ToastPresenter {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_LIFETIME, false)
    }
}

#[async_trait]
impl NotificationPresenter for ToastPresenter {
    async fn notify(&self, notice: Notice) {
        let line = format!("[{}] {}", notice.level.tag(), notice.message);
        match notice.level {
            NoticeLevel::Error => eprintln!("{line}"),
            _ => println!("{line}"),
        }
        let toast = Toast {
            notice,
            expires_at: Instant::now() + self.lifetime,
        };
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(toast);
    }

    /// Toasts cannot be acknowledged, so confirmation falls back to a terminal prompt.
    async fn confirm(&self, prompt: &str) -> bool {
        if self.auto_confirm {
            info!("Auto-confirmed: {prompt}");
            return true;
        }
        ask_terminal(prompt).await
    }

    fn live_notice(&self) -> Option<Notice> {
        self.active()
    }
}
