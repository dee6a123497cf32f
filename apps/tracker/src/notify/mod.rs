// Notification presenters: user-visible feedback and confirmation prompts.
// Views never print directly; every outcome goes through a presenter.

pub mod modal;
pub mod toast;

use std::io::{BufRead, Write};

use async_trait::async_trait;
use tracing::warn;

pub use modal::ModalPresenter;
pub use toast::ToastPresenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

impl NoticeLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "SUCCESS",
            NoticeLevel::Error => "ERROR",
            NoticeLevel::Info => "INFO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Surfaces outcomes to the user.
///
/// `confirm` must resolve only after an explicit answer; `false` means the
/// caller aborts the action with no side effect.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    async fn notify(&self, notice: Notice);

    async fn confirm(&self, prompt: &str) -> bool;

    /// A notice that is still on screen after `notify` returned.
    fn live_notice(&self) -> Option<Notice> {
        None
    }
}

/// Accepts `y` / `yes` in any case. Everything else is a refusal.
pub fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Asks a yes/no question on the terminal without blocking the runtime.
pub async fn ask_terminal(prompt: &str) -> bool {
    let prompt = prompt.to_string();
    let answer = tokio::task::spawn_blocking(move || -> std::io::Result<String> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{prompt} [y/N] ")?;
        stdout.flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    })
    .await;

    match answer {
        Ok(Ok(line)) => parse_answer(&line),
        Ok(Err(e)) => {
            warn!("Could not read confirmation from terminal: {e}");
            false
        }
        Err(e) => {
            warn!("Confirmation prompt task failed: {e}");
            false
        }
    }
}
