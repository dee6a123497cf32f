use async_trait::async_trait;
use tracing::info;

use super::{ask_terminal, Notice, NotificationPresenter};

/// Modal dialog rendered in the terminal. Confirmations block the flow until
/// the user answers, unless `auto_confirm` is set (`--yes`).
#[derive(Debug, Clone, Default)]
pub struct ModalPresenter {
    auto_confirm: bool,
}

impl ModalPresenter {
    pub fn new(auto_confirm: bool) -> Self {
        Self { auto_confirm }
    }
}

/// Frames a notice as a boxed dialog with a single close action.
pub fn frame_dialog(notice: &Notice) -> String {
    let title = format!(" {} ", notice.level.tag());
    let width = notice
        .message
        .chars()
        .count()
        .max(title.chars().count())
        + 2;
    let title_pad = width - title.chars().count();
    let body_pad = width - notice.message.chars().count() - 1;

    format!(
        "+{title}{}+\n| {}{}|\n+{}+\n  [Close]",
        "-".repeat(title_pad),
        notice.message,
        " ".repeat(body_pad),
        "-".repeat(width),
    )
}

#[async_trait]
impl NotificationPresenter for ModalPresenter {
    async fn notify(&self, notice: Notice) {
        println!("{}", frame_dialog(&notice));
    }

    async fn confirm(&self, prompt: &str) -> bool {
        if self.auto_confirm {
            info!("Auto-confirmed: {prompt}");
            return true;
        }
        ask_terminal(&format!("{prompt}\n  [Cancel] / [Confirm]?")).await
    }
}
