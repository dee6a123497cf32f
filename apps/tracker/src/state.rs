use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::gateway::{ApplicationsGateway, HttpGateway};
use crate::notify::{ModalPresenter, NotificationPresenter, ToastPresenter};
use crate::session::{FileSession, SessionStore};
use crate::views::{RecruiterView, SeekerView};

/// How notifications are shown for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterStyle {
    Modal,
    Toast,
}

/// Shared handles injected into every command.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: Arc<dyn ApplicationsGateway>,
    pub presenter: Arc<dyn NotificationPresenter>,
    pub session: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn build(config: Config, style: PresenterStyle, auto_confirm: bool) -> Result<Self> {
        let gateway = HttpGateway::new(&config.api_base_url, config.request_timeout)
            .with_context(|| format!("Invalid API base URL '{}'", config.api_base_url))?;
        info!("Using API at {}", gateway.base_url());

        let presenter: Arc<dyn NotificationPresenter> = match style {
            PresenterStyle::Modal => Arc::new(ModalPresenter::new(auto_confirm)),
            PresenterStyle::Toast => {
                Arc::new(ToastPresenter::new(config.toast_lifetime, auto_confirm))
            }
        };

        let session = FileSession::open(&config.session_file).with_context(|| {
            format!("Could not open session file {}", config.session_file.display())
        })?;
        info!("Session file at {}", session.path().display());

        Ok(Self {
            config,
            gateway: Arc::new(gateway),
            presenter,
            session: Arc::new(session),
        })
    }

    pub fn recruiter_view(&self) -> RecruiterView {
        RecruiterView::new(self.gateway.clone(), self.presenter.clone())
    }

    pub fn seeker_view(&self) -> Arc<SeekerView> {
        Arc::new(SeekerView::new(
            self.gateway.clone(),
            self.presenter.clone(),
            self.session.clone(),
        ))
    }
}
