//! Seeker view: the application form plus the own-status list.
//!
//! The status list is scoped by the session's CurrentUserEmail and refreshed on
//! load, after a successful submission, and by a recurring poll. Refreshes are
//! never cancelled or sequenced; whichever response lands last wins.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::gateway::{ApplicationsGateway, GatewayError, SubmitOutcome};
use crate::models::application::or_dash;
use crate::models::{Application, ApplicationForm, FieldErrors, FormField};
use crate::notify::{Notice, NoticeLevel, NotificationPresenter};
use crate::session::SessionStore;
use crate::views::poll::PollHandle;
use crate::views::tree::{status_badge, ViewNode};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub const NO_EMAIL: &str = "Please submit an application to view its status.";
pub const NO_MATCHES: &str = "No applications found for this email address.";
pub const LIST_FAILED: &str = "Could not load application status.";
pub const LIST_UNREACHABLE: &str = "Could not connect to the API server to load status.";

pub const RESUME_REQUIRED: &str = "Resume file is required.";
pub const MSG_RESUME_MISSING: &str = "Submission failed: Please select a resume file.";
pub const MSG_SUBMITTED: &str =
    "Application submitted successfully! Your Job ID is now visible in the status list below.";
pub const MSG_CONFLICT: &str =
    "Failed to submit application. Email ID already exists. Check your status below.";
pub const MSG_INVALID: &str = "Submission failed. Please check the highlighted fields.";
pub const MSG_FAILED: &str = "Failed to submit application. Server returned an unexpected error.";
pub const MSG_UNREACHABLE: &str =
    "Could not connect to the API server. Please check if the backend is running.";

#[derive(Debug, Clone, PartialEq)]
pub enum StatusListState {
    NoEmail,
    Loading,
    Loaded(Vec<Application>),
    Empty,
    LoadFailed,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeekerState {
    pub total: u64,
    pub form: ApplicationForm,
    pub field_errors: FieldErrors,
    pub status_list: StatusListState,
}

impl Default for SeekerState {
    fn default() -> Self {
        Self {
            total: 0,
            form: ApplicationForm::default(),
            field_errors: FieldErrors::default(),
            status_list: StatusListState::NoEmail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    /// Stopped client-side; nothing was sent.
    Blocked,
    Submitted,
    Conflict,
    Invalid,
    Failed,
    Unreachable,
}

pub struct SeekerView {
    gateway: Arc<dyn ApplicationsGateway>,
    presenter: Arc<dyn NotificationPresenter>,
    session: Arc<dyn SessionStore>,
    state: RwLock<SeekerState>,
    revision: watch::Sender<u64>,
}

impl SeekerView {
    pub fn new(
        gateway: Arc<dyn ApplicationsGateway>,
        presenter: Arc<dyn NotificationPresenter>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        let mut initial = SeekerState::default();
        if !session.current_email().trim().is_empty() {
            initial.status_list = StatusListState::Loading;
        }
        Self {
            gateway,
            presenter,
            session,
            state: RwLock::new(initial),
            revision,
        }
    }

    pub async fn snapshot(&self) -> SeekerState {
        self.state.read().await.clone()
    }

    /// Bumped every time a refresh replaces part of the snapshot.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }

    pub async fn load_total(&self) {
        let total = match self.gateway.get_total_count().await {
            Ok(total) => total,
            Err(e) => {
                warn!("Could not load total applications: {e}");
                0
            }
        };
        self.state.write().await.total = total;
        self.bump();
    }

    pub async fn load_status_list(&self) {
        let email = self.session.current_email();
        if email.trim().is_empty() {
            self.state.write().await.status_list = StatusListState::NoEmail;
            self.bump();
            return;
        }

        debug!("Loading status list for {email}");
        let list = match self.gateway.list_applications(Some(&email)).await {
            Ok(apps) if apps.is_empty() => StatusListState::Empty,
            Ok(apps) => StatusListState::Loaded(apps),
            Err(GatewayError::Network(e)) => {
                warn!("Status list could not reach the API: {e}");
                StatusListState::Unreachable
            }
            Err(e) => {
                warn!("Could not load status list: {e}");
                StatusListState::LoadFailed
            }
        };
        self.state.write().await.status_list = list;
        self.bump();
    }

    /// Both fetches, independently; neither waits on nor cancels the other.
    pub async fn refresh(&self) {
        tokio::join!(self.load_total(), self.load_status_list());
    }

    /// Starts the recurring refresh. Dropping or stopping the handle ends it.
    pub fn start_polling(self: &Arc<Self>, period: Duration) -> PollHandle {
        info!("Polling status list every {}s", period.as_secs_f32());
        let view = Arc::clone(self);
        PollHandle::spawn(period, move || {
            let view = view.clone();
            async move { view.refresh().await }
        })
    }

    pub async fn submit(&self, form: ApplicationForm) -> SubmitResult {
        let resume = match form.resume.clone() {
            Some(resume) if !resume.is_empty() => resume,
            _ => {
                {
                    let mut state = self.state.write().await;
                    state.form = form;
                    state.field_errors.set(FormField::Resume, RESUME_REQUIRED);
                }
                self.presenter.notify(Notice::error(MSG_RESUME_MISSING)).await;
                return SubmitResult::Blocked;
            }
        };

        if let Err(e) = self.session.set_current_email(&form.email_id) {
            warn!("Could not persist session email: {e}");
        }
        self.state.write().await.form = form.clone();

        info!("Submitting application for {}", form.email_id);
        let outcome = self
            .gateway
            .submit_application(&form.payload(), &resume)
            .await;

        match outcome {
            Ok(SubmitOutcome::Created(created)) => {
                if let Some(app) = created {
                    info!("Application {} created", app.id);
                }
                {
                    let mut state = self.state.write().await;
                    state.form = ApplicationForm::default();
                    state.field_errors.clear();
                }
                self.presenter.notify(Notice::success(MSG_SUBMITTED)).await;
                self.refresh().await;
                SubmitResult::Submitted
            }
            Ok(SubmitOutcome::Conflict) => {
                self.presenter.notify(Notice::error(MSG_CONFLICT)).await;
                SubmitResult::Conflict
            }
            Ok(SubmitOutcome::Validation(errors)) => {
                let written = self
                    .state
                    .write()
                    .await
                    .field_errors
                    .apply_server_errors(&errors);
                debug!("Server flagged {written} field(s)");
                let message = errors
                    .get("general")
                    .filter(|m| !m.trim().is_empty())
                    .cloned()
                    .unwrap_or_else(|| MSG_INVALID.to_string());
                self.presenter.notify(Notice::error(message)).await;
                SubmitResult::Invalid
            }
            Ok(SubmitOutcome::Failed { status }) => {
                warn!("Submission failed with status {status}");
                self.presenter.notify(Notice::error(MSG_FAILED)).await;
                SubmitResult::Failed
            }
            Err(GatewayError::Network(e)) => {
                warn!("Submission could not reach the API: {e}");
                self.presenter.notify(Notice::error(MSG_UNREACHABLE)).await;
                SubmitResult::Unreachable
            }
            Err(e) => {
                warn!("Submission failed: {e}");
                self.presenter.notify(Notice::error(MSG_FAILED)).await;
                SubmitResult::Failed
            }
        }
    }

    pub async fn render(&self) -> ViewNode {
        render_seeker(&self.snapshot().await)
    }
}

pub const STATUS_HEADERS: [&str; 5] = ["Job ID", "Job Role", "Link", "Status", "Applied On"];

/// Pure render of the seeker page.
pub fn render_seeker(state: &SeekerState) -> ViewNode {
    let mut children = vec![
        ViewNode::Heading("Job Application Tracker".to_string()),
        ViewNode::text(format!("Total applications: {}", state.total)),
    ];

    if state.form != ApplicationForm::default() {
        children.push(ViewNode::Heading("Your form".to_string()));
        children.extend(form_lines(&state.form));
    }

    children.extend(
        state
            .field_errors
            .iter()
            .map(|(field, message)| ViewNode::FieldError {
                field,
                message: message.to_string(),
            }),
    );

    children.push(ViewNode::Heading("Your applications".to_string()));
    children.push(match &state.status_list {
        StatusListState::NoEmail => ViewNode::message(NoticeLevel::Info, NO_EMAIL),
        StatusListState::Loading => ViewNode::message(NoticeLevel::Info, "Loading..."),
        StatusListState::Empty => ViewNode::message(NoticeLevel::Info, NO_MATCHES),
        StatusListState::LoadFailed => ViewNode::message(NoticeLevel::Error, LIST_FAILED),
        StatusListState::Unreachable => ViewNode::message(NoticeLevel::Error, LIST_UNREACHABLE),
        StatusListState::Loaded(apps) => ViewNode::Table {
            headers: STATUS_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: apps.iter().map(status_row).collect(),
        },
    });

    ViewNode::Column(children)
}

/// The retained form values, one line per filled-in field.
fn form_lines(form: &ApplicationForm) -> Vec<ViewNode> {
    let fields = [
        (FormField::Name, &form.name),
        (FormField::EmailId, &form.email_id),
        (FormField::MobileNumber, &form.mobile_number),
        (FormField::ExperienceRange, &form.experience_range),
        (FormField::JobRole, &form.job_role),
        (FormField::JobLink, &form.job_link),
        (FormField::Notes, &form.notes),
    ];
    let mut lines: Vec<ViewNode> = fields
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(field, value)| ViewNode::text(format!("{}: {value}", field.label())))
        .collect();
    if let Some(resume) = &form.resume {
        lines.push(ViewNode::text(format!(
            "{}: {}",
            FormField::Resume.label(),
            resume.file_name
        )));
    }
    lines
}

fn status_row(app: &Application) -> Vec<ViewNode> {
    let link = match or_dash(&app.job_link) {
        "-" => ViewNode::text("-"),
        href => ViewNode::link(href, "View Link"),
    };
    let applied_on = app
        .submitted_at()
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());

    vec![
        ViewNode::text(app.id.to_string()),
        ViewNode::text(or_dash(&app.job_role)),
        link,
        status_badge(app),
        ViewNode::text(applied_on),
    ]
}
