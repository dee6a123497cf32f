//! Recruiter dashboard: every application in one table, plus the summary line.
//!
//! The server is the source of truth. A status change is never patched into
//! the local snapshot; a confirmed, successful change triggers a full reload
//! of both the list and the statistics.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::gateway::{ApplicationsGateway, GatewayError, ResumeRef};
use crate::models::application::or_dash;
use crate::models::{Application, StatsSummary, Status};
use crate::notify::{Notice, NoticeLevel, NotificationPresenter};
use crate::views::tree::{status_badge, Action, ViewNode};

pub const LOADING: &str = "Loading applications...";
pub const NO_APPLICATIONS: &str = "No applications yet.";
pub const LOAD_FAILED: &str = "Error loading data. Is the backend server running?";
pub const NO_RESUME: &str = "Resume file not found.";

#[derive(Debug, Clone, PartialEq)]
pub enum TableState {
    Loading,
    Loaded(Vec<Application>),
    Empty,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecruiterState {
    pub table: TableState,
    pub summary: StatsSummary,
    /// Narrows the rendered rows; the fetch itself is always unfiltered.
    pub status_filter: Option<Status>,
}

impl Default for RecruiterState {
    fn default() -> Self {
        Self {
            table: TableState::Loading,
            summary: StatsSummary::default(),
            status_filter: None,
        }
    }
}

/// How a status-change request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Cancelled,
    Updated,
    Rejected,
    Unreachable,
}

pub struct RecruiterView {
    gateway: Arc<dyn ApplicationsGateway>,
    presenter: Arc<dyn NotificationPresenter>,
    state: RwLock<RecruiterState>,
}

impl RecruiterView {
    pub fn new(
        gateway: Arc<dyn ApplicationsGateway>,
        presenter: Arc<dyn NotificationPresenter>,
    ) -> Self {
        Self {
            gateway,
            presenter,
            state: RwLock::new(RecruiterState::default()),
        }
    }

    pub async fn snapshot(&self) -> RecruiterState {
        self.state.read().await.clone()
    }

    pub async fn set_status_filter(&self, filter: Option<Status>) {
        self.state.write().await.status_filter = filter;
    }

    /// Initial load: statistics and list, independently.
    pub async fn load(&self) {
        tokio::join!(self.load_statistics(), self.load_applications());
    }

    pub async fn load_applications(&self) {
        self.state.write().await.table = TableState::Loading;

        let table = match self.gateway.list_applications(None).await {
            Ok(apps) if apps.is_empty() => TableState::Empty,
            Ok(apps) => {
                info!("Loaded {} applications", apps.len());
                TableState::Loaded(apps)
            }
            Err(e) => {
                warn!("Could not load applications: {e}");
                TableState::Failed
            }
        };
        self.state.write().await.table = table;
    }

    pub async fn load_statistics(&self) {
        let (total, counts) = tokio::join!(
            self.gateway.get_total_count(),
            self.gateway.get_status_counts()
        );

        let summary = match (total, counts) {
            (Ok(total), Ok(counts)) => StatsSummary::from_parts(total, &counts),
            (Ok(total), Err(e)) => {
                warn!("Could not load status counts: {e}");
                StatsSummary {
                    total,
                    ..StatsSummary::default()
                }
            }
            (Err(e), _) => {
                warn!("Could not load statistics: {e}");
                StatsSummary::default()
            }
        };
        self.state.write().await.summary = summary;
    }

    /// Confirm, update, then reload list and statistics once each.
    pub async fn change_status(&self, id: i64, name: &str, status: Status) -> StatusChange {
        let prompt = format!("Change status for {name} to {status}?");
        if !self.presenter.confirm(&prompt).await {
            info!("Status change for application {id} cancelled");
            return StatusChange::Cancelled;
        }

        match self.gateway.update_status(id, status).await {
            Ok(()) => {
                info!("Application {id} updated to {status}");
                self.load().await;
                self.presenter
                    .notify(Notice::success(format!(
                        "Status for {name} updated to {status}."
                    )))
                    .await;
                StatusChange::Updated
            }
            Err(GatewayError::Network(e)) => {
                warn!("Status update for {id} could not reach the API: {e}");
                self.presenter
                    .notify(Notice::error(
                        "Could not connect to the API server to update status.",
                    ))
                    .await;
                StatusChange::Unreachable
            }
            Err(e) => {
                warn!("Status update for {id} failed: {e}");
                self.presenter
                    .notify(Notice::error(format!("Failed to update status for {name}.")))
                    .await;
                StatusChange::Rejected
            }
        }
    }

    /// The reject shortcut; same protocol as any other change.
    pub async fn reject(&self, id: i64, name: &str) -> StatusChange {
        self.change_status(id, name, Status::Rejected).await
    }

    /// Fetches one application and renders its detail panel.
    pub async fn details(&self, id: i64) -> Option<ViewNode> {
        match self.gateway.get_application(id).await {
            Ok(Some(app)) => Some(render_details(&app, self.resume_href(&app).as_deref())),
            Ok(None) => {
                self.presenter
                    .notify(Notice::error(format!("Application {id} was not found.")))
                    .await;
                None
            }
            Err(e) => {
                warn!("Could not load application {id}: {e}");
                self.presenter
                    .notify(Notice::error(format!("Could not load application {id}.")))
                    .await;
                None
            }
        }
    }

    /// Resume address for a row, `None` when no resume is on file.
    pub fn resume_href(&self, app: &Application) -> Option<String> {
        if !app.has_resume() {
            return None;
        }
        match self.gateway.resume_download_url(&ResumeRef::Id(app.id)) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                warn!("No resume URL for application {}: {e}", app.id);
                None
            }
        }
    }

    pub async fn render(&self) -> ViewNode {
        let state = self.snapshot().await;
        render_recruiter(&state, &|app| self.resume_href(app))
    }
}

pub const TABLE_HEADERS: [&str; 8] = [
    "ID",
    "Name",
    "Contact",
    "Experience",
    "Role",
    "Status",
    "Submitted",
    "Actions",
];

/// Pure render of the dashboard.
pub fn render_recruiter(
    state: &RecruiterState,
    resume_href: &dyn Fn(&Application) -> Option<String>,
) -> ViewNode {
    let summary = &state.summary;
    let mut children = vec![
        ViewNode::Heading("Applications".to_string()),
        ViewNode::text(format!(
            "Total: {}  Selected: {}  Rejected: {}",
            summary.total, summary.selected, summary.rejected
        )),
    ];
    if let Some(filter) = state.status_filter {
        children.push(ViewNode::text(format!("Showing: {filter}")));
    }

    let body = match &state.table {
        TableState::Loading => ViewNode::message(NoticeLevel::Info, LOADING),
        TableState::Empty => ViewNode::message(NoticeLevel::Info, NO_APPLICATIONS),
        TableState::Failed => ViewNode::message(NoticeLevel::Error, LOAD_FAILED),
        TableState::Loaded(apps) => {
            let rows: Vec<Vec<ViewNode>> = apps
                .iter()
                .filter(|app| match state.status_filter {
                    Some(filter) => app.known_status() == Some(filter),
                    None => true,
                })
                .map(|app| render_row(app, resume_href(app)))
                .collect();
            if rows.is_empty() {
                ViewNode::message(NoticeLevel::Info, NO_APPLICATIONS)
            } else {
                ViewNode::Table {
                    headers: TABLE_HEADERS.iter().map(|h| h.to_string()).collect(),
                    rows,
                }
            }
        }
    };
    children.push(body);

    ViewNode::Column(children)
}

fn contact(app: &Application) -> ViewNode {
    let email = or_dash(&app.email_id);
    let mobile = or_dash(&app.mobile_number);
    let email_node = if email == "-" {
        ViewNode::text("-")
    } else {
        ViewNode::link(format!("mailto:{email}"), email)
    };
    let mobile_node = if mobile == "-" {
        ViewNode::text("-")
    } else {
        ViewNode::link(format!("tel:{mobile}"), mobile)
    };
    ViewNode::Column(vec![email_node, mobile_node])
}

fn submitted(app: &Application) -> String {
    app.submitted_at()
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn resume_control(href: Option<String>) -> ViewNode {
    match href {
        Some(href) => ViewNode::link(href, "View Resume"),
        None => ViewNode::DisabledLink {
            label: "View Resume".to_string(),
            reason: NO_RESUME.to_string(),
        },
    }
}

fn render_row(app: &Application, resume_href: Option<String>) -> Vec<ViewNode> {
    let actions = ViewNode::Group(vec![
        ViewNode::Select {
            options: Status::ALL.iter().map(|s| s.to_string()).collect(),
            selected: app.status_label().to_string(),
            action: Action::ChangeStatus { id: app.id },
        },
        resume_control(resume_href),
        ViewNode::Button {
            label: "Reject".to_string(),
            action: Action::Reject { id: app.id },
        },
        ViewNode::Button {
            label: "Details".to_string(),
            action: Action::Details { id: app.id },
        },
    ]);

    vec![
        ViewNode::text(app.id.to_string()),
        ViewNode::text(app.display_name()),
        contact(app),
        ViewNode::text(or_dash(&app.experience_range)),
        ViewNode::text(or_dash(&app.job_role)),
        status_badge(app),
        ViewNode::text(submitted(app)),
        actions,
    ]
}

fn render_details(app: &Application, resume_href: Option<&str>) -> ViewNode {
    let field = |label: &str, value: &str| ViewNode::text(format!("{label}: {value}"));
    ViewNode::Column(vec![
        ViewNode::Heading(format!("Application {}", app.id)),
        field("Name", app.display_name()),
        contact(app),
        field("Experience", or_dash(&app.experience_range)),
        field("Role", or_dash(&app.job_role)),
        field("Job link", or_dash(&app.job_link)),
        field("Notes", or_dash(&app.notes)),
        ViewNode::Group(vec![ViewNode::text("Status:"), status_badge(app)]),
        field("Submitted", submitted(app).as_str()),
        resume_control(resume_href.map(str::to_string)),
    ])
}
