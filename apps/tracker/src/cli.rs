use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::gateway::ResumeRef;
use crate::models::{ApplicationForm, ResumeFile, Status};
use crate::notify::{Notice, NotificationPresenter};
use crate::state::{AppState, PresenterStyle};
use crate::views::recruiter::TableState;
use crate::views::{render_text, RecruiterView, StatusChange, SubmitResult, ViewNode};

#[derive(Parser, Debug)]
#[command(
    name = "tracker",
    about = "Track job applications against the Applications API",
    version
)]
pub struct Cli {
    /// Override the configured API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Show notifications as self-dismissing toasts instead of dialogs
    #[arg(long, global = true)]
    pub toast: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recruiter dashboard: review every application and move it through the pipeline
    Recruiter {
        #[command(subcommand)]
        command: RecruiterCommand,
    },
    /// Job seeker: submit an application and follow its status
    Seeker {
        #[command(subcommand)]
        command: SeekerCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecruiterCommand {
    /// List all applications with the summary line
    List {
        /// Only show rows with this status
        #[arg(long)]
        status: Option<Status>,
    },
    /// Change an application's status
    SetStatus {
        id: i64,
        status: Status,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Reject an application
    Reject {
        id: i64,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show every field of one application
    Show { id: i64 },
    /// Print the resume download address for an application
    ResumeUrl {
        id: i64,
        /// Address the file by its stored filename instead of the application id
        #[arg(long)]
        by_filename: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SeekerCommand {
    /// Submit a new application
    Submit(SubmitArgs),
    /// Show your applications and the overall total
    Status {
        /// Look up this email instead of the remembered one
        #[arg(long)]
        email: Option<String>,
        /// Keep refreshing until Ctrl+C
        #[arg(long)]
        watch: bool,
    },
    /// Print the remembered email
    Whoami,
    /// Clear the remembered email
    Forget,
}

#[derive(Args, Debug, Default)]
pub struct SubmitArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub mobile: String,
    /// e.g. "0-1 years", "3-5 years"
    #[arg(long)]
    pub experience: String,
    #[arg(long)]
    pub role: String,
    #[arg(long)]
    pub job_link: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// Resume file to attach (required by the server)
    #[arg(long)]
    pub resume: Option<PathBuf>,
}

impl Cli {
    fn auto_confirm(&self) -> bool {
        matches!(
            self.command,
            Command::Recruiter {
                command: RecruiterCommand::SetStatus { yes: true, .. }
                    | RecruiterCommand::Reject { yes: true, .. }
            }
        )
    }
}

pub async fn run(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(url) = cli.api_url.clone() {
        config.api_base_url = url;
    }
    let style = if cli.toast {
        PresenterStyle::Toast
    } else {
        PresenterStyle::Modal
    };
    let state = AppState::build(config, style, cli.auto_confirm())?;

    match cli.command {
        Command::Recruiter { command } => run_recruiter(&state, command).await?,
        Command::Seeker { command } => run_seeker(&state, command).await?,
    }
    Ok(())
}

async fn run_recruiter(state: &AppState, command: RecruiterCommand) -> Result<(), AppError> {
    let view = state.recruiter_view();
    match command {
        RecruiterCommand::List { status } => {
            view.set_status_filter(status).await;
            view.load().await;
            println!("{}", render_text(&view.render().await));
        }
        RecruiterCommand::SetStatus { id, status, .. } => {
            change_status(&view, id, status).await?;
        }
        RecruiterCommand::Reject { id, .. } => {
            change_status(&view, id, Status::Rejected).await?;
        }
        RecruiterCommand::Show { id } => {
            let details = view
                .details(id)
                .await
                .ok_or_else(|| AppError::NotFound(format!("application {id}")))?;
            println!("{}", render_text(&details));
        }
        RecruiterCommand::ResumeUrl { id, by_filename } => {
            let app = state
                .gateway
                .get_application(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("application {id}")))?;
            let missing = || AppError::NotFound(format!("resume for application {id}"));
            let href = if by_filename {
                let filename = app.resume_filename.clone().ok_or_else(missing)?;
                state
                    .gateway
                    .resume_download_url(&ResumeRef::Filename(filename))?
                    .to_string()
            } else {
                view.resume_href(&app).ok_or_else(missing)?
            };
            println!("{href}");
        }
    }
    Ok(())
}

/// Looks the name up from the list endpoint, falling back to `#<id>`, then
/// always runs the view's confirm/update/reload protocol.
async fn change_status(view: &RecruiterView, id: i64, status: Status) -> Result<(), AppError> {
    view.load_applications().await;
    let name = match view.snapshot().await.table {
        TableState::Loaded(apps) => apps
            .iter()
            .find(|app| app.id == id)
            .map(|app| app.display_name().to_string()),
        _ => None,
    }
    .unwrap_or_else(|| format!("#{id}"));

    let outcome = if status == Status::Rejected {
        view.reject(id, &name).await
    } else {
        view.change_status(id, &name, status).await
    };

    match outcome {
        StatusChange::Updated => {
            println!("{}", render_text(&view.render().await));
            Ok(())
        }
        StatusChange::Cancelled => Ok(()),
        StatusChange::Rejected | StatusChange::Unreachable => Err(AppError::ActionFailed(
            format!("Status for application {id} was not changed"),
        )),
    }
}

async fn run_seeker(state: &AppState, command: SeekerCommand) -> Result<(), AppError> {
    match command {
        SeekerCommand::Submit(args) => {
            let resume = match &args.resume {
                Some(path) => Some(ResumeFile::from_path(path).await?),
                None => None,
            };
            let form = ApplicationForm {
                name: args.name,
                email_id: args.email,
                mobile_number: args.mobile,
                experience_range: args.experience,
                job_role: args.role,
                job_link: args.job_link,
                notes: args.notes,
                resume,
            };

            let view = state.seeker_view();
            let result = view.submit(form).await;
            println!("{}", render_text(&view.render().await));
            if result != SubmitResult::Submitted {
                return Err(AppError::ActionFailed(
                    "Application was not submitted".to_string(),
                ));
            }
        }
        SeekerCommand::Status { email, watch } => {
            if let Some(email) = email {
                let email = email.trim();
                state.session.set_current_email(email)?;
                state
                    .presenter
                    .notify(Notice::info(format!("Showing applications for {email}.")))
                    .await;
            }
            let view = state.seeker_view();
            view.refresh().await;
            let mut shown = compose_page(state.presenter.as_ref(), view.render().await);
            println!("{shown}");

            if watch {
                let mut revisions = view.subscribe();
                let poll = view.start_polling(state.config.poll_interval);
                // Repaints between refreshes so an expired toast leaves the page.
                let mut repaint = tokio::time::interval(Duration::from_secs(1));
                loop {
                    tokio::select! {
                        changed = revisions.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        _ = repaint.tick() => {}
                        _ = tokio::signal::ctrl_c() => {
                            info!("Stopping status watch");
                            break;
                        }
                    }
                    let page = compose_page(state.presenter.as_ref(), view.render().await);
                    if page != shown {
                        println!("\n{page}");
                        shown = page;
                    }
                }
                poll.stop().await;
            }
        }
        SeekerCommand::Whoami => {
            let email = state.session.current_email();
            if email.is_empty() {
                println!("No email remembered yet.");
            } else {
                println!("{email}");
            }
        }
        SeekerCommand::Forget => {
            state.session.set_current_email("")?;
            state
                .presenter
                .notify(Notice::info("Forgot the remembered email."))
                .await;
        }
    }
    Ok(())
}

/// Renders a page with the presenter's live notice, if any, stacked on top.
fn compose_page(presenter: &dyn NotificationPresenter, page: ViewNode) -> String {
    match presenter.live_notice() {
        Some(notice) => render_text(&ViewNode::Column(vec![
            ViewNode::message(notice.level, notice.message),
            page,
        ])),
        None => render_text(&page),
    }
}
