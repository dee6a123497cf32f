//! Test doubles for the gateway and presenter seams.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Url;

use crate::gateway::{ApplicationsGateway, GatewayError, ResumeRef, SubmitOutcome};
use crate::models::{Application, ApplicationForm, ApplicationPayload, ResumeFile, Status, StatusCounts};
use crate::notify::{Notice, NotificationPresenter};

/// Scripted reply for a fake gateway operation.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Server(u16),
    Network,
}

impl<T: Clone> Reply<T> {
    fn resolve(&self) -> Result<T, GatewayError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Server(status) => Err(GatewayError::Server {
                status: *status,
                body: String::new(),
            }),
            Reply::Network => Err(GatewayError::Network("connection refused".into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(Option<String>),
    Get(i64),
    Total,
    Counts,
    Update(i64, Status),
    Submit { email: String, resume: String },
}

/// Records every call and answers from scripted replies.
pub struct FakeGateway {
    pub calls: Mutex<Vec<Call>>,
    pub list: Mutex<Reply<Vec<Application>>>,
    pub get: Mutex<Reply<Option<Application>>>,
    pub total: Mutex<Reply<u64>>,
    pub counts: Mutex<Reply<StatusCounts>>,
    pub update: Mutex<Reply<()>>,
    pub submit: Mutex<Reply<SubmitOutcome>>,
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            list: Mutex::new(Reply::Ok(Vec::new())),
            get: Mutex::new(Reply::Ok(None)),
            total: Mutex::new(Reply::Ok(0)),
            counts: Mutex::new(Reply::Ok(StatusCounts::default())),
            update: Mutex::new(Reply::Ok(())),
            submit: Mutex::new(Reply::Ok(SubmitOutcome::Created(None))),
        }
    }
}

impl FakeGateway {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ApplicationsGateway for FakeGateway {
    async fn list_applications(
        &self,
        email_filter: Option<&str>,
    ) -> Result<Vec<Application>, GatewayError> {
        self.record(Call::List(email_filter.map(str::to_string)));
        self.list.lock().unwrap().resolve()
    }

    async fn get_application(&self, id: i64) -> Result<Option<Application>, GatewayError> {
        self.record(Call::Get(id));
        self.get.lock().unwrap().resolve()
    }

    async fn get_total_count(&self) -> Result<u64, GatewayError> {
        self.record(Call::Total);
        self.total.lock().unwrap().resolve()
    }

    async fn get_status_counts(&self) -> Result<StatusCounts, GatewayError> {
        self.record(Call::Counts);
        self.counts.lock().unwrap().resolve()
    }

    async fn update_status(&self, id: i64, status: Status) -> Result<(), GatewayError> {
        self.record(Call::Update(id, status));
        self.update.lock().unwrap().resolve()
    }

    async fn submit_application(
        &self,
        payload: &ApplicationPayload<'_>,
        resume: &ResumeFile,
    ) -> Result<SubmitOutcome, GatewayError> {
        self.record(Call::Submit {
            email: payload.email_id.to_string(),
            resume: resume.file_name.clone(),
        });
        self.submit.lock().unwrap().resolve()
    }

    fn resume_download_url(&self, resume: &ResumeRef) -> Result<Url, GatewayError> {
        let raw = match resume {
            ResumeRef::Id(id) => format!("http://api.test/api/applications/resume/{id}"),
            ResumeRef::Filename(name) => format!("http://api.test/api/applications/download/{name}"),
        };
        Url::parse(&raw).map_err(|e| GatewayError::Url(e.to_string()))
    }
}

/// Records notices and prompts; answers confirmations with a fixed reply.
pub struct RecordingPresenter {
    pub notices: Mutex<Vec<Notice>>,
    pub prompts: Mutex<Vec<String>>,
    answer: bool,
}

impl RecordingPresenter {
    pub fn answering(answer: bool) -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            answer,
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationPresenter for RecordingPresenter {
    async fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

pub fn application(id: i64, name: &str, status: &str) -> Application {
    Application {
        id,
        name: Some(name.to_string()),
        email_id: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        mobile_number: Some("9876543210".to_string()),
        experience_range: Some("3-5 years".to_string()),
        job_role: Some("Backend Engineer".to_string()),
        job_link: Some("https://jobs.example.com/42".to_string()),
        notes: None,
        status: Some(status.to_string()),
        application_timestamp: Some("2024-05-01T09:30:00".to_string()),
        resume_filename: Some(format!("{id}_resume.pdf")),
    }
}

pub fn filled_form(email: &str, with_resume: bool) -> ApplicationForm {
    ApplicationForm {
        name: "Asha Rao".into(),
        email_id: email.into(),
        mobile_number: "9876543210".into(),
        experience_range: "3-5 years".into(),
        job_role: "Backend Engineer".into(),
        job_link: "https://jobs.example.com/42".into(),
        notes: "Available immediately".into(),
        resume: with_resume.then(|| ResumeFile::new("cv.pdf", b"%PDF-1.4".to_vec())),
    }
}
