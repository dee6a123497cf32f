/// Applications Gateway: the single point of entry for all calls to the Applications REST API.
///
/// ARCHITECTURAL RULE: No other module may perform network I/O against the API.
/// Views hold an `Arc<dyn ApplicationsGateway>` and never see `reqwest`.
///
/// No retries and no caching: every call is a fresh round trip, and every
/// failure comes back as a `GatewayError` for the caller to handle.
use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::models::stats::parse_total;
use crate::models::{Application, ApplicationPayload, ResumeFile, Status, StatusCounts};

#[cfg(test)]
mod stub;

pub const API_PREFIX: &str = "/api/applications";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never got a response (server unreachable, timeout, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response without a structured body we act on.
    #[error("API error (status {status}): {body}")]
    Server { status: u16, body: String },

    /// 2xx response whose JSON did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    Url(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

/// Result of a multipart submission that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 2xx. The created record, when the server echoed one back.
    Created(Option<Application>),
    /// 409: an application with this email already exists.
    Conflict,
    /// 400: field name -> message. May carry a `general` key.
    Validation(BTreeMap<String, String>),
    /// Any other non-2xx status.
    Failed { status: u16 },
}

/// How a resume download is addressed on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeRef {
    Id(i64),
    Filename(String),
}

#[async_trait]
pub trait ApplicationsGateway: Send + Sync {
    async fn list_applications(
        &self,
        email_filter: Option<&str>,
    ) -> Result<Vec<Application>, GatewayError>;

    /// `Ok(None)` on 404.
    async fn get_application(&self, id: i64) -> Result<Option<Application>, GatewayError>;

    async fn get_total_count(&self) -> Result<u64, GatewayError>;

    async fn get_status_counts(&self) -> Result<StatusCounts, GatewayError>;

    async fn update_status(&self, id: i64, status: Status) -> Result<(), GatewayError>;

    async fn submit_application(
        &self,
        payload: &ApplicationPayload<'_>,
        resume: &ResumeFile,
    ) -> Result<SubmitOutcome, GatewayError>;

    /// Pure URL construction; no request is made.
    fn resume_download_url(&self, resume: &ResumeRef) -> Result<Url, GatewayError>;
}

#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

/// reqwest-backed gateway against a running Applications API.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| GatewayError::Url(format!("{base_url}: {e}")))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        let raw = format!("{}{}{}", self.base_url, API_PREFIX, path);
        Url::parse(&raw).map_err(|e| GatewayError::Url(format!("{raw}: {e}")))
    }

    /// Sends a request, logging transport failures. Status handling is left to the caller.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<reqwest::Response, GatewayError> {
        match request.send().await {
            Ok(response) => {
                debug!("{what}: {}", response.status());
                Ok(response)
            }
            Err(e) => {
                error!("{what} failed to reach the API: {e}");
                Err(GatewayError::from(e))
            }
        }
    }
}

/// Turns a non-2xx response into `GatewayError::Server`.
async fn ensure_success(
    response: reqwest::Response,
    what: &str,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!("{what} returned {status}: {body}");
    Err(GatewayError::Server {
        status: status.as_u16(),
        body,
    })
}

/// Parses a 400 body into a field -> message mapping.
/// Non-string values are stringified; an unparseable body yields an empty mapping.
fn parse_field_errors(body: &str) -> BTreeMap<String, String> {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body)
    else {
        return BTreeMap::new();
    };
    map.into_iter()
        .map(|(key, value)| {
            let message = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, message)
        })
        .collect()
}

#[async_trait]
impl ApplicationsGateway for HttpGateway {
    async fn list_applications(
        &self,
        email_filter: Option<&str>,
    ) -> Result<Vec<Application>, GatewayError> {
        let mut request = self.client.get(self.endpoint("")?);
        if let Some(email) = email_filter {
            request = request.query(&[("email", email)]);
        }

        let response = self.send(request, "list applications").await?;
        let response = ensure_success(response, "list applications").await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        // A JSON `null` reads as an empty list.
        let apps: Option<Vec<Application>> = serde_json::from_str(&body)?;
        Ok(apps.unwrap_or_default())
    }

    async fn get_application(&self, id: i64) -> Result<Option<Application>, GatewayError> {
        let request = self.client.get(self.endpoint(&format!("/{id}"))?);
        let response = self.send(request, "get application").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response, "get application").await?;
        let body = response.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    async fn get_total_count(&self) -> Result<u64, GatewayError> {
        let request = self.client.get(self.endpoint("/statistics/total")?);
        let response = self.send(request, "total count").await?;
        let response = ensure_success(response, "total count").await?;
        let body = response.text().await?;
        Ok(parse_total(&body))
    }

    async fn get_status_counts(&self) -> Result<StatusCounts, GatewayError> {
        let request = self.client.get(self.endpoint("/statistics/byStatus")?);
        let response = self.send(request, "status counts").await?;
        let response = ensure_success(response, "status counts").await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(StatusCounts::default());
        }
        let counts: Option<StatusCounts> = serde_json::from_str(&body)?;
        Ok(counts.unwrap_or_default())
    }

    async fn update_status(&self, id: i64, status: Status) -> Result<(), GatewayError> {
        let request = self
            .client
            .patch(self.endpoint(&format!("/{id}/status"))?)
            .json(&StatusUpdate {
                status: status.as_str(),
            });

        let response = self.send(request, "update status").await?;
        ensure_success(response, "update status").await?;
        debug!("Application {id} moved to {status}");
        Ok(())
    }

    async fn submit_application(
        &self,
        payload: &ApplicationPayload<'_>,
        resume: &ResumeFile,
    ) -> Result<SubmitOutcome, GatewayError> {
        let application = Part::text(serde_json::to_string(payload)?).mime_str("application/json")?;
        let resume_part = Part::bytes(resume.bytes.to_vec())
            .file_name(resume.file_name.clone())
            .mime_str(&resume.content_type)?;
        let form = Form::new()
            .part("application", application)
            .part("resume", resume_part);

        let request = self.client.post(self.endpoint("")?).multipart(form);
        let response = self.send(request, "submit application").await?;
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The record is informational; a body we cannot read is still a success.
            let created = serde_json::from_str::<Application>(&body).ok();
            return Ok(SubmitOutcome::Created(created));
        }

        let body = response.text().await.unwrap_or_default();
        warn!("submit application returned {status}: {body}");

        Ok(match status {
            StatusCode::CONFLICT => SubmitOutcome::Conflict,
            StatusCode::BAD_REQUEST => SubmitOutcome::Validation(parse_field_errors(&body)),
            other => SubmitOutcome::Failed {
                status: other.as_u16(),
            },
        })
    }

    fn resume_download_url(&self, resume: &ResumeRef) -> Result<Url, GatewayError> {
        let mut url = self.endpoint("")?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GatewayError::Url(format!("{} cannot carry a path", self.base_url)))?;
            match resume {
                ResumeRef::Id(id) => segments.push("resume").push(&id.to_string()),
                ResumeRef::Filename(name) => segments.push("download").push(name),
            };
        }
        Ok(url)
    }
}
