use std::collections::BTreeMap;
use std::path::Path;

use bytes::Bytes;
use serde::Serialize;

use crate::models::application::Status;

/// Inline error slots on the seeker form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    EmailId,
    MobileNumber,
    ExperienceRange,
    JobRole,
    JobLink,
    Notes,
    Resume,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Name,
        FormField::EmailId,
        FormField::MobileNumber,
        FormField::ExperienceRange,
        FormField::JobRole,
        FormField::JobLink,
        FormField::Notes,
        FormField::Resume,
    ];

    /// Key used by the API's field-error mapping.
    pub fn key(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::EmailId => "emailId",
            FormField::MobileNumber => "mobileNumber",
            FormField::ExperienceRange => "experienceRange",
            FormField::JobRole => "jobRole",
            FormField::JobLink => "jobLink",
            FormField::Notes => "notes",
            FormField::Resume => "resume",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::EmailId => "Email",
            FormField::MobileNumber => "Mobile number",
            FormField::ExperienceRange => "Experience",
            FormField::JobRole => "Job role",
            FormField::JobLink => "Job link",
            FormField::Notes => "Notes",
            FormField::Resume => "Resume",
        }
    }

    pub fn from_key(key: &str) -> Option<FormField> {
        FormField::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// An attached resume, held in memory until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// The seeker's form as currently filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationForm {
    pub name: String,
    pub email_id: String,
    pub mobile_number: String,
    pub experience_range: String,
    pub job_role: String,
    pub job_link: String,
    pub notes: String,
    pub resume: Option<ResumeFile>,
}

impl ApplicationForm {
    /// JSON part of the multipart submission. New applications always start as `Applied`.
    pub fn payload(&self) -> ApplicationPayload<'_> {
        ApplicationPayload {
            name: &self.name,
            email_id: &self.email_id,
            mobile_number: &self.mobile_number,
            experience_range: &self.experience_range,
            job_role: &self.job_role,
            job_link: &self.job_link,
            notes: &self.notes,
            status: Status::Applied.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload<'a> {
    pub name: &'a str,
    pub email_id: &'a str,
    pub mobile_number: &'a str,
    pub experience_range: &'a str,
    pub job_role: &'a str,
    pub job_link: &'a str,
    pub notes: &'a str,
    pub status: &'a str,
}

/// Per-field inline error messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Writes the slots named by a server field-error mapping.
    /// Keys that are not form slots are ignored; unnamed slots keep their value.
    /// Returns how many slots were written.
    pub fn apply_server_errors(&mut self, errors: &BTreeMap<String, String>) -> usize {
        let mut written = 0;
        for (key, message) in errors {
            if let Some(field) = FormField::from_key(key) {
                self.set(field, message.clone());
                written += 1;
            }
        }
        written
    }
}
