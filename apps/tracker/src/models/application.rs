use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Lifecycle stage of an application. The client only ever sends these five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Applied,
    Interview,
    Selected,
    Rejected,
    Offer,
}

impl Status {
    /// Dropdown order used by the recruiter table.
    pub const ALL: [Status; 5] = [
        Status::Applied,
        Status::Interview,
        Status::Selected,
        Status::Rejected,
        Status::Offer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Applied => "Applied",
            Status::Interview => "Interview",
            Status::Selected => "Selected",
            Status::Rejected => "Rejected",
            Status::Offer => "Offer",
        }
    }

    /// Case-insensitive lookup. Anything outside the enumeration is `None`.
    pub fn parse(raw: &str) -> Option<Status> {
        let raw = raw.trim();
        Status::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::parse(s).ok_or_else(|| {
            format!(
                "unknown status '{s}' (expected one of: Applied, Interview, Selected, Rejected, Offer)"
            )
        })
    }
}

/// Read-only snapshot of a server-owned application record.
///
/// Every text field is optional on the wire: the server may send `null` or
/// omit keys, and a snapshot must still render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email_id: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub experience_range: Option<String>,
    #[serde(default)]
    pub job_role: Option<String>,
    #[serde(default)]
    pub job_link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub application_timestamp: Option<String>,
    #[serde(default)]
    pub resume_filename: Option<String>,
}

impl Application {
    /// Raw status label, verbatim. A missing status reads as `Applied`.
    pub fn status_label(&self) -> &str {
        self.status
            .as_deref()
            .unwrap_or_else(|| Status::Applied.as_str())
    }

    pub fn known_status(&self) -> Option<Status> {
        Status::parse(self.status_label())
    }

    pub fn has_resume(&self) -> bool {
        self.resume_filename
            .as_deref()
            .is_some_and(|f| !f.trim().is_empty())
    }

    pub fn display_name(&self) -> &str {
        or_dash(&self.name)
    }

    /// Submission time in local wall-clock terms.
    ///
    /// The server sends a zone-less local date time; an RFC 3339 value with an
    /// offset is converted to the local zone.
    pub fn submitted_at(&self) -> Option<NaiveDateTime> {
        let raw = self.application_timestamp.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.with_timezone(&Local).naive_local())
            })
    }
}

/// Renders an optional text attribute, `-` when absent or blank.
pub fn or_dash(value: &Option<String>) -> &str {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}
