use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::application::Status;

/// Per-status counts from the by-status statistics endpoint.
/// A status the server did not report counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCounts(HashMap<String, u64>);

impl StatusCounts {
    pub fn get(&self, status: Status) -> u64 {
        self.0.get(status.as_str()).copied().unwrap_or(0)
    }

    /// Offer counts toward the selected-success metric.
    pub fn selected(&self) -> u64 {
        self.get(Status::Selected)
            .saturating_add(self.get(Status::Offer))
    }

    pub fn rejected(&self) -> u64 {
        self.get(Status::Rejected)
    }
}

impl FromIterator<(String, u64)> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        StatusCounts(iter.into_iter().collect())
    }
}

/// Dashboard summary line.
///
/// `total` comes from its own endpoint and is never reconciled with the
/// per-status mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total: u64,
    pub selected: u64,
    pub rejected: u64,
}

impl StatsSummary {
    pub fn from_parts(total: u64, counts: &StatusCounts) -> Self {
        Self {
            total,
            selected: counts.selected(),
            rejected: counts.rejected(),
        }
    }
}

/// Parses the plain-text total. Empty or non-numeric bodies read as zero.
pub fn parse_total(body: &str) -> u64 {
    body.trim().parse().unwrap_or(0)
}
