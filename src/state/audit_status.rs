/// Audit status definitions for tracking pipeline progress
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the lifecycle status of an audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    /// Submitted and waiting for a worker
    Queued,

    /// A worker owns the record and the pipeline is in progress
    Running,

    /// Pipeline finished and all scores are stored
    Complete,

    /// Pipeline failed; `error_message` explains why
    Error,
}

impl AuditStatus {
    /// Returns true if a pipeline run may be started from this status
    ///
    /// Only queued records and failed records (re-runs) are startable.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Queued | Self::Error)
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    /// Parses a status from its database string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "complete" => Some(Self::Complete),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
