//! Scoring output types
//!
//! Serialized field names are camelCase to match the report payloads.

use crate::scoring::grade::Grade;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How urgent an issue is; orders from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixDifficulty {
    Easy,
    Medium,
    Hard,
}

/// The scoring category an issue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    /// AI-search readiness
    Geo,
    Technical,
    Content,
    Visibility,
    Onpage,
}

/// A single finding shown to the site owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub category: IssueCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub fix_difficulty: FixDifficulty,
}

impl Issue {
    pub fn new(
        category: IssueCategory,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        impact: impl Into<String>,
        fix_difficulty: FixDifficulty,
    ) -> Self {
        Self {
            category,
            severity,
            title: title.into(),
            description: description.into(),
            impact: impact.into(),
            fix_difficulty,
        }
    }

    /// Quick wins are issues that are easy to fix
    pub fn is_quick_win(&self) -> bool {
        self.fix_difficulty == FixDifficulty::Easy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGrades {
    pub geo: Grade,
    pub technical: Grade,
    pub content: Grade,
    pub visibility: Grade,
    pub onpage: Grade,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    pub total_issues: usize,
    pub pages_analyzed: usize,
    pub quick_wins: usize,
    /// e.g. `"+450%"`
    pub est_traffic_loss: String,
}

/// Category scores, grades, and issues for one audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditScores {
    pub geo: u32,
    pub technical: u32,
    pub content: u32,
    pub visibility: u32,
    pub onpage: u32,
    pub overall: u32,
    pub grade: Grade,
    pub category_grades: CategoryGrades,
    /// Sorted from most to least severe, ties kept in detection order
    pub issues: Vec<Issue>,
    pub stats: AuditStats,
}
