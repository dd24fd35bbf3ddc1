//! Report and log data models shared by the pipeline stages and printers.
//!
//! Field names match the JSON artifacts written by the tool.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A failing document and its raw parser message.
pub struct ErrorRecord {
    pub filename: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Validation artifact: failures plus pass/total counters.
pub struct ValidationReport {
    pub error_files: Vec<ErrorRecord>,
    /// Documents that parsed and passed the shape check.
    pub processed_count: usize,
    pub total_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Example record kept in a pattern bucket.
pub struct PatternExample {
    pub filename: String,
    pub full_error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Per-file outcome of a fix run.
pub enum FixStatus {
    Applied,
    #[serde(rename = "Not_Found")]
    NotFound,
    #[serde(rename = "No_Effective_Fix")]
    NoEffectiveFix,
    Error,
}

impl FixStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixStatus::Applied => "Applied",
            FixStatus::NotFound => "Not_Found",
            FixStatus::NoEffectiveFix => "No_Effective_Fix",
            FixStatus::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One fix-log line for a document considered by the dispatcher.
pub struct FixLogEntry {
    pub filename: String,
    pub status: FixStatus,
    pub fixes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
