//! Batch outcome model

use serde::{Deserialize, Serialize};

/// Dispatch status of the voice call for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum DispatchStatus {
    /// Call accepted by the telephony collaborator.
    Initiated,
    /// Call rejected; the reason string comes from the collaborator.
    Failed(String),
}

impl DispatchStatus {
    pub fn is_initiated(&self) -> bool {
        matches!(self, DispatchStatus::Initiated)
    }
}

/// Per-record result entry, appended in input order and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallOutcome {
    pub name: String,
    pub roll_no: String,
    pub father_name: String,
    pub phone: String,
    pub relation: String,
    pub message: String,
    pub result: String,
    pub spi: String,
    pub status: DispatchStatus,
    pub call_sid: Option<String>,
    /// URL of the generated audio artifact, when synthesis succeeded.
    pub audio_url: Option<String>,
}

/// Final report for one batch: ordered outcomes plus summary counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<CallOutcome>,
    pub processed: usize,
    /// Rows dropped by validation. Surfaced so silently-skipped data is
    /// visible to the caller instead of only to the logs.
    pub skipped: usize,
    pub calls_initiated: usize,
    pub calls_failed: usize,
    pub audio_generated: usize,
    /// Classifications that fell through to the default class.
    pub default_classifications: usize,
    pub learned_father_names: usize,
    pub learned_mother_names: usize,
}
