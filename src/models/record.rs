//! Student record model

use serde::{Deserialize, Serialize};

use crate::classifier::MISSING_SENTINEL;

/// One row of the uploaded result sheet, immutable once read.
///
/// All fields are kept as strings: the sheet is operator-authored and the
/// pipeline only ever compares or interpolates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub roll_no: String,
    pub semester: String,
    pub spi: String,
    pub result: String,
    pub father_name: String,
    pub mother_name: String,
    pub father_contact: String,
}

impl StudentRecord {
    /// A record missing any of {name, roll no, father name, father contact}
    /// is invalid and is skipped before classification or dispatch.
    pub fn is_valid(&self) -> bool {
        [&self.name, &self.roll_no, &self.father_name, &self.father_contact]
            .iter()
            .all(|field| is_present(field))
    }

    /// First whitespace token of the student's name, for classification.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

/// Whether a sheet cell holds an actual value.
pub fn is_present(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(MISSING_SENTINEL)
}
