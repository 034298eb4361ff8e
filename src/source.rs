//! Record source
//!
//! Reads the uploaded result sheet (CSV) into [`StudentRecord`]s. Field
//! lookup is by header name, so column order in the sheet does not matter.
//! A sheet that cannot be read or parsed is the one fatal error of the
//! pipeline; it aborts the batch before any side effect.

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use crate::models::StudentRecord;

const NAME: &str = "Name";
const ROLL_NO: &str = "Roll No";
const SEMESTER: &str = "Semester";
const SPI: &str = "SPI";
const RESULT: &str = "Result";
const FATHER_NAME: &str = "Father Name";
const MOTHER_NAME: &str = "Mother Name";
const FATHER_CONTACT: &str = "Father Contact";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read sheet headers: {0}")]
    Headers(csv::Error),

    #[error("failed to parse sheet row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// Parse CSV content into records, preserving sheet order.
pub fn read_records(content: &[u8]) -> Result<Vec<StudentRecord>, SourceError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content);

    let headers = reader.headers().map_err(SourceError::Headers)?.clone();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|source| SourceError::Row { row: index + 1, source })?;
        records.push(to_record(&headers, &row));
    }

    Ok(records)
}

fn to_record(headers: &StringRecord, row: &StringRecord) -> StudentRecord {
    let field = |name: &str| -> String {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|idx| row.get(idx))
            .unwrap_or("")
            .trim()
            .to_string()
    };

    StudentRecord {
        name: field(NAME),
        roll_no: field(ROLL_NO),
        semester: field(SEMESTER),
        spi: field(SPI),
        result: field(RESULT),
        father_name: field(FATHER_NAME),
        mother_name: field(MOTHER_NAME),
        father_contact: field(FATHER_CONTACT),
    }
}
