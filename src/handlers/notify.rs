//! Batch notification handler

use axum::extract::{Multipart, State};
use axum::Json;

use crate::batch::BatchProcessor;
use crate::models::BatchReport;
use crate::source;
use crate::{AppError, AppResult, AppState};

/// Multipart field name carrying the result sheet.
const SHEET_FIELD: &str = "csv";

/// Accept an uploaded result sheet and run the notification batch.
///
/// An unreadable sheet is the only fatal error; everything past parsing is
/// captured per record inside the returned report.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<BatchReport>> {
    let mut sheet: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some(SHEET_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("failed to read upload: {}", e)))?;
            sheet = Some(bytes.to_vec());
        }
    }

    let sheet = sheet
        .ok_or_else(|| AppError::BadRequest(format!("missing '{}' file field", SHEET_FIELD)))?;

    let records = source::read_records(&sheet)?;
    tracing::info!("Sheet loaded: {} rows", records.len());

    let processor = BatchProcessor::new(
        state.tts.clone(),
        state.telephony.clone(),
        state.config.twilio_from_number.clone(),
        state.config.tts_locale.clone(),
        state.config.inter_call_delay(),
    );

    let report = processor.run(&records).await;
    Ok(Json(report))
}
