//! Single-call handlers
//!
//! A test-call endpoint for verifying telephony credentials without a full
//! sheet upload, and a status proxy for previously placed calls.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::phone;
use crate::services::CallStatusInfo;
use crate::{AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct TestCallRequest {
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TestCallResponse {
    pub success: bool,
    pub call_sid: String,
    pub status: String,
}

/// Place a single test call
pub async fn test_call(
    State(state): State<AppState>,
    Json(req): Json<TestCallRequest>,
) -> AppResult<Json<TestCallResponse>> {
    let to = phone::normalize(&req.phone);
    tracing::info!(phone = %to, "placing test call");

    let handle = state
        .telephony
        .place_call(&to, &state.config.twilio_from_number, &req.message)
        .await?;

    Ok(Json(TestCallResponse {
        success: true,
        call_sid: handle.sid,
        status: handle.status,
    }))
}

/// Look up the status of a placed call
pub async fn status(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> AppResult<Json<CallStatusInfo>> {
    let info = state.telephony.call_status(&sid).await?;
    Ok(Json(info))
}
