//! Audio diagnostics handler
//!
//! Synthesizes a fixed test message so the TTS collaborator can be verified
//! without uploading a sheet, mirroring the telephony test-call route.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::{AppResult, AppState};

const TEST_MESSAGE: &str = "Hello, this is a test message from your college.";

#[derive(Debug, Serialize)]
pub struct TestAudioResponse {
    pub success: bool,
    pub file_name: String,
    pub url: String,
}

/// Generate a test audio artifact
pub async fn test_audio(State(state): State<AppState>) -> AppResult<Json<TestAudioResponse>> {
    let artifact = state
        .tts
        .synthesize(TEST_MESSAGE, &state.config.tts_locale)
        .await?;

    tracing::info!(file = %artifact.file_name, "test audio generated");

    Ok(Json(TestAudioResponse {
        success: true,
        file_name: artifact.file_name,
        url: artifact.url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::testing::{StubGateway, StubSynthesizer};
    use crate::AppError;
    use std::sync::Arc;

    fn state(tts_fails: bool) -> AppState {
        AppState {
            config: Config::for_tests(),
            tts: Arc::new(StubSynthesizer { fail: tts_fails }),
            telephony: Arc::new(StubGateway::new(false)),
        }
    }

    #[tokio::test]
    async fn returns_the_artifact_reference() {
        let resp = test_audio(State(state(false))).await.unwrap();
        assert!(resp.0.success);
        assert_eq!(resp.0.file_name, "test.mp3");
        assert_eq!(resp.0.url, "/static/test.mp3");
    }

    #[tokio::test]
    async fn synthesis_failure_surfaces_as_external_service_error() {
        let err = test_audio(State(state(true))).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }
}
