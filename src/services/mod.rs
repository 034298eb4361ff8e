//! External collaborators
//!
//! The orchestrator only sees these trait seams; the concrete clients talk
//! to the Google Translate TTS endpoint and the Twilio REST API.

pub mod telephony;
pub mod tts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use telephony::{CallError, TwilioClient};
pub use tts::{GoogleTtsClient, TtsError};

/// Reference to a stored audio artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioArtifact {
    pub file_name: String,
    /// URL path the artifact is served under.
    pub url: String,
}

/// Handle to a call accepted by the telephony collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallHandle {
    pub sid: String,
    pub status: String,
}

/// Lifecycle snapshot of a previously placed call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallStatusInfo {
    pub status: String,
    pub duration: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Text-to-speech collaborator.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, locale: &str) -> Result<AudioArtifact, TtsError>;
}

/// Voice-call collaborator.
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    async fn place_call(&self, to: &str, from: &str, spoken_text: &str)
        -> Result<CallHandle, CallError>;

    async fn call_status(&self, sid: &str) -> Result<CallStatusInfo, CallError>;
}

/// In-memory collaborator stubs shared by handler tests.
#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    pub struct StubSynthesizer {
        pub fail: bool,
    }

    #[async_trait]
    impl SpeechSynthesizer for StubSynthesizer {
        async fn synthesize(&self, _text: &str, _locale: &str) -> Result<AudioArtifact, TtsError> {
            if self.fail {
                return Err(TtsError::Endpoint(503));
            }
            Ok(AudioArtifact {
                file_name: "test.mp3".into(),
                url: "/static/test.mp3".into(),
            })
        }
    }

    pub struct StubGateway {
        pub fail: bool,
        /// Destination numbers seen by `place_call`.
        pub dialed: Mutex<Vec<String>>,
    }

    impl StubGateway {
        pub fn new(fail: bool) -> Self {
            Self { fail, dialed: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl VoiceGateway for StubGateway {
        async fn place_call(
            &self,
            to: &str,
            _from: &str,
            _spoken_text: &str,
        ) -> Result<CallHandle, CallError> {
            self.dialed.lock().unwrap().push(to.to_string());
            if self.fail {
                return Err(CallError::Api(401, "authentication failed".into()));
            }
            Ok(CallHandle { sid: "CA123".into(), status: "queued".into() })
        }

        async fn call_status(&self, _sid: &str) -> Result<CallStatusInfo, CallError> {
            Ok(CallStatusInfo {
                status: "completed".into(),
                duration: Some("12".into()),
                start_time: None,
                end_time: None,
            })
        }
    }
}
