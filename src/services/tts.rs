//! Google Translate TTS client
//!
//! Fetches spoken MP3 audio for a notification message and stores it in the
//! static audio directory so the front end can preview it.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::{AudioArtifact, SpeechSynthesizer};

const TTS_BASE_URL: &str = "https://translate.google.co.in/translate_tts";
const USER_AGENT: &str = concat!("campus-notify/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("network error: {0}")]
    Network(String),

    #[error("TTS endpoint returned status {0}")]
    Endpoint(u16),

    #[error("failed to store audio artifact: {0}")]
    Storage(String),
}

pub struct GoogleTtsClient {
    http_client: reqwest::Client,
    audio_dir: PathBuf,
}

impl GoogleTtsClient {
    pub fn new(audio_dir: PathBuf) -> Result<Self, TtsError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TtsError::Network(e.to_string()))?;

        Ok(Self { http_client, audio_dir })
    }

    /// Store fetched audio bytes under the audio directory and hand back the
    /// artifact reference the front end can play.
    async fn store_artifact(&self, bytes: &[u8]) -> Result<AudioArtifact, TtsError> {
        let file_name = format!("{}.mp3", Uuid::new_v4());
        let path = self.audio_dir.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| TtsError::Storage(e.to_string()))?;

        tracing::debug!(file = %file_name, bytes = bytes.len(), "audio artifact stored");

        Ok(AudioArtifact {
            url: format!("/static/{}", file_name),
            file_name,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsClient {
    async fn synthesize(&self, text: &str, locale: &str) -> Result<AudioArtifact, TtsError> {
        let response = self
            .http_client
            .get(TTS_BASE_URL)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", locale),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TtsError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TtsError::Endpoint(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TtsError::Network(e.to_string()))?;

        self.store_artifact(&bytes).await
    }
}
