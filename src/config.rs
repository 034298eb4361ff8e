//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Twilio account SID
    pub twilio_account_sid: String,

    /// Twilio auth token
    pub twilio_auth_token: String,

    /// Caller number calls are placed from
    pub twilio_from_number: String,

    /// Directory generated audio artifacts are stored in (served as /static)
    pub audio_dir: PathBuf,

    /// Locale passed to the TTS collaborator
    pub tts_locale: String,

    /// Minimum interval between consecutive calls, in milliseconds
    pub inter_call_delay_ms: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),

            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),

            twilio_from_number: env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),

            audio_dir: env::var("AUDIO_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),

            tts_locale: env::var("TTS_LOCALE").unwrap_or_else(|_| "en".to_string()),

            inter_call_delay_ms: env::var("INTER_CALL_DELAY_MS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(2000),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Throttle interval applied between consecutive calls
    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_millis(self.inter_call_delay_ms)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            twilio_account_sid: "AC_test".into(),
            twilio_auth_token: "token".into(),
            twilio_from_number: "+15550001111".into(),
            audio_dir: PathBuf::from("static"),
            tts_locale: "en".into(),
            inter_call_delay_ms: 0,
            environment: "test".into(),
        }
    }
}
