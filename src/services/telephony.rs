//! Twilio voice-call client
//!
//! Places calls through the Twilio REST API with an inline TwiML `<Say>`
//! verb so the notification is spoken without hosting a callback URL.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::{CallHandle, CallStatusInfo, VoiceGateway};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum CallError {
    #[error("network error: {0}")]
    Network(String),

    #[error("Twilio API error {0}: {1}")]
    Api(u16, String),

    #[error("unexpected response from Twilio: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct TwilioCallResponse {
    sid: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct TwilioCallStatusResponse {
    status: String,
    duration: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
}

pub struct TwilioClient {
    http_client: reqwest::Client,
    account_sid: String,
    auth_token: String,
}

impl TwilioClient {
    pub fn new(account_sid: String, auth_token: String) -> Result<Self, CallError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CallError::Network(e.to_string()))?;

        Ok(Self { http_client, account_sid, auth_token })
    }

    fn calls_url(&self) -> String {
        format!("{}/Accounts/{}/Calls.json", TWILIO_API_BASE, self.account_sid)
    }

    fn call_url(&self, sid: &str) -> String {
        format!("{}/Accounts/{}/Calls/{}.json", TWILIO_API_BASE, self.account_sid, sid)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, CallError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CallError::Api(status.as_u16(), body))
    }
}

#[async_trait]
impl VoiceGateway for TwilioClient {
    async fn place_call(
        &self,
        to: &str,
        from: &str,
        spoken_text: &str,
    ) -> Result<CallHandle, CallError> {
        let twiml = format!(
            r#"<Response><Say voice="alice" rate="slow">{}</Say></Response>"#,
            escape_xml(spoken_text)
        );

        let response = self
            .http_client
            .post(self.calls_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", from), ("Twiml", twiml.as_str())])
            .send()
            .await
            .map_err(|e| CallError::Network(e.to_string()))?;

        let body: TwilioCallResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| CallError::Parse(e.to_string()))?;

        Ok(CallHandle { sid: body.sid, status: body.status })
    }

    async fn call_status(&self, sid: &str) -> Result<CallStatusInfo, CallError> {
        let response = self
            .http_client
            .get(self.call_url(sid))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await
            .map_err(|e| CallError::Network(e.to_string()))?;

        let body: TwilioCallStatusResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| CallError::Parse(e.to_string()))?;

        Ok(CallStatusInfo {
            status: body.status,
            duration: body.duration,
            start_time: body.start_time,
            end_time: body.end_time,
        })
    }
}

/// Escape text for embedding inside a TwiML element.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
