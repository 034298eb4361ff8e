//! Campus Notify Server
//!
//! Voice notification service for student results: an uploaded result sheet
//! is turned into per-guardian phone calls with a spoken, personalized
//! message.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       CAMPUS NOTIFY                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────────┐   ┌──────────────────────┐ │
//! │  │  HTTP    │   │  Batch       │   │  Name Classifier     │ │
//! │  │  Layer   │──▶│  Orchestrator│──▶│  (learned per batch) │ │
//! │  │  (Axum)  │   │              │   └──────────────────────┘ │
//! │  └──────────┘   └──────┬───────┘                            │
//! │                        │ best-effort side effects           │
//! │              ┌─────────┴─────────┐                          │
//! │              ▼                   ▼                          │
//! │       ┌────────────┐      ┌────────────┐                   │
//! │       │ Google TTS │      │  Twilio    │                   │
//! │       └────────────┘      └────────────┘                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod batch;
mod classifier;
mod config;
mod error;
mod handlers;
mod message;
mod models;
mod phone;
mod services;
mod source;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use services::{GoogleTtsClient, SpeechSynthesizer, TwilioClient, VoiceGateway};

pub use error::{AppError, AppResult};

/// Upload size cap for result sheets.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "campus_notify=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Campus Notify server starting...");
    tracing::info!("Audio directory: {}", config.audio_dir.display());

    // Ensure the audio artifact directory exists before anything is synthesized
    tokio::fs::create_dir_all(&config.audio_dir)
        .await
        .expect("Failed to create audio directory");

    // Build collaborators
    let tts = GoogleTtsClient::new(config.audio_dir.clone())
        .expect("Failed to create TTS client");
    let telephony = TwilioClient::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
    )
    .expect("Failed to create telephony client");

    // Build application state
    let state = AppState {
        config: config.clone(),
        tts: Arc::new(tts),
        telephony: Arc::new(telephony),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub tts: Arc<dyn SpeechSynthesizer>,
    pub telephony: Arc<dyn VoiceGateway>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))

        // Batch notification (multipart CSV upload)
        .route("/api/v1/notify", post(handlers::notify::upload))

        // Single calls
        .route("/api/v1/calls/test", post(handlers::calls::test_call))
        .route("/api/v1/calls/:sid/status", get(handlers::calls::status))

        // TTS diagnostics
        .route("/api/v1/audio/test", get(handlers::audio::test_audio))

        // Generated audio artifacts
        .nest_service("/static", ServeDir::new(&state.config.audio_dir))

        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
