use std::future::Future;

use anyhow::{Context, Result};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::DeepgramResponse;

const DEEPGRAM_URL: &str = "https://api.deepgram.com/v1/listen?punctuate=true&smart_format=true";

/// Failure from the speech-to-text service
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("no audio provided")]
    NoInput,
    #[error("transcription service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
}

/// A service that turns recorded audio into plain transcript text
pub trait Transcriber {
    fn transcribe(
        &self,
        audio: &[u8],
        mime_type: &str,
    ) -> impl Future<Output = Result<String, TranscriptionError>> + Send;
}

#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    /// API key (from DEEPGRAM_API_KEY env var)
    pub api_key: String,
}

impl DeepgramConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPGRAM_API_KEY")
            .context("DEEPGRAM_API_KEY environment variable not set")?;
        Ok(Self { api_key })
    }
}

/// Deepgram pre-recorded transcription client
pub struct DeepgramClient {
    client: Client,
    config: DeepgramConfig,
}

impl DeepgramClient {
    pub fn new(config: DeepgramConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl Transcriber for DeepgramClient {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::NoInput);
        }

        info!("Uploading {} bytes of {} audio for transcription", audio.len(), mime_type);

        let response = self
            .client
            .post(DEEPGRAM_URL)
            .header("Authorization", format!("Token {}", self.config.api_key))
            .header("Content-Type", mime_type)
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| TranscriptionError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("Deepgram API error: {} - {}", status, body);
            return Err(if status.is_server_error() {
                TranscriptionError::ServiceUnavailable(message)
            } else {
                TranscriptionError::TranscriptionFailed(message)
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranscriptionError::ServiceUnavailable(e.to_string()))?;

        transcript_from_response(&body)
    }
}

/// Extract transcript text from a Deepgram JSON body
pub fn transcript_from_response(body: &str) -> Result<String, TranscriptionError> {
    let response: DeepgramResponse = serde_json::from_str(body)
        .map_err(|e| TranscriptionError::TranscriptionFailed(format!("invalid response: {}", e)))?;

    let text = response.transcript();
    if text.trim().is_empty() {
        return Err(TranscriptionError::TranscriptionFailed(
            "no speech recognized".to_string(),
        ));
    }

    debug!("Transcribed {} words", response.words().len());
    Ok(text)
}

/// Guess a MIME type from an audio file extension
pub fn mime_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" | "mp4" => "audio/mp4",
        "ogg" | "oga" => "audio/ogg",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}
