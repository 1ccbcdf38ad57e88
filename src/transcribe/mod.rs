//! Speech-to-text adapter boundary
//!
//! The aggregator talks to transcription through the [`Transcriber`] trait so
//! the external provider can be swapped or disabled entirely. When no
//! transcriber is configured, clients fall back to their own local
//! recognition.

mod whisper;

pub use whisper::WhisperClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Container format of an uploaded audio segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Webm,
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Webm => "webm",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }
}

/// Result of transcribing one audio segment.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub transcript: String,
    /// Trust in [0, 1]
    pub confidence: f32,
    pub language: Option<String>,
}

/// Provider failures, classified for the retry-or-fallback decision.
/// None of these crash a session; they all degrade to the fallback path.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("transcription rate limit exceeded")]
    RateLimited,

    #[error("transcription authentication failed")]
    AuthFailed,

    #[error("transcription service connection failed")]
    ConnectionFailed,

    #[error("transcription timed out")]
    Timeout,

    #[error("transcription failed: {0}")]
    Other(String),
}

/// Converts a buffered audio segment to text.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<Transcription, TranscriptionError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
