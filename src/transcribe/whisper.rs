use super::{AudioFormat, Transcriber, Transcription, TranscriptionError};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const WHISPER_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// OpenAI Whisper speech-to-text client.
pub struct WhisperClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    language: Option<String>,
}

impl WhisperClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self { client, api_key }
    }
}

#[async_trait::async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
    ) -> Result<Transcription, TranscriptionError> {
        info!("Transcribing {} bytes ({})", audio.len(), format.extension());

        // The API wants a named file part
        let file_part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(format!("segment.{}", format.extension()));

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", "whisper-1")
            .text("language", "en")
            .text("response_format", "verbose_json");

        let response = self
            .client
            .post(WHISPER_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranscriptionError::Timeout
                } else if e.is_connect() {
                    TranscriptionError::ConnectionFailed
                } else {
                    TranscriptionError::Other(e.to_string())
                }
            })?;

        match response.status().as_u16() {
            429 => return Err(TranscriptionError::RateLimited),
            401 => return Err(TranscriptionError::AuthFailed),
            status if status >= 400 => {
                return Err(TranscriptionError::Other(format!(
                    "provider returned status {}",
                    status
                )))
            }
            _ => {}
        }

        let body: WhisperResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Other(e.to_string()))?;

        info!("Transcription complete: {:.50}", body.text);

        Ok(Transcription {
            transcript: body.text,
            // The API reports no overall score; segments are trusted at 0.9
            confidence: 0.9,
            language: body.language,
        })
    }

    fn name(&self) -> &str {
        "whisper"
    }
}
