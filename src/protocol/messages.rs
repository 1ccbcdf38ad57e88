use crate::session::Progress;
use crate::template::Template;
use crate::transcribe::AudioFormat;
use serde::{Deserialize, Serialize};

/// Messages a client may send over the session socket.
///
/// Envelope: `{"event": "<name>", "data": {...}}`, kebab-case event names,
/// camelCase payload fields. Payloads are validated here, at the boundary,
/// before reaching core logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Create a session; server replies with session-created + welcome
    Start,

    /// Begin the interview; server replies with the first question
    Begin,

    /// Confirm the answer for a question and advance
    Answer {
        question_index: usize,
        transcript: String,
    },

    /// Stream a piece of recorded audio for the current question
    AudioChunk {
        question_index: usize,
        /// Base64-encoded audio bytes
        audio: String,
        format: AudioFormat,
        is_last_chunk: bool,
    },
}

/// Messages the server emits over the session socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    SessionCreated {
        session_id: String,
    },

    Welcome {
        text: String,
        /// Base64-encoded spoken rendering, absent when TTS is unavailable
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio: Option<String>,
    },

    Question {
        question_index: usize,
        question_id: String,
        text: String,
        voice_prompt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio: Option<String>,
        progress: Progress,
    },

    /// Server-side transcript for a question, or an instruction to fall back
    /// to client-local recognition
    Transcription {
        question_index: usize,
        transcript: Option<String>,
        confidence: f32,
        /// "whisper" for the server pipeline, "web-speech" for the fallback
        provider: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_fallback: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    GeneratingTemplate,

    Completion {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio: Option<String>,
    },

    TemplateGenerated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        template: Option<Template>,
        formatted_template: String,
    },

    Error {
        message: String,
        /// true: retry the same step; false: restart the interview
        recoverable: bool,
    },
}

impl ServerEvent {
    /// The degraded-but-continuing signal telling the client to use its own
    /// local recognizer for this question.
    pub fn fallback_transcription(question_index: usize, error: Option<String>) -> Self {
        ServerEvent::Transcription {
            question_index,
            transcript: None,
            confidence: 0.0,
            provider: "web-speech".to_string(),
            language: None,
            use_fallback: Some(true),
            error,
        }
    }
}
