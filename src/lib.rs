pub mod audio;
pub mod catalog;
pub mod config;
pub mod protocol;
pub mod session;
pub mod speech;
pub mod template;
pub mod transcribe;

pub use audio::ChunkAggregator;
pub use catalog::{Question, COMPLETION_MESSAGE, INTERVIEW_QUESTIONS, WELCOME_MESSAGE};
pub use config::Config;
pub use protocol::{create_router, AppState, ClientEvent, Connection, ServerEvent};
pub use session::{Answer, InterviewState, Progress, Session, SessionError, SessionStore};
pub use speech::SpeechClient;
pub use template::{Template, TemplateStrategy, TemplateWriter};
pub use transcribe::{AudioFormat, Transcriber, Transcription, TranscriptionError, WhisperClient};
