use crate::audio::ChunkAggregator;
use crate::session::SessionStore;
use crate::speech::SpeechClient;
use crate::template::{TemplateStrategy, TemplateWriter};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state handed to every connection.
#[derive(Clone)]
pub struct AppState {
    /// Interview sessions, shared across connections
    pub store: SessionStore,

    /// Per-session audio buffering and transcription dispatch
    pub aggregator: ChunkAggregator,

    /// Text-to-speech client; `None` degrades question delivery to text-only
    pub speech: Option<Arc<SpeechClient>>,

    /// Generative template collaborator, required by the generative strategy
    pub writer: Option<Arc<TemplateWriter>>,

    pub strategy: TemplateStrategy,

    /// How long a session survives its connection going away
    pub disconnect_grace: Duration,
}

impl AppState {
    pub fn new(
        store: SessionStore,
        aggregator: ChunkAggregator,
        speech: Option<Arc<SpeechClient>>,
        writer: Option<Arc<TemplateWriter>>,
        strategy: TemplateStrategy,
        disconnect_grace: Duration,
    ) -> Self {
        Self {
            store,
            aggregator,
            speech,
            writer,
            strategy,
            disconnect_grace,
        }
    }
}
