use super::messages::{ClientEvent, ServerEvent};
use super::state::AppState;
use crate::catalog::{COMPLETION_MESSAGE, WELCOME_MESSAGE};
use crate::session::SessionError;
use crate::template::{self, TemplateStrategy, ANSWER_COUNT};
use crate::transcribe::AudioFormat;
use base64::Engine;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// One client's side of the session protocol.
///
/// Owns the optional session id bound to this connection and translates
/// client events into state-machine operations. All server events flow out
/// through the channel handed in at construction, which keeps this type
/// independent of the actual socket.
pub struct Connection {
    state: AppState,
    session_id: Option<String>,
    events: mpsc::UnboundedSender<ServerEvent>,
}

impl Connection {
    pub fn new(state: AppState, events: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            state,
            session_id: None,
            events,
        }
    }

    /// Dispatch one validated client event.
    pub async fn handle(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Start => self.on_start().await,
            ClientEvent::Begin => self.on_begin().await,
            ClientEvent::Answer {
                question_index,
                transcript,
            } => self.on_answer(question_index, &transcript).await,
            ClientEvent::AudioChunk {
                question_index,
                audio,
                format,
                is_last_chunk,
            } => self.on_audio_chunk(question_index, &audio, format, is_last_chunk).await,
        }
    }

    /// The connection is gone. The audio buffer dies immediately; the session
    /// itself is retained for the grace window to tolerate reconnects.
    pub async fn disconnected(&mut self) {
        let Some(session_id) = self.session_id.take() else {
            return;
        };

        info!("Client disconnected, session {} enters grace period", session_id);
        self.state.aggregator.drop_session(&session_id).await;

        let store = self.state.store.clone();
        let grace = self.state.disconnect_grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            store.delete_session(&session_id).await;
        });
    }

    async fn on_start(&mut self) {
        let session = self.state.store.create_session().await;
        self.session_id = Some(session.session_id.clone());

        self.send(ServerEvent::SessionCreated {
            session_id: session.session_id,
        });

        let audio = self.spoken(WELCOME_MESSAGE).await;
        self.send(ServerEvent::Welcome {
            text: WELCOME_MESSAGE.to_string(),
            audio,
        });
    }

    async fn on_begin(&mut self) {
        let Some(session_id) = self.session_id.clone() else {
            self.no_active_session();
            return;
        };

        if let Err(e) = self.state.store.start_interview(&session_id).await {
            self.session_error(e);
            return;
        }

        self.send_current_question(&session_id).await;
    }

    async fn on_answer(&mut self, question_index: usize, transcript: &str) {
        let Some(session_id) = self.session_id.clone() else {
            self.no_active_session();
            return;
        };

        let result = async {
            self.state
                .store
                .save_response(&session_id, question_index, transcript, None)
                .await?;
            self.state.store.advance(&session_id).await
        }
        .await;

        match result {
            Ok(true) => self.send_current_question(&session_id).await,
            Ok(false) => self.finish_interview(&session_id).await,
            Err(e) => self.session_error(e),
        }
    }

    async fn on_audio_chunk(
        &mut self,
        question_index: usize,
        audio: &str,
        format: AudioFormat,
        is_last_chunk: bool,
    ) {
        let Some(session_id) = self.session_id.clone() else {
            self.no_active_session();
            return;
        };

        let chunk = match base64::engine::general_purpose::STANDARD.decode(audio) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Undecodable audio chunk for session {}: {}", session_id, e);
                self.send(ServerEvent::Error {
                    message: "Failed to process audio".to_string(),
                    recoverable: true,
                });
                return;
            }
        };

        let Some(session) = self.state.store.snapshot(&session_id).await else {
            self.session_error(SessionError::NotFound(session_id));
            return;
        };

        self.state
            .aggregator
            .on_chunk(
                &session_id,
                question_index,
                session.current_question_index,
                chunk,
                format,
                is_last_chunk,
                &self.events,
            )
            .await;
    }

    /// Emit the session's current question, with its spoken rendering when
    /// TTS is available.
    async fn send_current_question(&mut self, session_id: &str) {
        let (question, progress) = match async {
            let question = self.state.store.current_question(session_id).await?;
            let progress = self.state.store.progress(session_id).await?;
            Ok::<_, SessionError>((question, progress))
        }
        .await
        {
            Ok(pair) => pair,
            Err(e) => {
                self.session_error(e);
                return;
            }
        };

        let audio = self.spoken(question.voice_prompt).await;
        self.send(ServerEvent::Question {
            question_index: progress.current - 1,
            question_id: question.id.to_string(),
            text: question.text.to_string(),
            voice_prompt: question.voice_prompt.to_string(),
            audio,
            progress,
        });
    }

    /// All answers are in: announce generation, speak the completion message,
    /// and synthesize the template.
    async fn finish_interview(&mut self, session_id: &str) {
        self.send(ServerEvent::GeneratingTemplate);

        let audio = self.spoken(COMPLETION_MESSAGE).await;
        self.send(ServerEvent::Completion {
            text: COMPLETION_MESSAGE.to_string(),
            audio,
        });

        let responses = match self.state.store.all_responses(session_id).await {
            Ok(responses) => responses,
            Err(e) => {
                self.session_error(e);
                return;
            }
        };

        // Confirmed answers in question order; unanswered slots stay empty
        // and surface as placeholders in the deterministic output.
        let mut answers: [String; ANSWER_COUNT] = Default::default();
        for (index, answer) in responses {
            if index < ANSWER_COUNT {
                answers[index] = answer.confirmed_answer;
            }
        }

        let generated = match self.state.strategy {
            TemplateStrategy::Deterministic => {
                let template = template::synthesize(&answers);
                let formatted = template::render_markdown(&template);
                Ok(ServerEvent::TemplateGenerated {
                    template: Some(template),
                    formatted_template: formatted,
                })
            }
            TemplateStrategy::Generative => match &self.state.writer {
                Some(writer) => writer.generate(&answers).await.map(|formatted| {
                    ServerEvent::TemplateGenerated {
                        template: None,
                        formatted_template: formatted,
                    }
                }),
                None => Err(template::SynthesisError::Api(
                    "no template writer configured".to_string(),
                )),
            },
        };

        match generated {
            Ok(event) => {
                self.send(event);
                if let Err(e) = self.state.store.mark_complete(session_id).await {
                    warn!("Could not mark session {} complete: {}", session_id, e);
                }
            }
            Err(e) => {
                // The session stays in Generating with its answers intact,
                // so the client can retry without re-answering.
                error!("Template synthesis failed for session {}: {}", session_id, e);
                self.send(ServerEvent::Error {
                    message: format!("Failed to generate template: {}", e),
                    recoverable: false,
                });
            }
        }
    }

    async fn spoken(&self, text: &str) -> Option<String> {
        let speech = self.state.speech.as_ref()?;

        match speech.text_to_speech(text).await {
            Ok(audio) => Some(base64::engine::general_purpose::STANDARD.encode(audio)),
            Err(e) => {
                warn!("Speech synthesis failed, sending text only: {}", e);
                None
            }
        }
    }

    fn no_active_session(&self) {
        self.send(ServerEvent::Error {
            message: "No active session".to_string(),
            recoverable: false,
        });
    }

    fn session_error(&self, e: SessionError) {
        warn!("Session operation failed: {}", e);
        self.send(ServerEvent::Error {
            message: e.to_string(),
            recoverable: false,
        });
    }

    fn send(&self, event: ServerEvent) {
        // A failed send means the socket is already gone; nothing to do.
        let _ = self.events.send(event);
    }
}
