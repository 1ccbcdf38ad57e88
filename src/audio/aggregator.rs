use crate::protocol::ServerEvent;
use crate::transcribe::{AudioFormat, Transcriber};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

/// Buffered audio for one session's current question.
struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    format: AudioFormat,
    /// Question the buffered audio belongs to
    question_index: usize,
    /// Last time chunks were flushed to transcription
    last_processed: Instant,
    /// Whether a deadline task is already scheduled for this buffer
    flush_scheduled: bool,
    events: mpsc::UnboundedSender<ServerEvent>,
}

/// Batches streamed audio chunks per session and forwards ready segments to
/// the transcription adapter.
///
/// A segment is flushed when the client marks its last chunk, or when the
/// flush threshold has elapsed since the previous flush - whichever comes
/// first. The buffer is cleared on every flush, successful or not, and
/// transcription runs on a spawned task so the connection's message loop is
/// never blocked.
#[derive(Clone)]
pub struct ChunkAggregator {
    inner: Arc<Inner>,
}

struct Inner {
    transcriber: Option<Arc<dyn Transcriber>>,
    buffers: Mutex<HashMap<String, ChunkBuffer>>,
    flush_threshold: Duration,
    transcription_timeout: Duration,
}

impl ChunkAggregator {
    pub fn new(
        transcriber: Option<Arc<dyn Transcriber>>,
        flush_threshold: Duration,
        transcription_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transcriber,
                buffers: Mutex::new(HashMap::new()),
                flush_threshold,
                transcription_timeout,
            }),
        }
    }

    /// Whether a server-side transcriber is configured at all.
    pub fn enabled(&self) -> bool {
        self.inner.transcriber.is_some()
    }

    /// Feed one audio chunk for a session.
    ///
    /// `current_question_index` is the session's live question pointer; chunks
    /// tagged for any other question are stale and discarded so they cannot
    /// contaminate the next question's transcript.
    pub async fn on_chunk(
        &self,
        session_id: &str,
        question_index: usize,
        current_question_index: usize,
        chunk: Vec<u8>,
        format: AudioFormat,
        is_last_chunk: bool,
        events: &mpsc::UnboundedSender<ServerEvent>,
    ) {
        if question_index != current_question_index {
            warn!(
                "Discarding stale audio chunk for session {} (chunk Q{}, current Q{})",
                session_id, question_index, current_question_index
            );
            return;
        }

        // No transcriber: tell the client to use its local recognizer right
        // away instead of waiting for a timeout.
        if self.inner.transcriber.is_none() {
            let _ = events.send(ServerEvent::fallback_transcription(question_index, None));
            return;
        }

        let ready = {
            let mut buffers = self.inner.buffers.lock().await;
            let buffer = buffers
                .entry(session_id.to_string())
                .or_insert_with(|| ChunkBuffer {
                    chunks: Vec::new(),
                    format,
                    question_index,
                    last_processed: Instant::now(),
                    flush_scheduled: false,
                    events: events.clone(),
                });

            // The session advanced since this buffer was filled; anything
            // still in it belongs to a question the user already left.
            if buffer.question_index != question_index {
                buffer.chunks.clear();
                buffer.question_index = question_index;
            }

            buffer.format = format;
            buffer.events = events.clone();
            buffer.chunks.push(chunk);

            let elapsed = buffer.last_processed.elapsed();
            if is_last_chunk || elapsed >= self.inner.flush_threshold {
                Some(Self::take_segment(buffer))
            } else {
                if !buffer.flush_scheduled {
                    buffer.flush_scheduled = true;
                    let aggregator = self.clone();
                    let session_id = session_id.to_string();
                    let delay = self.inner.flush_threshold - elapsed;
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        aggregator.flush_due(&session_id).await;
                    });
                }
                None
            }
        };

        if let Some((segment, format, question_index, events)) = ready {
            self.submit(session_id, segment, format, question_index, events);
        }
    }

    /// Time-triggered flush: fires once the threshold has elapsed, so buffered
    /// audio reaches transcription even when no further chunks arrive.
    ///
    /// A last-chunk flush may reset the clock while this deadline is pending;
    /// in that case the deadline re-arms for the remaining window instead of
    /// giving up, so chunks buffered after the flush still get picked up.
    fn flush_due<'a>(
        &'a self,
        session_id: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
        let (ready, rearm) = {
            let mut buffers = self.inner.buffers.lock().await;
            match buffers.get_mut(session_id) {
                Some(buffer) => {
                    if buffer.chunks.is_empty() {
                        buffer.flush_scheduled = false;
                        (None, None)
                    } else {
                        let elapsed = buffer.last_processed.elapsed();
                        if elapsed >= self.inner.flush_threshold {
                            buffer.flush_scheduled = false;
                            (Some(Self::take_segment(buffer)), None)
                        } else {
                            buffer.flush_scheduled = true;
                            (None, Some(self.inner.flush_threshold - elapsed))
                        }
                    }
                }
                // Session disconnected before the deadline
                None => (None, None),
            }
        };

        if let Some(delay) = rearm {
            let aggregator = self.clone();
            let session_id = session_id.to_string();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                aggregator.flush_due(&session_id).await;
            });
            return;
        }

        if let Some((segment, format, question_index, events)) = ready {
            self.submit(session_id, segment, format, question_index, events);
        }
        })
    }

    /// Concatenate and clear the buffer, stamping the flush time.
    fn take_segment(
        buffer: &mut ChunkBuffer,
    ) -> (Vec<u8>, AudioFormat, usize, mpsc::UnboundedSender<ServerEvent>) {
        let segment: Vec<u8> = buffer.chunks.drain(..).flatten().collect();
        buffer.last_processed = Instant::now();
        (segment, buffer.format, buffer.question_index, buffer.events.clone())
    }

    /// Hand a segment to the transcriber without blocking the caller.
    fn submit(
        &self,
        session_id: &str,
        segment: Vec<u8>,
        format: AudioFormat,
        question_index: usize,
        events: mpsc::UnboundedSender<ServerEvent>,
    ) {
        let transcriber = match &self.inner.transcriber {
            Some(t) => Arc::clone(t),
            None => return,
        };
        let timeout = self.inner.transcription_timeout;
        let session_id = session_id.to_string();

        info!(
            "Submitting {} byte segment for session {} (Q{})",
            segment.len(),
            session_id,
            question_index + 1
        );

        tokio::spawn(async move {
            let result =
                tokio::time::timeout(timeout, transcriber.transcribe(&segment, format)).await;

            // If the session was purged while the call was in flight, the
            // receiver is gone and the send fails silently - the result is
            // simply discarded.
            let event = match result {
                Ok(Ok(transcription)) => ServerEvent::Transcription {
                    question_index,
                    transcript: Some(transcription.transcript),
                    confidence: transcription.confidence,
                    provider: transcriber.name().to_string(),
                    language: transcription.language,
                    use_fallback: None,
                    error: None,
                },
                Ok(Err(e)) => {
                    warn!("Transcription failed for session {}: {}", session_id, e);
                    ServerEvent::fallback_transcription(
                        question_index,
                        Some("Transcription failed, using browser speech recognition".to_string()),
                    )
                }
                Err(_) => {
                    warn!("Transcription timed out for session {}", session_id);
                    ServerEvent::fallback_transcription(
                        question_index,
                        Some("Transcription timed out, using browser speech recognition".to_string()),
                    )
                }
            };

            let _ = events.send(event);
        });
    }

    /// Drop a session's buffer. Called on disconnect; any in-flight
    /// transcription result is discarded when its event channel closes.
    pub async fn drop_session(&self, session_id: &str) {
        let mut buffers = self.inner.buffers.lock().await;
        buffers.remove(session_id);
    }

    /// Number of chunks currently buffered for a session (test hook).
    pub async fn buffered_chunks(&self, session_id: &str) -> usize {
        let buffers = self.inner.buffers.lock().await;
        buffers.get(session_id).map(|b| b.chunks.len()).unwrap_or(0)
    }
}
