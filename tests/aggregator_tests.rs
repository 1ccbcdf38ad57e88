// Integration tests for the audio chunk aggregator.
//
// A mock transcriber stands in for the external provider so the flush and
// fallback paths can be exercised without network access.

use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use voice_builder::{
    AudioFormat, ChunkAggregator, ServerEvent, Transcriber, Transcription, TranscriptionError,
};

struct MockTranscriber {
    calls: Mutex<Vec<Vec<u8>>>,
    fail: bool,
}

impl MockTranscriber {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail,
        })
    }

    fn calls(&self) -> Vec<Vec<u8>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        audio: &[u8],
        _format: AudioFormat,
    ) -> Result<Transcription, TranscriptionError> {
        self.calls.lock().unwrap().push(audio.to_vec());
        if self.fail {
            Err(TranscriptionError::Other("mock failure".to_string()))
        } else {
            Ok(Transcription {
                transcript: "mock transcript".to_string(),
                confidence: 0.9,
                language: Some("en".to_string()),
            })
        }
    }

    fn name(&self) -> &str {
        "whisper"
    }
}

fn aggregator(
    transcriber: Option<Arc<dyn Transcriber>>,
    flush_threshold: Duration,
) -> ChunkAggregator {
    ChunkAggregator::new(transcriber, flush_threshold, Duration::from_secs(5))
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Result<ServerEvent> {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .map_err(|_| anyhow!("timed out waiting for event"))?
        .ok_or_else(|| anyhow!("event channel closed"))
}

#[tokio::test]
async fn test_last_chunk_flushes_immediately() -> Result<()> {
    let mock = MockTranscriber::new(false);
    let agg = aggregator(Some(mock.clone()), Duration::from_secs(10));
    let (tx, mut rx) = mpsc::unbounded_channel();

    agg.on_chunk("s1", 0, 0, b"audio-bytes".to_vec(), AudioFormat::Webm, true, &tx)
        .await;

    match next_event(&mut rx).await? {
        ServerEvent::Transcription {
            question_index,
            transcript,
            confidence,
            provider,
            use_fallback,
            ..
        } => {
            assert_eq!(question_index, 0);
            assert_eq!(transcript.as_deref(), Some("mock transcript"));
            assert_eq!(confidence, 0.9);
            assert_eq!(provider, "whisper");
            assert_eq!(use_fallback, None);
        }
        other => return Err(anyhow!("unexpected event: {:?}", other)),
    }

    assert_eq!(mock.calls(), vec![b"audio-bytes".to_vec()]);
    assert_eq!(agg.buffered_chunks("s1").await, 0, "buffer is cleared on flush");

    Ok(())
}

#[tokio::test]
async fn test_chunks_concatenate_in_arrival_order() -> Result<()> {
    let mock = MockTranscriber::new(false);
    let agg = aggregator(Some(mock.clone()), Duration::from_secs(10));
    let (tx, mut rx) = mpsc::unbounded_channel();

    agg.on_chunk("s1", 0, 0, b"first-".to_vec(), AudioFormat::Webm, false, &tx)
        .await;
    agg.on_chunk("s1", 0, 0, b"second-".to_vec(), AudioFormat::Webm, false, &tx)
        .await;
    assert_eq!(agg.buffered_chunks("s1").await, 2);

    agg.on_chunk("s1", 0, 0, b"last".to_vec(), AudioFormat::Webm, true, &tx)
        .await;

    next_event(&mut rx).await?;
    assert_eq!(mock.calls(), vec![b"first-second-last".to_vec()]);

    Ok(())
}

#[tokio::test]
async fn test_stale_question_chunks_are_discarded() -> Result<()> {
    let mock = MockTranscriber::new(false);
    let agg = aggregator(Some(mock.clone()), Duration::from_secs(10));
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Chunk tagged for question 0, session already on question 1
    agg.on_chunk("s1", 0, 1, b"late".to_vec(), AudioFormat::Webm, true, &tx)
        .await;

    assert_eq!(agg.buffered_chunks("s1").await, 0);
    assert!(rx.try_recv().is_err(), "stale chunks must produce no event");
    assert!(mock.calls().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_time_triggered_flush_without_last_chunk() -> Result<()> {
    let mock = MockTranscriber::new(false);
    let agg = aggregator(Some(mock.clone()), Duration::from_millis(100));
    let (tx, mut rx) = mpsc::unbounded_channel();

    agg.on_chunk("s1", 0, 0, b"partial".to_vec(), AudioFormat::Webm, false, &tx)
        .await;
    assert!(rx.try_recv().is_err(), "nothing should flush before the deadline");

    // The scheduled deadline fires even though no further chunks arrive
    match next_event(&mut rx).await? {
        ServerEvent::Transcription { transcript, .. } => {
            assert_eq!(transcript.as_deref(), Some("mock transcript"));
        }
        other => return Err(anyhow!("unexpected event: {:?}", other)),
    }

    assert_eq!(mock.calls(), vec![b"partial".to_vec()]);
    assert_eq!(agg.buffered_chunks("s1").await, 0);

    Ok(())
}

#[tokio::test]
async fn test_chunk_buffered_after_flush_still_hits_the_deadline() -> Result<()> {
    let mock = MockTranscriber::new(false);
    let agg = aggregator(Some(mock.clone()), Duration::from_millis(200));
    let (tx, mut rx) = mpsc::unbounded_channel();

    // First chunk arms the deadline
    agg.on_chunk("s1", 0, 0, b"first-".to_vec(), AudioFormat::Webm, false, &tx)
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // A last-chunk flush resets the clock while the deadline is still pending
    agg.on_chunk("s1", 0, 0, b"second".to_vec(), AudioFormat::Webm, true, &tx)
        .await;
    next_event(&mut rx).await?;

    // A chunk buffered after that flush, with no further chunks ever arriving
    tokio::time::sleep(Duration::from_millis(50)).await;
    agg.on_chunk("s1", 0, 0, b"tail".to_vec(), AudioFormat::Webm, false, &tx)
        .await;

    match next_event(&mut rx).await? {
        ServerEvent::Transcription { transcript, .. } => {
            assert_eq!(transcript.as_deref(), Some("mock transcript"));
        }
        other => return Err(anyhow!("unexpected event: {:?}", other)),
    }

    assert_eq!(agg.buffered_chunks("s1").await, 0, "nothing may stay stranded in the buffer");
    assert_eq!(
        mock.calls(),
        vec![b"first-second".to_vec(), b"tail".to_vec()]
    );

    Ok(())
}

#[tokio::test]
async fn test_transcriber_failure_falls_back_and_clears_buffer() -> Result<()> {
    let mock = MockTranscriber::new(true);
    let agg = aggregator(Some(mock), Duration::from_secs(10));
    let (tx, mut rx) = mpsc::unbounded_channel();

    agg.on_chunk("s1", 2, 2, b"bad-audio".to_vec(), AudioFormat::Mp3, true, &tx)
        .await;

    match next_event(&mut rx).await? {
        ServerEvent::Transcription {
            question_index,
            transcript,
            confidence,
            provider,
            use_fallback,
            error,
            ..
        } => {
            assert_eq!(question_index, 2);
            assert_eq!(transcript, None);
            assert_eq!(confidence, 0.0);
            assert_eq!(provider, "web-speech");
            assert_eq!(use_fallback, Some(true));
            assert!(error.is_some());
        }
        other => return Err(anyhow!("unexpected event: {:?}", other)),
    }

    assert_eq!(agg.buffered_chunks("s1").await, 0, "buffer is cleared even on failure");

    Ok(())
}

#[tokio::test]
async fn test_no_transcriber_falls_back_immediately() -> Result<()> {
    let agg = aggregator(None, Duration::from_secs(10));
    let (tx, mut rx) = mpsc::unbounded_channel();

    assert!(!agg.enabled());

    agg.on_chunk("s1", 1, 1, b"chunk".to_vec(), AudioFormat::Webm, false, &tx)
        .await;

    // No buffering, no waiting: the fallback signal is synchronous
    match next_event(&mut rx).await? {
        ServerEvent::Transcription {
            question_index,
            transcript,
            provider,
            use_fallback,
            ..
        } => {
            assert_eq!(question_index, 1);
            assert_eq!(transcript, None);
            assert_eq!(provider, "web-speech");
            assert_eq!(use_fallback, Some(true));
        }
        other => return Err(anyhow!("unexpected event: {:?}", other)),
    }

    assert_eq!(agg.buffered_chunks("s1").await, 0);

    Ok(())
}

#[tokio::test]
async fn test_drop_session_discards_pending_audio() -> Result<()> {
    let mock = MockTranscriber::new(false);
    let agg = aggregator(Some(mock.clone()), Duration::from_millis(100));
    let (tx, mut rx) = mpsc::unbounded_channel();

    agg.on_chunk("s1", 0, 0, b"pending".to_vec(), AudioFormat::Webm, false, &tx)
        .await;
    agg.drop_session("s1").await;
    assert_eq!(agg.buffered_chunks("s1").await, 0);

    // The already-scheduled deadline finds nothing to flush
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(rx.try_recv().is_err());
    assert!(mock.calls().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_buffer_resets_when_question_advances() -> Result<()> {
    let mock = MockTranscriber::new(false);
    let agg = aggregator(Some(mock.clone()), Duration::from_secs(10));
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Audio for question 0 never finished; session moved on to question 1
    agg.on_chunk("s1", 0, 0, b"old-question-".to_vec(), AudioFormat::Webm, false, &tx)
        .await;
    agg.on_chunk("s1", 1, 1, b"new-question".to_vec(), AudioFormat::Webm, true, &tx)
        .await;

    match next_event(&mut rx).await? {
        ServerEvent::Transcription { question_index, .. } => assert_eq!(question_index, 1),
        other => return Err(anyhow!("unexpected event: {:?}", other)),
    }

    assert_eq!(
        mock.calls(),
        vec![b"new-question".to_vec()],
        "leftover audio from the previous question must not leak into the segment"
    );

    Ok(())
}
