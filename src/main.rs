use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use voice_builder::{
    create_router, AppState, ChunkAggregator, Config, SessionStore, SpeechClient,
    TemplateStrategy, TemplateWriter, WhisperClient, COMPLETION_MESSAGE, INTERVIEW_QUESTIONS,
    WELCOME_MESSAGE,
};

#[derive(Debug, Parser)]
#[command(name = "voice-builder", about = "Voice interview server for AI assistant templates")]
struct Args {
    /// Path to the config file (without extension)
    #[arg(long, default_value = "config/voice-builder")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Voice Builder v0.1.0");
    info!("Loaded config: {}", cfg.service.name);

    let openai_key = std::env::var("OPENAI_API_KEY").ok();
    let elevenlabs_key = std::env::var("ELEVENLABS_API_KEY").ok();

    // Server-side transcription is optional; without it, clients fall back
    // to their local recognizers.
    let transcriber = match (&openai_key, cfg.transcription.enabled) {
        (Some(key), true) => {
            info!("Whisper speech-to-text enabled");
            Some(Arc::new(WhisperClient::new(
                key.clone(),
                Duration::from_secs(cfg.audio.transcription_timeout_secs),
            )) as Arc<dyn voice_builder::Transcriber>)
        }
        _ => {
            info!("Whisper disabled, clients will use browser speech recognition");
            None
        }
    };

    let speech = match (&elevenlabs_key, cfg.speech.enabled) {
        (Some(key), true) => {
            info!("ElevenLabs text-to-speech enabled");
            Some(Arc::new(SpeechClient::new(
                key.clone(),
                cfg.speech.voice_id.clone(),
            )))
        }
        _ => {
            warn!("Text-to-speech disabled, voice prompts will be text-only");
            None
        }
    };

    let strategy = TemplateStrategy::parse(&cfg.template.strategy).unwrap_or_else(|| {
        warn!(
            "Unknown template strategy {:?}, using deterministic",
            cfg.template.strategy
        );
        TemplateStrategy::Deterministic
    });

    let writer = match (strategy, &openai_key) {
        (TemplateStrategy::Generative, Some(key)) => Some(Arc::new(TemplateWriter::new(key.clone()))),
        (TemplateStrategy::Generative, None) => {
            anyhow::bail!("generative template strategy requires OPENAI_API_KEY")
        }
        _ => None,
    };

    // The question catalog is fixed, so spoken prompts can be rendered once
    // and cached for every session.
    if let Some(speech) = speech.clone() {
        tokio::spawn(async move {
            let mut texts = vec![WELCOME_MESSAGE];
            texts.extend(INTERVIEW_QUESTIONS.iter().map(|q| q.voice_prompt));
            texts.push(COMPLETION_MESSAGE);
            speech.pre_generate(&texts).await;
        });
    }

    let store = SessionStore::new();
    let aggregator = ChunkAggregator::new(
        transcriber,
        Duration::from_millis(cfg.audio.flush_threshold_ms),
        Duration::from_secs(cfg.audio.transcription_timeout_secs),
    );

    // Idle-session sweep, independent of per-connection cleanup
    {
        let store = store.clone();
        let interval = Duration::from_secs(cfg.interview.sweep_interval_secs);
        let ttl = Duration::from_secs(cfg.interview.session_ttl_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately
            loop {
                ticker.tick().await;
                store.sweep_expired(ttl).await;
            }
        });
    }

    let state = AppState::new(
        store,
        aggregator,
        speech,
        writer,
        strategy,
        Duration::from_secs(cfg.interview.disconnect_grace_secs),
    );

    let router = create_router(state);
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    info!("WebSocket session endpoint at ws://{}/ws", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
