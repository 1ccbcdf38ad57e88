//! Text-to-speech boundary (ElevenLabs)
//!
//! Question prompts are fixed, so rendered audio is cached by exact text and
//! pre-generated at startup. TTS failures degrade to text-only delivery.

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

const ELEVENLABS_URL: &str = "https://api.elevenlabs.io/v1";

pub struct SpeechClient {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    cache: Mutex<HashMap<String, Vec<u8>>>,
}

impl SpeechClient {
    pub fn new(api_key: String, voice_id: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            voice_id,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Render `text` to audio bytes, serving repeated texts from cache.
    pub async fn text_to_speech(&self, text: &str) -> Result<Vec<u8>> {
        {
            let cache = self.cache.lock().await;
            if let Some(audio) = cache.get(text) {
                return Ok(audio.clone());
            }
        }

        info!("Generating speech for: {:.50}", text);

        let response = self
            .client
            .post(format!("{}/text-to-speech/{}", ELEVENLABS_URL, self.voice_id))
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": text,
                "model_id": "eleven_monolingual_v1",
                "voice_settings": {
                    "stability": 0.5,
                    "similarity_boost": 0.75,
                },
            }))
            .send()
            .await
            .context("Speech request failed")?;

        if !response.status().is_success() {
            bail!("Speech provider returned status {}", response.status());
        }

        let audio = response
            .bytes()
            .await
            .context("Failed to read speech response body")?
            .to_vec();

        let mut cache = self.cache.lock().await;
        cache.insert(text.to_string(), audio.clone());

        Ok(audio)
    }

    /// Warm the cache for a set of fixed texts. Individual failures are
    /// logged and skipped; the texts will be retried on first use.
    pub async fn pre_generate(&self, texts: &[&str]) {
        info!("Pre-generating audio for {} prompt(s)", texts.len());

        for text in texts {
            if let Err(e) = self.text_to_speech(text).await {
                warn!("Failed to pre-generate audio for {:.50}: {}", text, e);
            }
        }

        info!("Prompt audio pre-generation complete");
    }

    pub async fn cache_size(&self) -> usize {
        self.cache.lock().await.len()
    }
}
