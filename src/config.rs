use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub interview: InterviewConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub template: TemplateConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    /// Idle sessions older than this are swept (seconds)
    pub session_ttl_secs: u64,
    /// How often the background sweep runs (seconds)
    pub sweep_interval_secs: u64,
    /// How long a session survives a disconnect (seconds)
    pub disconnect_grace_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Buffered audio is flushed to transcription after this much time (ms)
    pub flush_threshold_ms: u64,
    /// Per-call transcription timeout (seconds)
    pub transcription_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// Server-side transcription; when false, clients fall back to local recognition
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// Provider voice used to render question prompts
    pub voice_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// "deterministic" or "generative"
    pub strategy: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "voice-builder".to_string(),
            http: HttpConfig {
                bind: "0.0.0.0".to_string(),
                port: 3000,
            },
        }
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 3600,
            sweep_interval_secs: 1800,
            disconnect_grace_secs: 300,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            flush_threshold_ms: 2000,
            transcription_timeout_secs: 15,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            voice_id: "EXAVITQu4vr4xnSDxMaL".to_string(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            strategy: "deterministic".to_string(),
        }
    }
}

impl Config {
    /// Load from a config file, layered with `VOICE_BUILDER__*` env overrides.
    ///
    /// The file is optional; a missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("VOICE_BUILDER").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
