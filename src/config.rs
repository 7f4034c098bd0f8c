use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable prefix, e.g. `VOICE_BRIDGE__STREAMING__HOST`
pub const ENV_PREFIX: &str = "VOICE_BRIDGE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub application: ApplicationConfig,
    pub provider: ProviderConfig,
    pub numbers: NumbersConfig,
    pub streaming: StreamingConfig,
    pub tunnel: TunnelConfig,
    pub greeting: GreetingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Provider application id, carried in every token
    pub id: String,
    pub private_key_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_base_url: String,
    /// Start a leg recording when an inbound call is answered
    pub record_calls: bool,
    /// Upper bound on outbound call length, in seconds
    pub max_call_duration: Option<u32>,
    /// Where finished recordings and transcripts are downloaded
    pub recordings_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NumbersConfig {
    /// Source number for outbound calls
    pub service: String,
    /// Default target for the `call` command
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Public host of the streaming endpoint (no scheme)
    pub host: Option<String>,
    pub participant: String,
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    pub language: String,
    pub inbound_text: String,
    pub outbound_text: String,
    pub style: Option<u32>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "voice-bridge".to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 9000,
        }
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            private_key_path: "private.key".to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.nexmo.com".to_string(),
            record_calls: false,
            max_call_duration: None,
            recordings_path: "post-call-data".to_string(),
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            host: None,
            participant: "user1".to_string(),
            webhook_url: None,
        }
    }
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:4040/api/tunnels".to_string(),
        }
    }
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            inbound_text: "Hello! How can I help you today?".to_string(),
            outbound_text: "Hello! Connecting you now.".to_string(),
            style: Some(11),
        }
    }
}

impl Config {
    /// Load from an optional config file, then apply `VOICE_BRIDGE__*` overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl ApplicationConfig {
    /// Private key location with a leading `~` expanded
    pub fn key_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.private_key_path).into_owned())
    }
}

impl ProviderConfig {
    pub fn recordings_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.recordings_path).into_owned())
    }
}
