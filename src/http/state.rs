use crate::config::Config;
use crate::voice::VoiceClient;
use std::sync::Arc;

/// Shared, read-only state for webhook handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: VoiceClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = VoiceClient::new(config.provider.api_base_url.clone());

        Self {
            config: Arc::new(config),
            client,
        }
    }
}
