//! One-shot outbound call placement

use crate::auth::TokenSigner;
use crate::config::Config;
use crate::error::Result;
use crate::ncco::{CallControlBuilder, CallDirection, Ncco};
use crate::tunnel;
use crate::voice::{CallOutcome, CreateCallRequest, ProviderReply, VoiceClient};
use tracing::{error, info};

/// Sign a fresh token and submit `ncco` as a call from the service number to
/// `destination`. Shared by the `call` command and the `/call` webhook.
pub async fn dial(config: &Config, client: &VoiceClient, destination: &str, ncco: Ncco) -> Result<ProviderReply> {
    let signer = TokenSigner::from_file(&config.application.id, &config.application.key_path())?;
    let token = signer.sign()?;

    let request = CreateCallRequest::new(&config.numbers.service, destination, ncco)
        .with_limit(config.provider.max_call_duration);

    client.create_call(&token, &request).await
}

/// Places outbound calls that greet the callee and bridge them to the
/// streaming endpoint
pub struct CallInitiator {
    config: Config,
    client: VoiceClient,
    http: reqwest::Client,
}

impl CallInitiator {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let client = VoiceClient::with_client(http.clone(), config.provider.api_base_url.clone());

        Self { config, client, http }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Explicit host, then configured host, then tunnel discovery
    pub async fn resolve_host(&self, host: Option<String>) -> Result<String> {
        if let Some(host) = host.or_else(|| self.config.streaming.host.clone()) {
            return Ok(host);
        }

        tunnel::discover(&self.http, &self.config.tunnel.api_url)
            .await
            .into_result()
    }

    /// Build the outbound NCCO for a resolved host. Without a configured
    /// callback, events go to `/event` on the same host.
    pub fn outbound_ncco(&self, host: &str) -> Result<Ncco> {
        let webhook_url = self
            .config
            .streaming
            .webhook_url
            .clone()
            .unwrap_or_else(|| format!("https://{}/event", host));

        CallControlBuilder::from_config(&self.config, host, CallDirection::Outbound)
            .webhook_url(Some(webhook_url))
            .build()
    }

    pub async fn place_call(&self, destination: &str, host: Option<String>) -> Result<CallOutcome> {
        let host = self.resolve_host(host).await?;
        info!("WebSocket: wss://{}/socket", host);

        let ncco = self.outbound_ncco(&host)?;
        let reply = dial(&self.config, &self.client, destination, ncco).await?;

        info!("Call status: {}", reply.status);

        let outcome = reply.outcome()?;
        match &outcome {
            CallOutcome::Created(created) => {
                info!("Call UUID: {}", created.uuid);
                info!("Phone should ring now");
            }
            CallOutcome::Rejected { status, body } => {
                error!("Call rejected ({}): {}", status, body);
            }
        }

        Ok(outcome)
    }
}
