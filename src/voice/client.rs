use super::messages::{CreateCallRequest, CreateCallResponse, RecordingRequest};
use crate::error::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Thin client for the provider's voice REST API.
///
/// No retries and no timeout beyond reqwest's defaults; a transport failure is
/// returned to the caller as `Error::Transport`.
#[derive(Debug, Clone)]
pub struct VoiceClient {
    http: Client,
    base_url: String,
}

/// Raw provider reply, kept verbatim so it can be relayed unchanged
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub status: StatusCode,
    pub body: String,
}

/// What happened to a call request
#[derive(Debug, Clone)]
pub enum CallOutcome {
    Created(CreateCallResponse),
    Rejected { status: StatusCode, body: String },
}

impl ProviderReply {
    /// Interpret the reply: 201 must carry a decodable call record, anything
    /// else is a rejection with the body left untouched.
    pub fn outcome(&self) -> Result<CallOutcome> {
        if self.status == StatusCode::CREATED {
            let created: CreateCallResponse = serde_json::from_str(&self.body)?;
            Ok(CallOutcome::Created(created))
        } else {
            Ok(CallOutcome::Rejected {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }
}

impl VoiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /v1/calls
    pub async fn create_call(&self, token: &str, request: &CreateCallRequest) -> Result<ProviderReply> {
        let url = format!("{}/v1/calls", self.base_url);

        let reply = self.post_json(&url, token, request).await?;

        info!(
            "Create call to {:?}: {}",
            request.to.iter().map(|t| t.number.as_str()).collect::<Vec<_>>(),
            reply.status
        );

        Ok(reply)
    }

    /// POST /v1/legs/{uuid}/recording
    pub async fn start_recording(&self, token: &str, leg_uuid: &str) -> Result<ProviderReply> {
        let url = format!("{}/v1/legs/{}/recording", self.base_url, leg_uuid);

        let reply = self.post_json(&url, token, &RecordingRequest::default()).await?;

        info!("Start recording on leg {}: {}", leg_uuid, reply.status);

        Ok(reply)
    }

    /// GET a provider-hosted file (recording or transcript) and write it to
    /// `dest`, creating parent directories. Returns the number of bytes written.
    pub async fn download(&self, token: &str, url: &str, dest: &Path) -> Result<usize> {
        let bytes = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let write_err = |source| Error::WriteFile {
            path: dest.to_path_buf(),
            source,
        };
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        tokio::fs::write(dest, &bytes).await.map_err(write_err)?;

        info!("Downloaded {} ({} bytes) to {}", url, bytes.len(), dest.display());

        Ok(bytes.len())
    }

    async fn post_json<T: Serialize + ?Sized>(&self, url: &str, token: &str, body: &T) -> Result<ProviderReply> {
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        Ok(ProviderReply { status, body })
    }
}
