use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the call initiator and the webhook handlers
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read private key {}: {source}", .path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid RSA private key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("failed to sign application token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("no secure tunnel found: {0}")]
    TunnelNotFound(String),

    #[error("invalid streaming URI: {0}")]
    InvalidStreamUri(#[from] url::ParseError),

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed provider response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
