use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Token lifetime: expiry is always exactly one hour after issuance
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Claims understood by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub application_id: String,
    pub iat: i64,
    pub exp: i64,
    /// Fresh per token so two tokens issued in the same second never collide
    pub jti: String,
}

impl Claims {
    pub fn new(application_id: &str, issued_at: i64) -> Self {
        Self {
            application_id: application_id.to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Signs application tokens with an RSA private key
pub struct TokenSigner {
    application_id: String,
    key: EncodingKey,
}

impl TokenSigner {
    /// Build a signer from PEM text (PKCS#1 or PKCS#8)
    pub fn from_pem(application_id: &str, pem: &[u8]) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(pem).map_err(Error::InvalidKey)?;

        Ok(Self {
            application_id: application_id.to_string(),
            key,
        })
    }

    /// Read the private key from disk
    pub fn from_file(application_id: &str, path: &Path) -> Result<Self> {
        let pem = std::fs::read(path).map_err(|source| Error::KeyRead {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded private key from {}", path.display());

        Self::from_pem(application_id, &pem)
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Sign a token issued now
    pub fn sign(&self) -> Result<String> {
        self.sign_at(Utc::now().timestamp())
    }

    pub fn sign_at(&self, issued_at: i64) -> Result<String> {
        let claims = Claims::new(&self.application_id, issued_at);

        encode(&Header::new(Algorithm::RS256), &claims, &self.key).map_err(Error::Signing)
    }
}
