//! Discovery of the public tunnel host from the local tunnel agent API

use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

const SECURE_SCHEME: &str = "https://";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TunnelList {
    #[serde(default)]
    pub tunnels: Vec<Tunnel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tunnel {
    #[serde(default)]
    pub public_url: String,
}

/// Result of a lookup; the reason for a miss is kept for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunnelLookup {
    Found(String),
    NotFound(String),
}

impl TunnelLookup {
    pub fn into_result(self) -> Result<String> {
        match self {
            TunnelLookup::Found(host) => Ok(host),
            TunnelLookup::NotFound(reason) => Err(Error::TunnelNotFound(reason)),
        }
    }
}

/// First tunnel served over https, as a bare host
pub fn select_secure_host(list: &TunnelList) -> Option<String> {
    list.tunnels
        .iter()
        .find_map(|t| t.public_url.strip_prefix(SECURE_SCHEME))
        .map(|host| host.trim_end_matches('/').to_string())
}

/// Ask the tunnel agent for its tunnels. Never fails: every problem becomes
/// `NotFound` with the cause attached.
pub async fn discover(client: &Client, api_url: &str) -> TunnelLookup {
    let lookup = match fetch(client, api_url).await {
        Ok(list) => match select_secure_host(&list) {
            Some(host) => TunnelLookup::Found(host),
            None => TunnelLookup::NotFound(format!(
                "none of the {} tunnels at {} is https",
                list.tunnels.len(),
                api_url
            )),
        },
        Err(reason) => TunnelLookup::NotFound(reason),
    };

    match &lookup {
        TunnelLookup::Found(host) => info!("Discovered tunnel host {}", host),
        TunnelLookup::NotFound(reason) => warn!("No tunnel host: {}", reason),
    }

    lookup
}

async fn fetch(client: &Client, api_url: &str) -> std::result::Result<TunnelList, String> {
    let response = client
        .get(api_url)
        .send()
        .await
        .map_err(|e| format!("tunnel API {} unreachable: {}", api_url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("tunnel API {} returned {}", api_url, status));
    }

    response
        .json::<TunnelList>()
        .await
        .map_err(|e| format!("tunnel API {} sent an unreadable body: {}", api_url, e))
}
