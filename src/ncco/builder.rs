use super::actions::{Action, Ncco};
use crate::config::Config;
use crate::error::Result;
use std::fmt;
use url::Url;

/// Which side placed the PSTN call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDirection {
    Inbound,
    Outbound,
}

impl CallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallDirection::Inbound => "inbound",
            CallDirection::Outbound => "outbound",
        }
    }
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the `connect` action sends call audio.
///
/// The streaming endpoint routes on the query parameters, so their names are
/// fixed: `participant`, `call_direction`, and optionally `peer_uuid`,
/// `caller_number` and `webhook_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTarget {
    pub host: String,
    pub participant: String,
    pub direction: CallDirection,
    pub peer_uuid: Option<String>,
    pub caller_number: Option<String>,
    pub webhook_url: Option<String>,
}

impl StreamTarget {
    pub fn new(host: impl Into<String>, direction: CallDirection) -> Self {
        Self {
            host: host.into(),
            participant: "user1".to_string(),
            direction,
            peer_uuid: None,
            caller_number: None,
            webhook_url: None,
        }
    }

    /// `wss://<host>/socket?participant=..&call_direction=..`
    pub fn uri(&self) -> Result<String> {
        let mut url = Url::parse(&format!("wss://{}/socket", self.host))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("participant", &self.participant);
            query.append_pair("call_direction", self.direction.as_str());
            if let Some(peer_uuid) = &self.peer_uuid {
                query.append_pair("peer_uuid", peer_uuid);
            }
            if let Some(caller_number) = &self.caller_number {
                query.append_pair("caller_number", caller_number);
            }
            if let Some(webhook_url) = &self.webhook_url {
                query.append_pair("webhook_url", webhook_url);
            }
        }

        Ok(url.into())
    }
}

/// Builds the two-action `[talk, connect]` document used for both call directions
#[derive(Debug, Clone)]
pub struct CallControlBuilder {
    greeting: String,
    language: String,
    style: Option<u32>,
    target: StreamTarget,
}

impl CallControlBuilder {
    pub fn new(greeting: impl Into<String>, target: StreamTarget) -> Self {
        Self {
            greeting: greeting.into(),
            language: "en-US".to_string(),
            style: None,
            target,
        }
    }

    /// Seed greeting, language, participant and callback from configuration.
    /// The voice style only applies to inbound greetings.
    pub fn from_config(config: &Config, host: &str, direction: CallDirection) -> Self {
        let greeting = &config.greeting;
        let (text, style) = match direction {
            CallDirection::Inbound => (&greeting.inbound_text, greeting.style),
            CallDirection::Outbound => (&greeting.outbound_text, None),
        };

        let mut target = StreamTarget::new(host, direction);
        target.participant = config.streaming.participant.clone();
        target.webhook_url = config.streaming.webhook_url.clone();

        Self::new(text.clone(), target)
            .language(greeting.language.clone())
            .style(style)
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn style(mut self, style: Option<u32>) -> Self {
        self.style = style;
        self
    }

    pub fn peer_uuid(mut self, peer_uuid: impl Into<String>) -> Self {
        self.target.peer_uuid = Some(peer_uuid.into());
        self
    }

    pub fn caller_number(mut self, caller_number: impl Into<String>) -> Self {
        self.target.caller_number = Some(caller_number.into());
        self
    }

    pub fn webhook_url(mut self, webhook_url: Option<String>) -> Self {
        self.target.webhook_url = webhook_url;
        self
    }

    pub fn target(&self) -> &StreamTarget {
        &self.target
    }

    pub fn build(self) -> Result<Ncco> {
        let uri = self.target.uri()?;

        Ok(vec![
            Action::talk(self.greeting, self.language, self.style),
            Action::connect_websocket(uri),
        ])
    }
}
