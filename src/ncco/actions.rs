use serde::{Deserialize, Serialize};

/// 16-bit linear PCM at 16 kHz, the only format the streaming endpoint accepts
pub const LINEAR16_16K: &str = "audio/l16;rate=16000";

/// A complete call-control document; actions run strictly in order
pub type Ncco = Vec<Action>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// Speak text to the caller
    Talk {
        text: String,
        language: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<u32>,
    },

    /// Bridge call audio to one or more endpoints
    Connect { endpoint: Vec<Endpoint> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Endpoint {
    Websocket {
        uri: String,
        #[serde(rename = "content-type")]
        content_type: String,
    },
}

impl Action {
    pub fn talk(text: impl Into<String>, language: impl Into<String>, style: Option<u32>) -> Self {
        Action::Talk {
            text: text.into(),
            language: language.into(),
            style,
        }
    }

    /// Connect to a single websocket carrying linear PCM
    pub fn connect_websocket(uri: impl Into<String>) -> Self {
        Action::Connect {
            endpoint: vec![Endpoint::Websocket {
                uri: uri.into(),
                content_type: LINEAR16_16K.to_string(),
            }],
        }
    }
}
