pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod initiator;
pub mod ncco;
pub mod tunnel;
pub mod voice;

pub use auth::{Claims, TokenSigner};
pub use config::Config;
pub use error::{Error, Result};
pub use http::{create_router, AppState};
pub use initiator::CallInitiator;
pub use ncco::{Action, CallControlBuilder, CallDirection, Endpoint, Ncco, StreamTarget};
pub use tunnel::TunnelLookup;
pub use voice::{CallOutcome, CreateCallRequest, CreateCallResponse, ProviderReply, VoiceClient};
