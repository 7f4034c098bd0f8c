pub mod client;
pub mod messages;

pub use client::{CallOutcome, ProviderReply, VoiceClient};
pub use messages::{
    CreateCallRequest, CreateCallResponse, DownloadTarget, PhoneEndpoint, RecordingRequest, RtcEvent,
};
