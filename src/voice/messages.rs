use crate::ncco::Ncco;
use serde::{Deserialize, Serialize};

/// A PSTN endpoint in a call request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEndpoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
}

impl PhoneEndpoint {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            kind: "phone".to_string(),
            number: number.into(),
        }
    }
}

/// Body of `POST /v1/calls`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCallRequest {
    pub to: Vec<PhoneEndpoint>,
    pub from: PhoneEndpoint,
    pub ncco: Ncco,
    /// Maximum call length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl CreateCallRequest {
    pub fn new(from: &str, to: &str, ncco: Ncco) -> Self {
        Self {
            to: vec![PhoneEndpoint::new(to)],
            from: PhoneEndpoint::new(from),
            ncco,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }
}

/// Body of a `201 Created` reply to `POST /v1/calls`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCallResponse {
    pub uuid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub conversation_uuid: Option<String>,
}

/// Body of `POST /v1/legs/{uuid}/recording`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingRequest {
    pub split: bool,
    pub streamed: bool,
    pub public: bool,
    /// Minutes the recording stays downloadable
    pub validity_time: u32,
    pub format: String,
}

impl Default for RecordingRequest {
    fn default() -> Self {
        Self {
            split: true,
            streamed: true,
            public: true,
            validity_time: 30,
            format: "mp3".to_string(),
        }
    }
}

/// Recording/transcription callback delivered to `POST /rtc`
#[derive(Debug, Clone, Deserialize)]
pub struct RtcEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub body: RtcEventBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RtcEventBody {
    pub recording_id: Option<String>,
    pub destination_url: Option<String>,
    pub transcription_url: Option<String>,
    pub channel: Option<RtcChannel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RtcChannel {
    pub id: String,
}

/// A file the provider has ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub file_name: String,
}

pub const RECORD_DONE: &str = "audio:record:done";
pub const TRANSCRIBE_DONE: &str = "audio:transcribe:done";

impl RtcEvent {
    /// `<recording_id>_<channel>.mp3` for recordings, `<recording_id>.txt` for
    /// transcripts. Other event types, missing fields or ids that are not
    /// plain file names yield nothing.
    pub fn download_target(&self) -> Option<DownloadTarget> {
        let recording_id = self.body.recording_id.as_deref().filter(|id| is_plain_name(id))?;

        let (url, file_name) = match self.kind.as_str() {
            RECORD_DONE => {
                let channel = self.body.channel.as_ref().map(|c| c.id.as_str()).filter(|id| is_plain_name(id))?;
                (
                    self.body.destination_url.clone()?,
                    format!("{}_{}.mp3", recording_id, channel),
                )
            }
            TRANSCRIBE_DONE => (
                self.body.transcription_url.clone()?,
                format!("{}.txt", recording_id),
            ),
            _ => return None,
        };

        Some(DownloadTarget { url, file_name })
    }
}

fn is_plain_name(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && id != "." && id != ".."
}
