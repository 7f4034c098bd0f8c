//! Webhook server the provider calls back into
//!
//! - GET /answer - NCCO for an inbound call
//! - GET|POST /event - Call lifecycle events (logged only)
//! - GET /call?number=... - Trigger an outbound call
//! - POST /rtc - Recording/transcript ready; downloads the file
//! - POST /results - Results posted back by the streaming endpoint
//! - GET /health, GET /_/health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
