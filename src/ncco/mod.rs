//! Call-control documents (NCCOs)
//!
//! An NCCO is an ordered list of actions the provider executes against a live
//! call. This crate only ever produces two: a `talk` greeting followed by a
//! `connect` that bridges call audio to the streaming endpoint over a websocket.

mod actions;
mod builder;

pub use actions::{Action, Endpoint, Ncco, LINEAR16_16K};
pub use builder::{CallControlBuilder, CallDirection, StreamTarget};
