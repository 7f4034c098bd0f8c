//! Application tokens for the provider REST API
//!
//! Every outbound request carries a short-lived RS256 JWT signed with the
//! application's private key. Tokens are minted per request and never cached.

mod token;

pub use token::{Claims, TokenSigner, TOKEN_TTL_SECS};
