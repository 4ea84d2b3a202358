//! Request handling helpers.
//!
//! - [`client_ip`] - Client address and API key extraction
//! - [`short_code`] - Short code format validation

pub mod client_ip;
pub mod short_code;
