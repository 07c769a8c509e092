//! WSPR audio coder: message packing, channel coding, tone synthesis,
//! callsign hashing and Maidenhead grid utilities.

/// Channel symbols in one WSPR transmission.
pub const SYMBOL_COUNT: usize = 162;

pub mod bridge;
pub mod error;
pub mod fec;
#[cfg(feature = "jni")]
pub mod jni;
pub mod locator;
pub mod message;
pub mod modem;
pub mod nhash;
pub mod params;
pub mod symbols;

pub use error::{Error, Result};
