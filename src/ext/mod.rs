//! Parsers for third-party types, each behind its own Cargo feature.
//!
//! Extensions do not register themselves: call the module's `register`
//! with the registry your decoders use.

#[cfg(feature = "decimal")]
pub mod decimal;
