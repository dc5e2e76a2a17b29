//! Arbitrary-precision decimals (`bigdecimal::BigDecimal`), feature `decimal`.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::convert::Decode;
use crate::record::Tags;
use crate::registry::ParserRegistry;

impl Decode for BigDecimal {}

/// Register the `BigDecimal` parser.
///
/// # Panics
///
/// Panics if a `BigDecimal` parser is already registered.
pub fn register(registry: &ParserRegistry) {
    registry.register(|input: &str, _tags: &Tags| BigDecimal::from_str(input));
}
