//! Parsers installed by [`ParserRegistry::with_builtins`].
//!
//! Durations use humantime's notation (`10m`, `1h 30m`, `250ms`).
//! Timestamps honor the field's `layout` tag (see [`crate::timestamp`]).

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};

use crate::convert::Decode;
use crate::record::Tags;
use crate::registry::ParserRegistry;
use crate::timestamp;

impl Decode for Duration {}
impl Decode for DateTime<Utc> {}
impl Decode for DateTime<FixedOffset> {}

pub(crate) fn register_builtins(registry: &ParserRegistry) {
    registry.register(|input: &str, _tags: &Tags| humantime::parse_duration(input));
    registry.register(|input: &str, tags: &Tags| timestamp::parse(input, tags.layout()));
    registry.register(|input: &str, tags: &Tags| {
        timestamp::parse(input, tags.layout()).map(|t| t.with_timezone(&Utc))
    });
}
