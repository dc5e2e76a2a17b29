//! Transformers post-process every source lookup before conversion.
//!
//! The decoder runs its transformers in registration order, each receiving
//! the key, the previous step's [`Lookup`] and the field's [`Tags`].
//! A transformer may fill in a missing value, rewrite a present one, turn a
//! value into an error, or return [`LookupError::Skip`] to leave the field
//! untouched without reporting anything.

use crate::error::LookupError;
use crate::record::Tags;
use crate::source::Lookup;

pub trait Transformer: Send + Sync {
    fn transform(&self, key: &str, lookup: Lookup, tags: &Tags) -> Lookup;
}

impl<F> Transformer for F
where
    F: Fn(&str, Lookup, &Tags) -> Lookup + Send + Sync,
{
    fn transform(&self, key: &str, lookup: Lookup, tags: &Tags) -> Lookup {
        self(key, lookup, tags)
    }
}

/// Replaces a missing key with the field's `default` tag, when it has one.
///
/// Only [`LookupError::NotFound`] is replaced: source errors and skips pass
/// through, and so does a value that was found.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValue;

impl Transformer for DefaultValue {
    fn transform(&self, _key: &str, lookup: Lookup, tags: &Tags) -> Lookup {
        match (lookup, tags.default_value()) {
            (Err(LookupError::NotFound), Some(default)) => Ok(default.to_string()),
            (lookup, _) => lookup,
        }
    }
}
