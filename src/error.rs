//! Error types.
//!
//! Decoding distinguishes three failure classes:
//!
//! - **Configuration errors** ([`DecodeError::MissingSource`],
//!   [`DecodeError::MissingKeyFormatter`]) are returned by
//!   [`DecoderBuilder::build`](crate::DecoderBuilder::build) before any
//!   destination is touched.
//! - **Field errors** ([`FieldError`]) describe one bad or missing value. They
//!   are collected, never fatal on their own, and surface together as
//!   [`DecodeError::Fields`].
//! - **Registry errors** ([`RegistryError`]) are programmer mistakes detected
//!   while registering custom parsers, never during a decode.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;

use thiserror::Error;

/// Boxed error used for pluggable sources and custom parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Source is missing: call .source() on the builder")]
    MissingSource,

    #[error("Key formatter is missing: call .key_format() on the builder")]
    MissingKeyFormatter,

    #[error(transparent)]
    Fields(#[from] FieldErrors),
}

impl DecodeError {
    /// The collected field errors, if this is a data error.
    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            DecodeError::Fields(errors) => Some(errors),
            _ => None,
        }
    }
}

/// All field errors of one decode, in field visitation order.
///
/// `Display` renders a single summary line. The alternate form (`{:#}`)
/// renders one error per line.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub(crate) fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Resolved keys of every failing field, in order.
    pub fn keys(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.key.as_str()).collect()
    }
}

impl std::ops::Index<usize> for FieldErrors {
    type Output = FieldError;

    fn index(&self, index: usize) -> &FieldError {
        &self.0[index]
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if f.alternate() { "\n" } else { ", " };
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// One field that could not be decoded.
#[derive(Debug, Error)]
#[error("[key: {key}] [field: {field}] {cause}")]
pub struct FieldError {
    /// Resolved source key. Empty for fields that never reach a lookup.
    pub key: String,
    /// Declared field name.
    pub field: &'static str,
    #[source]
    pub cause: FieldErrorKind,
}

impl FieldError {
    pub fn is_not_found(&self) -> bool {
        matches!(self.cause, FieldErrorKind::NotFound)
    }
}

#[derive(Debug, Error)]
pub enum FieldErrorKind {
    #[error("key not found")]
    NotFound,

    #[error(transparent)]
    Source(BoxError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("unsupported anonymous type {0}")]
    UnsupportedAnonymous(&'static str),
}

/// Outcome of a failed source lookup or transformer step.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("key not found")]
    NotFound,

    /// Raised by a transformer to leave the field untouched.
    #[error("skip key")]
    Skip,

    #[error(transparent)]
    Other(BoxError),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound)
    }

    pub fn other(error: impl Into<BoxError>) -> Self {
        LookupError::Other(error.into())
    }
}

/// A string that could not be converted into a field's type.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot parse as bool: {0}")]
    Bool(#[source] ParseBoolError),

    #[error("cannot parse as int: {0}")]
    Int(#[source] ParseIntError),

    #[error("cannot parse as uint: {0}")]
    Uint(#[source] ParseIntError),

    #[error("cannot parse as float: {0}")]
    Float(#[source] ParseFloatError),

    #[error("cannot parse as map: {0}")]
    Map(String),

    #[error("cannot parse as {type_name}: {source}")]
    FromStr {
        type_name: &'static str,
        source: BoxError,
    },

    #[error("cannot parse as custom type ({type_name}): {source}")]
    Custom {
        type_name: &'static str,
        source: BoxError,
    },

    #[error("custom parser for {0} returned a value of another type")]
    CustomMismatch(&'static str),

    #[error("unsupported dst type {0}")]
    Unsupported(&'static str),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("custom parser already registered for: {0}")]
    Duplicate(&'static str),
}
