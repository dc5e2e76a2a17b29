use std::collections::HashMap;
use std::env::VarError;

use crate::error::LookupError;
use crate::source::{Lookup, Source};

/// Environment variables as a [`Source`].
///
/// [`EnvSource::new`] reads the live process environment on every lookup.
/// [`EnvSource::from_vars`] takes a snapshot, so tests can pass synthetic
/// data instead of `std::env::vars()`.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    snapshot: Option<HashMap<String, String>>,
}

impl EnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            snapshot: Some(vars.into_iter().collect()),
        }
    }
}

impl Source for EnvSource {
    fn get(&self, key: &str) -> Lookup {
        if let Some(vars) = &self.snapshot {
            return vars.get(key).cloned().ok_or(LookupError::NotFound);
        }
        // A key containing `=` or NUL can never be set; std::env::var panics on it.
        if key.is_empty() || key.contains(['=', '\0']) {
            return Err(LookupError::NotFound);
        }
        match std::env::var(key) {
            Ok(value) => Ok(value),
            Err(VarError::NotPresent) => Err(LookupError::NotFound),
            Err(err @ VarError::NotUnicode(_)) => Err(LookupError::other(err)),
        }
    }
}
