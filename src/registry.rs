//! Custom parser registry.
//!
//! Maps a type identity to a function `(input, tags) -> value`. The
//! [type converter](crate::convert) consults it before any built-in
//! conversion, and the decoding engine consults it before recursing into a
//! nested record: registering a parser for a record type turns that record
//! into a single leaf.
//!
//! Registration is expected at startup, before decoders run concurrently.
//! Lookups take a shared lock and may happen from any number of threads.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::convert::Decode;
use crate::error::{BoxError, ConvertError, RegistryError};
use crate::record::Tags;

type ParseFn = dyn Fn(&str, &Tags) -> Result<Box<dyn Any + Send>, BoxError> + Send + Sync;

/// A registered parser for one type.
pub struct CustomParser {
    type_name: &'static str,
    parse: Box<ParseFn>,
}

impl CustomParser {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Run the parser. Failures are wrapped as [`ConvertError::Custom`].
    pub fn parse(&self, input: &str, tags: &Tags) -> Result<Box<dyn Any + Send>, ConvertError> {
        (self.parse)(input, tags).map_err(|source| ConvertError::Custom {
            type_name: self.type_name,
            source,
        })
    }
}

impl std::fmt::Debug for CustomParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomParser")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Type identity -> custom parser.
///
/// ```ignore
/// let parsers = ParserRegistry::with_builtins();
/// parsers.register(|input: &str, _tags: &Tags| input.parse::<Money>());
/// let decoder = Decoder::builder().parsers(Arc::new(parsers)) /* ... */;
/// ```
#[derive(Default)]
pub struct ParserRegistry {
    parsers: RwLock<HashMap<TypeId, Arc<CustomParser>>>,
}

impl ParserRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the duration and timestamp parsers.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        crate::parsers::register_builtins(&registry);
        registry
    }

    /// Register a parser for `T`.
    ///
    /// `Option<T>` and `Box<T>` share `T`'s entry: registering a parser for
    /// either registers it for `T`. A record type decoded by a parser needs
    /// an empty `impl Decode for MyRecord {}`.
    ///
    /// # Panics
    ///
    /// Panics if a parser for `T` is already registered. Registering twice is
    /// a setup mistake, not a decode failure.
    pub fn register<T, F, E>(&self, parser: F)
    where
        T: Decode,
        F: Fn(&str, &Tags) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        if let Err(err) = self.try_register(parser) {
            panic!("{err}");
        }
    }

    /// Like [`register`](Self::register), returning an error on duplicates.
    pub fn try_register<T, F, E>(&self, parser: F) -> Result<(), RegistryError>
    where
        T: Decode,
        F: Fn(&str, &Tags) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let type_name = std::any::type_name::<T>();
        let key = T::parser_key();
        let mut parsers = self.parsers.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = parsers.get(&key) {
            return Err(RegistryError::Duplicate(existing.type_name));
        }

        let parse = move |input: &str, tags: &Tags| -> Result<Box<dyn Any + Send>, BoxError> {
            match parser(input, tags) {
                Ok(value) => value
                    .into_parsed()
                    .ok_or_else(|| BoxError::from("custom parser returned no value")),
                Err(err) => Err(err.into()),
            }
        };
        parsers.insert(
            key,
            Arc::new(CustomParser {
                type_name,
                parse: Box::new(parse),
            }),
        );
        debug!(type_name, "registered custom parser");
        Ok(())
    }

    pub fn lookup(&self, key: TypeId) -> Option<Arc<CustomParser>> {
        self.parsers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    pub fn contains<T: Decode>(&self) -> bool {
        self.lookup(T::parser_key()).is_some()
    }

    pub fn len(&self) -> usize {
        self.parsers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parsers = self.parsers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<_> = parsers.values().map(|p| p.type_name).collect();
        names.sort_unstable();
        f.debug_struct("ParserRegistry").field("parsers", &names).finish()
    }
}
