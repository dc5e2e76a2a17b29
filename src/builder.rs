use std::sync::Arc;

use crate::error::DecodeError;
use crate::keyfmt::KeyFormatter;
use crate::record::{Record, Schemas};
use crate::registry::ParserRegistry;
use crate::source::Source;
use crate::transform::Transformer;
use crate::walk::{Pass, Path};

/// A configured decoder: source, key formatter, transformers and parser
/// registry.
///
/// Decoders are `Send + Sync`. One decoder may serve any number of
/// concurrent decodes; each keeps its own error accumulator.
pub struct Decoder {
    pub(crate) source: Box<dyn Source>,
    pub(crate) key_format: Box<dyn KeyFormatter>,
    pub(crate) transformers: Vec<Box<dyn Transformer>>,
    pub(crate) ignore_missing: bool,
    pub(crate) parsers: Arc<ParserRegistry>,
    pub(crate) schemas: Schemas,
}

impl Decoder {
    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::new()
    }

    /// Fill `dst` from the source.
    ///
    /// Fields whose key is absent keep their current value. Every failing
    /// field is reported in the returned [`DecodeError::Fields`]; fields that
    /// decoded successfully are assigned even when others fail.
    pub fn decode<R: Record>(&self, dst: &mut R) -> Result<(), DecodeError> {
        let mut pass = Pass::new(self);
        pass.walk(dst, &mut Path::new());
        pass.finish(std::any::type_name::<R>())
    }

    /// Decode into a fresh `R::default()`.
    pub fn load<R: Record + Default>(&self) -> Result<R, DecodeError> {
        let mut dst = R::default();
        self.decode(&mut dst)?;
        Ok(dst)
    }

    pub fn parsers(&self) -> &Arc<ParserRegistry> {
        &self.parsers
    }
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("transformers", &self.transformers.len())
            .field("ignore_missing", &self.ignore_missing)
            .field("parsers", &self.parsers)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Decoder`].
///
/// A source and a key formatter are required; everything else has a
/// default:
///
/// - **Transformers**: none. Add them with [`transformer()`](Self::transformer);
///   they run in the order added.
/// - **Missing keys**: reported as errors. See [`ignore_missing()`](Self::ignore_missing).
/// - **Parsers**: a fresh [`ParserRegistry::with_builtins`]. Share one
///   registry between decoders with [`parsers()`](Self::parsers).
#[derive(Default)]
pub struct DecoderBuilder {
    source: Option<Box<dyn Source>>,
    key_format: Option<Box<dyn KeyFormatter>>,
    transformers: Vec<Box<dyn Transformer>>,
    ignore_missing: bool,
    parsers: Option<Arc<ParserRegistry>>,
}

impl DecoderBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the key-value source (required).
    pub fn source(mut self, source: impl Source + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Set how field paths become source keys (required).
    pub fn key_format(mut self, key_format: impl KeyFormatter + 'static) -> Self {
        self.key_format = Some(Box::new(key_format));
        self
    }

    /// Append a transformer to the chain.
    pub fn transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// When `true`, keys the source does not have are skipped silently
    /// instead of reported (default: `false`).
    pub fn ignore_missing(mut self, ignore: bool) -> Self {
        self.ignore_missing = ignore;
        self
    }

    /// Use `parsers` instead of a fresh registry with the built-ins.
    pub fn parsers(mut self, parsers: Arc<ParserRegistry>) -> Self {
        self.parsers = Some(parsers);
        self
    }

    pub fn build(self) -> Result<Decoder, DecodeError> {
        let source = self.source.ok_or(DecodeError::MissingSource)?;
        let key_format = self.key_format.ok_or(DecodeError::MissingKeyFormatter)?;
        let parsers = self
            .parsers
            .unwrap_or_else(|| Arc::new(ParserRegistry::with_builtins()));

        Ok(Decoder {
            source,
            key_format,
            transformers: self.transformers,
            ignore_missing: self.ignore_missing,
            parsers,
            schemas: Schemas::default(),
        })
    }

    /// Build and decode into `dst` in one step.
    pub fn decode<R: Record>(self, dst: &mut R) -> Result<(), DecodeError> {
        self.build()?.decode(dst)
    }

    /// Build and decode into a fresh `R::default()` in one step.
    pub fn load<R: Record + Default>(self) -> Result<R, DecodeError> {
        self.build()?.load()
    }
}
