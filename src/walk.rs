//! The decoding pass: one depth-first walk over a destination record.
//!
//! For every field, in declaration order:
//!
//! 1. Fields whose effective name is [`SKIP`](crate::record::SKIP) are
//!    omitted. Nothing is looked up for them.
//! 2. Anonymous non-record fields are reported as unsupported.
//! 3. Non-settable fields are left alone.
//! 4. Embedded records are walked with the current path.
//! 5. Nested records are walked with the field's name appended, unless a
//!    custom parser is registered for the record type, in which case the
//!    record is decoded as one leaf.
//! 6. Leaves: format the key, query the source, run the transformers, then
//!    convert.
//!
//! A failing field never stops the walk; its error is collected and the
//! pass reports them all once the root record is done.

use tracing::{debug, trace};

use crate::builder::Decoder;
use crate::convert::Context;
use crate::error::{ConvertError, DecodeError, FieldError, FieldErrorKind, FieldErrors, LookupError};
use crate::record::{Field, FieldKind, Record, Tags};

/// Effective names from the root record to the current field.
pub(crate) type Path = Vec<&'static str>;

pub(crate) struct Pass<'d> {
    decoder: &'d Decoder,
    errors: FieldErrors,
}

impl<'d> Pass<'d> {
    pub fn new(decoder: &'d Decoder) -> Self {
        Self {
            decoder,
            errors: FieldErrors::default(),
        }
    }

    pub fn walk<R: Record>(&mut self, record: &mut R, path: &mut Path) {
        let decoder = self.decoder;
        let schema = decoder.schemas.get::<R>();

        for field in schema.fields() {
            if field.is_skipped() {
                debug!(field = field.name(), "field skipped");
                continue;
            }
            if let FieldKind::Anonymous = field.kind {
                self.errors.push(FieldError {
                    key: String::new(),
                    field: field.name(),
                    cause: FieldErrorKind::UnsupportedAnonymous(field.type_name()),
                });
                continue;
            }
            if !field.is_settable() {
                continue;
            }

            match &field.kind {
                FieldKind::Embedded(access) => access.walk(record, self, path),
                FieldKind::Nested(access) => {
                    path.push(field.effective_name());
                    match decoder.parsers.lookup(access.type_key()) {
                        None => access.walk(record, self, path),
                        Some(parser) => self.leaf(field, path, |input, tags| {
                            let value = parser.parse(input, tags)?;
                            if access.store(record, value) {
                                Ok(())
                            } else {
                                Err(ConvertError::CustomMismatch(parser.type_name()))
                            }
                        }),
                    }
                    path.pop();
                }
                FieldKind::Leaf(access) => {
                    path.push(field.effective_name());
                    let parsers = &*decoder.parsers;
                    self.leaf(field, path, |input, tags| {
                        access.assign(record, input, &Context { tags, parsers })
                    });
                    path.pop();
                }
                FieldKind::Anonymous => {}
            }
        }
    }

    /// Resolve one key and hand the value to `assign`.
    fn leaf<R>(
        &mut self,
        field: &Field<R>,
        path: &Path,
        assign: impl FnOnce(&str, &Tags) -> Result<(), ConvertError>,
    ) {
        let decoder = self.decoder;
        let key = decoder.key_format.format(path);
        trace!(key = %key, field = field.name(), "looking up key");

        let mut lookup = decoder.source.get(&key);
        for transformer in &decoder.transformers {
            lookup = transformer.transform(&key, lookup, field.tags());
        }

        let cause = match lookup {
            Ok(input) => match assign(&input, field.tags()) {
                Ok(()) => return,
                Err(err) => FieldErrorKind::Convert(err),
            },
            Err(LookupError::Skip) => {
                debug!(key = %key, field = field.name(), "key skipped by transformer");
                return;
            }
            Err(LookupError::NotFound) if decoder.ignore_missing => {
                debug!(key = %key, field = field.name(), "missing key ignored");
                return;
            }
            Err(LookupError::NotFound) => FieldErrorKind::NotFound,
            Err(LookupError::Other(err)) => FieldErrorKind::Source(err),
        };
        self.errors.push(FieldError {
            key,
            field: field.name(),
            cause,
        });
    }

    pub fn finish(self, record: &'static str) -> Result<(), DecodeError> {
        debug!(record, errors = self.errors.len(), "decode finished");
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::Fields(self.errors))
        }
    }
}
