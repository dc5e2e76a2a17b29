//! Decode flat key-value sources into typed, nested Rust structs.
//!
//! Fieldwise walks a destination struct field by field, builds a source key
//! for every leaf from the path of field names leading to it, looks the key
//! up in a pluggable source (environment variables, a map, URL query
//! parameters, anything that answers `get(key)`), and converts the string it
//! finds into the field's type.
//!
//! ```ignore
//! let config: AppConfig = Decoder::builder()
//!     .source(EnvSource::new())
//!     .key_format(keyfmt::prefix("MYAPP_", keyfmt::env()))
//!     .transformer(DefaultValue)
//!     .load()?;
//! ```
//!
//! With that decoder, `config.database.pool_size` is read from
//! `MYAPP_DATABASE_POOL_SIZE`, falls back to the field's `default` tag when
//! the variable is unset, and fails with a precise error when the value is
//! not a number.
//!
//! # Why fieldwise
//!
//! Environment variables, query strings and `--set key=value` flags all
//! share one shape: a flat map of strings. Applications want nested,
//! typed configuration. The usual glue reads each key by hand, parses it,
//! and reports the first failure it meets. Fieldwise replaces the glue with
//! one description per struct and reports **every** failing field at once,
//! each with the key it looked up and the field it was meant for.
//!
//! # Records: the struct is the schema
//!
//! A destination type implements [`Record`] by listing its fields:
//!
//! ```ignore
//! impl Record for AppConfig {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields.embedded("common", |c| &mut c.common);
//!         fields.leaf("port", |c| &mut c.port).default_value("8080");
//!         fields.leaf("allowed_ips", |c| &mut c.allowed_ips).delimiter(";");
//!         fields.nested("database", |c| &mut c.database).rename("db");
//!         fields.nested_opt("tls", |c| &mut c.tls);
//!         fields.leaf("started", |c| &mut c.started).layout("2006-01-02");
//!         fields.leaf("cache", |c| &mut c.cache).skip();
//!     }
//! }
//! ```
//!
//! - **Leaves** hold any [`Decode`] type: booleans, every integer width,
//!   floats, strings, paths, addresses, `Vec<T>`, maps, `Option<T>`,
//!   `Box<T>`, plus anything with a registered custom parser.
//! - **Nested records** add their name to the key path; optional ones are
//!   allocated on first use.
//! - **Embedded records** promote their fields into the parent: their own
//!   name never appears in a key.
//! - **Tags** tune single fields: `rename`, `delimiter`, `default`,
//!   `layout`, or any key a custom parser understands. Renaming to `"-"`
//!   (or calling `.skip()`) removes the field from decoding.
//!
//! # Keys
//!
//! A [`KeyFormatter`] turns the path (`["database", "pool_size"]`) into a
//! key. The [`keyfmt`] module has the common shapes: `DATABASE_POOL_SIZE`,
//! `database-pool-size`, `database.pool_size`, `APP__DATABASE__POOL_SIZE`,
//! and prefixes for any of them. A closure over the path works too.
//!
//! # Sources
//!
//! | Source | Use |
//! |--------|-----|
//! | [`EnvSource`] | process environment, or a snapshot for tests |
//! | [`MapSource`] | in-memory pairs, URL query strings, `Url` parameters |
//! | [`Layered`] | several sources, the last layer added wins |
//! | [`Empty`] | nothing; every key is missing |
//! | closures | anything else: a secrets store, a database row |
//!
//! A source reports absence as [`LookupError::NotFound`]. Missing keys are
//! field errors unless the decoder is built with
//! [`ignore_missing(true)`](DecoderBuilder::ignore_missing), in which case
//! the field simply keeps its value.
//!
//! # Transformers
//!
//! Every lookup result passes through the decoder's [`Transformer`] chain
//! before conversion. [`DefaultValue`] fills missing keys from the `default`
//! tag. Custom transformers can trim, expand, redact or veto values;
//! returning [`LookupError::Skip`] leaves the field untouched.
//!
//! # Custom parsers
//!
//! A [`ParserRegistry`] maps a type to a parser function. Parsers take
//! precedence over built-in conversion and even over nested records: a
//! record type with a registered parser is decoded from a single key (give
//! it an empty `impl Decode`). A parser registered for `Option<T>` or
//! `Box<T>` is registered for `T`.
//! [`ParserRegistry::with_builtins`] (the decoder's default) knows
//! [`std::time::Duration`] (`10m`, `1h 30m`) and chrono timestamps, whose
//! format the `layout` tag selects (see [`timestamp`]).
//!
//! # Error handling
//!
//! [`DecoderBuilder::build`] fails with a configuration error when the source
//! or the key formatter is missing. A decode fails with
//! [`DecodeError::Fields`], holding one [`FieldError`] per failing field in
//! visitation order:
//!
//! ```text
//! [key: nested-field-a] [field: field_a] cannot parse as bool: provided string was not `true` or `false`
//! [key: missing] [field: missing] key not found
//! ```
//!
//! Fields that decoded successfully are assigned even when others fail.
//!
//! # Logging
//!
//! Fieldwise emits [`tracing`](https://docs.rs/tracing) events: one `trace`
//! per key lookup, `debug` for skipped fields and ignored keys, and a `debug`
//! summary per decode. Keys and field names are logged; values never are.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), `SourceArgs` adds repeatable
//! `--set KEY=VALUE` and `--query` flags to a clap parser and turns them into
//! a [`MapSource`]. Combine it with [`Layered`] to let the command line
//! override the environment. To use fieldwise without clap:
//!
//! ```toml
//! fieldwise = { version = "...", default-features = false }
//! ```

pub mod error;
pub mod ext;
pub mod keyfmt;
pub mod timestamp;

mod builder;
mod casing;
#[cfg(feature = "clap")]
mod cli;
mod convert;
mod env;
mod parsers;
mod record;
mod registry;
mod source;
mod transform;
mod walk;

#[cfg(test)]
mod fixtures;

pub use builder::{Decoder, DecoderBuilder};
pub use casing::Casing;
#[cfg(feature = "clap")]
pub use cli::SourceArgs;
pub use convert::{Context, DEFAULT_DELIMITER, Decode, convert};
pub use env::EnvSource;
pub use error::{
    BoxError, ConvertError, DecodeError, FieldError, FieldErrorKind, FieldErrors, LookupError,
    RegistryError,
};
pub use keyfmt::KeyFormatter;
pub use record::{Field, Fields, Record, SKIP, Schema, Tags, tag};
pub use registry::{CustomParser, ParserRegistry};
pub use source::{Empty, Layered, Lookup, MapSource, Source};
pub use transform::{DefaultValue, Transformer};
