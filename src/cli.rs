//! Clap adapter for fieldwise.
//!
//! This module is the **optional integration layer** between the decoder and
//! the [clap](https://docs.rs/clap) CLI parser. It is compiled only when the
//! `clap` Cargo feature is enabled (on by default).
//!
//! [`SourceArgs`] adds two flags to any clap `#[derive(Parser)]` struct:
//!
//! - `--set KEY=VALUE`, repeatable, one key per flag.
//! - `--query STRING`, many keys at once in URL-query encoding
//!   (`port=8080&debug=true`).
//!
//! [`SourceArgs::into_source()`] turns them into a [`MapSource`] that can be
//! used on its own or as the top layer of a [`Layered`](crate::Layered)
//! source. The keys are source keys, so they must match the decoder's key
//! formatter (e.g. `database-url` with [`keyfmt::kebab`](crate::keyfmt::kebab)).

use clap::Args;

use crate::source::MapSource;

/// Clap-derived args that collect key-value pairs from the command line.
///
/// Embed this into your app's clap derive:
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     values: SourceArgs,
/// }
/// ```
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Set a value (repeatable), e.g. `--set server-port=8080`.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// URL-query encoded values, e.g. `--query 'server-port=8080&debug=true'`.
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,
}

impl SourceArgs {
    /// Collect the pairs into a source. `--set` pairs override `--query`
    /// pairs; among repeated `--set` flags the last one wins.
    pub fn into_source(self) -> MapSource {
        let mut source = self
            .query
            .as_deref()
            .map(MapSource::from_query)
            .unwrap_or_default();
        source.extend(self.set);
        source
    }
}

fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {arg:?}")),
    }
}
