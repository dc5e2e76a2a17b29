//! # fieldwise env demo
//!
//! A sample CLI that layers command-line values over environment variables
//! over tag defaults. It exists to demonstrate and manually verify
//! fieldwise's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example env_demo
//! ENV_DEMO__SERVER__PORT=9999 cargo run --example env_demo
//! cargo run --example env_demo -- --set server.port=7000 --set display.format=plain
//! cargo run --example env_demo -- --query 'server.host=0.0.0.0&verbose=true'
//! ENV_DEMO__SERVER__PORT=http cargo run --example env_demo
//! RUST_LOG=fieldwise=trace cargo run --example env_demo
//! ```

mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fieldwise::{DecodeError, Decoder, DefaultValue, EnvSource, SourceArgs, keyfmt};

use config::DemoConfig;

/// fieldwise demo: print the resolved configuration.
#[derive(Parser, Debug)]
#[command(name = "env-demo")]
struct Cli {
    #[command(flatten)]
    values: SourceArgs,
}

/// Two passes over one struct: the environment layer fills every field
/// (falling back to tag defaults), then the command-line layer overwrites
/// only the keys it has.
fn load(cli: Cli) -> Result<DemoConfig, DecodeError> {
    let mut config = DemoConfig::default();

    Decoder::builder()
        .source(EnvSource::new())
        .key_format(keyfmt::nested_env("ENV_DEMO"))
        .transformer(DefaultValue)
        .decode(&mut config)?;

    Decoder::builder()
        .source(cli.values.into_source())
        .key_format(keyfmt::dotted())
        .ignore_missing(true)
        .decode(&mut config)?;

    Ok(config)
}

fn print_config(config: &DemoConfig) {
    let ips: Vec<String> = config.server.allowed_ips.iter().map(ToString::to_string).collect();
    let entries = [
        ("name", config.common.name.clone()),
        ("verbose", config.common.verbose.to_string()),
        ("server.host", config.server.host.clone()),
        ("server.port", config.server.port.to_string()),
        ("server.timeout", humantime::format_duration(config.server.timeout).to_string()),
        ("server.allowed_ips", ips.join(";")),
        ("display.color", config.display.color.clone()),
        ("display.format", config.display.format.clone()),
    ];

    if config.display.format == "plain" {
        for (key, value) in &entries {
            println!("{key}={value}");
        }
    } else {
        let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in &entries {
            println!("{key:<width$}  {value}");
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load(cli).unwrap_or_else(|e| {
        eprintln!("Failed to load config:\n{e:#}");
        std::process::exit(1);
    });
    if config.common.verbose {
        println!("[verbose] resolved configuration for {:?}\n", config.common.name);
    }
    print_config(&config);
}
