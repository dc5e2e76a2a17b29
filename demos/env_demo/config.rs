//! Configuration records for the env demo application.
//!
//! The root [`DemoConfig`] embeds [`Common`] (its fields are promoted to the
//! root namespace) and nests [`ServerConfig`] and [`DisplayConfig`].
//!
//! # Key mapping
//!
//! | Env var (`keyfmt::nested_env`)   | `--set` key (`keyfmt::dotted`) |
//! |----------------------------------|--------------------------------|
//! | `ENV_DEMO__NAME`                 | `name`                         |
//! | `ENV_DEMO__VERBOSE`              | `verbose`                      |
//! | `ENV_DEMO__SERVER__HOST`         | `server.host`                  |
//! | `ENV_DEMO__SERVER__PORT`         | `server.port`                  |
//! | `ENV_DEMO__SERVER__TIMEOUT`      | `server.timeout`               |
//! | `ENV_DEMO__SERVER__ALLOWED_IPS`  | `server.allowed_ips`           |
//! | `ENV_DEMO__DISPLAY__COLOR`       | `display.color`                |
//! | `ENV_DEMO__DISPLAY__FORMAT`      | `display.format`               |

use std::net::IpAddr;
use std::time::Duration;

use fieldwise::{Fields, Record};

#[derive(Debug, Default)]
pub struct DemoConfig {
    pub common: Common,
    pub server: ServerConfig,
    pub display: DisplayConfig,
}

impl Record for DemoConfig {
    fn describe(fields: &mut Fields<Self>) {
        fields.embedded("common", |c| &mut c.common);
        fields.nested("server", |c| &mut c.server);
        fields.nested("display", |c| &mut c.display);
    }
}

/// Top-level keys shared by every command.
#[derive(Debug, Default)]
pub struct Common {
    pub name: String,
    pub verbose: bool,
}

impl Record for Common {
    fn describe(fields: &mut Fields<Self>) {
        fields.leaf("name", |c| &mut c.name).default_value("env-demo");
        fields.leaf("verbose", |c| &mut c.verbose).default_value("false");
    }
}

#[derive(Debug, Default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub allowed_ips: Vec<IpAddr>,
}

impl Record for ServerConfig {
    fn describe(fields: &mut Fields<Self>) {
        fields.leaf("host", |c| &mut c.host).default_value("127.0.0.1");
        fields.leaf("port", |c| &mut c.port).default_value("8080");
        fields.leaf("timeout", |c| &mut c.timeout).default_value("30s");
        fields
            .leaf("allowed_ips", |c| &mut c.allowed_ips)
            .delimiter(";")
            .default_value("127.0.0.1;::1");
    }
}

#[derive(Debug, Default)]
pub struct DisplayConfig {
    pub color: String,
    pub format: String,
}

impl Record for DisplayConfig {
    fn describe(fields: &mut Fields<Self>) {
        fields.leaf("color", |c| &mut c.color).default_value("yellow");
        fields.leaf("format", |c| &mut c.format).default_value("table");
    }
}
