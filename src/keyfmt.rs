//! Key formatters: turn a field path into a source key.
//!
//! The path holds the effective names from the destination root to the
//! field, skipping embedded records. A [`KeyFormatter`] maps it to the
//! single string a [`Source`](crate::Source) is queried with:
//!
//! | Formatter | `["database", "pool_size"]` |
//! |-----------|-----------------------------|
//! | [`env()`] | `DATABASE_POOL_SIZE` |
//! | [`kebab()`] | `database-pool-size` |
//! | [`dotted()`] | `database.pool_size` |
//! | [`nested_env("APP")`](nested_env) | `APP__DATABASE__POOL_SIZE` |
//! | [`prefix("APP_", env())`](prefix) | `APP_DATABASE_POOL_SIZE` |
//!
//! Closures `Fn(&[&str]) -> String` are formatters too.

use crate::casing::Casing;

pub trait KeyFormatter: Send + Sync {
    fn format(&self, path: &[&str]) -> String;
}

impl<F> KeyFormatter for F
where
    F: Fn(&[&str]) -> String + Send + Sync,
{
    fn format(&self, path: &[&str]) -> String {
        self(path)
    }
}

/// Segments mapped one by one, then joined with a separator.
#[derive(Debug, Clone)]
pub struct Joined {
    separator: String,
    map: Option<fn(&str) -> String>,
}

impl KeyFormatter for Joined {
    fn format(&self, path: &[&str]) -> String {
        match self.map {
            Some(map) => path
                .iter()
                .map(|s| map(s))
                .collect::<Vec<_>>()
                .join(self.separator.as_str()),
            None => path.join(self.separator.as_str()),
        }
    }
}

/// Another formatter's key with a fixed prefix.
pub struct Prefixed<K> {
    prefix: String,
    inner: K,
}

impl<K: KeyFormatter> KeyFormatter for Prefixed<K> {
    fn format(&self, path: &[&str]) -> String {
        let key = self.inner.format(path);
        let mut out = String::with_capacity(self.prefix.len() + key.len());
        out.push_str(&self.prefix);
        out.push_str(&key);
        out
    }
}

pub fn join(separator: impl Into<String>, map: Option<fn(&str) -> String>) -> Joined {
    Joined {
        separator: separator.into(),
        map,
    }
}

pub fn prefix<K: KeyFormatter>(prefix: impl Into<String>, inner: K) -> Prefixed<K> {
    Prefixed {
        prefix: prefix.into(),
        inner,
    }
}

/// `UPPER_SNAKE` segments joined with `_`.
pub fn env() -> Joined {
    join("_", Some(|s| Casing::UpperSnake.convert(s)))
}

/// `lower-kebab` segments joined with `-`.
pub fn kebab() -> Joined {
    join("-", Some(|s| Casing::LowerKebab.convert(s)))
}

/// `lower_snake` segments joined with `.`.
pub fn dotted() -> Joined {
    join(".", Some(|s| Casing::LowerSnake.convert(s)))
}

/// `PREFIX__SEGMENT__SEGMENT`: upper snake segments separated by a double
/// underscore, so single underscores inside a field name stay unambiguous.
pub fn nested_env(app: impl Into<String>) -> Prefixed<Joined> {
    let mut head = app.into();
    head.push_str("__");
    prefix(head, join("__", Some(|s| Casing::UpperSnake.convert(s))))
}
