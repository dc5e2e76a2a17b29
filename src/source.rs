//! Key-value sources.
//!
//! A [`Source`] answers one question: what string is stored under this
//! key? Absence is reported as [`LookupError::NotFound`], which the
//! decoder treats specially (transformers may replace it, and
//! `ignore_missing` silences it). Any other error becomes a field error.
//!
//! Built-in sources:
//!
//! | Source | Backing data |
//! |--------|--------------|
//! | closures `Fn(&str) -> Lookup` | anything |
//! | [`MapSource`], `HashMap<String, String>`, `BTreeMap<String, String>` | an in-memory map |
//! | [`MapSource::from_query`] / [`MapSource::from_url`] | URL query parameters |
//! | [`EnvSource`](crate::EnvSource) | process environment |
//! | [`Empty`] | nothing |
//! | [`Layered`] | other sources, highest layer first |

use std::collections::{BTreeMap, HashMap};

use url::Url;

use crate::error::LookupError;

/// Result of a source lookup or transformer step.
pub type Lookup = Result<String, LookupError>;

pub trait Source: Send + Sync {
    fn get(&self, key: &str) -> Lookup;
}

impl<F> Source for F
where
    F: Fn(&str) -> Lookup + Send + Sync,
{
    fn get(&self, key: &str) -> Lookup {
        self(key)
    }
}

impl Source for HashMap<String, String> {
    fn get(&self, key: &str) -> Lookup {
        HashMap::get(self, key).cloned().ok_or(LookupError::NotFound)
    }
}

impl Source for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Lookup {
        BTreeMap::get(self, key).cloned().ok_or(LookupError::NotFound)
    }
}

/// An in-memory key-value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSource(HashMap<String, String>);

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Decode a URL query string (`a=1&b=x%20y`). The first value of a
    /// repeated key wins.
    pub fn from_query(query: &str) -> Self {
        let mut map = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            map.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        Self(map)
    }

    /// The query parameters of `url`, as [`from_query`](Self::from_query).
    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Source for MapSource {
    fn get(&self, key: &str) -> Lookup {
        self.0.get(key).cloned().ok_or(LookupError::NotFound)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for MapSource {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for MapSource {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for MapSource {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

/// A source with no keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl Source for Empty {
    fn get(&self, _key: &str) -> Lookup {
        Err(LookupError::NotFound)
    }
}

/// Sources stacked in ascending priority: the last layer added wins.
///
/// A lookup asks each layer from the top down and returns the first answer
/// that is not "not found", including errors.
///
/// ```ignore
/// let source = Layered::new()
///     .layer(MapSource::from([("port", "8080")]))
///     .layer(EnvSource::new());
/// ```
#[derive(Default)]
pub struct Layered {
    layers: Vec<Box<dyn Source>>,
}

impl Layered {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(mut self, source: impl Source + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }
}

impl Source for Layered {
    fn get(&self, key: &str) -> Lookup {
        for layer in self.layers.iter().rev() {
            match layer.get(key) {
                Err(LookupError::NotFound) => continue,
                answer => return answer,
            }
        }
        Err(LookupError::NotFound)
    }
}

impl std::fmt::Debug for Layered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layered").field("layers", &self.layers.len()).finish()
    }
}
