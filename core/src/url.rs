//! Request-target model: path plus query parameters

use ahash::AHashMap;

/// A request target split into its path and query parameters.
///
/// The path never contains `?`. Query parameters are taken verbatim (no
/// percent-decoding); a segment without `=` or with an empty key is ignored,
/// and the first occurrence of a key wins.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpUrl {
    full: String,
    path: String,
    query: AHashMap<String, String>,
}

impl HttpUrl {
    /// Split a raw request target on its first `?`
    pub fn parse(target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, parse_pairs(query, '&')),
            None => (target, AHashMap::new()),
        };

        Self {
            full: target.to_string(),
            path: path.to_string(),
            query,
        }
    }

    /// The target exactly as it appeared on the request line
    #[inline]
    pub fn full(&self) -> &str {
        &self.full
    }

    /// Target without the query string
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get query parameter by name
    #[inline]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// All query parameters
    #[inline]
    pub fn query_params(&self) -> &AHashMap<String, String> {
        &self.query
    }
}

/// Split `input` on `separator` into `key=value` pairs.
///
/// Pairs without `=` or with an empty key are dropped; the first value seen
/// for a key is kept.
pub(crate) fn parse_pairs(input: &str, separator: char) -> AHashMap<String, String> {
    let mut pairs = AHashMap::new();

    for segment in input.split(separator) {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        pairs
            .entry(key.to_string())
            .or_insert_with(|| value.trim().to_string());
    }

    pairs
}
