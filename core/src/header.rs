//! Ordered header storage with case-insensitive lookups

/// Request headers in the order they were received
///
/// Names keep the case they arrived with. A repeated name (compared
/// ASCII case-insensitively) overwrites the earlier value in place, so the
/// last value wins while the first position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderTable {
    entries: Vec<(String, String)>,
}

impl HeaderTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or overwrite a header
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();

        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Get header value by name (case-insensitive)
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Get header value as specific type
    #[inline]
    pub fn get_parsed<T>(&self, name: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(name)?.parse().ok()
    }

    /// Check if a header is present
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get number of headers
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if headers are empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all headers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
