//! Path parameters collected by the builder.

use indexmap::IndexMap;

/// Marker that prefixes path parameter names in route patterns.
pub const PARAM_PREFIX: char = ':';

/// Path parameters keyed by their colon-prefixed name.
///
/// `id` and `:id` address the same entry. Insertion order is kept; setting an
/// existing key replaces the value in place.
///
/// # Example
///
/// ```rust
/// use stagehand::PathParams;
///
/// let mut params = PathParams::new();
/// params.insert("id", "1");
/// params.insert(":id", "2");
///
/// assert_eq!(params.len(), 1);
/// assert_eq!(params.get("id"), Some("2"));
/// assert_eq!(params.iter().next(), Some((":id", "2")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    inner: IndexMap<String, String>,
}

impl PathParams {
    /// Creates an empty set of parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, normalizing the key.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(prefixed_key(key), value.into());
    }

    /// Looks up a parameter by either form of its key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(&prefixed_key(key)).map(String::as_str)
    }

    /// Iterates over `(":key", value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over `("key", value)` pairs with the prefix removed.
    pub fn iter_bare(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().map(|(k, v)| (bare_key(k), v))
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no parameters were set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Returns `key` with exactly one leading `:`. An empty key stays empty.
#[must_use]
pub fn prefixed_key(key: &str) -> String {
    if key.is_empty() || key.starts_with(PARAM_PREFIX) {
        key.to_string()
    } else {
        format!("{PARAM_PREFIX}{key}")
    }
}

/// Strips a single leading `:`.
#[must_use]
pub fn bare_key(key: &str) -> &str {
    key.strip_prefix(PARAM_PREFIX).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_key() {
        assert_eq!(prefixed_key("id"), ":id");
        assert_eq!(prefixed_key(":id"), ":id");
        assert_eq!(prefixed_key(""), "");
    }

    #[test]
    fn test_bare_key() {
        assert_eq!(bare_key(":id"), "id");
        assert_eq!(bare_key("id"), "id");
        assert_eq!(bare_key("::id"), ":id");
    }

    #[test]
    fn test_insertion_order_and_replace() {
        let mut params = PathParams::new();
        params.insert("org", "acme");
        params.insert("id", "1");
        params.insert(":org", "globex");

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, [(":org", "globex"), (":id", "1")]);

        let bare: Vec<_> = params.iter_bare().collect();
        assert_eq!(bare, [("org", "globex"), ("id", "1")]);
    }
}
