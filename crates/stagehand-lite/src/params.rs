//! Matched path parameters.

use smallvec::SmallVec;

/// Parameters stored inline before spilling to the heap.
const INLINE_PARAMS: usize = 4;

/// A single matched path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name as written in the route, without any marker.
    pub key: String,
    /// Matched value.
    pub value: String,
}

impl Param {
    /// Creates a parameter.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered list of matched path parameters.
///
/// Lookup is linear; routes rarely carry more than a handful of parameters.
/// Duplicate keys are allowed and the first match wins.
///
/// # Example
///
/// ```rust
/// use stagehand_lite::{Param, Params};
///
/// let params: Params = vec![Param::new("org", "acme"), Param::new("id", "7")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(params.by_name("id"), Some("7"));
/// assert_eq!(params.iter().next().unwrap().key, "org");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: SmallVec<[Param; INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` parameters.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Appends a parameter.
    pub fn push(&mut self, param: Param) {
        self.inner.push(param);
    }

    /// Returns the value of the first parameter named `key`.
    #[must_use]
    pub fn by_name(&self, key: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Returns the parameters in match order.
    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.inner.iter()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<Param> for Params {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
