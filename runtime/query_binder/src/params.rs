use indexmap::IndexMap;
use smallvec::SmallVec;

/// The raw, percent-decoded parameters of a query string.
///
/// `RawQueryParams` is a multimap: every parameter name maps to the ordered list of
/// values it was given in the query string.
/// Names are kept in the order they first appeared, values in the order they arrived.
///
/// # Example
///
/// ```rust
/// use query_binder::RawQueryParams;
///
/// let params = RawQueryParams::parse("room_id=1&room_id=2&name=Hi%20there");
/// assert_eq!(params.get("name"), Some("Hi there"));
/// assert_eq!(params.get_all("room_id").collect::<Vec<_>>(), vec!["1", "2"]);
/// assert_eq!(params.get("missing"), None);
/// ```
///
/// # What about nested parameters?
///
/// There is no namespacing: `address[city]=Rome` is stored under the `address[city]`
/// name, verbatim.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawQueryParams {
    inner: IndexMap<String, SmallVec<[String; 1]>>,
}

impl RawQueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, using the `application/x-www-form-urlencoded` grammar.
    ///
    /// `+` is decoded as a space and percent-encoded sequences are decoded.
    /// Pairs without a `=` are stored with an empty value.
    /// A leading `?`, if present, is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        form_urlencoded::parse(query.as_bytes()).collect()
    }

    /// Parse the query component of a URI.
    ///
    /// An empty parameter set is returned if the URI has no query component.
    pub fn from_uri(uri: &http::Uri) -> Self {
        Self::parse(uri.query().unwrap_or_default())
    }

    /// Append a value to the list of values for `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Returns the first value registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns all the values registered under `name`, in arrival order.
    ///
    /// The iterator is empty if `name` never appeared in the query string.
    pub fn get_all(&self, name: &str) -> impl ExactSizeIterator<Item = &str> {
        self.inner
            .get(name)
            .map(|values| values.as_slice())
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
    }

    /// Returns `true` if `name` appeared in the query string, even with an empty value.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Returns the number of distinct parameter names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the query string contained no parameters.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over `(name, values)` pairs, in first-arrival order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &[String])> {
        self.inner
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl<K, V> Extend<(K, V)> for RawQueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RawQueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}
