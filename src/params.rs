//! Route parameter extraction and query string parsing
//!
//! Types for working with values extracted from route patterns (like `:slug`
//! or `*rest`) and from URL query strings (like `?page=2&sort=date`).

use std::collections::HashMap;

/// Route parameters extracted from path segments
///
/// # Example
///
/// ```
/// use spa_navigator::RouteParams;
///
/// // Route pattern: /blog/:slug
/// // Matched path:  /blog/hello-world
/// let mut params = RouteParams::new();
/// params.insert("slug".to_string(), "hello-world".to_string());
///
/// assert_eq!(params.get("slug"), Some(&"hello-world".to_string()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: HashMap<String, String>,
}

impl RouteParams {
    /// Create new empty route params
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a hashmap
    pub fn from_map(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Get a parameter value as a string
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert a parameter
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Check if a parameter exists
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over all parameters
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.params.iter()
    }

    /// Check if parameters are empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

impl FromIterator<(String, String)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters parsed from a URL query string
///
/// Supports multiple values for the same key.
///
/// # Example
///
/// ```
/// use spa_navigator::QueryParams;
///
/// let query = QueryParams::parse("page=2&tag=rust&tag=wasm");
///
/// assert_eq!(query.get("page"), Some(&"2".to_string()));
/// assert_eq!(query.get_as::<u32>("page"), Some(2));
/// assert_eq!(query.get_all("tag").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: HashMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create new empty query params
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a query string (without the leading `?`)
    pub fn parse(query: &str) -> Self {
        let mut params: HashMap<String, Vec<String>> = HashMap::new();

        for pair in query.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params
                .entry(percent_decode(key))
                .or_default()
                .push(percent_decode(value));
        }

        Self { params }
    }

    /// Get the first value for a parameter
    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)?.first()
    }

    /// Get all values for a parameter
    ///
    /// Useful for keys that appear multiple times like `?tag=rust&tag=wasm`.
    pub fn get_all(&self, key: &str) -> Option<&Vec<String>> {
        self.params.get(key)
    }

    /// Get the first value parsed as type `T`
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Insert a parameter, appending when the key already exists
    pub fn insert(&mut self, key: String, value: String) {
        self.params.entry(key).or_default().push(value);
    }

    /// Check if a parameter exists
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Check if parameters are empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Get number of unique parameter keys
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

/// Split a location path into its path and query components.
///
/// ```
/// use spa_navigator::params::split_path_and_query;
///
/// assert_eq!(split_path_and_query("/blog?page=2"), ("/blog", Some("page=2")));
/// assert_eq!(split_path_and_query("/blog"), ("/blog", None));
/// ```
pub fn split_path_and_query(path: &str) -> (&str, Option<&str>) {
    match path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path, None),
    }
}

/// Minimal percent-decoding for query string components.
///
/// Escapes decode to bytes so multi-byte UTF-8 sequences like `%C3%A9`
/// reassemble correctly. Invalid escape sequences are passed through
/// verbatim; byte sequences that are not valid UTF-8 decode lossily.
fn percent_decode(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        match c {
            '%' => {
                let hex: String = chars.by_ref().take(2).collect();
                if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                    bytes.push(byte);
                } else {
                    bytes.push(b'%');
                    bytes.extend_from_slice(hex.as_bytes());
                }
            }
            '+' => bytes.push(b' '),
            _ => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_params_basic() {
        let mut params = RouteParams::new();
        params.insert("slug".to_string(), "hello".to_string());

        assert_eq!(params.get("slug"), Some(&"hello".to_string()));
        assert!(params.contains("slug"));
        assert!(!params.contains("missing"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn route_params_get_as() {
        let mut params = RouteParams::new();
        params.insert("id".to_string(), "42".to_string());
        params.insert("draft".to_string(), "true".to_string());

        assert_eq!(params.get_as::<u32>("id"), Some(42));
        assert_eq!(params.get_as::<bool>("draft"), Some(true));
        assert_eq!(params.get_as::<u32>("missing"), None);
        assert_eq!(params.get_as::<u32>("draft"), None);
    }

    #[test]
    fn route_params_from_iter() {
        let params: RouteParams = [("a".to_string(), "1".to_string())].into_iter().collect();
        assert_eq!(params.get("a"), Some(&"1".to_string()));
    }

    #[test]
    fn query_params_basic() {
        let query = QueryParams::parse("page=2&sort=date");

        assert_eq!(query.get("page"), Some(&"2".to_string()));
        assert_eq!(query.get("sort"), Some(&"date".to_string()));
        assert_eq!(query.get("missing"), None);
    }

    #[test]
    fn query_params_multiple_values() {
        let query = QueryParams::parse("tag=rust&tag=wasm");

        let tags = query.get_all("tag").unwrap();
        assert_eq!(tags, &vec!["rust".to_string(), "wasm".to_string()]);
        // get() returns the first value
        assert_eq!(query.get("tag"), Some(&"rust".to_string()));
    }

    #[test]
    fn query_params_valueless_key() {
        let query = QueryParams::parse("debug&page=1");
        assert_eq!(query.get("debug"), Some(&String::new()));
    }

    #[test]
    fn query_params_decoding() {
        let query = QueryParams::parse("q=hello%20world&name=a+b");
        assert_eq!(query.get("q"), Some(&"hello world".to_string()));
        assert_eq!(query.get("name"), Some(&"a b".to_string()));
    }

    #[test]
    fn query_params_multibyte_decoding() {
        let query = QueryParams::parse("q=caf%C3%A9&city=M%C3%BCnchen&emoji=%F0%9F%A6%80");
        assert_eq!(query.get("q"), Some(&"café".to_string()));
        assert_eq!(query.get("city"), Some(&"München".to_string()));
        assert_eq!(query.get("emoji"), Some(&"🦀".to_string()));
    }

    #[test]
    fn query_params_bad_escape_passes_through() {
        let query = QueryParams::parse("q=100%zz&p=50%");
        assert_eq!(query.get("q"), Some(&"100%zz".to_string()));
        assert_eq!(query.get("p"), Some(&"50%".to_string()));
    }

    #[test]
    fn query_params_empty_string() {
        let query = QueryParams::parse("");
        assert!(query.is_empty());
    }

    #[test]
    fn split_path_query() {
        assert_eq!(
            split_path_and_query("/blog?page=2&tag=rust"),
            ("/blog", Some("page=2&tag=rust"))
        );
        assert_eq!(split_path_and_query("/"), ("/", None));
    }
}
