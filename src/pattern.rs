//! Route path pattern compilation
//!
//! Turns a route path string into an anchored regex matcher plus an ordered
//! list of parameter names. Supported syntax:
//!
//! - Literal segments: `/blog/archive`
//! - Dynamic segment: `/blog/:slug` (captures one segment, excludes `/`)
//! - Catch-all: `/docs/*rest` (captures one or more trailing segments,
//!   including slashes)
//!
//! Compilation walks the pattern character by character rather than running a
//! single substitution regex over it, so literal metacharacters are escaped
//! exactly once. Every compiled matcher is anchored and tolerates one
//! trailing slash, so `/about` and `/about/` resolve identically.

use crate::error::PatternError;
use crate::params::RouteParams;
use regex::{Regex, RegexBuilder};

/// Maximum allowed length for a route pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A compiled route path pattern.
///
/// Invariant: the regex has exactly `param_names.len()` capture groups, in
/// declaration order.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// The original pattern string.
    pattern: String,
    /// Anchored matcher.
    regex: Regex,
    /// Parameter names in declaration order.
    param_names: Vec<String>,
}

impl CompiledPattern {
    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the parameter names in declaration order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns true if the pattern captures no parameters.
    pub fn is_static(&self) -> bool {
        self.param_names.is_empty()
    }

    /// Match a request path against this pattern.
    ///
    /// Returns the extracted parameters on success, pairing each capture
    /// group with its declared name.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let caps = self.regex.captures(path)?;

        let mut params = RouteParams::new();
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.insert(name.clone(), m.as_str().to_string());
            }
        }

        Some(params)
    }

    /// Check whether a path matches without extracting parameters.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Compile a route path pattern.
///
/// The root path `/` compiles to an exact matcher that also accepts the
/// empty string, so both `/` and `` resolve to the root route.
pub fn compile_pattern(path: &str) -> Result<CompiledPattern, PatternError> {
    if path.len() > MAX_PATTERN_LENGTH {
        return Err(PatternError::TooLong {
            len: path.len(),
            max: MAX_PATTERN_LENGTH,
        });
    }

    // Root is special-cased: an optional single slash and nothing else.
    if path == "/" {
        return Ok(CompiledPattern {
            pattern: path.to_string(),
            regex: build_regex(r"^/?$", path)?,
            param_names: Vec::new(),
        });
    }

    let (regex_str, param_names) = translate(path)?;
    let regex = build_regex(&regex_str, path)?;

    Ok(CompiledPattern {
        pattern: path.to_string(),
        regex,
        param_names,
    })
}

/// Compile the maximally permissive fallback used when a pattern is
/// malformed: matches any path starting with `/`.
///
/// A route that matches too much is preferred over no router at all; the
/// route table builder flags routes built this way.
pub fn fallback_pattern(path: &str) -> CompiledPattern {
    CompiledPattern {
        pattern: path.to_string(),
        // Hand-checked literal, cannot fail to compile.
        regex: Regex::new(r"^/.*$").unwrap_or_else(|_| unreachable!()),
        param_names: Vec::new(),
    }
}

/// Translate a pattern string into a regex source and its parameter names.
fn translate(path: &str) -> Result<(String, Vec<String>), PatternError> {
    let mut regex_str = String::from("^");
    let mut param_names = Vec::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ':' => {
                let name = consume_identifier(&mut chars);
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName {
                        pattern: path.to_string(),
                    });
                }
                param_names.push(name);
                regex_str.push_str("([^/]+)");
            }
            '*' => {
                let name = consume_identifier(&mut chars);
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName {
                        pattern: path.to_string(),
                    });
                }
                param_names.push(name);
                regex_str.push_str("(.*)");
            }
            // Escape regex metacharacters literally.
            '/' | '.' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|'
            | '\\' => {
                regex_str.push('\\');
                regex_str.push(c);
            }
            _ => regex_str.push(c),
        }
    }

    // Trailing-slash tolerance before the anchor.
    regex_str.push_str("/?$");
    Ok((regex_str, param_names))
}

/// Consume an identifier (`[A-Za-z0-9_]+`) from the char stream.
fn consume_identifier(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&next) = chars.peek() {
        if next.is_alphanumeric() || next == '_' {
            name.push(next);
            chars.next();
        } else {
            break;
        }
    }
    name
}

fn build_regex(source: &str, pattern: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(source)
        .size_limit(MAX_REGEX_SIZE)
        .build()
        .map_err(|e| PatternError::Regex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_pattern() {
        let pattern = compile_pattern("/about").unwrap();
        assert!(pattern.is_static());
        assert!(pattern.is_match("/about"));
        assert!(!pattern.is_match("/about/team"));
        assert!(!pattern.is_match("/abou"));
    }

    #[test]
    fn root_pattern() {
        let pattern = compile_pattern("/").unwrap();
        assert!(pattern.is_match("/"));
        assert!(pattern.is_match(""));
        assert!(!pattern.is_match("/anything"));
    }

    #[test]
    fn single_param() {
        let pattern = compile_pattern("/blog/:slug").unwrap();
        assert_eq!(pattern.param_names(), &["slug"]);

        let params = pattern.matches("/blog/hello-world").unwrap();
        assert_eq!(params.get("slug"), Some(&"hello-world".to_string()));

        // A dynamic segment never crosses a slash.
        assert!(pattern.matches("/blog/hello/world").is_none());
        assert!(pattern.matches("/blog").is_none());
    }

    #[test]
    fn params_extracted_in_declaration_order() {
        let pattern = compile_pattern("/users/:user_id/posts/:post_id").unwrap();
        assert_eq!(pattern.param_names(), &["user_id", "post_id"]);

        let params = pattern.matches("/users/42/posts/7").unwrap();
        assert_eq!(params.get("user_id"), Some(&"42".to_string()));
        assert_eq!(params.get("post_id"), Some(&"7".to_string()));
    }

    #[test]
    fn catch_all() {
        let pattern = compile_pattern("/docs/*rest").unwrap();
        assert_eq!(pattern.param_names(), &["rest"]);

        let params = pattern.matches("/docs/a/b/c").unwrap();
        assert_eq!(params.get("rest"), Some(&"a/b/c".to_string()));

        assert!(pattern.matches("/other/a").is_none());
    }

    #[test]
    fn trailing_slash_tolerated() {
        let pattern = compile_pattern("/about").unwrap();
        assert!(pattern.is_match("/about"));
        assert!(pattern.is_match("/about/"));

        let pattern = compile_pattern("/blog/:slug").unwrap();
        let a = pattern.matches("/blog/x").unwrap();
        let b = pattern.matches("/blog/x/").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn metacharacters_escaped() {
        let pattern = compile_pattern("/api/v1.0").unwrap();
        assert!(pattern.is_match("/api/v1.0"));
        assert!(!pattern.is_match("/api/v1X0"));

        let pattern = compile_pattern("/files/(archive)").unwrap();
        assert!(pattern.is_match("/files/(archive)"));
    }

    #[test]
    fn capture_count_matches_param_names() {
        let pattern = compile_pattern("/a/:x/b/:y/*z").unwrap();
        assert_eq!(pattern.regex.captures_len() - 1, pattern.param_names().len());
    }

    #[test]
    fn empty_param_name_rejected() {
        assert!(matches!(
            compile_pattern("/users/:"),
            Err(PatternError::EmptyParamName { .. })
        ));
        assert!(matches!(
            compile_pattern("/files/*"),
            Err(PatternError::EmptyParamName { .. })
        ));
    }

    #[test]
    fn oversized_pattern_rejected() {
        let long = "/".to_string() + &"a".repeat(MAX_PATTERN_LENGTH + 1);
        assert!(matches!(
            compile_pattern(&long),
            Err(PatternError::TooLong { .. })
        ));
    }

    #[test]
    fn fallback_matches_everything_under_root() {
        let pattern = fallback_pattern("/broken/:");
        assert!(pattern.is_match("/anything/at/all"));
        assert!(pattern.is_match("/"));
        assert!(!pattern.is_match("no-leading-slash"));
        assert_eq!(pattern.pattern(), "/broken/:");
    }
}
