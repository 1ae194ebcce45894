//! Module for paths and path matchers
//!
//! A path consists of zero or more [`PathSegment`] elements which either represent the index of a
//! JSON array item or the name of a JSON object member. Combined they describe the location of a
//! value in a JSON document, for example `$.a.items[2]` is the item at index 2 of the array which
//! is the value of member `items`, which itself is nested in the value of member `a`.
//!
//! A [`PathMatcher`] decides whether a path is the location a caller is looking for. The most
//! common matcher is a [`PathPattern`], which can be created with the [`path_pattern!`] macro or
//! parsed from its string form. Closures taking a `&[PathSegment]` are matchers as well.

use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// A segment of a path
///
/// A segment can either represent the index of a JSON array item or the name of a JSON object member.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum PathSegment {
    /// Index (starting at 0) of a JSON array item
    Index(u32),
    /// Name of a JSON object member
    Member(String),
}

/// Creates a [`PathSegment::Index`] with the number as index
impl From<u32> for PathSegment {
    fn from(v: u32) -> Self {
        PathSegment::Index(v)
    }
}

/// Creates a [`PathSegment::Member`] with the string as member name
impl From<String> for PathSegment {
    fn from(v: String) -> Self {
        PathSegment::Member(v)
    }
}

/// Creates a [`PathSegment::Member`] with the string as member name
impl From<&str> for PathSegment {
    fn from(v: &str) -> Self {
        PathSegment::Member(v.to_owned())
    }
}

/// Formats a path in absolute dot-notation, for example `$.a.items[2]`
///
/// The empty path (the top-level value) is formatted as `$`.
pub fn format_path(path: &[PathSegment]) -> String {
    let mut formatted = "$".to_owned();
    for segment in path {
        match segment {
            PathSegment::Index(index) => formatted.push_str(&format!("[{index}]")),
            PathSegment::Member(name) => {
                formatted.push('.');
                formatted.push_str(name);
            }
        }
    }
    formatted
}

/// Predicate deciding whether a path is the location a caller is looking for
///
/// Implementations should be pure functions of the given path; the reader evaluates them
/// repeatedly while skipping forward through the JSON document.
///
/// # Examples
/// Closures are path matchers as well:
/// ```
/// # use pathwise::path::*;
/// let matcher = |path: &[PathSegment]| path.last() == Some(&PathSegment::from("items"));
/// assert!(matcher.matches(&[PathSegment::from("a"), PathSegment::from("items")]));
/// ```
pub trait PathMatcher {
    /// Checks whether `path` is matched
    fn matches(&self, path: &[PathSegment]) -> bool;
}

impl<F: Fn(&[PathSegment]) -> bool> PathMatcher for F {
    fn matches(&self, path: &[PathSegment]) -> bool {
        self(path)
    }
}

/// A segment of a [`PathPattern`]
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum PatternSegment {
    /// Matches exactly the array item with this index
    Index(u32),
    /// Matches exactly the object member with this name
    Member(String),
    /// Matches any array item; written as `[*]`
    AnyIndex,
    /// Matches any object member; written as `*`
    AnyMember,
}

impl PatternSegment {
    fn matches(&self, segment: &PathSegment) -> bool {
        match (self, segment) {
            (PatternSegment::Index(expected), PathSegment::Index(actual)) => expected == actual,
            (PatternSegment::Member(expected), PathSegment::Member(actual)) => expected == actual,
            (PatternSegment::AnyIndex, PathSegment::Index(_)) => true,
            (PatternSegment::AnyMember, PathSegment::Member(_)) => true,
            _ => false,
        }
    }
}

/// Creates a [`PatternSegment::Index`] with the number as index
impl From<u32> for PatternSegment {
    fn from(v: u32) -> Self {
        PatternSegment::Index(v)
    }
}

/// Creates a [`PatternSegment::Member`] with the string as member name
impl From<&str> for PatternSegment {
    fn from(v: &str) -> Self {
        PatternSegment::Member(v.to_owned())
    }
}

/// Creates a [`PatternSegment::Member`] with the string as member name
impl From<String> for PatternSegment {
    fn from(v: String) -> Self {
        PatternSegment::Member(v)
    }
}

impl From<PathSegment> for PatternSegment {
    fn from(v: PathSegment) -> Self {
        match v {
            PathSegment::Index(index) => PatternSegment::Index(index),
            PathSegment::Member(name) => PatternSegment::Member(name),
        }
    }
}

/// Path matcher which matches paths segment by segment
///
/// A path is matched if it has the same number of segments as the pattern and every
/// segment is matched by the pattern segment at the same position. Wildcard segments
/// ([`PatternSegment::AnyIndex`], [`PatternSegment::AnyMember`]) match any segment of
/// the corresponding kind.
///
/// # Examples
/// ```
/// # use pathwise::path::*;
/// let pattern: PathPattern = "rows[*].cells".parse()?;
/// assert!(pattern.matches(&[
///     PathSegment::from("rows"),
///     PathSegment::from(3),
///     PathSegment::from("cells"),
/// ]));
/// assert!(!pattern.matches(&[PathSegment::from("rows")]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct PathPattern {
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Creates a pattern from its segments
    pub fn new(segments: Vec<PatternSegment>) -> Self {
        PathPattern { segments }
    }

    /// Creates a pattern which matches exactly the given path
    pub fn exact(path: &[PathSegment]) -> Self {
        PathPattern::new(path.iter().cloned().map(PatternSegment::from).collect())
    }

    /// Gets the segments of this pattern
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }
}

impl PathMatcher for PathPattern {
    fn matches(&self, path: &[PathSegment]) -> bool {
        self.segments.len() == path.len()
            && self
                .segments
                .iter()
                .zip(path)
                .all(|(pattern_segment, segment)| pattern_segment.matches(segment))
    }
}

impl Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PatternSegment::Index(index) => write!(f, "[{index}]")?,
                PatternSegment::Member(name) => write!(f, ".{name}")?,
                PatternSegment::AnyIndex => write!(f, "[*]")?,
                PatternSegment::AnyMember => write!(f, ".*")?,
            }
        }
        Ok(())
    }
}

/// Error which occurred while parsing a [`PathPattern`]
#[derive(Error, PartialEq, Eq, Clone, Debug)]
#[error("parse error at index {index}: {message}")]
pub struct PatternParseError {
    /// Index (starting at 0) where the error occurred within the string
    pub index: usize,
    /// Message describing why the error occurred
    pub message: String,
}

fn parse_error<T>(index: usize, message: &str) -> Result<T, PatternParseError> {
    Err(PatternParseError {
        index,
        message: message.to_owned(),
    })
}

/// Parses a pattern in dot-notation, for example `outer[4].inner`, `rows[*].cells` or `a.*`
///
/// The string must not start with `$` (respectively `$.`) and member names are limited to contain
/// only `a`-`z`, `A`-`Z`, `0`-`9`, `-` and `_`. A member name of `*` matches any member and an index
/// of `[*]` matches any array item. The string must not be empty.
impl FromStr for PathPattern {
    type Err = PatternParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return parse_error(0, "empty path");
        }

        let bytes = s.as_bytes();
        if bytes[0] == b'.' {
            return parse_error(0, "leading '.' is not allowed");
        }

        let mut segments = Vec::new();
        let mut index = 0;
        let mut is_array_item = bytes[0] == b'[';

        loop {
            if is_array_item {
                // Skip '['
                index += 1;
                let end_index = match bytes[index..].iter().position(|b| *b == b']') {
                    None => return parse_error(index, "missing ']' for array index"),
                    Some(i) => index + i,
                };
                let index_str = &s[index..end_index];

                if index_str.is_empty() {
                    return parse_error(index, "missing index value");
                }
                if index_str == "*" {
                    segments.push(PatternSegment::AnyIndex);
                } else {
                    if let Some(i) = index_str.bytes().position(|b| !b.is_ascii_digit()) {
                        return parse_error(index + i, "invalid index digit");
                    }
                    if index_str.len() > 1 && index_str.starts_with('0') {
                        return parse_error(index, "leading 0 is not allowed");
                    }
                    let value = u32::from_str(index_str).map_err(|e| PatternParseError {
                        index,
                        message: format!("invalid index value: {e}"),
                    })?;
                    segments.push(PatternSegment::Index(value));
                }
                index = end_index + 1;
            } else {
                let end_index = bytes[index..]
                    .iter()
                    .position(|b| *b == b'.' || *b == b'[')
                    .map_or(bytes.len(), |i| index + i);
                let name = &s[index..end_index];

                if name.is_empty() {
                    return parse_error(index, "missing member name");
                }
                if name == "*" {
                    segments.push(PatternSegment::AnyMember);
                } else {
                    if let Some(i) = name
                        .bytes()
                        .position(|b| !(b.is_ascii_alphanumeric() || b == b'-' || b == b'_'))
                    {
                        return parse_error(index + i, "unsupported char in member name");
                    }
                    segments.push(PatternSegment::Member(name.to_owned()));
                }
                index = end_index;
            }

            if index >= bytes.len() {
                break;
            }
            match bytes[index] {
                b'.' => {
                    is_array_item = false;
                    index += 1;
                }
                // '[' is skipped at the start of the next iteration
                b'[' => is_array_item = true,
                _ => return parse_error(index, "expecting either '.' or '['"),
            }
        }

        Ok(PathPattern::new(segments))
    }
}

/// Creates a [`PathPattern`] from pattern segments
///
/// The arguments to this macro represent the pattern segments:
/// - numbers of type `u32` are converted to [`PatternSegment::Index`]
/// - strings are converted to [`PatternSegment::Member`]
/// - [`PatternSegment`] values are used as is, for example for wildcards
///
/// # Examples
/// ```
/// # use pathwise::path::*;
/// let pattern = path_pattern!["outer", PatternSegment::AnyIndex, "inner"];
/// assert_eq!("$.outer[*].inner", pattern.to_string());
/// ```
#[macro_export]
macro_rules! path_pattern {
    ( $( $segment:expr ),* $(,)? ) => {
        $crate::path::PathPattern::new(vec![
            $(
                $crate::path::PatternSegment::from($segment),
            )*
        ])
    };
}

// Re-export the macro to be available under the `pathwise::path` module path
#[doc(inline)]
pub use path_pattern;
