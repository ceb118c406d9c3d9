//! JSON Pointer style attribute paths.
//!
//! `""` addresses the whole resource; every other path is a sequence of
//! `/`-prefixed segments following RFC 6901 (`~1` escapes `/`, `~0` escapes `~`).
//!
//! ```rust
//! use fieldguard_core::AttributePath;
//!
//! let city: AttributePath = "/address/city".parse().unwrap();
//! let address = city.parent().unwrap();
//! assert!(address.is_ancestor_of(&city));
//! assert_eq!(city.last_segment(), Some("city"));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Immutable pointer to a field or subtree inside a JSON resource.
///
/// Equality, hashing and ordering all follow the canonical string form, so
/// `BTreeMap<AttributePath, _>` iterates paths lexicographically.
#[derive(Clone)]
pub struct AttributePath {
    pointer: String,
    segments: Vec<String>,
}

impl AttributePath {
    /// The whole-resource root (`""`).
    pub fn root() -> Self {
        Self {
            pointer: String::new(),
            segments: Vec::new(),
        }
    }

    /// Parses a pointer string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttributeExpression`] when the input does not
    /// start with `/`, contains an empty segment (including a trailing slash),
    /// or uses an escape other than `~0`/`~1`.
    pub fn parse(expression: &str) -> Result<Self> {
        if expression.is_empty() {
            return Ok(Self::root());
        }
        let Some(body) = expression.strip_prefix('/') else {
            return Err(Error::invalid_attribute(expression, "must start with '/'"));
        };

        let mut segments = Vec::new();
        for raw in body.split('/') {
            if raw.is_empty() {
                return Err(Error::invalid_attribute(expression, "empty path segment"));
            }
            segments.push(unescape(expression, raw)?);
        }

        Ok(Self {
            pointer: expression.to_string(),
            segments,
        })
    }

    /// Returns `true` for the whole-resource root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Unescaped segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Canonical pointer string, usable with `serde_json::Value::pointer`.
    pub fn as_str(&self) -> &str {
        &self.pointer
    }

    /// The enclosing path, or `None` for the root.
    pub fn parent(&self) -> Option<AttributePath> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self::from_segments(rest.to_vec()))
    }

    /// Unescaped final segment, or `None` for the root.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Appends one (unescaped) segment.
    #[must_use]
    pub fn child(&self, segment: &str) -> AttributePath {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self::from_segments(segments)
    }

    /// Strict ancestry, bounded at segment boundaries.
    ///
    /// `/ab` is not an ancestor of `/abc`, and no path is its own ancestor.
    pub fn is_ancestor_of(&self, other: &AttributePath) -> bool {
        other.segments.len() > self.segments.len() && other.segments.starts_with(&self.segments)
    }

    /// Inverse of [`is_ancestor_of`](Self::is_ancestor_of).
    pub fn is_descendant_of(&self, other: &AttributePath) -> bool {
        other.is_ancestor_of(self)
    }

    /// Walks from this path's parent up to the root (inclusive).
    pub fn ancestors(&self) -> impl Iterator<Item = AttributePath> + '_ {
        (0..self.segments.len())
            .rev()
            .map(|len| Self::from_segments(self.segments[..len].to_vec()))
    }

    fn from_segments(segments: Vec<String>) -> Self {
        let pointer = segments.iter().fold(String::new(), |mut acc, segment| {
            acc.push('/');
            acc.push_str(&escape(segment));
            acc
        });
        Self { pointer, segments }
    }
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn unescape(expression: &str, raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => {
                return Err(Error::invalid_attribute(
                    expression,
                    "'~' must be followed by '0' or '1'",
                ))
            }
        }
    }
    Ok(out)
}

impl PartialEq for AttributePath {
    fn eq(&self, other: &Self) -> bool {
        self.pointer == other.pointer
    }
}

impl Eq for AttributePath {}

impl Hash for AttributePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pointer.hash(state);
    }
}

impl PartialOrd for AttributePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttributePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pointer.cmp(&other.pointer)
    }
}

impl fmt::Debug for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttributePath({:?})", self.pointer)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pointer)
    }
}

impl FromStr for AttributePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for AttributePath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for AttributePath {
    fn as_ref(&self) -> &str {
        &self.pointer
    }
}

impl Serialize for AttributePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pointer)
    }
}

impl<'de> Deserialize<'de> for AttributePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
