// Path expressions: `a/b/c`, `a.b.c`, or any mix of the two.
// A backslash before a separator (`\.`, `\/`) keeps it inside the segment.
// Empty segments in the prefix (`a..b`, `/a`) are skipped; an empty key is not.
use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    raw: String,
    segments: Vec<String>,
}

impl Path {
    /// All segments, key included. Never empty.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments walked before reaching the key's container.
    pub fn prefix(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn key(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// The expression as typed by the user.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_path(s)
    }
}

fn is_separator(c: char) -> bool {
    c == '.' || c == '/'
}

/// Split a raw path expression into segments.
pub fn parse_path(raw: &str) -> Result<Path> {
    let mut parts: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some(&next) if is_separator(next) => {
                    cur.push(next);
                    chars.next();
                }
                _ => cur.push('\\'),
            },
            c if is_separator(c) => parts.push(std::mem::take(&mut cur)),
            c => cur.push(c),
        }
    }
    parts.push(cur);

    // the key is whatever follows the last separator; it must be non-empty
    let key = parts.pop().unwrap_or_default();
    if key.is_empty() {
        return Err(Error::EmptyPath);
    }
    let mut segments: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
    segments.push(key);

    Ok(Path {
        raw: raw.to_string(),
        segments,
    })
}
