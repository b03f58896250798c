//! Path templates
//!
//! `/courses/{course_id}` binds one segment, `/files/{path..}` binds the
//! rest of the path and must come last.

use std::collections::HashSet;
use std::fmt;

use meete_domain::error::{Error, Result};

/// One segment of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    Static(String),
    /// Single-segment parameter
    Param(String),
    /// Parameter taking every remaining segment
    Tail(String),
}

/// Validated path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse and validate a template
    pub fn parse(raw: &str) -> Result<Self> {
        if !raw.is_empty() && !raw.starts_with('/') {
            return Err(Error::invalid_argument(format!(
                "Path '{raw}' must start with '/'"
            )));
        }

        let parts: Vec<&str> = raw.split('/').filter(|part| !part.is_empty()).collect();
        let mut segments = Vec::with_capacity(parts.len());
        let mut names = HashSet::new();

        for (index, part) in parts.iter().enumerate() {
            let segment = match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(inner) => {
                    let (name, tail) = match inner.strip_suffix("..") {
                        Some(name) => (name, true),
                        None => (inner, false),
                    };
                    if !is_identifier(name) {
                        return Err(Error::invalid_argument(format!(
                            "Invalid parameter '{{{inner}}}' in path '{raw}'"
                        )));
                    }
                    if !names.insert(name) {
                        return Err(Error::invalid_argument(format!(
                            "Duplicate parameter '{name}' in path '{raw}'"
                        )));
                    }
                    if tail && index + 1 != parts.len() {
                        return Err(Error::invalid_argument(format!(
                            "Tail parameter '{name}' must be the last segment of '{raw}'"
                        )));
                    }
                    if tail {
                        Segment::Tail(name.to_string())
                    } else {
                        Segment::Param(name.to_string())
                    }
                }
                None if !part.chars().all(is_path_char) => {
                    return Err(Error::invalid_argument(format!(
                        "Malformed segment '{part}' in path '{raw}'"
                    )));
                }
                None => Segment::Static((*part).to_string()),
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: if raw.is_empty() { "/".to_string() } else { raw.to_string() },
            segments,
        })
    }

    /// Template as declared
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Parameters in template order: name, segment index, whether tail
    pub fn params(&self) -> Vec<(&str, usize, bool)> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(index, segment)| match segment {
                Segment::Param(name) => Some((name.as_str(), index, false)),
                Segment::Tail(name) => Some((name.as_str(), index, true)),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// Whether the template binds no parameter
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Static(_)))
    }

    /// Same path in `<param>` syntax
    pub fn angle_path(&self) -> String {
        let rendered: Vec<String> = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Static(text) => text.clone(),
                Segment::Param(name) => format!("<{name}>"),
                Segment::Tail(name) => format!("<{name}..>"),
            })
            .collect();
        format!("/{}", rendered.join("/"))
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Unreserved characters, sub-delimiters, `:` and `@`
fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~!$&'()*+,;=:@".contains(c)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(first) if first == '_' || first.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
