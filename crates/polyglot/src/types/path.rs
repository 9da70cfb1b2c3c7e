//! Dot-segmented message paths.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error produced when parsing an invalid message path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path '{path}': {reason}")]
pub struct PathError {
    pub path: String,
    pub reason: String,
}

impl PathError {
    fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A normalized, dot-segmented message identifier.
///
/// Paths name messages within a locale-independent namespace. Segments are
/// non-blank and limited to ASCII letters, digits, `-` and `_`. The canonical
/// string form joins segments with `.`; equality and hashing use that form.
/// Paths are immutable; children and parents are derived functionally.
///
/// # Example
///
/// ```
/// use polyglot::Path;
///
/// let path = Path::parse("home.header.title").unwrap();
/// assert_eq!(path.last_segment(), Some("title"));
/// assert_eq!(path.parent().unwrap().to_string(), "home.header");
/// assert_eq!(Path::root().child(&path), path);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    value: String,
}

impl Path {
    /// The empty path.
    pub fn root() -> Self {
        Self {
            value: String::new(),
        }
    }

    /// Parse a dot-separated path string.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Ok(Self::root());
        }
        if path.starts_with('.') {
            return Err(PathError::new(path, "must not start with '.'"));
        }
        if path.ends_with('.') {
            return Err(PathError::new(path, "must not end with '.'"));
        }
        if path.contains("..") {
            return Err(PathError::new(path, "must not contain '..'"));
        }
        for segment in path.split('.') {
            validate_segment(path, segment)?;
        }
        Ok(Self {
            value: path.to_string(),
        })
    }

    /// Build a path from pre-split segments, skipping blank ones.
    ///
    /// Used by formatter providers to assemble conventional lookup paths
    /// such as `formats.money.<style>` where the style may be absent.
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Result<Self, PathError> {
        let mut value = String::new();
        for segment in segments {
            if segment.is_empty() {
                continue;
            }
            validate_segment(segment, segment)?;
            if !value.is_empty() {
                value.push('.');
            }
            value.push_str(segment);
        }
        Ok(Self { value })
    }

    pub fn is_root(&self) -> bool {
        self.value.is_empty()
    }

    /// The canonical dot-joined form.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.value.split('.').filter(|s| !s.is_empty())
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments().next_back()
    }

    /// A new path with `sub` appended below this one.
    pub fn child(&self, sub: &Path) -> Path {
        if self.is_root() {
            return sub.clone();
        }
        if sub.is_root() {
            return self.clone();
        }
        Path {
            value: format!("{}.{}", self.value, sub.value),
        }
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        if self.is_root() {
            return None;
        }
        match self.value.rfind('.') {
            Some(pos) => Some(Path {
                value: self.value[..pos].to_string(),
            }),
            None => Some(Path::root()),
        }
    }
}

fn validate_segment(path: &str, segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        return Err(PathError::new(path, "blank segment"));
    }
    for c in segment.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
            return Err(PathError::new(
                path,
                format!("invalid character '{c}' in segment '{segment}'"),
            ));
        }
    }
    Ok(())
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.value)
        }
    }
}

impl std::str::FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl TryFrom<String> for Path {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Path::parse(&value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.value
    }
}
