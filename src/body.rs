//! Provides the in-memory body type used by fake requests and responses.

use std::{borrow::Cow, fmt, str};

/// The contents of a fake request or response body.
///
/// Bodies are plain byte buffers. A [`Body`] can be created from strings or
/// bytes using the [`Into`](std::convert::Into) trait:
///
/// ```
/// use ruse::Body;
///
/// let body: Body = "hello world".into();
/// assert_eq!(body.text(), "hello world");
/// ```
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Body(Vec<u8>);

impl Body {
    /// Create a new empty body.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Get the size of the body in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the body contents as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the body contents as text, replacing any invalid UTF-8 sequences
    /// with the replacement character.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Consume the body and return the underlying buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match str::from_utf8(&self.0) {
            Ok(text) => write!(f, "Body({:?})", text),
            Err(_) => write!(f, "Body({} bytes)", self.0.len()),
        }
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}
