//! The fake response record produced by handlers.

use crate::body::Body;

/// A fake HTTP response.
///
/// A response is a plain record of status code, headers and body. Handlers
/// can build one field by field, or convert from the `(status, headers,
/// body)` triple directly:
///
/// ```
/// use ruse::Response;
///
/// let a = Response::new(201)
///     .header("content-type", "application/json")
///     .body("{}");
///
/// let b: Response = (
///     201,
///     vec![("content-type".to_string(), "application/json".to_string())],
///     "{}",
/// )
///     .into();
///
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    /// The HTTP status code.
    pub status_code: u16,
    /// Response headers, in insertion order.
    pub headers: Vec<(String, String)>,
    /// The response body.
    pub body: Body,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: Vec::new(),
            body: Body::empty(),
        }
    }
}

impl Response {
    /// Create a new response with the given status code and no headers or
    /// body.
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    /// Append a header to the response.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the response body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }
}

impl<B: Into<Body>> From<(u16, Vec<(String, String)>, B)> for Response {
    fn from((status_code, headers, body): (u16, Vec<(String, String)>, B)) -> Self {
        Self {
            status_code,
            headers,
            body: body.into(),
        }
    }
}
