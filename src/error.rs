//! Types for error handling.

use http::Method;
use std::error::Error as StdError;
use std::fmt;

/// All possible types of errors that can be returned from ruse.
///
/// Errors surface to the caller of the intercepted request, never to the
/// fake "server" side: an unmocked request or a failing handler is a
/// test-authoring bug and is reported loudly by default.
#[derive(Debug)]
pub enum Error {
    /// A request was finalized more than once.
    AlreadyResponded,
    /// A handler matched the request but returned an error.
    Handler {
        /// The intercepted request method.
        method: Method,
        /// The intercepted request path.
        path: String,
        /// The original error returned by the handler.
        source: Box<dyn StdError + Send + Sync>,
    },
    /// A verb could not be parsed into an HTTP method.
    InvalidMethod(http::method::InvalidMethod),
    /// A request was sent while no interception session was installed.
    NoSession,
    /// No handler was registered for the request's verb and path.
    Unhandled {
        /// The intercepted request method.
        method: Method,
        /// The intercepted request path.
        path: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AlreadyResponded => f.write_str("request has already been responded to"),
            Error::Handler {
                method,
                path,
                source,
            } => write!(
                f,
                "intercepted {} {} but the handler returned an error: {}",
                method, path, source
            ),
            Error::InvalidMethod(e) => write!(f, "invalid HTTP method: {}", e),
            Error::NoSession => f.write_str("no interception session is installed"),
            Error::Unhandled { method, path } => write!(
                f,
                "intercepted {} {} but no handler was defined for this type of request",
                method, path
            ),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Handler { source, .. } => {
                let source: &(dyn StdError + 'static) = source.as_ref();
                Some(source)
            }
            Error::InvalidMethod(e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<http::method::InvalidMethod> for Error {
    fn from(error: http::method::InvalidMethod) -> Error {
        Error::InvalidMethod(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unhandled_message_names_verb_and_path() {
        let error = Error::Unhandled {
            method: Method::GET,
            path: "/widgets".into(),
        };

        let message = error.to_string();
        assert!(message.contains("GET"));
        assert!(message.contains("/widgets"));
    }

    #[test]
    fn handler_error_preserves_source() {
        let error = Error::Handler {
            method: Method::PUT,
            path: "/widgets/1".into(),
            source: "boom".into(),
        };

        let message = error.to_string();
        assert!(message.contains("PUT"));
        assert!(message.contains("/widgets/1"));
        assert!(message.contains("boom"));
        assert!(error.source().is_some());
    }
}
