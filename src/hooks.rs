//! Override points for the dispatch lifecycle.

use crate::{body::Body, error::Error, request::Request};
use http::Method;
use std::error::Error as StdError;

/// Hooks into the request dispatch lifecycle.
///
/// Every method has a default: the prepare hooks are identity transforms,
/// `handled` is a no-op, and the failure hooks are fail-loud. Harnesses that
/// want a different policy implement the trait and install it with
/// [`SessionBuilder::hooks`](crate::SessionBuilder::hooks):
///
/// ```
/// use ruse::{Hooks, Session};
///
/// struct JsonDefaults;
///
/// impl Hooks for JsonDefaults {
///     fn prepare_headers(&self, mut headers: Vec<(String, String)>) -> Vec<(String, String)> {
///         headers.push(("content-type".into(), "application/json".into()));
///         headers
///     }
/// }
///
/// let session = Session::builder().hooks(JsonDefaults).start(|_| {});
/// session.shutdown();
/// ```
pub trait Hooks: Send + Sync {
    /// Transform response headers before the response is finalized.
    fn prepare_headers(&self, headers: Vec<(String, String)>) -> Vec<(String, String)> {
        headers
    }

    /// Transform the response body before the response is finalized.
    fn prepare_body(&self, body: Body) -> Body {
        body
    }

    /// Called after a request has been responded to, whether immediately or
    /// through deferred resolution.
    fn handled(&self, method: &Method, path: &str, request: &Request) {
        let _ = (method, path, request);
    }

    /// Called when no route matches a request, after the request has been
    /// journaled as unhandled.
    ///
    /// An unmocked request is a test-authoring bug, so the default fails
    /// loudly. An override may respond to the request itself (for example
    /// with a synthetic 404) and return `Ok` for a softer policy.
    fn unhandled(&self, method: &Method, path: &str, request: &Request) -> Result<(), Error> {
        let _ = request;

        Err(Error::Unhandled {
            method: method.clone(),
            path: path.to_owned(),
        })
    }

    /// Called when a matched handler returns an error.
    ///
    /// The returned error surfaces to the caller of the intercepted request.
    /// The default wraps the original error with verb and path context while
    /// keeping it reachable through `source()`.
    fn errored(
        &self,
        method: &Method,
        path: &str,
        request: &Request,
        error: Box<dyn StdError + Send + Sync>,
    ) -> Error {
        let _ = request;

        Error::Handler {
            method: method.clone(),
            path: path.to_owned(),
            source: error,
        }
    }
}

/// The default hook set.
pub(crate) struct DefaultHooks;

impl Hooks for DefaultHooks {}
