//! The fake request transport.
//!
//! A [`Request`] records everything the code under test sent (method, url,
//! headers, body) and carries the response slot that [`respond`][Request::respond]
//! finalizes exactly once. Cloning a request clones a handle to the same
//! underlying transport; equality is identity, not value.

use crate::{body::Body, error::Error, interceptor, registry, response::Response};
use http::Method;
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Condvar, Mutex},
    time::{Duration, Instant},
};

/// A fake HTTP request captured by an interception session.
///
/// Requests are created with [`Request::builder`] or one of the per-verb
/// shorthands, sent with [`RequestBuilder::send`], and finalized by the
/// dispatcher (or a test) through [`respond`][Request::respond]. The handle
/// stays usable after sending, so tests can observe the response and assert
/// on what was sent:
///
/// ```
/// use ruse::{Response, ResponseMode, Session};
///
/// let session = Session::start(|s| {
///     s.get("/widgets/:id", |_| Ok(Response::new(200).body("{}")), ResponseMode::Immediate);
/// });
///
/// let request = ruse::get("/widgets/42")?;
///
/// assert_eq!(request.status(), Some(200));
/// assert_eq!(request.param("id").as_deref(), Some("42"));
/// session.shutdown();
/// # Ok::<(), ruse::Error>(())
/// ```
#[derive(Clone)]
pub struct Request(Arc<Inner>);

struct Inner {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Body>,

    /// Path and query parameters, attached when a route matches.
    params: Mutex<HashMap<String, String>>,
    query_params: Mutex<HashMap<String, String>>,

    /// The response slot, written at most once.
    response: Mutex<Option<Response>>,
    responded: Condvar,
}

impl Request {
    /// Start building a request with an arbitrary method.
    ///
    /// The method is normalized to uppercase, matching how routes are
    /// registered.
    pub fn builder(method: Method, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            method: registry::normalize_method(method),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Start building a GET request.
    pub fn get(url: impl Into<String>) -> RequestBuilder {
        Self::builder(Method::GET, url)
    }

    /// Start building a HEAD request.
    pub fn head(url: impl Into<String>) -> RequestBuilder {
        Self::builder(Method::HEAD, url)
    }

    /// Start building a POST request.
    pub fn post(url: impl Into<String>) -> RequestBuilder {
        Self::builder(Method::POST, url)
    }

    /// Start building a PUT request.
    pub fn put(url: impl Into<String>) -> RequestBuilder {
        Self::builder(Method::PUT, url)
    }

    /// Start building a PATCH request.
    pub fn patch(url: impl Into<String>) -> RequestBuilder {
        Self::builder(Method::PATCH, url)
    }

    /// Start building a DELETE request.
    pub fn delete(url: impl Into<String>) -> RequestBuilder {
        Self::builder(Method::DELETE, url)
    }

    /// Send this request through the installed interception session.
    ///
    /// Returns the request handle back for observation. Fails with
    /// [`Error::NoSession`] when no session is installed, with
    /// [`Error::Unhandled`] when no route matches, and with
    /// [`Error::Handler`] when the matched handler fails.
    pub fn send(self) -> Result<Request, Error> {
        interceptor::dispatch(self)
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.0.method
    }

    /// The request url as given by the caller.
    pub fn url(&self) -> &str {
        &self.0.url
    }

    /// The request body, if one was set.
    pub fn body(&self) -> Option<Body> {
        self.0.body.clone()
    }

    /// Path parameters extracted by the matched route pattern.
    ///
    /// Empty until a route has matched this request.
    pub fn params(&self) -> HashMap<String, String> {
        self.0.params.lock().unwrap().clone()
    }

    /// Look up a single path parameter by name.
    pub fn param(&self, name: &str) -> Option<String> {
        self.0.params.lock().unwrap().get(name).cloned()
    }

    /// Query parameters extracted from the request url.
    ///
    /// Empty until a route has matched this request.
    pub fn query_params(&self) -> HashMap<String, String> {
        self.0.query_params.lock().unwrap().clone()
    }

    /// Look up a single query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.0.query_params.lock().unwrap().get(name).cloned()
    }

    /// Get all values for a request header with the given name.
    pub fn header_values(&self, name: impl AsRef<str>) -> impl Iterator<Item = String> + '_ {
        let name_lower = name.as_ref().to_lowercase();

        self.0
            .headers
            .iter()
            .filter(move |(name, _)| name.to_lowercase() == name_lower)
            .map(|(_, value)| value.clone())
    }

    /// Assert that the request carries a header with the given value.
    ///
    /// # Panics
    ///
    /// Panics if no header with the name has the expected value.
    pub fn expect_header(&self, name: impl AsRef<str>, value: impl AsRef<str>) {
        let name = name.as_ref();

        self.header_values(name)
            .find(|v| v == value.as_ref())
            .unwrap_or_else(|| panic!("no header named `{}` with value expected found", name));
    }

    /// Assert that the request body equals the expected bytes.
    ///
    /// # Panics
    ///
    /// Panics if the request has no body or the body differs.
    pub fn expect_body(&self, expected: impl AsRef<[u8]>) {
        if let Some(body) = self.body() {
            assert_eq!(expected.as_ref(), body.as_bytes());
        } else {
            panic!("expected a body, but request had none");
        }
    }

    /// Finalize this request with a response.
    ///
    /// A request can be responded to exactly once; a second call returns
    /// [`Error::AlreadyResponded`].
    pub fn respond(
        &self,
        status: u16,
        headers: Vec<(String, String)>,
        body: impl Into<Body>,
    ) -> Result<(), Error> {
        self.respond_with(Response {
            status_code: status,
            headers,
            body: body.into(),
        })
    }

    /// Finalize this request with a prepared [`Response`] record.
    pub fn respond_with(&self, response: Response) -> Result<(), Error> {
        {
            let mut slot = self.0.response.lock().unwrap();

            if slot.is_some() {
                return Err(Error::AlreadyResponded);
            }

            *slot = Some(response);
        }

        log::trace!("{} {} finalized", self.0.method, self.0.url);
        self.0.responded.notify_all();

        Ok(())
    }

    /// The response, if the request has been finalized.
    pub fn response(&self) -> Option<Response> {
        self.0.response.lock().unwrap().clone()
    }

    /// The response status code, if the request has been finalized.
    pub fn status(&self) -> Option<u16> {
        self.0
            .response
            .lock()
            .unwrap()
            .as_ref()
            .map(|response| response.status_code)
    }

    /// Block until the request is finalized or the timeout elapses.
    ///
    /// Useful for observing deferred responses that complete from a route
    /// timer rather than an explicit trigger.
    pub fn wait_for_response(&self, timeout: Duration) -> Option<Response> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.0.response.lock().unwrap();

        while slot.is_none() {
            let now = Instant::now();

            if now >= deadline {
                return None;
            }

            let (guard, _) = self
                .0
                .responded
                .wait_timeout(slot, deadline - now)
                .unwrap();
            slot = guard;
        }

        slot.clone()
    }

    /// Identity check: do both handles refer to the same transport?
    pub(crate) fn is_same(&self, other: &Request) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Attach extracted path and query parameters once a route matches.
    pub(crate) fn attach_match(
        &self,
        params: HashMap<String, String>,
        query_params: HashMap<String, String>,
    ) {
        *self.0.params.lock().unwrap() = params;
        *self.0.query_params.lock().unwrap() = query_params;
    }
}

impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for Request {}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.0.method)
            .field("url", &self.0.url)
            .field("responded", &self.0.response.lock().unwrap().is_some())
            .finish()
    }
}

/// A builder for creating a fake request.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Body>,
}

impl RequestBuilder {
    /// Append a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Build the request without sending it.
    pub fn build(self) -> Request {
        Request(Arc::new(Inner {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            params: Mutex::new(HashMap::new()),
            query_params: Mutex::new(HashMap::new()),
            response: Mutex::new(None),
            responded: Condvar::new(),
        }))
    }

    /// Build the request and send it through the installed session.
    pub fn send(self) -> Result<Request, Error> {
        self.build().send()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respond_finalizes_exactly_once() {
        let request = Request::get("/widgets").build();

        assert!(request.response().is_none());
        request.respond(204, vec![], ()).unwrap();

        assert_eq!(request.status(), Some(204));
        assert!(matches!(
            request.respond(200, vec![], ()),
            Err(Error::AlreadyResponded)
        ));
    }

    #[test]
    fn clones_share_identity() {
        let request = Request::get("/widgets").build();
        let other = Request::get("/widgets").build();

        assert_eq!(request, request.clone());
        assert_ne!(request, other);
    }

    #[test]
    fn wait_for_response_times_out() {
        let request = Request::get("/widgets").build();

        assert!(request
            .wait_for_response(Duration::from_millis(10))
            .is_none());
    }

    #[test]
    fn method_is_normalized() {
        let request = Request::builder(Method::from_bytes(b"get").unwrap(), "/widgets").build();

        assert_eq!(request.method(), &Method::GET);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let request = Request::get("/widgets")
            .header("Content-Type", "application/json")
            .build();

        request.expect_header("content-type", "application/json");
    }
}
