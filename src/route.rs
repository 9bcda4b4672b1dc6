//! Registered routes and their completion modes.

use crate::{request::Request, response::Response};
use http::Method;
use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

/// The result type handlers return.
///
/// Returning `Err` is the documented way to simulate a server-side failure;
/// the error surfaces to the caller of the intercepted request wrapped in
/// [`Error::Handler`](crate::Error::Handler).
pub type HandlerResult = Result<Response, Box<dyn std::error::Error + Send + Sync>>;

pub(crate) type BoxHandler = Box<dyn Fn(&Request) -> HandlerResult + Send + Sync>;

/// Policy governing when a matched request's response is finalized.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponseMode {
    /// Respond synchronously, before the send call returns.
    Immediate,
    /// Leave the response pending until the session's
    /// [`resolve`](crate::Session::resolve) is called for the request.
    Manual,
    /// Leave the response pending; complete it automatically after the
    /// delay unless it is explicitly resolved first.
    Delayed(Duration),
}

impl ResponseMode {
    /// Whether responses for this route are deferred rather than immediate.
    pub fn is_deferred(self) -> bool {
        self != ResponseMode::Immediate
    }
}

/// A registered route: pattern, handler and completion mode, plus the call
/// counter mutated on every match.
pub(crate) struct Route {
    method: Method,
    pattern: String,
    handler: BoxHandler,
    mode: ResponseMode,
    calls: AtomicUsize,
}

impl Route {
    pub(crate) fn new<H>(method: Method, pattern: &str, handler: H, mode: ResponseMode) -> Self
    where
        H: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            method,
            pattern: pattern.to_owned(),
            handler: Box::new(handler),
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub(crate) fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn invoke(&self, request: &Request) -> HandlerResult {
        (self.handler)(request)
    }
}

/// A handle to a registered route, returned by
/// [`Session::register`](crate::Session::register) and the per-verb
/// registration methods.
///
/// The handle observes the route's call counter for test assertions; it does
/// not keep the route matchable after the session is gone.
#[derive(Clone)]
pub struct RouteHandle(std::sync::Arc<Route>);

impl RouteHandle {
    pub(crate) fn new(route: std::sync::Arc<Route>) -> Self {
        Self(route)
    }

    /// The number of times the route's handler has been invoked.
    pub fn calls(&self) -> usize {
        self.0.calls.load(Ordering::SeqCst)
    }

    /// The method the route was registered for.
    pub fn method(&self) -> &Method {
        &self.0.method
    }

    /// The path pattern the route was registered with.
    pub fn pattern(&self) -> &str {
        &self.0.pattern
    }

    /// The route's completion mode.
    pub fn mode(&self) -> ResponseMode {
        self.0.mode
    }
}

impl fmt::Debug for RouteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteHandle")
            .field("method", &self.0.method)
            .field("pattern", &self.0.pattern)
            .field("mode", &self.0.mode)
            .field("calls", &self.calls())
            .finish()
    }
}
