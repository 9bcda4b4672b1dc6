//! The interception session and its dispatcher.

use crate::{
    error::Error,
    hooks::{DefaultHooks, Hooks},
    interceptor,
    pending::{PendingResponse, PendingResponses, ResolveTarget},
    registry::{self, Registry},
    request::Request,
    response::Response,
    route::{HandlerResult, ResponseMode, Route, RouteHandle},
};
use http::Method;
use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

/// An active interception session: a set of fake endpoints and the
/// dispatcher that routes intercepted requests to them.
///
/// Starting a session installs it as the process-wide interception target;
/// every request sent through this crate is then matched against the
/// session's routes instead of reaching a network. Only one session should
/// be active at a time, and [`shutdown`](Session::shutdown) ends it.
///
/// ```
/// use ruse::{Response, ResponseMode, Session};
///
/// let session = Session::start(|s| {
///     s.get("/widgets", |_| Ok(Response::new(200).body("[]")), ResponseMode::Immediate);
///     s.post("/widgets", |_| Ok(Response::new(201)), ResponseMode::Manual);
/// });
///
/// // Synchronous route: the response is observable as soon as the send
/// // call returns.
/// let listing = ruse::get("/widgets")?;
/// assert_eq!(listing.status(), Some(200));
///
/// // Deferred route: pending until the harness resolves it.
/// let creation = ruse::post("/widgets", "{}")?;
/// assert_eq!(creation.status(), None);
/// session.resolve(&creation);
/// assert_eq!(creation.status(), Some(201));
///
/// session.shutdown();
/// # Ok::<(), ruse::Error>(())
/// ```
///
/// Cloning a session clones a handle to the same underlying state.
#[derive(Clone)]
pub struct Session(Arc<Inner>);

pub(crate) struct Inner {
    registry: Mutex<Registry>,
    routes: Mutex<Vec<Arc<Route>>>,

    /// Journals of every request that was dispatched to a handler or fell
    /// through, in arrival order. Never pruned while the session lives.
    handled: Mutex<VecDeque<Request>>,
    unhandled: Mutex<VecDeque<Request>>,

    pending: PendingResponses,
    hooks: Box<dyn Hooks>,

    /// The global binding displaced when this session was installed,
    /// consumed by the first `shutdown` call.
    previous: Mutex<Option<interceptor::Binding>>,
}

impl Session {
    /// Start a new session with the default hooks.
    ///
    /// The session is installed as the interception target first, then the
    /// setup routine runs with the session so it can register routes.
    /// Routes may also be registered at any later point.
    pub fn start(setup: impl FnOnce(&Session)) -> Session {
        Self::builder().start(setup)
    }

    /// Create a builder for a session with customized behavior.
    pub fn builder() -> SessionBuilder {
        SessionBuilder {
            hooks: Box::new(DefaultHooks),
        }
    }

    pub(crate) fn from_inner(inner: Arc<Inner>) -> Self {
        Self(inner)
    }

    /// Register a route for an arbitrary method.
    ///
    /// The pattern language is the recognizer's: literal segments, named
    /// `:param` segments and a `*rest` catch-all. When patterns overlap,
    /// the most specific match wins. The returned [`RouteHandle`] observes
    /// the route's call counter.
    pub fn register<H>(
        &self,
        method: Method,
        pattern: &str,
        handler: H,
        mode: ResponseMode,
    ) -> RouteHandle
    where
        H: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        let method = registry::normalize_method(method);
        let route = Arc::new(Route::new(method.clone(), pattern, handler, mode));

        let token = {
            let mut routes = self.0.routes.lock().unwrap();
            routes.push(route.clone());
            routes.len() - 1
        };

        self.0.registry.lock().unwrap().add(&method, pattern, token);

        tracing::debug!("registered {} {} ({:?})", method, pattern, mode);

        RouteHandle::new(route)
    }

    /// Register a GET route.
    pub fn get<H>(&self, pattern: &str, handler: H, mode: ResponseMode) -> RouteHandle
    where
        H: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::GET, pattern, handler, mode)
    }

    /// Register a POST route.
    pub fn post<H>(&self, pattern: &str, handler: H, mode: ResponseMode) -> RouteHandle
    where
        H: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::POST, pattern, handler, mode)
    }

    /// Register a PUT route.
    pub fn put<H>(&self, pattern: &str, handler: H, mode: ResponseMode) -> RouteHandle
    where
        H: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::PUT, pattern, handler, mode)
    }

    /// Register a PATCH route.
    pub fn patch<H>(&self, pattern: &str, handler: H, mode: ResponseMode) -> RouteHandle
    where
        H: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::PATCH, pattern, handler, mode)
    }

    /// Register a DELETE route.
    pub fn delete<H>(&self, pattern: &str, handler: H, mode: ResponseMode) -> RouteHandle
    where
        H: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::DELETE, pattern, handler, mode)
    }

    /// Register a HEAD route.
    pub fn head<H>(&self, pattern: &str, handler: H, mode: ResponseMode) -> RouteHandle
    where
        H: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(Method::HEAD, pattern, handler, mode)
    }

    /// Dispatch an intercepted request.
    ///
    /// This is the entry point the interception shim forwards every sent
    /// request to. Matched requests are journaled as handled before their
    /// handler runs; unmatched requests are journaled as unhandled and
    /// reported through the [`Hooks::unhandled`] hook, which fails loudly
    /// by default.
    pub fn handle_request(&self, request: Request) -> Result<(), Error> {
        let method = request.method().clone();
        let url = request.url().to_owned();

        let matched = self.0.registry.lock().unwrap().recognize(&method, &url);

        let matched = match matched {
            Some(matched) => matched,
            None => {
                self.0.unhandled.lock().unwrap().push_back(request.clone());

                tracing::warn!("{} {} did not match any registered route", method, url);

                return self.0.hooks.unhandled(&method, &url, &request);
            }
        };

        let route = self.0.routes.lock().unwrap()[matched.token].clone();

        route.record_call();
        request.attach_match(matched.params, matched.query_params);
        self.0.handled.lock().unwrap().push_back(request.clone());

        tracing::debug!("{} {} matched {}", method, url, route.pattern());

        let response = match route.invoke(&request) {
            Ok(response) => response,
            Err(error) => return Err(self.0.hooks.errored(&method, &url, &request, error)),
        };

        let response = Response {
            status_code: response.status_code,
            headers: self.0.hooks.prepare_headers(response.headers),
            body: self.0.hooks.prepare_body(response.body),
        };

        match route.mode() {
            ResponseMode::Immediate => {
                request.respond_with(response)?;
                self.0.hooks.handled(&method, &url, &request);
                Ok(())
            }
            ResponseMode::Manual => {
                self.track(request, response, method, url);
                Ok(())
            }
            ResponseMode::Delayed(delay) => {
                let timed = request.clone();
                self.track(request, response, method, url);
                self.arm_timer(timed, delay);
                Ok(())
            }
        }
    }

    fn track(&self, request: Request, response: Response, method: Method, path: String) {
        tracing::debug!("{} {} deferred", method, path);

        self.0.pending.track(PendingResponse {
            request,
            response,
            method,
            path,
        });
    }

    /// Arm the one-shot timer for a delayed route. First of the timer and
    /// an explicit trigger wins; the loser finds no entry left.
    fn arm_timer(&self, request: Request, delay: Duration) {
        let weak = Arc::downgrade(&self.0);

        thread::spawn(move || {
            thread::sleep(delay);

            if let Some(inner) = weak.upgrade() {
                Session::from_inner(inner).resolve(&request);
            }
        });
    }

    /// Force-complete pending responses.
    ///
    /// The target is either a specific in-flight [`Request`] handle, or a
    /// url, which resolves every in-flight request sent to it. Returns how
    /// many entries were completed; resolving an already-completed request
    /// is a no-op returning 0.
    pub fn resolve<'a>(&self, target: impl Into<ResolveTarget<'a>>) -> usize {
        let taken = self.0.pending.take_matching(target.into());
        let count = taken.len();

        for entry in taken {
            self.complete(entry);
        }

        if count > 0 {
            tracing::debug!("resolved {} pending response(s)", count);
        }

        count
    }

    fn complete(&self, entry: PendingResponse) {
        let PendingResponse {
            request,
            response,
            method,
            path,
        } = entry;

        if request.respond_with(response).is_ok() {
            self.0.hooks.handled(&method, &path, &request);
        }
    }

    /// Whether the harness's main flow would have to wait on an explicit
    /// resolution trigger before issuing this request.
    ///
    /// Returns `true` unless a route matches and defers its responses (a
    /// deferred route is resolved by the harness itself, so there is
    /// nothing to block on).
    pub fn should_block_for(&self, method: Method, path: &str) -> bool {
        let method = registry::normalize_method(method);

        let matched = self.0.registry.lock().unwrap().recognize(&method, path);

        match matched {
            Some(matched) => !self.0.routes.lock().unwrap()[matched.token]
                .mode()
                .is_deferred(),
            None => true,
        }
    }

    /// Every request that was matched to a handler, in arrival order.
    ///
    /// Membership means dispatch began, independent of whether the handler
    /// succeeded.
    pub fn handled_requests(&self) -> Vec<Request> {
        self.0.handled.lock().unwrap().iter().cloned().collect()
    }

    /// Every request that matched no route, in arrival order.
    pub fn unhandled_requests(&self) -> Vec<Request> {
        self.0.unhandled.lock().unwrap().iter().cloned().collect()
    }

    /// The number of deferred responses still in flight.
    pub fn pending_count(&self) -> usize {
        self.0.pending.len()
    }

    /// End interception, restoring whatever binding was in place before
    /// this session started.
    ///
    /// Safe to call more than once; only the first call restores. Pending
    /// deferred responses are not flushed.
    pub fn shutdown(&self) {
        if let Some(binding) = self.0.previous.lock().unwrap().take() {
            interceptor::restore(binding);
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("routes", &self.0.routes.lock().unwrap().len())
            .field("handled", &self.0.handled.lock().unwrap().len())
            .field("unhandled", &self.0.unhandled.lock().unwrap().len())
            .field("pending", &self.0.pending.len())
            .finish()
    }
}

/// A builder for creating a [`Session`] with customized behavior.
pub struct SessionBuilder {
    hooks: Box<dyn Hooks>,
}

impl SessionBuilder {
    /// Install a custom hook set for the session.
    pub fn hooks(mut self, hooks: impl Hooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Start the session: install it as the interception target, then run
    /// the setup routine with it.
    pub fn start(self, setup: impl FnOnce(&Session)) -> Session {
        let inner = Arc::new(Inner {
            registry: Mutex::new(Registry::new()),
            routes: Mutex::new(Vec::new()),
            handled: Mutex::new(VecDeque::new()),
            unhandled: Mutex::new(VecDeque::new()),
            pending: PendingResponses::default(),
            hooks: self.hooks,
            previous: Mutex::new(None),
        });

        let binding = interceptor::install(Arc::downgrade(&inner));
        *inner.previous.lock().unwrap() = Some(binding);

        let session = Session(inner);
        setup(&session);
        session
    }
}
