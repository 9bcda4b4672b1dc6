//! The practical way to fake HTTP in tests.
//!
//! ruse lets a test harness declare fake HTTP endpoints and transparently
//! intercepts every request sent through the crate's request surface,
//! routing it to a matching handler instead of a network. Handlers compute
//! a `(status, headers, body)` response; responses complete synchronously,
//! on an explicit trigger, or on a timer, so loading states are as easy to
//! test as happy paths.
//!
//! ```
//! use ruse::{Response, ResponseMode, Session};
//!
//! let session = Session::start(|s| {
//!     s.get(
//!         "/widgets/:id",
//!         |req| {
//!             let id = req.param("id").unwrap();
//!             Ok(Response::new(200).body(format!("{{\"id\":{}}}", id)))
//!         },
//!         ResponseMode::Immediate,
//!     );
//! });
//!
//! let request = ruse::get("/widgets/42")?;
//!
//! assert_eq!(request.status(), Some(200));
//! assert_eq!(request.response().unwrap().body.text(), "{\"id\":42}");
//!
//! session.shutdown();
//! # Ok::<(), ruse::Error>(())
//! ```
//!
//! Requests that match no route fail loudly by default, since an unmocked
//! request is a test-authoring bug rather than a soft failure, and failing
//! handlers surface their error to the caller with verb and path context.
//! Both policies can be overridden through the [`Hooks`] trait.
//!
//! Interception is process-wide state with an explicit paired lifecycle:
//! starting a [`Session`] installs it, [`Session::shutdown`] restores what
//! was there before. Run one session at a time; test suites that exercise
//! several sessions should serialize them.

pub use http;

mod body;
mod error;
mod hooks;
mod interceptor;
mod pending;
mod registry;
mod request;
mod response;
mod route;
mod session;

pub use body::Body;
pub use error::Error;
pub use hooks::Hooks;
pub use pending::ResolveTarget;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use route::{HandlerResult, ResponseMode, RouteHandle};
pub use session::{Session, SessionBuilder};

/// A convenience module to import the most common types and traits at once.
pub mod prelude {
    pub use crate::{Body, Hooks, Request, Response, ResponseMode, Session};
}

/// Sends a GET request through the installed session.
pub fn get(url: impl Into<String>) -> Result<Request, Error> {
    Request::get(url).send()
}

/// Sends a HEAD request through the installed session.
pub fn head(url: impl Into<String>) -> Result<Request, Error> {
    Request::head(url).send()
}

/// Sends a POST request through the installed session.
pub fn post(url: impl Into<String>, body: impl Into<Body>) -> Result<Request, Error> {
    Request::post(url).body(body).send()
}

/// Sends a PUT request through the installed session.
pub fn put(url: impl Into<String>, body: impl Into<Body>) -> Result<Request, Error> {
    Request::put(url).body(body).send()
}

/// Sends a PATCH request through the installed session.
pub fn patch(url: impl Into<String>, body: impl Into<Body>) -> Result<Request, Error> {
    Request::patch(url).body(body).send()
}

/// Sends a DELETE request through the installed session.
pub fn delete(url: impl Into<String>) -> Result<Request, Error> {
    Request::delete(url).send()
}

/// Sends a prepared request through the installed session.
pub fn send(request: Request) -> Result<Request, Error> {
    request.send()
}
