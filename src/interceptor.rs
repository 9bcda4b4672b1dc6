//! The process-wide interception binding.
//!
//! Installing a session swaps "the network" out from under every request
//! sent through this crate: [`dispatch`] hands sent requests to the
//! currently bound session instead. The binding is explicit, paired state.
//! [`install`] returns the previous binding and [`restore`] writes one
//! back, so a session's `shutdown` can put back exactly what it displaced.
//! Only one session should be active at a time; installs are
//! last-writer-wins.

use crate::{error::Error, request::Request, session};
use once_cell::sync::Lazy;
use std::sync::{Mutex, Weak};

/// The saved state of the global binding: either "nothing installed" or a
/// weak reference to the session that was bound.
///
/// Holding `Weak` means a session that is dropped without `shutdown` simply
/// deactivates interception instead of dangling.
pub(crate) struct Binding(Option<Weak<session::Inner>>);

static CURRENT: Lazy<Mutex<Option<Weak<session::Inner>>>> = Lazy::new(|| Mutex::new(None));

/// Bind a session as the interception target, returning whatever was bound
/// before so it can be restored on shutdown.
pub(crate) fn install(session: Weak<session::Inner>) -> Binding {
    let previous = CURRENT.lock().unwrap().replace(session);

    tracing::debug!("interception session installed");

    Binding(previous)
}

/// Write a previously saved binding back.
pub(crate) fn restore(binding: Binding) {
    *CURRENT.lock().unwrap() = binding.0;

    tracing::debug!("interception session shut down");
}

/// The currently installed session, if any is still alive.
pub(crate) fn current() -> Option<session::Session> {
    CURRENT
        .lock()
        .unwrap()
        .as_ref()
        .and_then(Weak::upgrade)
        .map(session::Session::from_inner)
}

/// Forward a sent request to the installed session's dispatcher.
///
/// This is the substitute "send" every request goes through; there is no
/// network to fall through to, so an unbound send is an error.
pub(crate) fn dispatch(request: Request) -> Result<Request, Error> {
    match current() {
        Some(session) => {
            session.handle_request(request.clone())?;
            Ok(request)
        }
        None => Err(Error::NoSession),
    }
}
