//! Bookkeeping for requests whose response is intentionally delayed.

use crate::{request::Request, response::Response};
use http::Method;
use std::sync::Mutex;

/// A request awaiting deferred completion, together with everything needed
/// to finalize it: the prepared response and the verb/path context for the
/// handled hook.
pub(crate) struct PendingResponse {
    pub request: Request,
    pub response: Response,
    pub method: Method,
    pub path: String,
}

/// What a resolution call is keyed by.
///
/// Request identity is the primary key; a plain url is accepted as a legacy
/// fallback and may match several in-flight requests at once.
#[derive(Clone, Copy)]
pub enum ResolveTarget<'a> {
    /// Resolve the exact in-flight request.
    Request(&'a Request),
    /// Resolve every in-flight request sent to this url.
    Url(&'a str),
}

impl<'a> From<&'a Request> for ResolveTarget<'a> {
    fn from(request: &'a Request) -> Self {
        ResolveTarget::Request(request)
    }
}

impl<'a> From<&'a str> for ResolveTarget<'a> {
    fn from(url: &'a str) -> Self {
        ResolveTarget::Url(url)
    }
}

impl ResolveTarget<'_> {
    fn matches(&self, entry: &PendingResponse) -> bool {
        match self {
            ResolveTarget::Request(request) => entry.request == **request,
            ResolveTarget::Url(url) => entry.request.url() == *url,
        }
    }
}

/// The set of in-flight deferred responses.
///
/// Entries are appended in arrival order and removed exactly once, on
/// resolution. Untriggered entries live for the session's lifetime.
#[derive(Default)]
pub(crate) struct PendingResponses {
    entries: Mutex<Vec<PendingResponse>>,
}

impl PendingResponses {
    pub(crate) fn track(&self, entry: PendingResponse) {
        let mut entries = self.entries.lock().unwrap();
        entries.push(entry);

        log::trace!("{} pending response(s) in flight", entries.len());
    }

    /// Remove and return every entry the target matches, preserving arrival
    /// order. Indices are adjusted on removal so no entry is visited twice.
    pub(crate) fn take_matching(&self, target: ResolveTarget<'_>) -> Vec<PendingResponse> {
        let mut entries = self.entries.lock().unwrap();
        let mut taken = Vec::new();
        let mut index = 0;

        while index < entries.len() {
            if target.matches(&entries[index]) {
                taken.push(entries.remove(index));
            } else {
                index += 1;
            }
        }

        taken
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(request: &Request) -> PendingResponse {
        PendingResponse {
            request: request.clone(),
            response: Response::default(),
            method: Method::GET,
            path: request.url().to_owned(),
        }
    }

    #[test]
    fn identity_resolution_takes_only_that_request() {
        let pending = PendingResponses::default();
        let first = Request::get("/widgets").build();
        let second = Request::get("/widgets").build();

        pending.track(entry(&first));
        pending.track(entry(&second));

        let taken = pending.take_matching(ResolveTarget::from(&first));
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].request, first);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn url_resolution_takes_all_matching_in_order() {
        let pending = PendingResponses::default();
        let first = Request::get("/widgets").build();
        let other = Request::get("/gadgets").build();
        let second = Request::get("/widgets").build();

        pending.track(entry(&first));
        pending.track(entry(&other));
        pending.track(entry(&second));

        let taken = pending.take_matching(ResolveTarget::from("/widgets"));
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].request, first);
        assert_eq!(taken[1].request, second);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn unmatched_target_takes_nothing() {
        let pending = PendingResponses::default();
        let request = Request::get("/widgets").build();

        pending.track(entry(&request));

        assert!(pending
            .take_matching(ResolveTarget::from("/gadgets"))
            .is_empty());
        assert_eq!(pending.len(), 1);
    }
}
