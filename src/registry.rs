//! Per-verb path registries.
//!
//! Pattern matching itself is delegated to the `route-recognizer` crate and
//! consumed through a deliberately narrow interface: bind a pattern to an
//! opaque route token, and recognize a url into a token plus extracted
//! parameters. Precedence between overlapping patterns is the recognizer's
//! own most-specific-wins rule; at most one match comes back.

use http::Method;
use route_recognizer::Router;
use std::collections::HashMap;
use url::Url;

/// One recognizer per HTTP verb, created on demand.
pub(crate) struct Registry {
    routers: HashMap<Method, Router<usize>>,
}

/// The outcome of recognizing a url for some verb.
pub(crate) struct RouteMatch {
    /// Opaque token bound at registration time (the route's index).
    pub token: usize,
    pub params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            routers: HashMap::new(),
        }
    }

    /// Bind a path pattern to a route token under the given verb.
    pub(crate) fn add(&mut self, method: &Method, pattern: &str, token: usize) {
        self.routers
            .entry(method.clone())
            .or_insert_with(Router::new)
            .add(pattern, token);
    }

    /// Recognize a url for the given verb.
    ///
    /// The url may be in origin form (`/widgets?sort=asc`) or absolute
    /// (`http://host/widgets?sort=asc`); only path and query take part in
    /// matching.
    pub(crate) fn recognize(&self, method: &Method, url: &str) -> Option<RouteMatch> {
        let router = self.routers.get(method)?;
        let (path, query) = split_target(url);

        let matched = router.recognize(&path).ok()?;
        let token = **matched.handler();

        let params = matched
            .params()
            .iter()
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect();

        Some(RouteMatch {
            token,
            params,
            query_params: query.map(|q| parse_query(&q)).unwrap_or_default(),
        })
    }
}

/// Normalize an HTTP method to its uppercase form, the form routes are
/// registered under.
pub(crate) fn normalize_method(method: Method) -> Method {
    let name = method.as_str();

    if name.bytes().any(|b| b.is_ascii_lowercase()) {
        Method::from_bytes(name.to_ascii_uppercase().as_bytes()).unwrap_or(method)
    } else {
        method
    }
}

/// Split a request target into its path and optional raw query string.
fn split_target(url: &str) -> (String, Option<String>) {
    // Absolute urls carry their own path/query split.
    if let Ok(parsed) = Url::parse(url) {
        if parsed.has_host() {
            return (
                parsed.path().to_owned(),
                parsed.query().map(str::to_owned),
            );
        }
    }

    let without_fragment = url.split('#').next().unwrap_or(url);

    match without_fragment.split_once('?') {
        Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
        None => (without_fragment.to_owned(), None),
    }
}

/// Decode a raw query string into a map, later duplicates winning.
fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
