mod common;

use ruse::http::Method;
use ruse::{Body, Hooks, Request, Response, ResponseMode, Session};
use std::sync::{Arc, Mutex};

#[test]
fn synchronous_response_is_observable_in_the_same_turn() {
    let _guard = common::setup();

    let session = Session::start(|s| {
        s.get(
            "/widgets",
            |_| Ok(Response::new(200).body("[]")),
            ResponseMode::Immediate,
        );
    });

    let request = ruse::get("/widgets").unwrap();
    let response = request.response().unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.text(), "[]");

    session.shutdown();
}

#[test]
fn response_headers_are_delivered() {
    let _guard = common::setup();

    let session = Session::start(|s| {
        s.get(
            "/widgets",
            |_| Ok(Response::new(200).header("x-total-count", "0").body("[]")),
            ResponseMode::Immediate,
        );
    });

    let response = ruse::get("/widgets").unwrap().response().unwrap();

    assert!(response
        .headers
        .contains(&("x-total-count".to_string(), "0".to_string())));

    session.shutdown();
}

#[test]
fn handlers_observe_the_request_they_are_given() {
    let _guard = common::setup();

    let session = Session::start(|s| {
        s.post(
            "/widgets",
            |req| {
                let body = req.body().unwrap();
                Ok(Response::new(201).body(body.text().into_owned()))
            },
            ResponseMode::Immediate,
        );
    });

    let request = Request::post("/widgets")
        .header("content-type", "application/json")
        .body(r#"{"name":"sprocket"}"#)
        .send()
        .unwrap();

    request.expect_header("content-type", "application/json");
    request.expect_body(r#"{"name":"sprocket"}"#);
    assert_eq!(
        request.response().unwrap().body.text(),
        r#"{"name":"sprocket"}"#
    );

    session.shutdown();
}

#[test]
fn handlers_may_return_the_status_headers_body_triple() {
    let _guard = common::setup();

    let session = Session::start(|s| {
        s.post(
            "/widgets",
            |_| {
                Ok((
                    201,
                    vec![("location".to_string(), "/widgets/1".to_string())],
                    "{}",
                )
                    .into())
            },
            ResponseMode::Immediate,
        );
    });

    let response = ruse::post("/widgets", "{}").unwrap().response().unwrap();

    assert_eq!(response.status_code, 201);
    assert!(response
        .headers
        .contains(&("location".to_string(), "/widgets/1".to_string())));
    assert_eq!(response.body.text(), "{}");

    session.shutdown();
}

struct Preparing;

impl Hooks for Preparing {
    fn prepare_headers(&self, mut headers: Vec<(String, String)>) -> Vec<(String, String)> {
        headers.push(("content-type".into(), "application/json".into()));
        headers
    }

    fn prepare_body(&self, body: Body) -> Body {
        Body::from(format!("{{\"data\":{}}}", body.text()))
    }
}

#[test]
fn prepare_hooks_transform_every_response() {
    let _guard = common::setup();

    let session = Session::builder().hooks(Preparing).start(|s| {
        s.get(
            "/widgets",
            |_| Ok(Response::new(200).body("[]")),
            ResponseMode::Immediate,
        );
    });

    let response = ruse::get("/widgets").unwrap().response().unwrap();

    assert!(response
        .headers
        .contains(&("content-type".to_string(), "application/json".to_string())));
    assert_eq!(response.body.text(), "{\"data\":[]}");

    session.shutdown();
}

#[derive(Clone, Default)]
struct Recording(Arc<Mutex<Vec<String>>>);

impl Hooks for Recording {
    fn handled(&self, method: &Method, path: &str, _: &Request) {
        self.0.lock().unwrap().push(format!("{} {}", method, path));
    }
}

#[test]
fn handled_hook_runs_after_the_response_is_finalized() {
    let _guard = common::setup();

    let recording = Recording::default();
    let session = Session::builder().hooks(recording.clone()).start(|s| {
        s.get(
            "/widgets",
            |_| Ok(Response::new(200)),
            ResponseMode::Immediate,
        );
    });

    ruse::get("/widgets").unwrap();

    assert_eq!(
        recording.0.lock().unwrap().as_slice(),
        ["GET /widgets".to_string()]
    );

    session.shutdown();
}
