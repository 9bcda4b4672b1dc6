mod common;

use ruse::{Error, Request, Response, ResponseMode, Session};

#[test]
fn shutdown_restores_the_previous_binding() {
    let _guard = common::setup();

    let session = Session::start(|s| {
        s.get("/widgets", |_| Ok(Response::new(200)), ResponseMode::Immediate);
    });

    assert!(ruse::get("/widgets").is_ok());

    session.shutdown();

    assert!(matches!(ruse::get("/widgets"), Err(Error::NoSession)));
}

#[test]
fn nested_sessions_unwind_in_reverse_order() {
    let _guard = common::setup();

    let outer = Session::start(|s| {
        s.get("/widgets", |_| Ok(Response::new(200)), ResponseMode::Immediate);
    });

    let inner = Session::start(|s| {
        s.get("/widgets", |_| Ok(Response::new(201)), ResponseMode::Immediate);
    });

    // Last writer wins while both are installed.
    assert_eq!(ruse::get("/widgets").unwrap().status(), Some(201));

    // Shutting down in reverse order re-exposes the outer session.
    inner.shutdown();
    assert_eq!(ruse::get("/widgets").unwrap().status(), Some(200));

    outer.shutdown();
    assert!(matches!(ruse::get("/widgets"), Err(Error::NoSession)));
}

#[test]
fn shutdown_twice_is_safe() {
    let _guard = common::setup();

    let session = Session::start(|_| {});

    session.shutdown();
    session.shutdown();
}

#[test]
fn dropping_a_session_deactivates_interception() {
    let _guard = common::setup();

    {
        let _session = Session::start(|s| {
            s.get("/widgets", |_| Ok(Response::default()), ResponseMode::Immediate);
        });
    }

    assert!(matches!(ruse::get("/widgets"), Err(Error::NoSession)));
}

#[test]
fn routes_can_be_registered_after_start() {
    let _guard = common::setup();

    let session = Session::start(|_| {});

    session.get("/late", |_| Ok(Response::new(200)), ResponseMode::Immediate);

    assert_eq!(ruse::get("/late").unwrap().status(), Some(200));

    session.shutdown();
}

#[test]
fn prepared_requests_can_be_sent_through_the_crate_function() {
    let _guard = common::setup();

    let session = Session::start(|s| {
        s.put("/widgets/1", |_| Ok(Response::new(204)), ResponseMode::Immediate);
    });

    let request = Request::put("/widgets/1").body("{}").build();
    let request = ruse::send(request).unwrap();

    assert_eq!(request.status(), Some(204));

    session.shutdown();
}
