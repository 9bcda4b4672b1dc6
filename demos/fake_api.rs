//! A small walkthrough: declare a fake widgets API, exercise it, and
//! inspect what was intercepted.

use ruse::{Response, ResponseMode, Session};
use std::time::Duration;

fn main() -> Result<(), ruse::Error> {
    let session = Session::start(|s| {
        s.get(
            "/widgets/:id",
            |req| {
                let id = req.param("id").unwrap();
                Ok(Response::new(200).body(format!("{{\"id\":{}}}", id)))
            },
            ResponseMode::Immediate,
        );

        s.post(
            "/widgets",
            |_| Ok(Response::new(201).header("location", "/widgets/43")),
            ResponseMode::Manual,
        );

        s.delete(
            "/widgets/:id",
            |_| Ok(Response::new(204)),
            ResponseMode::Delayed(Duration::from_millis(100)),
        );
    });

    // Synchronous: the response is ready as soon as the call returns.
    let fetched = ruse::get("/widgets/42")?;
    println!(
        "GET /widgets/42 -> {} {}",
        fetched.status().unwrap(),
        fetched.response().unwrap().body.text()
    );

    // Deferred: nothing happens until the harness resolves the request.
    let created = ruse::post("/widgets", r#"{"name":"sprocket"}"#)?;
    println!("POST /widgets pending: {:?}", created.status());
    session.resolve(&created);
    println!("POST /widgets resolved: {}", created.status().unwrap());

    // Timed: the response completes on its own after the delay.
    let deleted = ruse::delete("/widgets/42")?;
    let response = deleted
        .wait_for_response(Duration::from_secs(5))
        .expect("delete should complete from its timer");
    println!("DELETE /widgets/42 -> {}", response.status_code);

    println!("{} request(s) handled", session.handled_requests().len());

    session.shutdown();
    Ok(())
}
