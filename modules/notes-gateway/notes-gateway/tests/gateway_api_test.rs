use std::time::Duration;

use axum::Router;
use axum::routing::get;
use http::Method;
use notes_gateway::test_support::{AppHarness, MockResponse, RawJson};
use serde_json::json;

// -- Downstream error passthrough --

#[tokio::test]
async fn downstream_not_found_is_relayed_with_exact_body() {
    let h = AppHarness::builder().build().await;
    h.mock().mock(
        "GET",
        "/categories/c-404",
        MockResponse::error(404, "404", "not found", "no rows"),
    );

    let resp = h.api_v1().get("categories", "c-404").send().await;

    resp.assert_error(404, "404", "downstream");
    assert_eq!(
        resp.json(),
        json!({"error_code": "404", "message": "not found", "developer_message": "no rows"})
    );
}

#[tokio::test]
async fn downstream_conflict_keeps_its_status() {
    let h = AppHarness::builder().build().await;
    h.mock().mock(
        "POST",
        "/tags",
        MockResponse::error(409, "TS-000009", "tag already exists", "duplicate key"),
    );

    h.api_v1()
        .post("tags")
        .with_body(json!({"name": "work", "color": "red"}))
        .send()
        .await
        .assert_error(409, "TS-000009", "downstream");
}

#[tokio::test]
async fn downstream_server_error_becomes_bad_gateway() {
    let h = AppHarness::builder().build().await;
    h.mock().mock(
        "GET",
        "/users/u-1",
        MockResponse::error(500, "US-000500", "database unavailable", "pool exhausted"),
    );

    let resp = h.api_v1().get("users", "u-1").send().await;
    resp.assert_error(502, "US-000500", "downstream");
    assert_eq!(resp.error_info().message, "database unavailable");
}

#[tokio::test]
async fn undecodable_error_body_is_a_generic_500() {
    let h = AppHarness::builder().build().await;
    h.mock().mock(
        "GET",
        "/notes/n-1",
        MockResponse::text(500, "<html>upstream exploded</html>"),
    );

    let resp = h.api_v1().get("notes", "n-1").send().await;
    resp.assert_error(500, "GW-000500", "gateway");
    assert!(!String::from_utf8_lossy(resp.bytes()).contains("exploded"));
}

// -- Create --

#[tokio::test]
async fn create_with_relative_location_returns_gateway_location() {
    let h = AppHarness::builder().build().await;
    h.mock()
        .mock("POST", "/categories", MockResponse::created("/categories/c-7/"));

    let resp = h
        .api_v1()
        .post("categories")
        .with_body(json!({"name": "work", "user_uuid": "u-1"}))
        .expect_status(201)
        .await;
    assert_eq!(resp.location(), Some("/api/categories/c-7"));

    let recorded = h.mock().recorded_requests().await;
    assert_eq!(
        recorded[0].body_json(),
        json!({"name": "work", "user_uuid": "u-1"})
    );
}

#[tokio::test]
async fn create_without_location_is_internal_error() {
    let h = AppHarness::builder().build().await;
    h.mock().mock("POST", "/tags", MockResponse::empty(201));

    h.api_v1()
        .post("tags")
        .with_body(json!({"name": "x", "color": ""}))
        .send()
        .await
        .assert_error(500, "GW-000500", "gateway");
}

// -- Caller input validation --

#[tokio::test]
async fn missing_filter_parameter_is_rejected_before_any_call() {
    let h = AppHarness::builder().build().await;

    let resp = h.api_v1().list("categories").send().await;
    resp.assert_error(400, "GW-000400", "gateway");
    assert!(resp.error_info().message.contains("user_uuid"));

    h.api_v1()
        .list("users")
        .with_query("email", "a@b.c")
        .send()
        .await
        .assert_error(400, "GW-000400", "gateway");

    assert!(h.mock().recorded_requests().await.is_empty());
}

#[tokio::test]
async fn malformed_tag_ids_are_rejected() {
    let h = AppHarness::builder().build().await;

    h.api_v1()
        .list("tags")
        .with_query("id", "3,seven")
        .send()
        .await
        .assert_error(400, "GW-000400", "gateway");
    h.api_v1()
        .get("tags", "abc")
        .send()
        .await
        .assert_error(400, "GW-000400", "gateway");

    assert!(h.mock().recorded_requests().await.is_empty());
}

#[tokio::test]
async fn malformed_json_body_is_400() {
    let h = AppHarness::builder().build().await;

    h.api_v1()
        .post("notes")
        .with_body(RawJson("{\"header\": "))
        .send()
        .await
        .assert_error(400, "GW-000400", "gateway");

    h.api_v1()
        .post("tags")
        .with_body(json!({"name": "missing color"}))
        .send()
        .await
        .assert_error(400, "GW-000400", "gateway");
}

#[tokio::test]
async fn mismatched_passwords_are_rejected() {
    let h = AppHarness::builder().build().await;

    h.api_v1()
        .post("users")
        .with_body(json!({
            "email": "a@b.c",
            "username": "ann",
            "password": "one",
            "repeat_password": "two",
        }))
        .send()
        .await
        .assert_error(400, "GW-000400", "gateway");
    assert!(h.mock().recorded_requests().await.is_empty());
}

#[tokio::test]
async fn category_delete_requires_owner_and_forwards_it() {
    let h = AppHarness::builder().build().await;
    h.mock()
        .mock("DELETE", "/categories/c-9", MockResponse::empty(204));

    h.api_v1()
        .delete("categories", "c-9")
        .send()
        .await
        .assert_error(400, "GW-000400", "gateway");

    h.api_v1()
        .delete("categories", "c-9")
        .with_query("user_uuid", "u-1")
        .expect_status(204)
        .await;

    let recorded = h.mock().recorded_requests().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        recorded[0].body_json(),
        json!({"uuid": "c-9", "user_uuid": "u-1"})
    );
}

// -- Deadlines and panics --

#[tokio::test]
async fn slow_downstream_is_cut_off_by_the_request_deadline() {
    let h = AppHarness::builder()
        .with_inbound_timeout(Duration::from_millis(100))
        .build()
        .await;
    h.mock().mock(
        "GET",
        "/notes",
        MockResponse::json(200, json!([])).with_delay(Duration::from_secs(3)),
    );

    let started = std::time::Instant::now();
    h.api_v1()
        .list("notes")
        .with_query("category_uuid", "c-1")
        .send()
        .await
        .assert_error(500, "GW-000500", "gateway");
    assert!(started.elapsed() < Duration::from_secs(2));
}

async fn boom() -> &'static str {
    panic!("handler bug");
}

#[tokio::test]
async fn handler_panic_becomes_json_500() {
    let h = AppHarness::builder()
        .with_routes(Router::new().route("/api/boom", get(boom)))
        .build()
        .await;

    let resp = h.api_v1().raw(Method::GET, "/api/boom").send().await;
    resp.assert_error(500, "GW-000500", "gateway");

    // The router keeps serving after the panic.
    h.mock()
        .mock("GET", "/tags/1", MockResponse::json(200, json!({"id": 1})));
    h.api_v1().get("tags", "1").expect_status(200).await;
}
