//! Integration tests for the HTTP routes.
//!
//! Requests go through the full router (CORS, tracing, handlers) with a
//! [`StaticSource`] standing in for the network.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use icsproxy_server::{AppState, ServerConfig, router};
use icsproxy_source::{StaticResponse, StaticSource};
use serde_json::{Value, json};
use tower::ServiceExt;

const CAL_URL: &str = "https://calendar.example.com/team.ics";

const CALENDAR: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:3\r\n\
SUMMARY:Retro\r\n\
DTSTART:20240320T150000Z\r\n\
DTEND:20240320T160000Z\r\n\
URL:https://example.com/retro\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:1\r\n\
SUMMARY:Offsite\r\n\
LOCATION:Lisbon\r\n\
DTSTART;VALUE=DATE:20240305\r\n\
DTEND;VALUE=DATE:20240307\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:2\r\n\
SUMMARY:Planning\r\n  session\r\n\
DTSTART;TZID=Europe/Paris:20240312T093000\r\n\
DESCRIPTION:Quarterly\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

fn app_with(config: ServerConfig, source: StaticSource) -> (Router, Arc<StaticSource>) {
    let source = Arc::new(source);
    let app = router(AppState::new(config, source.clone()));
    (app, source)
}

fn app() -> (Router, Arc<StaticSource>) {
    app_with(
        ServerConfig::default(),
        StaticSource::new().with_body(CAL_URL, CALENDAR),
    )
}

fn events_uri(params: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("/api/events?{query}")
}

async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(header::ORIGIN, "https://dashboard.example.org")
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn summaries(body: &Value) -> Vec<&str> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["summary"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn events_are_sorted_and_normalized() {
    let (app, source) = app();
    let response = get(app, &events_uri(&[("ics", CAL_URL)])).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(source.requests(), [CAL_URL]);

    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({
            "items": [
                {
                    "summary": "Offsite",
                    "location": "Lisbon",
                    "description": "",
                    "htmlLink": "",
                    "start": { "date": "2024-03-05" },
                    "end": { "date": "2024-03-07" }
                },
                {
                    "summary": "Planning session",
                    "location": "",
                    "description": "Quarterly",
                    "htmlLink": "",
                    "start": { "dateTime": "2024-03-12T09:30:00.000Z" },
                    "end": { "dateTime": "2024-03-12T09:30:00.000Z" }
                },
                {
                    "summary": "Retro",
                    "location": "",
                    "description": "",
                    "htmlLink": "https://example.com/retro",
                    "start": { "dateTime": "2024-03-20T15:00:00.000Z" },
                    "end": { "dateTime": "2024-03-20T16:00:00.000Z" }
                }
            ]
        })
    );
}

#[tokio::test]
async fn root_path_serves_events() {
    let (app, _) = app();
    let response = get(app, "/?ics=https%3A%2F%2Fcalendar.example.com%2Fteam.ics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(summaries(&body), ["Offsite", "Planning session", "Retro"]);
}

#[tokio::test]
async fn success_headers() {
    let (app, _) = app();
    let response = get(app, &events_uri(&[("ics", CAL_URL)])).await;

    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "public, s-maxage=120, stale-while-revalidate=600"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn max_results_caps_after_sorting() {
    let (app, _) = app();
    let response = get(app, &events_uri(&[("ics", CAL_URL), ("maxResults", "1")])).await;

    let body = json_body(response).await;
    assert_eq!(summaries(&body), ["Offsite"]);
}

#[tokio::test]
async fn unusable_max_results_falls_back() {
    for value in ["0", "-5", "lots"] {
        let (app, _) = app();
        let response = get(app, &events_uri(&[("ics", CAL_URL), ("maxResults", value)])).await;

        assert_eq!(response.status(), StatusCode::OK, "maxResults={value}");
        let body = json_body(response).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 3, "maxResults={value}");
    }
}

#[tokio::test]
async fn time_window_is_inclusive() {
    let (app, _) = app();
    let response = get(
        app,
        &events_uri(&[
            ("ics", CAL_URL),
            ("timeMin", "2024-03-12T09:30:00Z"),
            ("timeMax", "2024-03-20T15:00:00Z"),
        ]),
    )
    .await;

    let body = json_body(response).await;
    assert_eq!(summaries(&body), ["Planning session", "Retro"]);
}

#[tokio::test]
async fn unparsable_bounds_are_ignored() {
    let (app, _) = app();
    let response = get(
        app,
        &events_uri(&[("ics", CAL_URL), ("timeMin", "soon"), ("timeMax", "later")]),
    )
    .await;

    let body = json_body(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn empty_calendar_gives_empty_items() {
    let (app, _) = app_with(
        ServerConfig::default(),
        StaticSource::new().with_body(CAL_URL, "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n"),
    );
    let response = get(app, &events_uri(&[("ics", CAL_URL)])).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "items": [] }));
}

#[tokio::test]
async fn configured_default_url_is_used() {
    let (app, source) = app_with(
        ServerConfig::default().with_default_ics_url(CAL_URL),
        StaticSource::new().with_body(CAL_URL, CALENDAR),
    );
    let response = get(app, "/api/events").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(source.requests(), [CAL_URL]);
}

#[tokio::test]
async fn missing_url_is_400() {
    let (app, source) = app();
    let response = get(app, "/api/events").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Missing ICS URL (pass ?ics= or configure default_ics_url)" })
    );
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn non_https_url_is_400_without_fetch() {
    let (app, source) = app();
    let response = get(
        app,
        &events_uri(&[("ics", "http://calendar.example.com/team.ics")]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Invalid ICS URL" }));
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn overlong_url_is_400() {
    let long = format!("https://calendar.example.com/{}", "a".repeat(1000));
    let (app, source) = app();
    let response = get(app, &events_uri(&[("ics", &long)])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Invalid ICS URL" }));
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn upstream_status_is_propagated() {
    let missing = "https://calendar.example.com/missing.ics";
    let (app, _) = app();
    let response = get(app, &events_uri(&[("ics", missing)])).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Fetch failed", "detail": "Not Found" })
    );
}

#[tokio::test]
async fn upstream_server_error_body_is_relayed() {
    let (app, _) = app_with(
        ServerConfig::default(),
        StaticSource::new().with_response(
            CAL_URL,
            StaticResponse::Status {
                status: 503,
                body: "maintenance".to_string(),
            },
        ),
    );
    let response = get(app, &events_uri(&[("ics", CAL_URL)])).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Fetch failed", "detail": "maintenance" })
    );
}

#[tokio::test]
async fn network_failure_is_500() {
    let (app, _) = app_with(
        ServerConfig::default(),
        StaticSource::new().with_response(
            CAL_URL,
            StaticResponse::NetworkError("connection reset".to_string()),
        ),
    );
    let response = get(app, &events_uri(&[("ics", CAL_URL)])).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "ICS proxy failure");
    assert!(body["detail"].as_str().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn cors_preflight() {
    let (app, _) = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/events")
        .header(header::ORIGIN, "https://dashboard.example.org")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(methods.contains("GET"));
}

#[tokio::test]
async fn healthz() {
    let (app, source) = app();
    let response = get(app, "/healthz").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })
    );
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn repeated_max_results_keeps_first() {
    let (app, _) = app();
    let response = get(
        app,
        &events_uri(&[("ics", CAL_URL), ("maxResults", "1"), ("maxResults", "2")]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let body = json_body(response).await;
    assert_eq!(summaries(&body), ["Offsite"]);
}

#[tokio::test]
async fn repeated_ics_keeps_first() {
    let (app, source) = app();
    let response = get(
        app,
        &events_uri(&[("ics", CAL_URL), ("ics", "http://elsewhere.example.com/x.ics")]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(source.requests(), [CAL_URL]);
}

#[tokio::test]
async fn leading_digits_of_max_results_are_used() {
    let (app, _) = app();
    let response = get(app, &events_uri(&[("ics", CAL_URL), ("maxResults", "2.5")])).await;

    let body = json_body(response).await;
    assert_eq!(summaries(&body), ["Offsite", "Planning session"]);
}
