//! End-to-end checks over the assembled router: public pages, the
//! booking flow, and the admin console behind its session cookie.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::Router;
use http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use salon_api::create_router;
use shared_models::session::{CSRF_HEADER, SESSION_COOKIE};
use shared_utils::test_utils::{MockSupabaseRows, TestConfig};

async fn app_for(server: &MockServer) -> Router {
    let config = TestConfig::default()
        .with_supabase_url(&server.uri())
        .with_env_admin("owner@example.com", "hunter2");
    create_router(config.to_arc())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_responds() {
    let server = MockServer::start().await;
    let app = app_for(&server).await;

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn site_endpoint_serves_branding() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/businesses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let app = app_for(&server).await;
    let response = app
        .oneshot(Request::builder().uri("/site").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["brand"]["name"], json!("HairDaze"));
    assert!(body["badges"].as_array().is_some());
}

#[tokio::test]
async fn booking_flow_creates_then_refuses_double_booking() {
    let server = MockServer::start().await;

    // First submission: slot free, insert returns the row.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("time", "eq.10:00 AM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseRows::booking(1, "2025-06-03", "10:00 AM", "Dana", "Color")
        ])))
        .mount(&server)
        .await;

    // Second submission: the slot now reads as taken.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("time", "eq.10:00 AM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .mount(&server)
        .await;

    let payload = json!({
        "date": "2025-06-03",
        "time": "10:00 AM",
        "name": "Dana",
        "service": "Color"
    });

    let app = app_for(&server).await;
    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bookings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    let body = body_json(first).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["booking"]["id"], json!(1));

    let second = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/bookings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = body_json(second).await;
    assert_eq!(body["error"], json!("Time already booked"));
}

#[tokio::test]
async fn availability_endpoint_lists_open_slots() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let app = app_for(&server).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/bookings/availability/times?date=2025-06-03")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let times = body["times"].as_array().unwrap();
    assert_eq!(times.len(), 18);
    assert_eq!(times[0], json!("10:00 AM"));
}

#[tokio::test]
async fn admin_console_flow_login_list_and_cancel() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::booking(5, "2025-06-03", "10:00 AM", "Dana", "Color")
        ])))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let app = app_for(&server).await;
    let addr = SocketAddr::from(([10, 99, 1, 1], 4000));

    let login = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .extension(ConnectInfo(addr))
                .body(Body::from(
                    json!({ "email": "owner@example.com", "password": "hunter2" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(login.status(), StatusCode::OK);
    let set_cookie = login
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie")
        .to_string();
    let cookie_pair = set_cookie.split(';').next().unwrap().to_string();
    assert!(cookie_pair.starts_with(SESSION_COOKIE));

    let body = body_json(login).await;
    let csrf = body["csrf_token"].as_str().unwrap().to_string();

    let listing = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/bookings?view=all")
                .header(header::COOKIE, &cookie_pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(listing.status(), StatusCode::OK);
    let body = body_json(listing).await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 1);

    // Mutations without the CSRF header are refused.
    let forbidden = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/bookings/5/cancel")
                .header(header::COOKIE, &cookie_pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let cancel = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/bookings/5/cancel")
                .header(header::COOKIE, &cookie_pair)
                .header(CSRF_HEADER, &csrf)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(cancel.status(), StatusCode::OK);
    let body = body_json(cancel).await;
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn anonymous_admin_requests_are_rejected() {
    let server = MockServer::start().await;
    let app = app_for(&server).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/bookings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
