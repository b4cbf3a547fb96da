use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::models::{BookingError, BookingStatus, CreateBookingRequest};
use booking_cell::services::BookingService;
use shared_utils::test_utils::{MockSupabaseRows, TestConfig};

fn service_for(server: &MockServer) -> BookingService {
    let config = TestConfig::default()
        .with_supabase_url(&server.uri())
        .to_app_config();
    BookingService::new(&config)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn create_request() -> CreateBookingRequest {
    CreateBookingRequest {
        date: "2025-06-03".to_string(),
        time: "10:00 AM".to_string(),
        name: "Dana".to_string(),
        service: "Color".to_string(),
        email: Some("dana@example.com".to_string()),
    }
}

#[tokio::test]
async fn slot_taken_checks_scheduled_rows_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("date", "eq.2025-06-03"))
        .and(query_param("time", "eq.10:00 AM"))
        .and(query_param("status", "eq.Scheduled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 12 }])))
        .mount(&server)
        .await;

    let service = service_for(&server);
    assert!(service.slot_taken(date("2025-06-03"), "10:00 AM").await.unwrap());
}

#[tokio::test]
async fn create_booking_inserts_scheduled_row() {
    let server = MockServer::start().await;

    // Conflict probe finds nothing.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseRows::booking_with_email(
                7,
                "2025-06-03",
                "10:00 AM",
                "Dana",
                "Color",
                "dana@example.com"
            )
        ])))
        .mount(&server)
        .await;

    let booking = service_for(&server)
        .create_booking(create_request())
        .await
        .unwrap();

    assert_eq!(booking.id, 7);
    assert_eq!(booking.status, BookingStatus::Scheduled);
    assert_eq!(booking.time, "10:00 AM");
    assert_eq!(booking.customer_email(), Some("dana@example.com"));
}

#[tokio::test]
async fn create_booking_rejects_taken_slot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 3 }])))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .create_booking(create_request())
        .await
        .unwrap_err();
    assert_matches!(err, BookingError::SlotTaken);
}

#[tokio::test]
async fn create_booking_validates_input_before_any_request() {
    // No mocks mounted: validation failures must never reach the server.
    let server = MockServer::start().await;
    let service = service_for(&server);

    let mut missing = create_request();
    missing.name = "   ".to_string();
    assert_matches!(
        service.create_booking(missing).await.unwrap_err(),
        BookingError::MissingFields
    );

    let mut bad_date = create_request();
    bad_date.date = "06/03/2025".to_string();
    assert_matches!(
        service.create_booking(bad_date).await.unwrap_err(),
        BookingError::InvalidDate(_)
    );
}

#[tokio::test]
async fn cancel_by_details_reports_match_count() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("name", "eq.Dana"))
        .and(query_param("status", "eq.Scheduled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::booking(7, "2025-06-03", "10:00 AM", "Dana", "Color")
        ])))
        .mount(&server)
        .await;

    let changed = service_for(&server)
        .cancel_by_details("2025-06-03", "10:00 AM", "Dana", "Color")
        .await
        .unwrap();
    assert_eq!(changed, 1);
}

#[tokio::test]
async fn cancel_by_id_refetches_and_reports_change() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.7"))
        .and(query_param("status", "eq.Scheduled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut cancelled = MockSupabaseRows::booking(7, "2025-06-03", "10:00 AM", "Dana", "Color");
    cancelled["status"] = json!("Cancelled");
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([cancelled])))
        .mount(&server)
        .await;

    let (changed, row) = service_for(&server).cancel_by_id(7).await.unwrap();
    assert!(changed);
    assert_eq!(row.unwrap().status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn complete_by_id_leaves_cancelled_rows_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    // Row exists but was already cancelled, so the guarded PATCH skipped it.
    let mut row = MockSupabaseRows::booking(9, "2025-06-03", "1:00 PM", "Ade", "Cut");
    row["status"] = json!("Cancelled");
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&server)
        .await;

    let (changed, fetched) = service_for(&server).complete_by_id(9).await.unwrap();
    assert!(!changed);
    assert_eq!(fetched.unwrap().status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn update_booking_refuses_occupied_slot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "neq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 8 }])))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .update_booking(7, "Dana", "Color", "2025-06-03", "10:00 AM")
        .await
        .unwrap_err();
    assert_matches!(err, BookingError::SlotTaken);
}

#[tokio::test]
async fn update_booking_patches_and_returns_row() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "neq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::booking(7, "2025-06-10", "2:00 PM", "Dana", "Cut")
        ])))
        .mount(&server)
        .await;

    let booking = service_for(&server)
        .update_booking(7, "Dana", "Cut", "2025-06-10", "2:00 PM")
        .await
        .unwrap();
    assert_eq!(booking.date, date("2025-06-10"));
    assert_eq!(booking.time, "2:00 PM");
}

#[tokio::test]
async fn list_bookings_applies_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("date", "gte.2025-06-01"))
        .and(query_param("status", "eq.Scheduled"))
        .and(query_param("order", "date.asc,time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::booking(1, "2025-06-03", "10:00 AM", "Dana", "Color"),
            MockSupabaseRows::booking(2, "2025-06-03", "2:00 PM", "Ade", "Cut"),
        ])))
        .mount(&server)
        .await;

    let bookings = service_for(&server)
        .list_bookings(Some(date("2025-06-01")), None, true)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].name, "Dana");
}
