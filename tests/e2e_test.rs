use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Value, json};
use shareit_booking::adapters::mock::{
    BookingStore as MockBookingStore, FixedClock, ItemCatalog as MockItemCatalog,
    UserDirectory as MockUserDirectory,
};
use shareit_booking::api::SHARER_USER_ID_HEADER;
use shareit_booking::api::handlers::AppState;
use shareit_booking::api::router::create_router;
use shareit_booking::application::booking::ServiceDependencies;
use shareit_booking::domain::value_objects::*;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

struct TestApp {
    router: axum::Router,
    users: Arc<MockUserDirectory>,
    items: Arc<MockItemCatalog>,
    now: DateTime<Utc>,
}

/// E2Eテスト用のアプリケーションセットアップ
///
/// インメモリのアダプターと実際のAPIルーターを使用します。
fn setup_e2e_app() -> TestApp {
    let now = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
    let users = Arc::new(MockUserDirectory::new());
    let items = Arc::new(MockItemCatalog::new());

    let service_deps = ServiceDependencies {
        booking_store: Arc::new(MockBookingStore::new()),
        user_directory: users.clone(),
        item_catalog: items.clone(),
        clock: Arc::new(FixedClock::new(now)),
    };

    let app_state = Arc::new(AppState { service_deps });

    TestApp {
        router: create_router(app_state),
        users,
        items,
        now,
    }
}

/// リクエストを送信し、ステータスとJSONボディを返す
async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    user: Option<UserId>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(SHARER_USER_ID_HEADER, user.value().to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

fn booking_request(app: &TestApp, item_id: ItemId, from_hours: i64, to_hours: i64) -> Value {
    json!({
        "itemId": item_id.value(),
        "start": app.now + Duration::hours(from_hours),
        "end": app.now + Duration::hours(to_hours),
    })
}

// ============================================================================
// E2Eテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_e2e_full_booking_flow() {
    // Arrange
    let app = setup_e2e_app();
    let owner = app.users.add_user("Owner");
    let booker = app.users.add_user("Booker");
    let item = app.items.add_item("Drill", owner, true);

    // Step 1: 予約申請（POST /bookings）
    let (status, created) = send(
        &app,
        "POST",
        "/bookings",
        Some(booker),
        Some(booking_request(&app, item, 1, 2)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "WAITING");
    assert_eq!(created["item"]["id"], json!(item.value()));
    assert_eq!(created["item"]["name"], "Drill");
    assert_eq!(created["booker"]["id"], json!(booker.value()));
    let booking_id = created["id"].as_str().unwrap().to_string();

    // Step 2: 所有者が承認（PATCH /bookings/:id?approved=true）
    let (status, approved) = send(
        &app,
        "PATCH",
        &format!("/bookings/{}?approved=true", booking_id),
        Some(owner),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "APPROVED");

    // Step 3: 予約者が詳細を取得（GET /bookings/:id）
    let (status, fetched) = send(
        &app,
        "GET",
        &format!("/bookings/{}", booking_id),
        Some(booker),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], booking_id.as_str());
    assert_eq!(fetched["status"], "APPROVED");

    // Step 4: 一覧取得（GET /bookings, GET /bookings/owner）
    let (status, mine) = send(&app, "GET", "/bookings?state=FUTURE", Some(booker), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, owned) = send(&app, "GET", "/bookings/owner", Some(owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owned[0]["id"], booking_id.as_str());

    // Step 5: アイテムの予約サマリー
    let (status, summary) = send(
        &app,
        "GET",
        &format!("/bookings/items/{}/summary", item.value()),
        Some(owner),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["nextBooking"]["id"], booking_id.as_str());
    assert_eq!(summary["nextBooking"]["bookerId"], json!(booker.value()));
    assert!(summary["lastBooking"].is_null());
}

// ============================================================================
// E2Eテスト: 異常系
// ============================================================================

#[tokio::test]
async fn test_e2e_missing_user_header_is_bad_request() {
    let app = setup_e2e_app();

    let (status, body) = send(&app, "GET", "/bookings", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_e2e_malformed_user_header_is_bad_request() {
    let app = setup_e2e_app();

    let request = Request::builder()
        .method("GET")
        .uri("/bookings")
        .header(SHARER_USER_ID_HEADER, "42")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_e2e_owner_booking_own_item_is_not_found() {
    let app = setup_e2e_app();
    let owner = app.users.add_user("Owner");
    let item = app.items.add_item("Drill", owner, true);

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(owner),
        Some(booking_request(&app, item, 1, 2)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "OWNER_CANNOT_BOOK_OWN_ITEM");
}

#[tokio::test]
async fn test_e2e_unavailable_item_is_bad_request() {
    let app = setup_e2e_app();
    let owner = app.users.add_user("Owner");
    let booker = app.users.add_user("Booker");
    let item = app.items.add_item("Tent", owner, false);

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(booker),
        Some(booking_request(&app, item, 1, 2)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ITEM_NOT_AVAILABLE");
}

#[tokio::test]
async fn test_e2e_missing_end_is_bad_request() {
    let app = setup_e2e_app();
    let owner = app.users.add_user("Owner");
    let booker = app.users.add_user("Booker");
    let item = app.items.add_item("Drill", owner, true);

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(booker),
        Some(json!({
            "itemId": item.value(),
            "start": app.now + Duration::hours(1),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_BOOKING_PERIOD");
}

#[tokio::test]
async fn test_e2e_unknown_state_is_bad_request() {
    let app = setup_e2e_app();
    let booker = app.users.add_user("Booker");

    let (status, body) = send(&app, "GET", "/bookings?state=SOON", Some(booker), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "UNKNOWN_STATE");
    assert_eq!(body["message"], "Unknown state: SOON");
}

#[tokio::test]
async fn test_e2e_invalid_pagination_is_rejected_at_gateway() {
    let app = setup_e2e_app();
    let booker = app.users.add_user("Booker");

    let (status, _) = send(&app, "GET", "/bookings?from=-1", Some(booker), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/bookings/owner?size=0", Some(booker), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_e2e_unknown_booking_is_not_found() {
    let app = setup_e2e_app();
    let user = app.users.add_user("User");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/bookings/{}", uuid::Uuid::new_v4()),
        Some(user),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "BOOKING_NOT_FOUND");
}

#[tokio::test]
async fn test_e2e_decide_twice_is_bad_request() {
    let app = setup_e2e_app();
    let owner = app.users.add_user("Owner");
    let booker = app.users.add_user("Booker");
    let item = app.items.add_item("Drill", owner, true);

    let (_, created) = send(
        &app,
        "POST",
        "/bookings",
        Some(booker),
        Some(booking_request(&app, item, 1, 2)),
    )
    .await;
    let uri = format!("/bookings/{}?approved=true", created["id"].as_str().unwrap());

    let (status, _) = send(&app, "PATCH", &uri, Some(owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "PATCH", &uri, Some(owner), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ALREADY_APPROVED");
}

#[tokio::test]
async fn test_e2e_health_check() {
    let app = setup_e2e_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
