use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use tower::ServiceExt;

mod common;
use common::{TEST_ADMIN_PASSWORD, TEST_ADMIN_USER, build_router};

async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> Response<axum::body::Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(
    router: &Router,
    uri: &str,
    body: &str,
    cookie: Option<&str>,
) -> Response<axum::body::Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    router
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response<axum::body::Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<axum::body::Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Log in with the test admin and return the session cookie pair.
async fn login(router: &Router) -> String {
    let body = format!(
        "username={}&password={}",
        TEST_ADMIN_USER, TEST_ADMIN_PASSWORD
    );
    let response = post_form(router, "/login", &body, None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn count_nights(db_path: &str) -> i64 {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    conn.query_row("SELECT COUNT(*) FROM nights", [], |row| row.get(0))
        .expect("count")
}

const NIGHT_BODY: &str = "to_bed=23:00&to_rise=07:00&amount=8&alone=on";

#[tokio::test]
async fn anonymous_request_redirects_to_login_with_next() {
    let (router, _db) = build_router("http_anon_redirect");

    let response = get(&router, "/places/", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login?next=/places/");
}

#[tokio::test]
async fn wrong_password_rerenders_login() {
    let (router, _db) = build_router("http_bad_password");

    let response = post_form(&router, "/login", "username=admin&password=wrong", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Invalid username or password"));
}

#[tokio::test]
async fn login_without_next_lands_on_dashboard() {
    let (router, _db) = build_router("http_login_dashboard");

    let body = format!(
        "username={}&password={}",
        TEST_ADMIN_USER, TEST_ADMIN_PASSWORD
    );
    let response = post_form(&router, "/login", &body, None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn login_with_safe_next_redirects_there() {
    let (router, _db) = build_router("http_safe_next");

    let body = format!(
        "username={}&password={}",
        TEST_ADMIN_USER, TEST_ADMIN_PASSWORD
    );
    let response = post_form(&router, "/login?next=/places/", &body, None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/places/");
}

#[tokio::test]
async fn login_with_external_next_is_rejected() {
    let (router, _db) = build_router("http_unsafe_next");

    let body = format!(
        "username={}&password={}",
        TEST_ADMIN_USER, TEST_ADMIN_PASSWORD
    );
    let response = post_form(
        &router,
        "/login?next=https://evil.example/phish",
        &body,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn session_cookie_grants_access_and_logout_revokes_it() {
    let (router, _db) = build_router("http_session_lifecycle");
    let cookie = login(&router).await;

    let response = get(&router, "/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("No nights tracked yet"));

    let response = get(&router, "/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");

    // The revoked session no longer opens the gate.
    let response = get(&router, "/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login?next=/");
}

#[tokio::test]
async fn unparsable_datekey_is_a_400() {
    let (router, db_path) = build_router("http_bad_datekey");
    let cookie = login(&router).await;

    let response = get(&router, "/nights/not-a-date", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_form(&router, "/nights/not-a-date", NIGHT_BODY, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count_nights(&db_path), 0);
}

#[tokio::test]
async fn future_date_is_a_400_and_writes_nothing() {
    let (router, db_path) = build_router("http_future_date");
    let cookie = login(&router).await;

    let response = get(&router, "/nights/20990101", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_form(&router, "/nights/20990101", NIGHT_BODY, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count_nights(&db_path), 0);
}

#[tokio::test]
async fn night_submit_upserts_and_redirects_back() {
    let (router, db_path) = build_router("http_night_upsert");
    let cookie = login(&router).await;

    let response = post_form(&router, "/nights/20240105", NIGHT_BODY, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/nights/20240105");
    assert_eq!(count_nights(&db_path), 1);

    // Same date again: still one record, new values.
    let response = post_form(
        &router,
        "/nights/20240105",
        "to_bed=22:30&to_rise=06:30&amount=7.5",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(count_nights(&db_path), 1);

    let response = get(&router, "/nights/20240105", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("22:30"));
    assert!(body.contains("7.5"));
}

#[tokio::test]
async fn dashboard_reports_missing_nights() {
    let (router, _db) = build_router("http_dashboard_summary");
    let cookie = login(&router).await;

    post_form(&router, "/nights/20240101", NIGHT_BODY, Some(&cookie)).await;
    post_form(&router, "/nights/20240110", NIGHT_BODY, Some(&cookie)).await;

    let response = get(&router, "/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Nights tracked: <strong>2</strong>"));
    assert!(body.contains("Missing nights: <strong>8</strong>"));
}

#[tokio::test]
async fn nights_index_lists_eight_recent_dates() {
    let (router, _db) = build_router("http_nights_index");
    let cookie = login(&router).await;

    let response = get(&router, "/nights/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert_eq!(body.matches("<li>").count(), 8);
}

#[tokio::test]
async fn unknown_place_id_is_a_404() {
    let (router, _db) = build_router("http_place_404");
    let cookie = login(&router).await;

    let response = get(&router, "/places/9999", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_form(
        &router,
        "/places/9999",
        "name=Cabin&latitude=1&longitude=2",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn place_create_and_edit_flow() {
    let (router, _db) = build_router("http_place_crud");
    let cookie = login(&router).await;

    let response = post_form(
        &router,
        "/places/new",
        "name=Home&latitude=48.85&longitude=2.35",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/places/");

    let response = get(&router, "/places/", Some(&cookie)).await;
    let body = body_text(response).await;
    assert!(body.contains("Home"));

    // Edit place 1; coordinates may be left blank independently.
    let response = post_form(
        &router,
        "/places/1",
        "name=Grandma&latitude=&longitude=",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = get(&router, "/places/1", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Grandma"));
}

#[tokio::test]
async fn place_form_rejects_blank_name_and_bad_coordinates() {
    let (router, _db) = build_router("http_place_validation");
    let cookie = login(&router).await;

    let response = post_form(&router, "/places/new", "name=", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_form(
        &router,
        "/places/new",
        "name=Cabin&latitude=north",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
