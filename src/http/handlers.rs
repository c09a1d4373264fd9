//! Route handlers. Every handler behind the authentication gate takes a
//! `CurrentUser` argument: the gate is an extractor, so the resolved
//! principal is explicit in each signature instead of ambient state.

use crate::auth::{self, SESSION_COOKIE, SESSION_MAX_AGE_SECS};
use crate::core::ledger::summarize;
use crate::db::nights::NightRepository;
use crate::db::places::PlaceRepository;
use crate::errors::{AppError, AppResult};
use crate::http::render;
use crate::http::AppState;
use crate::models::night::NightFields;
use crate::models::place::PlaceFields;
use crate::utils::date;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{Html, IntoResponse, Response};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

// ---------------------------------------------------------------------
// Authentication gate
// ---------------------------------------------------------------------

/// The authenticated principal of a request. Extracting it enforces the
/// gate: anonymous requests are redirected to the login page with the
/// original path preserved as the `next` target.
pub struct CurrentUser {
    pub username: String,
    pub token: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = session_token(&parts.headers)
            && let Some(username) = state.sessions.resolve(&token)
        {
            return Ok(CurrentUser { username, token });
        }

        let requested = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        Err(render::found(&format!(
            "/login?next={}",
            render::encode_query_component(requested)
        )))
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in cookies.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=')
            && name == SESSION_COOKIE
        {
            return Some(value.to_string());
        }
    }
    None
}

fn session_cookie(token: &str, max_age: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}")
}

fn with_cookie(mut response: Response, cookie: &str) -> AppResult<Response> {
    let value =
        HeaderValue::from_str(cookie).map_err(|e| AppError::Other(e.to_string()))?;
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}

// ---------------------------------------------------------------------
// Login / logout
// ---------------------------------------------------------------------

#[derive(Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

pub async fn login_page(Query(query): Query<NextQuery>) -> Html<String> {
    render::login_page(query.next.as_deref(), false)
}

pub async fn login_submit(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    axum::Form(form): axum::Form<LoginForm>,
) -> Result<Response, AppError> {
    let ok = {
        let db = state.db.lock().await;
        auth::verify_credentials(&db.conn, &form.username, &form.password)?
    };

    if !ok {
        tracing::info!(username = %form.username, "rejected login");
        return Ok(render::login_page(query.next.as_deref(), true).into_response());
    }

    // Validate the redirect target before issuing anything.
    if let Some(next) = &query.next
        && !auth::is_safe_redirect(next)
    {
        return Err(AppError::UnsafeRedirect(next.clone()));
    }

    let token = state.sessions.create(&form.username);
    tracing::info!(username = %form.username, "login");

    let target = query.next.as_deref().unwrap_or("/");
    with_cookie(
        render::found(target),
        &session_cookie(&token, SESSION_MAX_AGE_SECS),
    )
}

pub async fn logout(user: CurrentUser, State(state): State<AppState>) -> Result<Response, AppError> {
    state.sessions.revoke(&user.token);
    tracing::info!(username = %user.username, "logout");
    with_cookie(render::found("/"), &session_cookie("", 0))
}

// ---------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------

pub async fn dashboard(
    _user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let mut db = state.db.lock().await;
    let nights = NightRepository::new(&mut db.conn).all_ordered()?;
    Ok(render::dashboard_page(&summarize(&nights)))
}

// ---------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------

#[derive(Deserialize)]
pub struct PlaceForm {
    name: String,
    latitude: Option<String>,
    longitude: Option<String>,
}

impl PlaceForm {
    /// Name is required; either coordinate may be left blank.
    fn into_fields(self) -> AppResult<PlaceFields> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::InvalidForm("place name must not be empty".into()));
        }
        Ok(PlaceFields {
            name,
            latitude: parse_coordinate("latitude", self.latitude)?,
            longitude: parse_coordinate("longitude", self.longitude)?,
        })
    }
}

fn parse_coordinate(label: &str, raw: Option<String>) -> AppResult<Option<f64>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| AppError::InvalidForm(format!("{label} is not a number: {s}"))),
    }
}

pub async fn show_places(
    _user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let db = state.db.lock().await;
    let places = PlaceRepository::new(&db.conn).list()?;
    Ok(render::places_page(&places))
}

pub async fn add_place_page(_user: CurrentUser) -> Html<String> {
    render::place_form_page("New place", "/places/new", None)
}

pub async fn add_place_submit(
    _user: CurrentUser,
    State(state): State<AppState>,
    axum::Form(form): axum::Form<PlaceForm>,
) -> Result<Response, AppError> {
    let fields = form.into_fields()?;
    let db = state.db.lock().await;
    let place = PlaceRepository::new(&db.conn).create(&fields)?;
    tracing::info!(place = %place.name, id = place.id, "created place");
    Ok(render::found("/places/"))
}

pub async fn place_page(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(pid): Path<i64>,
) -> Result<Html<String>, AppError> {
    let db = state.db.lock().await;
    let place = PlaceRepository::new(&db.conn)
        .find_by_id(pid)?
        .ok_or_else(|| AppError::NotFound(format!("place {pid}")))?;
    Ok(render::place_form_page(
        &format!("Edit {}", place.name),
        &format!("/places/{pid}"),
        Some(&place),
    ))
}

pub async fn place_submit(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(pid): Path<i64>,
    axum::Form(form): axum::Form<PlaceForm>,
) -> Result<Response, AppError> {
    let fields = form.into_fields()?;
    let db = state.db.lock().await;
    let updated = PlaceRepository::new(&db.conn).update(pid, &fields)?;
    if updated == 0 {
        return Err(AppError::NotFound(format!("place {pid}")));
    }
    tracing::info!(place = %fields.name, id = pid, "updated place");
    Ok(render::found("/places/"))
}

// ---------------------------------------------------------------------
// Nights
// ---------------------------------------------------------------------

#[derive(Deserialize)]
pub struct NightForm {
    to_bed: String,
    to_rise: String,
    amount: String,
    place: Option<String>,
    alone: Option<String>,
    sleepless: Option<String>,
}

impl NightForm {
    fn into_fields(self, day: NaiveDate) -> AppResult<NightFields> {
        let bed = parse_clock(&self.to_bed)?;
        let rise = parse_clock(&self.to_rise)?;
        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::InvalidForm(format!("amount is not a number: {}", self.amount)))?;
        let place = match self.place.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                s.parse::<i64>()
                    .map_err(|_| AppError::InvalidForm(format!("invalid place id: {s}")))?,
            ),
        };

        // Checkboxes arrive as present-or-absent.
        Ok(NightFields::from_clock_times(
            day,
            bed,
            rise,
            amount,
            place,
            self.alone.is_some(),
            self.sleepless.is_some(),
        ))
    }
}

fn parse_clock(s: &str) -> AppResult<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

/// Reject unparsable datekeys and future dates before anything touches
/// the database.
fn parse_route_date(datekey: &str) -> AppResult<NaiveDate> {
    let day = date::parse_date_key(datekey)
        .ok_or_else(|| AppError::InvalidDate(datekey.to_string()))?;
    if day > date::today() {
        return Err(AppError::FutureDate(datekey.to_string()));
    }
    Ok(day)
}

pub async fn show_nights(_user: CurrentUser) -> Html<String> {
    // Today plus the seven days before it, newest first.
    let dates: Vec<(String, String)> = date::recent_days(date::today(), 8)
        .into_iter()
        .map(|d| (date::format_date_key(d), d.format("%d/%m/%Y").to_string()))
        .collect();
    render::nights_page(&dates)
}

pub async fn night_page(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(datekey): Path<String>,
) -> Result<Html<String>, AppError> {
    let day = parse_route_date(&datekey)?;

    let mut db = state.db.lock().await;
    let night = NightRepository::new(&mut db.conn).find_by_day(day)?;
    let places = PlaceRepository::new(&db.conn).list()?;

    Ok(render::night_form_page(&render::NightFormPage {
        date_label: day.format("%d/%m/%Y").to_string(),
        datekey: date::format_date_key(day),
        prev_key: date::format_date_key(date::prev_day(day)),
        next_key: date::format_date_key(date::next_day(day)),
        night: night.as_ref(),
        places: &places,
    }))
}

/// Create the night for the date, or edit it if it already exists.
pub async fn night_submit(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(datekey): Path<String>,
    axum::Form(form): axum::Form<NightForm>,
) -> Result<Response, AppError> {
    let day = parse_route_date(&datekey)?;
    let fields = form.into_fields(day)?;

    let mut db = state.db.lock().await;
    let night = NightRepository::new(&mut db.conn).upsert(day, &fields)?;
    tracing::info!(day = %night.day, "saved night");

    Ok(render::found(&format!(
        "/nights/{}",
        date::format_date_key(day)
    )))
}
