//! Server-rendered HTML documents. Pages are small enough that they are
//! assembled as strings; every user-supplied value goes through `escape`.

use crate::core::ledger::LedgerSummary;
use crate::models::night::Night;
use crate::models::place::Place;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

/// Escape text for interpolation into HTML bodies and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a value for embedding in a query string.
pub fn encode_query_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// A plain 302 with a Location header, used after successful writes and
/// for the login redirects of the authentication gate.
pub fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
        "",
    )
        .into_response()
}

fn layout(title: &str, nav: bool, body: &str) -> Html<String> {
    let nav_html = if nav {
        "<nav><a href=\"/\">Dashboard</a> | <a href=\"/nights/\">Nights</a> | \
         <a href=\"/places/\">Places</a> | <a href=\"/logout\">Logout</a></nav><hr>"
    } else {
        ""
    };
    Html(format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{} — nightlog</title></head>\n\
         <body>{}<h1>{}</h1>\n{}\n</body></html>",
        escape(title),
        nav_html,
        escape(title),
        body
    ))
}

pub fn dashboard_page(summary: &LedgerSummary) -> Html<String> {
    let body = match &summary.range {
        Some(range) => format!(
            "<ul>\
             <li>Nights tracked: <strong>{}</strong></li>\
             <li>First night: {}</li>\
             <li>Last night: {}</li>\
             <li>Missing nights: <strong>{}</strong></li>\
             </ul>",
            summary.count, range.first, range.last, range.missing
        ),
        None => "<p>No nights tracked yet. Start with <a href=\"/nights/\">tonight</a>.</p>"
            .to_string(),
    };
    layout("Sleep dashboard", true, &body)
}

pub fn login_page(next: Option<&str>, failed: bool) -> Html<String> {
    let action = match next {
        Some(next) => format!("/login?next={}", escape(&encode_query_component(next))),
        None => "/login".to_string(),
    };
    let notice = if failed {
        "<p>Invalid username or password.</p>"
    } else {
        ""
    };
    let body = format!(
        "{}<form method=\"post\" action=\"{}\">\
         <label>Username <input type=\"text\" name=\"username\" required></label><br>\
         <label>Password <input type=\"password\" name=\"password\" required></label><br>\
         <button type=\"submit\">Log in</button>\
         </form>",
        notice, action
    );
    layout("Log in", false, &body)
}

pub fn places_page(places: &[Place]) -> Html<String> {
    let mut rows = String::new();
    for place in places {
        rows.push_str(&format!(
            "<tr><td><a href=\"/places/{}\">{}</a></td><td>{}</td><td>{}</td></tr>",
            place.id,
            escape(&place.name),
            place
                .latitude
                .map(|v| v.to_string())
                .unwrap_or_else(|| "—".to_string()),
            place
                .longitude
                .map(|v| v.to_string())
                .unwrap_or_else(|| "—".to_string()),
        ));
    }
    let body = format!(
        "<p><a href=\"/places/new\">Add a place</a></p>\
         <table><tr><th>Name</th><th>Latitude</th><th>Longitude</th></tr>{}</table>",
        rows
    );
    layout("Places", true, &body)
}

pub fn place_form_page(title: &str, action: &str, place: Option<&Place>) -> Html<String> {
    let name = place.map(|p| escape(&p.name)).unwrap_or_default();
    let latitude = place
        .and_then(|p| p.latitude)
        .map(|v| v.to_string())
        .unwrap_or_default();
    let longitude = place
        .and_then(|p| p.longitude)
        .map(|v| v.to_string())
        .unwrap_or_default();
    let body = format!(
        "<form method=\"post\" action=\"{}\">\
         <label>Name <input type=\"text\" name=\"name\" value=\"{}\" required></label><br>\
         <label>Latitude <input type=\"text\" name=\"latitude\" value=\"{}\"></label><br>\
         <label>Longitude <input type=\"text\" name=\"longitude\" value=\"{}\"></label><br>\
         <button type=\"submit\">Save</button>\
         </form>",
        action, name, latitude, longitude
    );
    layout(title, true, &body)
}

pub fn nights_page(dates: &[(String, String)]) -> Html<String> {
    let mut items = String::new();
    for (key, label) in dates {
        items.push_str(&format!(
            "<li><a href=\"/nights/{}\">{}</a></li>",
            key, label
        ));
    }
    let body = format!("<ul>{}</ul>", items);
    layout("Recent nights", true, &body)
}

pub struct NightFormPage<'a> {
    pub date_label: String,
    pub datekey: String,
    pub prev_key: String,
    pub next_key: String,
    pub night: Option<&'a Night>,
    pub places: &'a [Place],
}

pub fn night_form_page(page: &NightFormPage) -> Html<String> {
    let night = page.night;
    let to_bed = night.map(|n| n.bed_time_str()).unwrap_or_default();
    let to_rise = night.map(|n| n.rise_time_str()).unwrap_or_default();
    let amount = night.map(|n| n.amount.to_string()).unwrap_or_default();
    let alone = if night.map(|n| n.alone).unwrap_or(false) {
        " checked"
    } else {
        ""
    };
    let sleepless = if night.map(|n| n.sleepless).unwrap_or(false) {
        " checked"
    } else {
        ""
    };

    let mut options = String::from("<option value=\"\"></option>");
    let selected_place = night.and_then(|n| n.place);
    for place in page.places {
        let selected = if Some(place.id) == selected_place {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            place.id,
            selected,
            escape(&place.name)
        ));
    }

    let body = format!(
        "<p><a href=\"/nights/{prev}\">&larr; previous</a> | \
         <a href=\"/nights/{next}\">next &rarr;</a></p>\
         <form method=\"post\" action=\"/nights/{key}\">\
         <label>To bed <input type=\"time\" name=\"to_bed\" value=\"{to_bed}\" required></label><br>\
         <label>To rise <input type=\"time\" name=\"to_rise\" value=\"{to_rise}\" required></label><br>\
         <label>Hours slept <input type=\"text\" name=\"amount\" value=\"{amount}\" required></label><br>\
         <label>Place <select name=\"place\">{options}</select></label><br>\
         <label>Alone <input type=\"checkbox\" name=\"alone\"{alone}></label><br>\
         <label>Sleepless <input type=\"checkbox\" name=\"sleepless\"{sleepless}></label><br>\
         <button type=\"submit\">Save night</button>\
         </form>",
        prev = page.prev_key,
        next = page.next_key,
        key = page.datekey,
        to_bed = to_bed,
        to_rise = to_rise,
        amount = amount,
        options = options,
        alone = alone,
        sleepless = sleepless,
    );
    layout(&format!("Night of {}", page.date_label), true, &body)
}
