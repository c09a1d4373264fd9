use serde::Serialize;

/// A named sleeping location. Coordinates are independently optional;
/// nights hold a weak reference to a place by id.
#[derive(Debug, Clone, Serialize)]
pub struct Place {
    pub id: i64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Payload of the place form, for both create and edit.
#[derive(Debug, Clone)]
pub struct PlaceFields {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
