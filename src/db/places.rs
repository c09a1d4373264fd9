use crate::errors::AppResult;
use crate::models::place::{Place, PlaceFields};
use rusqlite::{Connection, Row, params};

/// Plain CRUD over the places table. Unknown ids surface as None and are
/// turned into hard 404s at the HTTP layer; places are never deleted.
pub struct PlaceRepository<'c> {
    conn: &'c Connection,
}

impl<'c> PlaceRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn list(&self) -> AppResult<Vec<Place>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, latitude, longitude FROM places ORDER BY id ASC")?;

        let rows = stmt.query_map([], map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Place>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, latitude, longitude FROM places WHERE id = ?1")?;

        let mut rows = stmt.query_map([id], map_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub fn create(&self, fields: &PlaceFields) -> AppResult<Place> {
        self.conn.execute(
            "INSERT INTO places (name, latitude, longitude) VALUES (?1, ?2, ?3)",
            params![fields.name, fields.latitude, fields.longitude],
        )?;

        Ok(Place {
            id: self.conn.last_insert_rowid(),
            name: fields.name.clone(),
            latitude: fields.latitude,
            longitude: fields.longitude,
        })
    }

    /// Update an existing place. Returns the number of affected rows so the
    /// caller can distinguish an unknown id.
    pub fn update(&self, id: i64, fields: &PlaceFields) -> AppResult<usize> {
        let n = self.conn.execute(
            "UPDATE places SET name = ?1, latitude = ?2, longitude = ?3 WHERE id = ?4",
            params![fields.name, fields.latitude, fields.longitude, id],
        )?;
        Ok(n)
    }

    pub fn count(&self) -> AppResult<i64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM places", [], |row| row.get(0))?;
        Ok(n)
    }
}

fn map_row(row: &Row) -> rusqlite::Result<Place> {
    Ok(Place {
        id: row.get("id")?,
        name: row.get("name")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
    })
}
