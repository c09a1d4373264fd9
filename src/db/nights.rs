use crate::errors::{AppError, AppResult};
use crate::models::night::{Night, NightFields};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Row, params};

const DAY_FMT: &str = "%Y-%m-%d";
const STAMP_FMT: &str = "%Y-%m-%d %H:%M";

/// Date-keyed access to the nights table. Absence of a night for a date is
/// a normal state, not an error; direct-id lookups do not exist.
pub struct NightRepository<'c> {
    conn: &'c mut Connection,
}

impl<'c> NightRepository<'c> {
    pub fn new(conn: &'c mut Connection) -> Self {
        Self { conn }
    }

    pub fn find_by_day(&self, day: NaiveDate) -> AppResult<Option<Night>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, day, to_bed, to_rise, amount, place, alone, sleepless
             FROM nights WHERE day = ?1",
        )?;

        let mut rows = stmt.query_map([day.format(DAY_FMT).to_string()], map_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// All nights, ordered by day ascending (the summary relies on this).
    pub fn all_ordered(&self) -> AppResult<Vec<Night>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, day, to_bed, to_rise, amount, place, alone, sleepless
             FROM nights ORDER BY day ASC",
        )?;

        let rows = stmt.query_map([], map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn count(&self) -> AppResult<i64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM nights", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Create-or-update the night for `day`, applying all submitted fields.
    ///
    /// The lookup and the write run inside one transaction so the pair is a
    /// single atomic unit; the UNIQUE index on `day` backs up the
    /// one-night-per-date invariant if anything else ever writes the table.
    pub fn upsert(&mut self, day: NaiveDate, fields: &NightFields) -> AppResult<Night> {
        let day_str = day.format(DAY_FMT).to_string();
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = {
            let mut stmt = tx.prepare("SELECT id FROM nights WHERE day = ?1")?;
            let mut rows = stmt.query_map([&day_str], |row| row.get::<_, i64>(0))?;
            match rows.next() {
                Some(id) => Some(id?),
                None => None,
            }
        };

        let id = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE nights
                     SET to_bed = ?1, to_rise = ?2, amount = ?3,
                         place = ?4, alone = ?5, sleepless = ?6
                     WHERE id = ?7",
                    params![
                        fields.to_bed.format(STAMP_FMT).to_string(),
                        fields.to_rise.format(STAMP_FMT).to_string(),
                        fields.amount,
                        fields.place,
                        fields.alone as i64,
                        fields.sleepless as i64,
                        id,
                    ],
                )?;
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO nights (day, to_bed, to_rise, amount, place, alone, sleepless)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        day_str,
                        fields.to_bed.format(STAMP_FMT).to_string(),
                        fields.to_rise.format(STAMP_FMT).to_string(),
                        fields.amount,
                        fields.place,
                        fields.alone as i64,
                        fields.sleepless as i64,
                    ],
                )?;
                tx.last_insert_rowid()
            }
        };

        tx.commit()?;

        Ok(Night {
            id,
            day,
            to_bed: fields.to_bed,
            to_rise: fields.to_rise,
            amount: fields.amount,
            place: fields.place,
            alone: fields.alone,
            sleepless: fields.sleepless,
        })
    }
}

fn map_row(row: &Row) -> rusqlite::Result<Night> {
    let day_str: String = row.get("day")?;
    let bed_str: String = row.get("to_bed")?;
    let rise_str: String = row.get("to_rise")?;

    let day = NaiveDate::parse_from_str(&day_str, DAY_FMT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(day_str.clone())),
        )
    })?;

    let to_bed = NaiveDateTime::parse_from_str(&bed_str, STAMP_FMT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(bed_str.clone())),
        )
    })?;

    let to_rise = NaiveDateTime::parse_from_str(&rise_str, STAMP_FMT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(rise_str.clone())),
        )
    })?;

    Ok(Night {
        id: row.get("id")?,
        day,
        to_bed,
        to_rise,
        amount: row.get("amount")?,
        place: row.get("place")?,
        alone: row.get::<_, i64>("alone")? != 0,
        sleepless: row.get::<_, i64>("sleepless")? != 0,
    })
}
