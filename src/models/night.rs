use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// One sleep record for a single calendar date.
/// `day` is the natural key; `id` is only a storage handle.
#[derive(Debug, Clone, Serialize)]
pub struct Night {
    pub id: i64,
    pub day: NaiveDate,              // ⇔ nights.day (TEXT "YYYY-MM-DD", UNIQUE)
    pub to_bed: NaiveDateTime,       // ⇔ nights.to_bed (TEXT "YYYY-MM-DD HH:MM")
    pub to_rise: NaiveDateTime,      // ⇔ nights.to_rise (TEXT "YYYY-MM-DD HH:MM")
    pub amount: f64,                 // ⇔ nights.amount (REAL, hours slept)
    pub place: Option<i64>,          // ⇔ nights.place (INTEGER NULL → places.id)
    pub alone: bool,                 // ⇔ nights.alone (INTEGER 0/1)
    pub sleepless: bool,             // ⇔ nights.sleepless (INTEGER 0/1)
}

/// The mutable payload of a night, as submitted through the night form.
/// Applied whole on every upsert: last write wins.
#[derive(Debug, Clone)]
pub struct NightFields {
    pub to_bed: NaiveDateTime,
    pub to_rise: NaiveDateTime,
    pub amount: f64,
    pub place: Option<i64>,
    pub alone: bool,
    pub sleepless: bool,
}

impl NightFields {
    /// Rebuild the bed/rise timestamps from clock times on the form.
    ///
    /// The night keyed to `day` spans the evening of `day` into the next
    /// morning: a bed time of 12:00 or later lands on `day`, an earlier one
    /// is past midnight and lands on the next day. Rise is always next day.
    pub fn from_clock_times(
        day: NaiveDate,
        bed: NaiveTime,
        rise: NaiveTime,
        amount: f64,
        place: Option<i64>,
        alone: bool,
        sleepless: bool,
    ) -> Self {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
        let next = day.succ_opt().unwrap_or(day);
        let to_bed = if bed >= noon {
            day.and_time(bed)
        } else {
            next.and_time(bed)
        };
        Self {
            to_bed,
            to_rise: next.and_time(rise),
            amount,
            place,
            alone,
            sleepless,
        }
    }
}

impl Night {
    pub fn day_str(&self) -> String {
        self.day.format("%Y-%m-%d").to_string()
    }

    pub fn bed_time_str(&self) -> String {
        self.to_bed.format("%H:%M").to_string()
    }

    pub fn rise_time_str(&self) -> String {
        self.to_rise.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn evening_bed_time_stays_on_the_night_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let f = NightFields::from_clock_times(day, t(23, 15), t(7, 0), 7.75, None, true, false);
        assert_eq!(f.to_bed.date(), day);
        assert_eq!(f.to_rise.date(), day.succ_opt().unwrap());
    }

    #[test]
    fn past_midnight_bed_time_rolls_to_next_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let f = NightFields::from_clock_times(day, t(0, 30), t(8, 0), 7.5, None, true, false);
        assert_eq!(f.to_bed.date(), day.succ_opt().unwrap());
        assert!(f.to_bed < f.to_rise);
    }
}
