use chrono::NaiveDate;

/// Route parameter format: fixed-width calendar key, no separators.
pub const DATE_KEY_FMT: &str = "%Y%m%d";

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse an 8-character datekey (YYYYMMDD). Anything else is rejected,
/// including shorter digit runs chrono would otherwise accept.
pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_KEY_FMT).ok()
}

pub fn format_date_key(d: NaiveDate) -> String {
    d.format(DATE_KEY_FMT).to_string()
}

pub fn prev_day(d: NaiveDate) -> NaiveDate {
    d.pred_opt().unwrap_or(d)
}

pub fn next_day(d: NaiveDate) -> NaiveDate {
    d.succ_opt().unwrap_or(d)
}

/// The last `n` calendar days ending at `end`, newest first.
pub fn recent_days(end: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(n);
    let mut d = end;
    for _ in 0..n {
        out.push(d);
        d = prev_day(d);
    }
    out
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_key_round_trip() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date_key(d), "20240105");
        assert_eq!(parse_date_key("20240105"), Some(d));
    }

    #[test]
    fn date_key_rejects_garbage() {
        assert_eq!(parse_date_key("not-a-date"), None);
        assert_eq!(parse_date_key("2024015"), None); // 7 digits
        assert_eq!(parse_date_key("202401051"), None); // 9 digits
        assert_eq!(parse_date_key("20241301"), None); // month 13
        assert_eq!(parse_date_key("20240230"), None); // Feb 30
    }

    #[test]
    fn recent_days_newest_first() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let days = recent_days(end, 3);
        assert_eq!(
            days,
            vec![
                end,
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            ]
        );
    }
}
