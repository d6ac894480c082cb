use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Textual format of `from`/`to`: local time, no offset
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A query window derived from a single calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

impl DateRange {
    /// Full day window: `00:00:00` to `23:59:59` of `date`
    pub fn for_day(date: NaiveDate) -> Self {
        Self {
            from: date.and_time(NaiveTime::MIN),
            to: date.and_time(end_of_day()),
        }
    }

    /// Same-instant window at `23:59:59` used by the credential probe.
    ///
    /// This is not a real data window; it only asks the server for as little as possible.
    pub fn probe(date: NaiveDate) -> Self {
        let instant = date.and_time(end_of_day());
        Self {
            from: instant,
            to: instant,
        }
    }

    pub fn probe_today() -> Self {
        Self::probe(Local::now().date_naive())
    }

    pub fn from_text(&self) -> String {
        self.from.format(QUERY_DATE_FORMAT).to_string()
    }

    pub fn to_text(&self) -> String {
        self.to.format(QUERY_DATE_FORMAT).to_string()
    }

    /// Query parameters in request order
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [("from", self.from_text()), ("to", self.to_text())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_for_day_spans_whole_day() {
        let range = DateRange::for_day(date(2024, 1, 1));
        assert_eq!(range.from_text(), "2024-01-01 00:00:00");
        assert_eq!(range.to_text(), "2024-01-01 23:59:59");
        assert!(range.from <= range.to);
    }

    #[test]
    fn test_probe_is_same_instant() {
        let range = DateRange::probe(date(2024, 2, 29));
        assert_eq!(range.from_text(), "2024-02-29 23:59:59");
        assert_eq!(range.from, range.to);
    }

    #[test]
    fn test_query_pairs_order() {
        let pairs = DateRange::for_day(date(2023, 12, 31)).query_pairs();
        assert_eq!(pairs[0], ("from", "2023-12-31 00:00:00".to_string()));
        assert_eq!(pairs[1], ("to", "2023-12-31 23:59:59".to_string()));
    }

    #[test]
    fn test_probe_today_uses_local_date() {
        let range = DateRange::probe_today();
        assert_eq!(range.from.date(), Local::now().date_naive());
        assert_eq!(range.to_text().len(), 19);
    }
}
