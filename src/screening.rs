//! Screening-status buckets. On-screen membership is driven purely by the
//! box-office reference list; the two time-based buckets require a known
//! open date on the row.

use std::collections::HashSet;

use jiff::civil::Date;

use crate::entities::movie;

const DATE_FMT: &str = "%Y.%m.%d";

pub fn today() -> Date {
    jiff::Zoned::now().date()
}

fn parse_open_date(raw: &str) -> Option<Date> {
    Date::strptime(DATE_FMT, raw).ok()
}

pub fn on_screen(rows: &[movie::Model], screening: &HashSet<String>) -> Vec<movie::Model> {
    rows.iter().filter(|row| screening.contains(&row.title)).cloned().collect()
}

pub fn coming_soon(rows: &[movie::Model], today: Date) -> Vec<movie::Model> {
    rows.iter()
        .filter(|row| !row.open_date.is_empty())
        .filter(|row| parse_open_date(&row.open_date).is_some_and(|date| date > today))
        .cloned()
        .collect()
}

pub fn off_screen(
    rows: &[movie::Model],
    today: Date,
    screening: &HashSet<String>,
) -> Vec<movie::Model> {
    rows.iter()
        .filter(|row| !row.open_date.is_empty())
        .filter(|row| parse_open_date(&row.open_date).is_some_and(|date| date < today))
        .filter(|row| !screening.contains(&row.title))
        .cloned()
        .collect()
}
