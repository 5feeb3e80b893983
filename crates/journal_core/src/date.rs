//! Calendar date math for month panels.
//!
//! # Responsibility
//! - Resolve month offsets against the session base date.
//! - Build whole-week month grids and the labels/keys rendered with them.
//! - Parse and format the `DD/MM/YYYY` entry date representation.
//!
//! # Invariants
//! - Every function here is pure; "today" is always passed in by the caller.
//! - Day keys are calendar `YYYY-MM-DD`, never derived from an instant.
//! - Grid rows always hold exactly 7 consecutive days.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Integer distance in months from the session's base month.
pub type MonthOffset = i32;

/// Canonical day-granularity key joining entries to grid cells.
pub type DayKey = String;

/// One grid row, ordered from the configured week start.
pub type Week = [NaiveDate; 7];

const DMY_FORMAT: &str = "%d/%m/%Y";
const DAY_KEY_FORMAT: &str = "%Y-%m-%d";
const MONTH_LABEL_FORMAT: &str = "%B %Y";

/// Returns the first day of the month `offset` months away from `base`.
///
/// Saturates to the earliest/latest representable month outside chrono's range.
pub fn month_start(base: NaiveDate, offset: MonthOffset) -> NaiveDate {
    let anchor = first_of_month(base);
    let shifted = if offset >= 0 {
        anchor.checked_add_months(Months::new(offset.unsigned_abs()))
    } else {
        anchor.checked_sub_months(Months::new(offset.unsigned_abs()))
    };
    shifted.unwrap_or_else(|| {
        if offset < 0 {
            NaiveDate::MIN
        } else {
            first_of_month(NaiveDate::MAX)
        }
    })
}

/// Builds the display grid for the month containing `month`.
///
/// The grid begins on `week_start` on-or-before the 1st and ends on the day
/// before `week_start` on-or-after the last day of the month.
pub fn month_grid(month: NaiveDate, week_start: Weekday) -> Vec<Week> {
    let first = first_of_month(month);
    let last = last_of_month(month);

    let lead = days_from_week_start(first.weekday(), week_start);
    let trail = 6 - days_from_week_start(last.weekday(), week_start);
    let grid_start = first.checked_sub_days(Days::new(lead)).unwrap_or(first);
    let grid_end = last.checked_add_days(Days::new(trail)).unwrap_or(last);

    let mut weeks = Vec::with_capacity(6);
    let mut cursor = grid_start;
    while cursor <= grid_end {
        let mut week = [cursor; 7];
        for (slot, day) in week.iter_mut().zip(cursor.iter_days()) {
            *slot = day;
        }
        weeks.push(week);
        match cursor.checked_add_days(Days::new(7)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    weeks
}

/// Returns whether `a` and `b` fall in the same calendar month.
pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Canonical `YYYY-MM-DD` key for a calendar day.
pub fn day_key(date: NaiveDate) -> DayKey {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Human month label, e.g. `September 2025`.
pub fn month_label(date: NaiveDate) -> String {
    date.format(MONTH_LABEL_FORMAT).to_string()
}

/// Short weekday names in grid column order.
pub fn weekday_labels(week_start: Weekday) -> [&'static str; 7] {
    const MONDAY_FIRST: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    let shift = week_start.num_days_from_monday() as usize;
    std::array::from_fn(|column| MONDAY_FIRST[(column + shift) % 7])
}

/// Parses a strict `DD/MM/YYYY` entry date.
pub fn try_parse_dmy(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DMY_FORMAT).ok()
}

/// Parses a `DD/MM/YYYY` entry date, falling back to `today` when malformed.
pub fn parse_dmy_or(raw: &str, today: NaiveDate) -> NaiveDate {
    try_parse_dmy(raw).unwrap_or(today)
}

/// Formats a date as `DD/MM/YYYY`.
pub fn format_dmy(date: NaiveDate) -> String {
    date.format(DMY_FORMAT).to_string()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

fn days_from_week_start(day: Weekday, week_start: Weekday) -> u64 {
    let day = u64::from(day.num_days_from_monday());
    let start = u64::from(week_start.num_days_from_monday());
    (day + 7 - start) % 7
}

#[cfg(test)]
mod tests {
    use super::{days_from_week_start, last_of_month};
    use chrono::{NaiveDate, Weekday};

    #[test]
    fn last_of_month_handles_leap_february() {
        let feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(last_of_month(feb), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn days_from_week_start_wraps_around() {
        assert_eq!(days_from_week_start(Weekday::Sun, Weekday::Mon), 6);
        assert_eq!(days_from_week_start(Weekday::Sun, Weekday::Sun), 0);
        assert_eq!(days_from_week_start(Weekday::Mon, Weekday::Sun), 1);
    }
}
