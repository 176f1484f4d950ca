use chrono::NaiveDate;

/// Parse a calendar date, reading ambiguous `a/b/c` forms as day/month/year.
///
/// Accepts `/`, `-` and `.` separators, two- or four-digit years, and a
/// trailing time component (`"15/08/2020 15:00"`, `"2020-08-15T15:00:00"`).
/// A leading four-digit field is taken as the year (`"2020-08-15"`).
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    let date_part = s.split([' ', 'T']).next()?;
    let mut parts = date_part.split(['/', '-', '.']);
    let first = parts.next()?;
    let second = parts.next()?;
    let third = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if first.len() == 4 {
        let year = parse_field::<i32>(first)?;
        let month = parse_field::<u32>(second)?;
        let day = parse_field::<u32>(third)?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let day = parse_field::<u32>(first)?;
    let month = parse_field::<u32>(second)?;
    let year = match third.len() {
        2 => expand_two_digit_year(parse_field::<i32>(third)?),
        4 => parse_field::<i32>(third)?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_field<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// Same pivot as strptime's %y: 69..=99 are 1900s, 00..=68 are 2000s.
fn expand_two_digit_year(yy: i32) -> i32 {
    if yy >= 69 { 1900 + yy } else { 2000 + yy }
}
