use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::info;

use crate::columns::{AWAY_GOALS, CRITICAL, DATE, HOME_GOALS, TEAMS};
use crate::table::{Table, TableError, Value};

/// Historical or abbreviated club names and their canonical spelling.
/// No canonical name appears as an alias, so normalization is idempotent.
pub const TEAM_ALIASES: &[(&str, &str)] = &[
    ("Man United", "Manchester United"),
    ("Man City", "Manchester City"),
    ("Leicester", "Leicester City"),
    ("Tottenham", "Tottenham Hotspur"),
    ("Newcastle", "Newcastle United"),
    ("West Ham", "West Ham United"),
    ("Brighton", "Brighton & Hove Albion"),
    ("Wolves", "Wolverhampton Wanderers"),
    ("Sheffield Utd", "Sheffield United"),
    ("Nottm Forest", "Nottingham Forest"),
    ("Nott'm Forest", "Nottingham Forest"),
    ("Bournemouth", "AFC Bournemouth"),
    ("Luton", "Luton Town"),
    ("Burnley", "Burnley FC"),
    ("Brentford", "Brentford FC"),
    ("Fulham", "Fulham FC"),
];

static TEAM_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| TEAM_ALIASES.iter().copied().collect());

pub fn canonical_team_name(name: &str) -> &str {
    TEAM_MAP.get(name).copied().unwrap_or(name)
}

/// Back-fill missing scores with 0, then drop rows missing a date, either
/// team or the result code.
pub fn handle_missing_values(table: &Table) -> Result<Table, TableError> {
    let critical = CRITICAL
        .iter()
        .map(|c| table.require_column(c))
        .collect::<Result<Vec<_>, _>>()?;

    let cleaned = table
        .clone()
        .map_column(HOME_GOALS, fill_zero)?
        .map_column(AWAY_GOALS, fill_zero)?
        .retain_rows(|row| critical.iter().all(|&idx| !row[idx].is_null()));

    let removed = table.len() - cleaned.len();
    if removed > 0 {
        info!(removed, "removed rows with missing critical data");
    }
    Ok(cleaned)
}

/// Parse Date day-first into date cells; rows whose date does not parse are dropped.
pub fn clean_date_values(table: &Table) -> Result<Table, TableError> {
    let date_idx = table.require_column(DATE)?;
    let cleaned = table
        .clone()
        .map_column(DATE, |v| v.as_date().into())?
        .retain_rows(|row| !row[date_idx].is_null());

    let removed = table.len() - cleaned.len();
    if removed > 0 {
        info!(removed, "removed rows with unparseable dates");
    }
    Ok(cleaned)
}

pub fn normalize_team_names(table: &Table) -> Result<Table, TableError> {
    TEAMS
        .iter()
        .try_fold(table.clone(), |acc, column| acc.map_column(column, canonicalize))
}

fn fill_zero(v: &Value) -> Value {
    if v.is_null() { Value::Int(0) } else { v.clone() }
}

fn canonicalize(v: &Value) -> Value {
    match v {
        Value::Text(name) => Value::Text(canonical_team_name(name).to_string()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{AWAY_TEAM, HOME_TEAM, REQUIRED, RESULT_CODE};
    use chrono::NaiveDate;

    fn raw(rows: Vec<[Value; 6]>) -> Table {
        Table::from_rows(REQUIRED, rows.into_iter().map(Vec::from).collect()).unwrap()
    }

    #[test]
    fn missing_scores_become_zero() {
        let t = raw(vec![[
            "12/09/2020".into(),
            "Fulham".into(),
            "Arsenal".into(),
            Value::Null,
            Value::Int(3),
            "A".into(),
        ]]);
        let out = handle_missing_values(&t).unwrap();
        assert_eq!(out.get(0, HOME_GOALS), Some(&Value::Int(0)));
        assert_eq!(out.get(0, AWAY_GOALS), Some(&Value::Int(3)));
    }

    #[test]
    fn rows_missing_critical_fields_are_dropped() {
        let mut rows = Vec::new();
        for critical in [0usize, 1, 2, 5] {
            let mut row = [
                "12/09/2020".into(),
                "Fulham".into(),
                "Arsenal".into(),
                Value::Int(0),
                Value::Int(3),
                "A".into(),
            ];
            row[critical] = Value::Null;
            rows.push(row);
        }
        rows.push([
            "13/09/2020".into(),
            "Leeds".into(),
            "Wolves".into(),
            Value::Int(1),
            Value::Int(1),
            "D".into(),
        ]);
        let t = raw(rows);
        let out = handle_missing_values(&t).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.get(0, HOME_TEAM), Some(&Value::from("Leeds")));
        assert_eq!(t.len(), 5, "input must be left untouched");
    }

    #[test]
    fn missing_score_column_is_an_error() {
        let t = Table::from_rows([DATE, HOME_TEAM, AWAY_TEAM, RESULT_CODE], Vec::new()).unwrap();
        let err = handle_missing_values(&t).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(ref c) if c == HOME_GOALS));
    }

    #[test]
    fn dates_are_parsed_and_bad_rows_dropped() {
        let t = raw(vec![
            [
                "15/08/2020".into(),
                "Fulham".into(),
                "Arsenal".into(),
                Value::Int(0),
                Value::Int(3),
                "A".into(),
            ],
            [
                "someday".into(),
                "Leeds".into(),
                "Wolves".into(),
                Value::Int(1),
                Value::Int(1),
                "D".into(),
            ],
        ]);
        let out = clean_date_values(&t).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            out.get(0, DATE),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2020, 8, 15).unwrap()))
        );
    }

    #[test]
    fn aliases_map_on_both_sides() {
        let t = raw(vec![[
            "15/08/2020".into(),
            "Man United".into(),
            "Nott'm Forest".into(),
            Value::Int(2),
            Value::Int(1),
            "H".into(),
        ]]);
        let out = normalize_team_names(&t).unwrap();
        assert_eq!(out.get(0, HOME_TEAM), Some(&Value::from("Manchester United")));
        assert_eq!(out.get(0, AWAY_TEAM), Some(&Value::from("Nottingham Forest")));
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(canonical_team_name("Arsenal"), "Arsenal");
        assert_eq!(canonical_team_name("Wolves"), "Wolverhampton Wanderers");
    }

    #[test]
    fn canonical_names_are_not_aliases() {
        for (_, canonical) in TEAM_ALIASES {
            assert_eq!(canonical_team_name(canonical), *canonical);
        }
    }
}
