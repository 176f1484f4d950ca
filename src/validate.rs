use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::columns::{DATE, FIXTURE_KEY, REQUIRED, RESULT_CODE, SCORES, TEAMS};
use crate::table::Table;

const VALID_RESULTS: [&str; 3] = ["H", "D", "A"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: TableStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableStats {
    pub total_rows: usize,
    pub unique_teams: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub null_count: usize,
}

// Partial result of a single check, folded into the report.
#[derive(Debug, Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Findings {
    fn error(msg: String) -> Self {
        Self {
            errors: vec![msg],
            warnings: Vec::new(),
        }
    }

    fn warning(msg: String) -> Self {
        Self {
            errors: Vec::new(),
            warnings: vec![msg],
        }
    }

    fn merge(mut self, other: Findings) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}

type Check = fn(&Table) -> Findings;

const CHECKS: &[(&str, Check)] = &[
    ("columns", check_columns),
    ("numeric_columns", check_numeric_columns),
    ("date_column", check_date_column),
    ("score_values", check_score_values),
    ("result_values", check_result_values),
    ("missing_values", check_missing_values),
    ("duplicate_values", check_duplicate_values),
];

/// Run every check in order over `table` and collect summary stats.
///
/// Checks never short-circuit: a missing required column is reported and the
/// remaining checks skip whatever columns are absent.
pub fn validate(table: &Table) -> ValidationReport {
    let findings = CHECKS
        .iter()
        .fold(Findings::default(), |acc, (name, check)| {
            let found = check(table);
            debug!(
                check = *name,
                errors = found.errors.len(),
                warnings = found.warnings.len(),
                "validation check finished"
            );
            acc.merge(found)
        });

    ValidationReport {
        is_valid: findings.errors.is_empty(),
        errors: findings.errors,
        warnings: findings.warnings,
        stats: collect_stats(table),
    }
}

fn check_columns(table: &Table) -> Findings {
    let missing = REQUIRED
        .iter()
        .filter(|c| !table.has_column(c))
        .copied()
        .collect::<Vec<_>>();
    if missing.is_empty() {
        return Findings::default();
    }
    Findings::error(format!("Missing columns: [{}]", missing.join(", ")))
}

fn check_numeric_columns(table: &Table) -> Findings {
    SCORES
        .iter()
        .filter(|c| table.has_column(c) && !table.is_numeric_column(c))
        .map(|c| Findings::error(format!("{c} is not numeric")))
        .fold(Findings::default(), Findings::merge)
}

fn check_date_column(table: &Table) -> Findings {
    let Some(cells) = table.column(DATE) else {
        return Findings::default();
    };
    let mut present = 0usize;
    let mut parsed = 0usize;
    for cell in cells.filter(|v| !v.is_null()) {
        present += 1;
        if cell.as_date().is_some() {
            parsed += 1;
        }
    }
    if present > 0 && parsed == 0 {
        return Findings::error(format!(
            "Invalid date format: none of {present} Date values parse as day-first dates"
        ));
    }
    if parsed < present {
        debug!(
            unparsed = present - parsed,
            "Date values will be coerced to missing"
        );
    }
    Findings::default()
}

fn check_score_values(table: &Table) -> Findings {
    SCORES
        .iter()
        .filter(|c| {
            table
                .column(c)
                .is_some_and(|mut cells| cells.any(|v| v.as_f64().is_some_and(|x| x < 0.0)))
        })
        .map(|c| Findings::error(format!("Negative values in {c}")))
        .fold(Findings::default(), Findings::merge)
}

fn check_result_values(table: &Table) -> Findings {
    let Some(cells) = table.column(RESULT_CODE) else {
        return Findings::default();
    };
    let invalid = cells
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .filter(|s| !VALID_RESULTS.contains(&s.as_str()))
        .collect::<BTreeSet<_>>();
    if invalid.is_empty() {
        return Findings::default();
    }
    let listed = invalid.into_iter().collect::<Vec<_>>().join(", ");
    Findings::error(format!("Invalid results: {{{listed}}}"))
}

fn check_missing_values(table: &Table) -> Findings {
    let counts = REQUIRED
        .iter()
        .filter_map(|c| table.column_null_count(c).map(|n| (*c, n)))
        .filter(|(_, n)| *n > 0)
        .map(|(c, n)| format!("{c}: {n}"))
        .collect::<Vec<_>>();
    if counts.is_empty() {
        return Findings::default();
    }
    Findings::warning(format!("Null values: {{{}}}", counts.join(", ")))
}

fn check_duplicate_values(table: &Table) -> Findings {
    let Some(key_idx) = FIXTURE_KEY
        .iter()
        .map(|c| table.column_index(c))
        .collect::<Option<Vec<_>>>()
    else {
        return Findings::default();
    };

    let mut seen = HashSet::new();
    let mut duplicates = 0usize;
    for row in table.rows() {
        let key = key_idx
            .iter()
            .map(|&idx| (row[idx].is_null(), row[idx].to_string()))
            .collect::<Vec<_>>();
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    if duplicates == 0 {
        return Findings::default();
    }
    Findings::warning(format!("Found {duplicates} duplicate matches"))
}

fn collect_stats(table: &Table) -> TableStats {
    TableStats {
        total_rows: table.len(),
        unique_teams: unique_teams(table),
        date_range: date_range(table),
        null_count: table.null_count(),
    }
}

pub(crate) fn unique_teams(table: &Table) -> usize {
    TEAMS
        .iter()
        .filter_map(|c| table.column(c))
        .flatten()
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .collect::<HashSet<_>>()
        .len()
}

fn date_range(table: &Table) -> Option<(NaiveDate, NaiveDate)> {
    let dates = table.column(DATE)?.filter_map(|v| v.as_date());
    dates.fold(None, |range, d| match range {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{AWAY_TEAM, HOME_TEAM};
    use crate::table::Value;

    fn fixture_row(date: &str, home: &str, away: &str, hg: i64, ag: i64, ftr: &str) -> Vec<Value> {
        vec![
            date.into(),
            home.into(),
            away.into(),
            Value::Int(hg),
            Value::Int(ag),
            ftr.into(),
        ]
    }

    fn table(rows: Vec<Vec<Value>>) -> Table {
        Table::from_rows(REQUIRED, rows).expect("valid table")
    }

    #[test]
    fn clean_table_is_valid() {
        let t = table(vec![
            fixture_row("12/09/2020", "Fulham", "Arsenal", 0, 3, "A"),
            fixture_row("13/09/2020", "Tottenham", "Everton", 0, 1, "A"),
        ]);
        let report = validate(&t);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.stats.total_rows, 2);
        assert_eq!(report.stats.unique_teams, 4);
        assert_eq!(report.stats.null_count, 0);
        assert_eq!(
            report.stats.date_range,
            Some((
                NaiveDate::from_ymd_opt(2020, 9, 12).unwrap(),
                NaiveDate::from_ymd_opt(2020, 9, 13).unwrap()
            ))
        );
    }

    #[test]
    fn missing_columns_are_listed_in_order() {
        let t = Table::from_rows(
            [DATE, HOME_TEAM, AWAY_TEAM, "FTHG"],
            vec![vec!["12/09/2020".into(), "Fulham".into(), "Arsenal".into(), Value::Int(0)]],
        )
        .unwrap();
        let report = validate(&t);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["Missing columns: [FTAG, FTR]".to_string()]);
    }

    #[test]
    fn non_numeric_and_negative_scores() {
        let mut rows = vec![fixture_row("12/09/2020", "Fulham", "Arsenal", -1, 3, "A")];
        rows[0][4] = "three".into();
        let report = validate(&table(rows));
        assert_eq!(
            report.errors,
            vec![
                "FTAG is not numeric".to_string(),
                "Negative values in FTHG".to_string()
            ]
        );
    }

    #[test]
    fn wholesale_date_failure_is_an_error() {
        let report = validate(&table(vec![
            fixture_row("soon", "Fulham", "Arsenal", 0, 3, "A"),
            fixture_row("later", "Leeds", "Wolves", 1, 1, "D"),
        ]));
        assert!(!report.is_valid);
        assert!(report.errors[0].starts_with("Invalid date format"));
        assert_eq!(report.stats.date_range, None);
    }

    #[test]
    fn isolated_bad_dates_are_tolerated() {
        let report = validate(&table(vec![
            fixture_row("soon", "Fulham", "Arsenal", 0, 3, "A"),
            fixture_row("19/09/2020", "Leeds", "Fulham", 4, 3, "H"),
        ]));
        assert!(report.is_valid);
        let day = NaiveDate::from_ymd_opt(2020, 9, 19).unwrap();
        assert_eq!(report.stats.date_range, Some((day, day)));
    }

    #[test]
    fn invalid_results_are_reported_as_a_set() {
        let report = validate(&table(vec![
            fixture_row("12/09/2020", "Fulham", "Arsenal", 0, 3, "X"),
            fixture_row("13/09/2020", "Leeds", "Wolves", 1, 1, "W"),
            fixture_row("14/09/2020", "Leeds", "Wolves", 1, 1, "X"),
        ]));
        assert_eq!(report.errors, vec!["Invalid results: {W, X}".to_string()]);
    }

    #[test]
    fn nulls_and_duplicates_only_warn() {
        let mut rows = vec![
            fixture_row("12/09/2020", "Fulham", "Arsenal", 0, 3, "A"),
            fixture_row("12/09/2020", "Fulham", "Arsenal", 0, 3, "A"),
            fixture_row("13/09/2020", "Leeds", "Wolves", 1, 1, "D"),
        ];
        rows[2][1] = Value::Null;
        rows[2][5] = Value::Null;
        let report = validate(&table(rows));
        assert!(report.is_valid);
        assert_eq!(
            report.warnings,
            vec![
                "Null values: {HomeTeam: 1, FTR: 1}".to_string(),
                "Found 1 duplicate matches".to_string()
            ]
        );
        assert_eq!(report.stats.null_count, 2);
    }

    #[test]
    fn empty_table_has_no_date_range() {
        let report = validate(&table(Vec::new()));
        assert!(report.is_valid);
        assert_eq!(report.stats.total_rows, 0);
        assert_eq!(report.stats.date_range, None);
    }
}
