use chrono::Datelike;
use serde::Serialize;

use crate::columns::{
    AWAY_GOALS, DATE, DAY, GOAL_DIFFERENCE, HOME_GOALS, IS_AWAY, IS_CLOSE_MATCH, IS_HIGH_SCORING,
    IS_HOME, IS_LOW_SCORING, IS_WEEKEND, MONTH, RESULT, RESULT_CODE, TOTAL_GOALS, YEAR,
};
use crate::table::{Table, TableError, Value};

/// Full-time result. Variant order matches the numeric encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MatchResult {
    Away,
    Draw,
    Home,
}

impl MatchResult {
    pub const ALL: [MatchResult; 3] = [MatchResult::Away, MatchResult::Draw, MatchResult::Home];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "H" => Some(MatchResult::Home),
            "D" => Some(MatchResult::Draw),
            "A" => Some(MatchResult::Away),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchResult::Home => "H",
            MatchResult::Draw => "D",
            MatchResult::Away => "A",
        }
    }

    pub fn code(self) -> i64 {
        match self {
            MatchResult::Home => 2,
            MatchResult::Draw => 1,
            MatchResult::Away => 0,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            2 => Some(MatchResult::Home),
            1 => Some(MatchResult::Draw),
            0 => Some(MatchResult::Away),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Derived {
    total_goals: Vec<Value>,
    goal_difference: Vec<Value>,
    day: Vec<Value>,
    year: Vec<Value>,
    month: Vec<Value>,
    is_weekend: Vec<Value>,
    result: Vec<Value>,
    is_high_scoring: Vec<Value>,
    is_low_scoring: Vec<Value>,
    is_close_match: Vec<Value>,
}

/// Append goal aggregates, calendar fields and result encodings.
///
/// Input columns are kept as they are; a derived column that already exists is
/// recomputed in place. `result` is only derived when FTR is present.
pub fn create_basic_features(table: &Table) -> Result<Table, TableError> {
    let date_idx = table.require_column(DATE)?;
    let home_idx = table.require_column(HOME_GOALS)?;
    let away_idx = table.require_column(AWAY_GOALS)?;
    let ftr_idx = table.column_index(RESULT_CODE);

    let mut d = Derived::default();
    for row in table.rows() {
        let goals = row[home_idx].as_f64().zip(row[away_idx].as_f64());
        let total = goals.map(|(h, a)| h + a);
        let diff = goals.map(|(h, a)| h - a);
        d.total_goals.push(total.map_or(Value::Null, Value::number));
        d.goal_difference.push(diff.map_or(Value::Null, Value::number));
        d.is_high_scoring.push(Value::flag(total.is_some_and(|t| t >= 3.0)));
        d.is_low_scoring.push(Value::flag(total.is_some_and(|t| t <= 1.0)));
        d.is_close_match.push(Value::flag(diff.is_some_and(|g| g.abs() <= 1.0)));

        let date = row[date_idx].as_date();
        let weekday = date.map(|dt| i64::from(dt.weekday().num_days_from_monday()));
        d.day.push(weekday.into());
        d.year.push(date.map(|dt| i64::from(dt.year())).into());
        d.month.push(date.map(|dt| i64::from(dt.month())).into());
        d.is_weekend.push(Value::Bool(weekday.is_some_and(|w| w >= 5)));

        if let Some(idx) = ftr_idx {
            let code = row[idx]
                .as_str()
                .and_then(MatchResult::from_label)
                .map(MatchResult::code);
            d.result.push(code.into());
        }
    }

    let rows = table.len();
    let mut out = table
        .clone()
        .with_column(TOTAL_GOALS, d.total_goals)?
        .with_column(GOAL_DIFFERENCE, d.goal_difference)?
        .with_column(DAY, d.day)?
        .with_column(YEAR, d.year)?
        .with_column(MONTH, d.month)?
        .with_column(IS_WEEKEND, d.is_weekend)?;
    if ftr_idx.is_some() {
        out = out.with_column(RESULT, d.result)?;
    }
    out.with_column(IS_HOME, vec![Value::Int(1); rows])?
        .with_column(IS_AWAY, vec![Value::Int(0); rows])?
        .with_column(IS_HIGH_SCORING, d.is_high_scoring)?
        .with_column(IS_LOW_SCORING, d.is_low_scoring)?
        .with_column(IS_CLOSE_MATCH, d.is_close_match)
}
