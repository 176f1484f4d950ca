use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::columns::{AWAY_GOALS, HOME_GOALS, RESULT, SEASON, TOTAL_GOALS, YEAR};
use crate::features::MatchResult;
use crate::table::Table;
use crate::validate::unique_teams;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResultDistribution {
    pub home: usize,
    pub draw: usize,
    pub away: usize,
}

impl ResultDistribution {
    pub fn total(&self) -> usize {
        self.home + self.draw + self.away
    }

    /// Shares of (home, draw, away); all zero when no results were counted.
    pub fn shares(&self) -> (f64, f64, f64) {
        let n = self.total();
        if n == 0 {
            return (0.0, 0.0, 0.0);
        }
        let n = n as f64;
        (
            self.home as f64 / n,
            self.draw as f64 / n,
            self.away as f64 / n,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualitySummary {
    pub rows: usize,
    pub null_counts: BTreeMap<String, usize>,
    pub duplicate_rows: usize,
    pub results: ResultDistribution,
    pub avg_home_goals: Option<f64>,
    pub avg_away_goals: Option<f64>,
    pub avg_total_goals: Option<f64>,
    pub seasons: Vec<String>,
    pub matches_per_year: BTreeMap<i64, usize>,
    pub unique_teams: usize,
}

impl QualitySummary {
    /// Describe a processed table. Columns that are absent leave their part
    /// of the summary empty.
    pub fn from_table(table: &Table) -> Self {
        let null_counts: BTreeMap<String, usize> = table
            .columns()
            .iter()
            .filter_map(|c| table.column_null_count(c).map(|n| (c.clone(), n)))
            .filter(|(_, n)| *n > 0)
            .collect();

        let mut seen = HashSet::new();
        let duplicate_rows = table
            .rows()
            .iter()
            .filter(|row| !seen.insert(row.iter().map(|v| v.to_string()).collect::<Vec<_>>()))
            .count();

        let mut results = ResultDistribution::default();
        if let Some(cells) = table.column(RESULT) {
            for result in cells.filter_map(|v| v.as_i64().and_then(MatchResult::from_code)) {
                match result {
                    MatchResult::Home => results.home += 1,
                    MatchResult::Draw => results.draw += 1,
                    MatchResult::Away => results.away += 1,
                }
            }
        }

        let seasons: Vec<String> = table
            .column(SEASON)
            .map(|cells| {
                cells
                    .filter(|v| !v.is_null())
                    .map(|v| v.to_string())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default();

        let mut matches_per_year: BTreeMap<i64, usize> = BTreeMap::new();
        if let Some(cells) = table.column(YEAR) {
            for year in cells.filter_map(|v| v.as_i64()) {
                *matches_per_year.entry(year).or_insert(0) += 1;
            }
        }

        Self {
            rows: table.len(),
            null_counts,
            duplicate_rows,
            results,
            avg_home_goals: column_mean(table, HOME_GOALS),
            avg_away_goals: column_mean(table, AWAY_GOALS),
            avg_total_goals: column_mean(table, TOTAL_GOALS),
            seasons,
            matches_per_year,
            unique_teams: unique_teams(table),
        }
    }

    pub fn years(&self) -> Vec<i64> {
        self.matches_per_year.keys().copied().collect()
    }
}

fn column_mean(table: &Table, name: &str) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for x in table.column(name)?.filter_map(|v| v.as_f64()) {
        sum += x;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}
