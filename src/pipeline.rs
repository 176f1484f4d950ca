use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::clean::{clean_date_values, handle_missing_values, normalize_team_names};
use crate::features::create_basic_features;
use crate::table::{Table, TableError};
use crate::validate::{ValidationReport, validate};

pub type Step = fn(&Table) -> Result<Table, TableError>;

/// Processing steps in the order they are applied.
pub const STEPS: &[(&str, Step)] = &[
    ("handle_missing_values", handle_missing_values),
    ("clean_date_values", clean_date_values),
    ("normalize_team_names", normalize_team_names),
    ("create_basic_features", create_basic_features),
];

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("data validation failed: [{}]", .report.errors.join("; "))]
    Validation { report: Box<ValidationReport> },
    #[error("error in step {step}: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: TableError,
    },
}

impl PipelineError {
    /// Validation errors that blocked the run, if that is why it stopped.
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            PipelineError::Validation { report } => Some(&report.errors),
            PipelineError::Step { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    pub step: &'static str,
    pub rows_before: usize,
    pub rows_after: usize,
}

impl StepSummary {
    pub fn rows_dropped(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}

#[derive(Debug, Clone)]
pub struct ProcessedTable {
    pub table: Table,
    pub input_rows: usize,
    pub steps: Vec<StepSummary>,
    pub final_report: ValidationReport,
}

impl ProcessedTable {
    pub fn output_rows(&self) -> usize {
        self.table.len()
    }

    pub fn rows_dropped(&self) -> usize {
        self.input_rows.saturating_sub(self.output_rows())
    }

    pub fn warnings(&self) -> &[String] {
        &self.final_report.warnings
    }

    pub fn step(&self, name: &str) -> Option<&StepSummary> {
        self.steps.iter().find(|s| s.step == name)
    }
}

/// Validate, clean and derive features. Invalid input stops the run before
/// any step executes; a failing step stops the remaining ones.
pub fn process(table: &Table) -> Result<ProcessedTable, PipelineError> {
    let report = validate(table);
    if !report.is_valid {
        warn!(errors = ?report.errors, "data validation failed");
        return Err(PipelineError::Validation {
            report: Box::new(report),
        });
    }

    let total = STEPS.len();
    let mut steps = Vec::with_capacity(total);
    let mut current = table.clone();
    for (idx, (name, step)) in STEPS.iter().enumerate() {
        let rows_before = current.len();
        current = step(&current).map_err(|source| PipelineError::Step {
            step: *name,
            source,
        })?;
        let summary = StepSummary {
            step: *name,
            rows_before,
            rows_after: current.len(),
        };
        info!(
            step = *name,
            dropped = summary.rows_dropped(),
            "Step {}/{} completed",
            idx + 1,
            total
        );
        steps.push(summary);
    }

    let final_report = validate(&current);
    if !final_report.warnings.is_empty() {
        warn!(warnings = ?final_report.warnings, "processing warnings");
    }
    info!(
        input_rows = table.len(),
        output_rows = current.len(),
        "data processing complete"
    );

    Ok(ProcessedTable {
        table: current,
        input_rows: table.len(),
        steps,
        final_report,
    })
}
