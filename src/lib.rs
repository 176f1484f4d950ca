pub mod clean;
pub mod columns;
pub mod config;
pub mod dates;
pub mod features;
pub mod pipeline;
pub mod seasons;
pub mod summary;
pub mod table;
pub mod validate;

pub use pipeline::{PipelineError, ProcessedTable, StepSummary, process};
pub use table::{Table, TableError, Value};
pub use validate::{ValidationReport, validate};
