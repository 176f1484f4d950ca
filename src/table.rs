use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::dates::parse_day_first;

// Tokens a CSV reader conventionally treats as missing.
const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "#N/A", "<NA>"];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("missing column `{0}`")]
    MissingColumn(String),
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("column `{name}` has {found} values, table has {expected} rows")]
    ColumnLength {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    /// Type a raw CSV cell: null tokens, then integers, floats, booleans, text.
    pub fn parse_cell(raw: &str) -> Self {
        let s = raw.trim();
        if NULL_TOKENS.contains(&s) {
            return Value::Null;
        }
        if let Ok(n) = s.parse::<i64>() {
            return Value::Int(n);
        }
        if s.bytes().any(|b| b.is_ascii_digit())
            && let Ok(f) = s.parse::<f64>()
            && f.is_finite()
        {
            return Value::Float(f);
        }
        match s {
            "True" | "true" | "TRUE" => Value::Bool(true),
            "False" | "false" | "FALSE" => Value::Bool(false),
            _ => Value::Text(s.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Date cells as-is, text cells parsed day-first.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_day_first(s),
            _ => None,
        }
    }

    /// Integral numbers stay integers, anything else becomes a float.
    pub fn number(x: f64) -> Self {
        if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
            Value::Int(x as i64)
        } else {
            Value::Float(x)
        }
    }

    pub fn flag(on: bool) -> Self {
        Value::Int(i64::from(on))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Row-ordered table with named columns and dynamically typed cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns.into_iter().map(Into::into).collect::<Vec<String>>();
        for (idx, name) in columns.iter().enumerate() {
            if columns[..idx].contains(name) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value> + use<'a>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// True when every non-null cell of the column is an integer or float.
    pub fn is_numeric_column(&self, name: &str) -> bool {
        self.column(name)
            .is_some_and(|mut cells| cells.all(|v| v.is_null() || v.is_numeric()))
    }

    pub fn null_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|v| v.is_null()).count())
            .sum()
    }

    pub fn column_null_count(&self, name: &str) -> Option<usize> {
        self.column(name)
            .map(|cells| cells.filter(|v| v.is_null()).count())
    }

    /// Replace the column's values, or append it when absent.
    pub fn with_column(mut self, name: &str, values: Vec<Value>) -> Result<Self, TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                name: name.to_string(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(self)
    }

    pub fn map_column<F>(mut self, name: &str, mut f: F) -> Result<Self, TableError>
    where
        F: FnMut(&Value) -> Value,
    {
        let idx = self.require_column(name)?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        Ok(self)
    }

    pub fn retain_rows<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.rows.retain(|row| keep(row));
        self
    }

    /// Stack tables by column name. The result has the union of columns in
    /// first-seen order; cells a source table lacks are null.
    pub fn concat(tables: &[Table]) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for table in tables {
            for name in &table.columns {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }
        let positions: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.as_str(), idx))
            .collect();

        let mut rows = Vec::with_capacity(tables.iter().map(Table::len).sum());
        for table in tables {
            let targets = table
                .columns
                .iter()
                .map(|name| positions[name.as_str()])
                .collect::<Vec<_>>();
            for row in &table.rows {
                let mut out = vec![Value::Null; columns.len()];
                for (value, &target) in row.iter().zip(&targets) {
                    out[target] = value.clone();
                }
                rows.push(out);
            }
        }
        Table { columns, rows }
    }

    /// Read a headed CSV. Short rows are padded with nulls.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let headers = rdr
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();
        let mut table = Table::new(headers)?;
        let width = table.columns.len();

        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() > width {
                return Err(TableError::RowWidth {
                    row: idx,
                    expected: width,
                    found: record.len(),
                });
            }
            let mut row = record.iter().map(Value::parse_cell).collect::<Vec<_>>();
            row.resize(width, Value::Null);
            table.rows.push(row);
        }
        Ok(table)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::from_csv_reader(file)
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), TableError> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Table, TableError, Value};

    #[test]
    fn parse_cell_types() {
        assert_eq!(Value::parse_cell("2"), Value::Int(2));
        assert_eq!(Value::parse_cell("-1"), Value::Int(-1));
        assert_eq!(Value::parse_cell("1.5"), Value::Float(1.5));
        assert_eq!(Value::parse_cell(""), Value::Null);
        assert_eq!(Value::parse_cell("NA"), Value::Null);
        assert_eq!(Value::parse_cell("inf"), Value::Text("inf".to_string()));
        assert_eq!(Value::parse_cell(" Arsenal "), Value::Text("Arsenal".to_string()));
        assert_eq!(Value::parse_cell("True"), Value::Bool(true));
    }

    #[test]
    fn csv_short_rows_are_padded() {
        let raw = "Date,HomeTeam,FTHG\n15/08/2020,Fulham,0\n16/08/2020,Spurs\n";
        let table = Table::from_csv_reader(raw.as_bytes()).expect("csv should parse");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "FTHG"), Some(&Value::Null));
        assert_eq!(table.get(0, "FTHG"), Some(&Value::Int(0)));
    }

    #[test]
    fn csv_long_rows_are_rejected() {
        let raw = "a,b\n1,2,3\n";
        let err = Table::from_csv_reader(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::RowWidth { found: 3, .. }));
    }

    #[test]
    fn concat_unions_columns() {
        let a = Table::from_rows(["x", "y"], vec![vec![Value::Int(1), Value::Int(2)]]).unwrap();
        let b = Table::from_rows(["y", "z"], vec![vec![Value::Int(3), Value::Int(4)]]).unwrap();
        let out = Table::concat(&[a, b]);
        assert_eq!(out.columns(), &["x", "y", "z"]);
        assert_eq!(out.rows()[1], vec![Value::Null, Value::Int(3), Value::Int(4)]);
    }

    #[test]
    fn with_column_replaces_existing() {
        let t = Table::from_rows(["x"], vec![vec![Value::Int(1)], vec![Value::Int(2)]]).unwrap();
        let t = t.with_column("x", vec![Value::Int(9), Value::Int(8)]).unwrap();
        assert_eq!(t.columns().len(), 1);
        assert_eq!(t.get(1, "x"), Some(&Value::Int(8)));
        assert!(t.with_column("y", vec![Value::Null]).is_err());
    }

    #[test]
    fn numeric_column_ignores_nulls() {
        let t = Table::from_rows(
            ["g", "s"],
            vec![
                vec![Value::Int(1), "a".into()],
                vec![Value::Null, Value::Int(1)],
            ],
        )
        .unwrap();
        assert!(t.is_numeric_column("g"));
        assert!(!t.is_numeric_column("s"));
        assert!(!t.is_numeric_column("missing"));
        assert_eq!(t.null_count(), 1);
    }
}
