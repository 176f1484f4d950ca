use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::columns::SEASON;
use crate::config::Config;
use crate::table::{Table, TableError, Value};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("folder {} not found", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("season {0} not found")]
    SeasonNotFound(String),
    #[error("failed to list {}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: TableError,
    },
    #[error("no available seasons")]
    NoSeasons,
    #[error("no seasons specified")]
    EmptySelection,
    #[error("seasons not found: [{}]", .0.join(", "))]
    UnknownSeasons(Vec<String>),
    #[error("no seasons were successfully loaded")]
    NothingLoaded,
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::DirectoryNotFound(_)
                | RepositoryError::SeasonNotFound(_)
                | RepositoryError::UnknownSeasons(_)
        )
    }
}

/// Source of raw per-season match tables.
pub trait SeasonRepository {
    /// Sorted season identifiers.
    fn list_seasons(&self) -> Result<Vec<String>, RepositoryError>;

    fn load_season(&self, season: &str) -> Result<Table, RepositoryError>;

    /// Every available season stacked into one table with a `season` column.
    /// Seasons that fail to load are skipped.
    fn load_all_seasons(&self) -> Result<Table, RepositoryError> {
        let seasons = self.list_seasons()?;
        if seasons.is_empty() {
            return Err(RepositoryError::NoSeasons);
        }
        load_tagged(self, &seasons)
    }

    fn load_selected_seasons(&self, seasons: &[String]) -> Result<Table, RepositoryError> {
        if seasons.is_empty() {
            return Err(RepositoryError::EmptySelection);
        }
        let available = self.list_seasons()?;
        let missing = seasons
            .iter()
            .filter(|s| !available.contains(s))
            .cloned()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(RepositoryError::UnknownSeasons(missing));
        }
        load_tagged(self, seasons)
    }
}

fn load_tagged<R: SeasonRepository + ?Sized>(
    repo: &R,
    seasons: &[String],
) -> Result<Table, RepositoryError> {
    let mut tables = Vec::with_capacity(seasons.len());
    for season in seasons {
        match repo.load_season(season).and_then(|t| tag_season(t, season)) {
            Ok(table) => {
                debug!(season = %season, rows = table.len(), "loaded season");
                tables.push(table);
            }
            Err(err) => warn!(season = %season, error = %err, "error loading season"),
        }
    }
    if tables.is_empty() {
        return Err(RepositoryError::NothingLoaded);
    }
    Ok(Table::concat(&tables))
}

fn tag_season(table: Table, season: &str) -> Result<Table, RepositoryError> {
    let values = vec![Value::Text(season.to_string()); table.len()];
    table
        .with_column(SEASON, values)
        .map_err(|source| RepositoryError::Read {
            path: PathBuf::from(season),
            source,
        })
}

/// Season files laid out as `<raw_dir>/<prefix><season>.csv`.
#[derive(Debug, Clone)]
pub struct CsvSeasonRepository {
    raw_dir: PathBuf,
    prefix: String,
}

impl CsvSeasonRepository {
    pub fn new(raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            prefix: crate::config::DEFAULT_SEASON_FILE_PREFIX.to_string(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self {
            raw_dir: cfg.data_raw_path.clone(),
            prefix: cfg.season_file_prefix.clone(),
        }
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn season_path(&self, season: &str) -> PathBuf {
        self.raw_dir.join(format!("{}{season}.csv", self.prefix))
    }

    fn season_from_file_name(&self, name: &str) -> Option<String> {
        let season = name.strip_prefix(&self.prefix)?.strip_suffix(".csv")?;
        if season.is_empty() {
            return None;
        }
        Some(season.to_string())
    }
}

impl SeasonRepository for CsvSeasonRepository {
    fn list_seasons(&self) -> Result<Vec<String>, RepositoryError> {
        if !self.raw_dir.is_dir() {
            return Err(RepositoryError::DirectoryNotFound(self.raw_dir.clone()));
        }
        let entries = std::fs::read_dir(&self.raw_dir).map_err(|source| RepositoryError::List {
            path: self.raw_dir.clone(),
            source,
        })?;

        let mut seasons = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RepositoryError::List {
                path: self.raw_dir.clone(),
                source,
            })?;
            if !entry.path().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if let Some(season) = self.season_from_file_name(&name) {
                seasons.push(season);
            }
        }
        seasons.sort();
        Ok(seasons)
    }

    fn load_season(&self, season: &str) -> Result<Table, RepositoryError> {
        let path = self.season_path(season);
        if !path.is_file() {
            return Err(RepositoryError::SeasonNotFound(season.to_string()));
        }
        Table::from_csv_path(&path).map_err(|source| RepositoryError::Read { path, source })
    }
}
