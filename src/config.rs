use std::path::PathBuf;

use serde::Serialize;

pub const DEFAULT_SEASON_FILE_PREFIX: &str = "E0_";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub data_raw_path: PathBuf,
    pub data_processed_path: PathBuf,
    pub models_path: PathBuf,
    pub season_file_prefix: String,
    pub random_state: u64,
    pub test_size: f64,
    // Matches considered when computing a team's recent form.
    pub form_matches: usize,
    pub feature_columns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_raw_path: PathBuf::from("data/raw"),
            data_processed_path: PathBuf::from("data/processed"),
            models_path: PathBuf::from("models"),
            season_file_prefix: DEFAULT_SEASON_FILE_PREFIX.to_string(),
            random_state: 42,
            test_size: 0.2,
            form_matches: 5,
            feature_columns: [
                "HomeTeam_encoded",
                "AwayTeam_encoded",
                "Home_Form",
                "Away_Form",
                "Total_Goals",
                "Goal_Difference",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl Config {
    /// Defaults overridden by `FOOTBALL_*` environment variables. Blank or
    /// unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_raw_path: env_path("FOOTBALL_DATA_RAW_PATH").unwrap_or(defaults.data_raw_path),
            data_processed_path: env_path("FOOTBALL_DATA_PROCESSED_PATH")
                .unwrap_or(defaults.data_processed_path),
            models_path: env_path("FOOTBALL_MODELS_PATH").unwrap_or(defaults.models_path),
            season_file_prefix: env_trimmed("FOOTBALL_SEASON_FILE_PREFIX")
                .unwrap_or(defaults.season_file_prefix),
            random_state: env_parse("FOOTBALL_RANDOM_STATE").unwrap_or(defaults.random_state),
            test_size: env_parse::<f64>("FOOTBALL_TEST_SIZE")
                .filter(|v| (0.0..1.0).contains(v))
                .unwrap_or(defaults.test_size),
            form_matches: env_parse("FOOTBALL_FORM_MATCHES")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.form_matches),
            feature_columns: defaults.feature_columns,
        }
    }

    pub fn processed_file(&self, name: &str) -> PathBuf {
        self.data_processed_path.join(name)
    }
}

fn env_trimmed(key: &str) -> Option<String> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env_trimmed(key).map(PathBuf::from)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_trimmed(key)?.parse().ok()
}
