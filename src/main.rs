use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use football_pipeline::config::Config;
use football_pipeline::pipeline;
use football_pipeline::seasons::{CsvSeasonRepository, SeasonRepository};
use football_pipeline::summary::QualitySummary;
use football_pipeline::validate::validate;

const PROCESSED_FILE: &str = "matches.csv";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = Config::from_env();
    if let Some(dir) = parse_path_arg("--data-dir") {
        cfg.data_raw_path = dir;
    }
    debug!(?cfg, "resolved config");
    let repo = CsvSeasonRepository::from_config(&cfg);

    let available = repo.list_seasons()?;
    println!("Available seasons: {available:?}");

    let raw = match parse_seasons_arg() {
        Some(selected) => repo.load_selected_seasons(&selected)?,
        None => repo.load_all_seasons()?,
    };
    println!("Loaded {} rows, {} columns", raw.len(), raw.columns().len());

    let report = validate(&raw);
    if has_flag("--report-json") {
        let json = serde_json::to_string_pretty(&report).context("serialize validation report")?;
        println!("{json}");
    }
    println!("Validation: {}", if report.is_valid { "PASS" } else { "FAIL" });
    for err in &report.errors {
        println!(" error: {err}");
    }
    for warning in &report.warnings {
        println!(" warning: {warning}");
    }
    if !report.is_valid {
        return Err(anyhow!("validation failed, skipping processing"));
    }

    let processed = pipeline::process(&raw).context("processing failed")?;

    println!(
        "Processed: {} -> {} rows",
        processed.input_rows,
        processed.output_rows()
    );
    for step in &processed.steps {
        println!(
            "  {}: {} -> {} rows",
            step.step, step.rows_before, step.rows_after
        );
    }
    for warning in processed.warnings() {
        println!(" warning: {warning}");
    }

    let summary = QualitySummary::from_table(&processed.table);
    let (home, draw, away) = summary.results.shares();
    println!("Unique teams: {}", summary.unique_teams);
    println!(
        "Home wins: {} ({:.1}%)",
        summary.results.home,
        home * 100.0
    );
    println!("Draws: {} ({:.1}%)", summary.results.draw, draw * 100.0);
    println!(
        "Away wins: {} ({:.1}%)",
        summary.results.away,
        away * 100.0
    );
    if let (Some(h), Some(a), Some(t)) = (
        summary.avg_home_goals,
        summary.avg_away_goals,
        summary.avg_total_goals,
    ) {
        println!("Average goals: home {h:.2}, away {a:.2}, total {t:.2}");
    }
    println!("Seasons: {:?}", summary.seasons);
    println!("Matches per year: {:?}", summary.matches_per_year);

    let out = parse_path_arg("--out")
        .or_else(|| has_flag("--save").then(|| cfg.processed_file(PROCESSED_FILE)));
    if let Some(out) = out {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        processed
            .table
            .write_csv(&out)
            .with_context(|| format!("write processed table {}", out.display()))?;
        println!("Wrote {}", out.display());
    }

    Ok(())
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}

fn parse_value_arg(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    parse_value_arg(flag).map(PathBuf::from)
}

fn parse_seasons_arg() -> Option<Vec<String>> {
    let raw = parse_value_arg("--seasons")?;
    let mut seasons = Vec::new();
    for part in raw.split([',', ';', ' ']) {
        let part = part.trim();
        if !part.is_empty() && !seasons.iter().any(|s: &String| s == part) {
            seasons.push(part.to_string());
        }
    }
    if seasons.is_empty() { None } else { Some(seasons) }
}
