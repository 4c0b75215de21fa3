use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;

use retrograde_rust::config::CalculatorConfig;
use retrograde_rust::core::domain::Body;
use retrograde_rust::ephemeris::{EphemerisProvider, TableEphemeris, TieredEphemeris};
use retrograde_rust::io::report::RetrogradeReport;
use retrograde_rust::parsing::reference_csv::parse_reference_csv;
use retrograde_rust::services::calculator::RetrogradeCalculator;
use retrograde_rust::services::validation::{validate_periods, MatchOutcome, DEFAULT_TOLERANCE_DAYS};
use retrograde_rust::time::jd_to_date_string;

const USAGE: &str = "Usage:
  retrograde-calculator run [config.toml]
  retrograde-calculator validate <report.json> <body> <reference.csv>
  retrograde-calculator bodies <table.json>";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("run") => run(args.get(1).map(PathBuf::from)),
        Some("validate") if args.len() == 4 => {
            validate(Path::new(&args[1]), &args[2], Path::new(&args[3]))
        }
        Some("bodies") if args.len() == 2 => list_bodies(Path::new(&args[1])),
        _ => {
            eprintln!("{}", USAGE);
            bail!("invalid arguments");
        }
    }
}

fn load_provider(config: &CalculatorConfig) -> Result<Box<dyn EphemerisProvider>> {
    let settings = &config.ephemeris;
    if settings.tables.is_empty() {
        bail!("No ephemeris tables configured (set [ephemeris] tables)");
    }

    let primary = TableEphemeris::from_files(&settings.tables)
        .context("Failed to load ephemeris tables")?;

    if settings.fallback_tables.is_empty() {
        return Ok(Box::new(primary));
    }

    let fallback = TableEphemeris::from_files(&settings.fallback_tables)
        .context("Failed to load fallback ephemeris tables")?;
    Ok(Box::new(TieredEphemeris::new(
        primary,
        fallback,
        settings.primary_start_year..=settings.primary_end_year,
    )))
}

fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => CalculatorConfig::from_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => CalculatorConfig::from_default_location().context("Failed to load configuration")?,
    };

    println!("=== Retrograde Calculator ({}-{}) ===", config.range.start_year, config.range.end_year);
    let started = Instant::now();

    let provider = load_provider(&config)?;
    let calculator = RetrogradeCalculator::new(&config, provider.as_ref())?;
    let report = calculator.calculate_all()?;

    let output = &config.output;
    let saved = report
        .save(&output.path, output.pretty, output.compress)
        .with_context(|| format!("Failed to write {}", output.path.display()))?;

    println!();
    println!("Complete! Generated in {:.1} seconds", started.elapsed().as_secs_f64());
    for line in saved.summary_lines() {
        println!("{}", line);
    }
    println!();
    for line in report.summary_lines() {
        println!("{}", line);
    }

    Ok(())
}

fn validate(report_path: &Path, body: &str, reference_path: &Path) -> Result<()> {
    let body: Body = body.parse()?;
    let report = RetrogradeReport::from_file(report_path)
        .with_context(|| format!("Failed to read report {}", report_path.display()))?;
    if report.get(body).is_none() {
        bail!("{} has no entry in {}", body, report_path.display());
    }

    let reference = parse_reference_csv(reference_path)?;
    let computed = report.periods_for(body);
    let validation = validate_periods(&computed, &reference, DEFAULT_TOLERANCE_DAYS);

    for result in &validation.results {
        match (result.outcome, result.matched) {
            (MatchOutcome::Exact, _) => println!("  ✓ EXACT MATCH: {}", result.reference),
            (MatchOutcome::Close, Some(matched)) => {
                println!(
                    "  ≈ CLOSE MATCH: {} (computed {} to {}, start {:+} days, end {:+} days)",
                    result.reference,
                    jd_to_date_string(matched.start_jd).unwrap_or_default(),
                    jd_to_date_string(matched.end_jd).unwrap_or_default(),
                    result.start_diff_days.unwrap_or(0),
                    result.end_diff_days.unwrap_or(0)
                );
            }
            _ => println!("  ✗ NO MATCH: {}", result.reference),
        }
    }

    println!();
    println!("Validation Results:");
    println!("  Exact Matches: {}", validation.exact_matches());
    println!("  Close Matches (±{} days): {}", DEFAULT_TOLERANCE_DAYS, validation.close_matches());
    println!("  Missing: {}", validation.missing());
    println!("  Total Tested: {}", validation.total());
    println!("  Exact Match Rate: {:.1}%", validation.exact_match_rate() * 100.0);

    Ok(())
}

fn list_bodies(table_path: &Path) -> Result<()> {
    let table = TableEphemeris::from_file(table_path)
        .with_context(|| format!("Failed to load {}", table_path.display()))?;

    println!("Ephemeris '{}':", table.name());
    for pair in table.pairs() {
        let coverage = table
            .coverage(pair)
            .map(|(first, last)| {
                format!(
                    "{} to {}",
                    jd_to_date_string(first).unwrap_or_else(|| first.to_string()),
                    jd_to_date_string(last).unwrap_or_else(|| last.to_string())
                )
            })
            .unwrap_or_else(|| "empty".to_string());
        println!("  {}: {} samples, {}", pair, table.sample_count(pair), coverage);
    }

    Ok(())
}
