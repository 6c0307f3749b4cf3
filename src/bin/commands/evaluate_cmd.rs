use anyhow::{bail, Context, Result};
use ipgeo::evaluate::codes_match;
use ipgeo::{
    evaluate, load_table_report, load_table_with, sample_cases, sample_cases_seeded, RangeTable,
    TableLayout,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use super::lookup_cmd::is_stdin;

pub struct EvaluateOptions {
    pub db: PathBuf,
    pub truth: PathBuf,
    pub samples: usize,
    pub seed: Option<u64>,
    pub show_cases: bool,
    pub json: bool,
}

pub fn cmd_evaluate(opts: EvaluateOptions) -> Result<ExitCode> {
    if is_stdin(&opts.db) && is_stdin(&opts.truth) {
        bail!("--db and --truth cannot both read from stdin");
    }

    let report = load_table_report(&opts.db)
        .with_context(|| format!("Failed to load range table: {}", opts.db.display()))?;
    let truth = load_table_with(&opts.truth, TableLayout::CountryOnly)
        .with_context(|| format!("Failed to load ground-truth table: {}", opts.truth.display()))?;

    let table = RangeTable::from_ranges(report.ranges);

    let cases = match opts.seed {
        Some(seed) => sample_cases_seeded(&truth.ranges, opts.samples, seed),
        None => sample_cases(&truth.ranges, opts.samples, &mut StdRng::from_os_rng()),
    };
    info!(cases = cases.len(), seed = ?opts.seed, "evaluation cases generated");

    if !opts.json {
        println!("Generated {} test cases", cases.len());
    }

    if opts.show_cases && !opts.json {
        for case in &cases {
            let found = table.find(case.ip).map(|r| r.country_code.as_str());
            let verdict = if codes_match(found, &case.expected) {
                "ok"
            } else {
                "MISMATCH"
            };
            println!(
                "IP: {}, Expected: {}, Found: {} [{}]",
                case.ip,
                case.expected,
                found.unwrap_or("(none)"),
                verdict
            );
        }
    }

    let result = evaluate(&table, &cases);

    if opts.json {
        let output = json!({
            "db": opts.db.display().to_string(),
            "truth": opts.truth.display().to_string(),
            "seed": opts.seed,
            "total": result.total,
            "correct": result.correct,
            "unresolved": result.unresolved,
            "accuracy": result.accuracy(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Correct:    {} / {}", result.correct, result.total);
        println!("Unresolved: {}", result.unresolved);
        println!("Accuracy: {:.2}%", result.accuracy());
    }

    Ok(ExitCode::SUCCESS)
}
