use anyhow::{Context, Result};
use ipgeo::{format_ipv4, load_table_report, IpRange, RangeTable};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli_utils::{format_kb, format_number, memory_usage, print_preview};

/// Addresses in the IPv4 space
const IPV4_SPACE: u64 = 1 << 32;

pub fn cmd_inspect(db: PathBuf, preview: usize, json_output: bool) -> Result<ExitCode> {
    let report = load_table_report(&db)
        .with_context(|| format!("Failed to load range table: {}", db.display()))?;

    if !json_output {
        print_preview(&report.ranges, preview);
    }

    let skipped = report.skipped;
    let preview_rows: Vec<IpRange> = report.ranges.iter().take(preview).cloned().collect();
    let table = RangeTable::from_ranges(report.ranges);
    let coverage = table.coverage();
    let overlaps = table.overlap_count();
    let inverted = table.inverted_count();
    let memory = memory_usage(table.heap_usage());
    let lowest = table.ranges().first().map(|r| r.start);
    let highest = table.ranges().iter().map(|r| r.end).max();

    if json_output {
        let output = json!({
            "file": db.display().to_string(),
            "records": table.len(),
            "skipped_rows": skipped,
            "covered_addresses": coverage,
            "overlapping_ranges": overlaps,
            "inverted_ranges": inverted,
            "lowest_address": lowest.map(|ip| format_ipv4(ip).to_string()),
            "highest_address": highest.map(|ip| format_ipv4(ip).to_string()),
            "memory_bytes": memory,
            "preview": preview_rows,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!();
    println!("Table:     {}", db.display());
    println!("Records:   {}", format_number(table.len() as u64));
    println!("Skipped:   {} malformed rows", format_number(skipped as u64));
    println!(
        "Coverage:  {} addresses ({:.2}% of IPv4)",
        format_number(coverage),
        coverage as f64 * 100.0 / IPV4_SPACE as f64
    );
    if let (Some(lowest), Some(highest)) = (lowest, highest) {
        println!("Span:      {} - {}", format_ipv4(lowest), format_ipv4(highest));
    }
    if overlaps > 0 {
        println!("Overlaps:  {} ranges start inside their predecessor", overlaps);
    }
    if inverted > 0 {
        println!("Inverted:  {} ranges end before they start", inverted);
    }
    println!("Memory:    {}", format_kb(memory));

    Ok(ExitCode::SUCCESS)
}
