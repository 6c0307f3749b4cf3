use ipgeo::{GeoError, IpRange};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when at least one address is outside every range
pub const EXIT_NOT_FOUND: u8 = 2;

/// Exit code for a command that failed with `err`
///
/// A miss maps to [`EXIT_NOT_FOUND`]; bad input, unreadable tables and any
/// other failure map to 1.
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<GeoError>() {
        Some(geo) if !geo.is_input_error() => ExitCode::from(EXIT_NOT_FOUND),
        _ => ExitCode::FAILURE,
    }
}

/// Install the stderr log subscriber; `--verbose` forces debug level
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ipgeo=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Print the leading rows of a freshly loaded (unsorted) table
pub fn print_preview(ranges: &[IpRange], count: usize) {
    if count == 0 {
        return;
    }
    println!("First {} records:", count);
    for (i, r) in ranges.iter().take(count).enumerate() {
        println!("{}: {}-{}, {}, {}", i, r.start, r.end, r.country_code, r.region);
    }
}

/// Heap bytes attributed to the loaded tables
///
/// With the `dhat-heap` feature this is the allocator's live byte count;
/// otherwise it is the tables' own estimate.
pub fn memory_usage(table_estimate: usize) -> usize {
    #[cfg(feature = "dhat-heap")]
    {
        let _ = table_estimate;
        dhat::HeapStats::get().curr_bytes
    }

    #[cfg(not(feature = "dhat-heap"))]
    {
        table_estimate
    }
}

pub fn format_kb(bytes: usize) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
