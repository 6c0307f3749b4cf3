use anyhow::{bail, Context, Result};
use ipgeo::{load_table, load_table_report, parse_ipv4, RangeTable};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cli_utils::{format_kb, memory_usage, print_preview, EXIT_NOT_FOUND};

pub struct LookupOptions {
    pub ips: Vec<String>,
    pub db: PathBuf,
    pub proxy_db: Option<PathBuf>,
    pub preview: usize,
    pub json: bool,
    pub quiet: bool,
}

pub fn cmd_lookup(opts: LookupOptions) -> Result<ExitCode> {
    if let Some(proxy_db) = &opts.proxy_db {
        if is_stdin(&opts.db) && is_stdin(proxy_db) {
            bail!("--db and --proxy-db cannot both read from stdin");
        }
    }

    // Reject bad addresses before paying for the table load
    let queries = opts
        .ips
        .iter()
        .map(|ip| parse_ipv4(ip).map(|n| (ip.as_str(), n)))
        .collect::<ipgeo::Result<Vec<_>>>()?;

    let report = load_table_report(&opts.db)
        .with_context(|| format!("Failed to load range table: {}", opts.db.display()))?;

    let text_output = !opts.json && !opts.quiet;
    if text_output {
        print_preview(&report.ranges, opts.preview);
    }

    let table = RangeTable::from_ranges(report.ranges);

    let proxies = match &opts.proxy_db {
        Some(path) => Some(RangeTable::from_ranges(load_table(path).with_context(|| {
            format!("Failed to load proxy table: {}", path.display())
        })?)),
        None => None,
    };

    let mut all_found = true;
    let mut results = Vec::with_capacity(queries.len());

    for (ip, ip_int) in queries {
        let found = table.find(ip_int);
        let proxy = proxies.as_ref().map(|p| p.contains(ip_int));
        all_found &= found.is_some();

        if text_output {
            println!("IP as integer: {}", ip_int);
            match found {
                Some(r) => println!("Country: {}, Region: {}", r.country_code, r.region),
                None => println!("{}", ipgeo::GeoError::NotFound(ip.to_string())),
            }
            if let Some(is_proxy) = proxy {
                println!("Proxy Type: {}", if is_proxy { "Proxy" } else { "No Proxy" });
            }
        } else if opts.json {
            let mut entry = json!({
                "ip": ip,
                "ip_int": ip_int,
                "found": found.is_some(),
                "country_code": found.map(|r| r.country_code.as_str()),
                "region": found.map(|r| r.region.as_str()),
            });
            if let Some(is_proxy) = proxy {
                entry["proxy"] = json!(is_proxy);
            }
            results.push(entry);
        }
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&json!(results))?);
    } else if text_output {
        let estimate = table.heap_usage() + proxies.as_ref().map_or(0, RangeTable::heap_usage);
        println!("Total memory usage: {}", format_kb(memory_usage(estimate)));
    }

    if all_found {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_NOT_FOUND))
    }
}

/// Whether `path` names standard input
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}
