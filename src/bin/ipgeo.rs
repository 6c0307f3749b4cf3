#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

mod cli_utils;
mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{cmd_evaluate, cmd_inspect, cmd_lookup, EvaluateOptions, LookupOptions};

/// Table path used when `--db` is not given
const DEFAULT_DB: &str = "IP2LOCATION-LITE-DB1.CSV/IP2LOCATION-LITE-DB1.CSV";

/// Address looked up when no IP is given
const DEMO_IP: &str = "113.161.50.126";

#[derive(Parser)]
#[command(name = "ipgeo")]
#[command(
    about = "IPv4 to country/region lookup over IP2Location-style range tables",
    long_about = "ipgeo - IPv4 to country/region lookup over IP2Location-style range tables\n\n\
    Loads a headerless CSV table of `range_start,range_end,country_code,region` rows \n\
    (range bounds as big-endian integers), sorts it by range start and resolves \n\
    addresses with a binary search. Tables may be gzip-compressed.\n\n\
    Exit codes:\n\
      0  every address was found\n\
      1  invalid address or unreadable table\n\
      2  at least one address is outside every range\n\n\
    Examples:\n\
      ipgeo lookup 113.161.50.126 --db IP2LOCATION-LITE-DB1.CSV\n\
      ipgeo lookup 8.8.8.8 1.1.1.1 --db db1.csv.gz --json\n\
      ipgeo lookup 104.244.73.112 --db db1.csv --proxy-db px1.csv\n\
      ipgeo inspect --db IP2LOCATION-LITE-DB1.CSV\n\
      ipgeo evaluate --db IP2LOCATION-LITE-DB1.CSV --truth geolite2-country-ipv4-num.csv"
)]
#[command(version)]
struct Cli {
    /// Log loader diagnostics to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the country and region of one or more IPv4 addresses
    Lookup {
        /// IPv4 addresses to resolve
        #[arg(value_name = "IP", default_value = DEMO_IP)]
        ips: Vec<String>,

        /// Location range table (CSV or CSV.gz, "-" for stdin)
        #[arg(long, value_name = "PATH", default_value = DEFAULT_DB)]
        db: PathBuf,

        /// Proxy range table; reports whether each address is a known proxy
        #[arg(long, value_name = "PATH")]
        proxy_db: Option<PathBuf>,

        /// Number of loaded records to print before the results (0 to disable)
        #[arg(long, value_name = "N", default_value = "5")]
        preview: usize,

        /// Output results as JSON
        #[arg(short, long, conflicts_with = "quiet")]
        json: bool,

        /// Quiet mode - no output, only exit code
        #[arg(short, long)]
        quiet: bool,
    },

    /// Inspect a range table without performing lookups
    Inspect {
        /// Location range table (CSV or CSV.gz, "-" for stdin)
        #[arg(long, value_name = "PATH", default_value = DEFAULT_DB)]
        db: PathBuf,

        /// Number of loaded records to print (0 to disable)
        #[arg(long, value_name = "N", default_value = "5")]
        preview: usize,

        /// Output statistics as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Measure country-code accuracy against a ground-truth range table
    Evaluate {
        /// Location range table under test (CSV or CSV.gz, "-" for stdin)
        #[arg(long, value_name = "PATH", default_value = DEFAULT_DB)]
        db: PathBuf,

        /// Ground-truth table of `range_start,range_end,country_code` rows
        #[arg(long, value_name = "PATH")]
        truth: PathBuf,

        /// Number of addresses to sample from the ground-truth ranges
        #[arg(short = 'n', long, value_name = "N", default_value = "100000")]
        samples: usize,

        /// Seed for reproducible sampling (random if not given)
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Print every case as it is evaluated
        #[arg(long)]
        show_cases: bool,

        /// Output the summary as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    cli_utils::init_logging(cli.verbose);

    #[cfg(feature = "dhat-heap")]
    let profiler = dhat::Profiler::new_heap();

    let outcome = match cli.command {
        Commands::Lookup {
            ips,
            db,
            proxy_db,
            preview,
            json,
            quiet,
        } => cmd_lookup(LookupOptions {
            ips,
            db,
            proxy_db,
            preview,
            json,
            quiet,
        }),
        Commands::Inspect { db, preview, json } => cmd_inspect(db, preview, json),
        Commands::Evaluate {
            db,
            truth,
            samples,
            seed,
            show_cases,
            json,
        } => cmd_evaluate(EvaluateOptions {
            db,
            truth,
            samples,
            seed,
            show_cases,
            json,
        }),
    };

    // Write the heap profile before the process exits
    #[cfg(feature = "dhat-heap")]
    drop(profiler);

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            cli_utils::exit_code_for(&err)
        }
    }
}
