//! ipgeo - IPv4 to Country/Region Lookup
//!
//! ipgeo resolves IPv4 addresses against range tables in the IP2Location
//! LITE style: flat CSV files where every row is
//! `range_start,range_end,country_code,region` and the range bounds are
//! the addresses' big-endian integer values.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ipgeo::{load_table, RangeTable};
//!
//! let table = RangeTable::from_ranges(load_table("IP2LOCATION-LITE-DB1.CSV")?);
//!
//! let (country, region) = table.find_region("113.161.50.126")?;
//! println!("Country: {}, Region: {}", country, region);
//! # Ok::<(), ipgeo::GeoError>(())
//! ```
//!
//! # Lookup
//!
//! The table is sorted once by range start. A query is answered with a
//! binary search for the rightmost range starting at or below the query,
//! followed by a check against that range's end:
//!
//! ```text
//!   [100 ──── 200]        [300 ──── 400]
//!        ▲           ▲          ▲
//!       150         250        300
//!    US / A      not found    CA / B
//! ```
//!
//! Both bounds are inclusive. Loading is O(n log n) for the sort, and each
//! lookup is O(log n).

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types for table loading and lookups
pub mod error;
/// Accuracy evaluation against ground-truth tables
pub mod evaluate;
pub mod file_reader;
/// IPv4 address encoding
pub mod ip_codec;
/// CSV range table loader
pub mod loader;
pub mod range_index;

pub use crate::error::{GeoError, Result};
pub use crate::evaluate::{evaluate, sample_cases, sample_cases_seeded, EvalCase, EvalReport};
pub use crate::ip_codec::{format_ipv4, parse_ipv4};
pub use crate::loader::{
    load_from_reader, load_from_reader_with, load_table, load_table_report, load_table_with,
    LoadReport, TableLayout,
};
pub use crate::range_index::{find_range, find_region, sort_ranges, IpRange, RangeTable};

/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
