//! Range table loader
//!
//! Reads a headerless CSV table whose first four columns are
//! `range_start,range_end,country_code,region`, with range bounds given as
//! pre-encoded decimal integers. Extra columns are ignored. Ground-truth
//! tables in the GeoLite2 numeric export carry only the first three
//! columns; they load with [`TableLayout::CountryOnly`] and an empty region.
//!
//! Malformed rows (too few fields, or a bound that is not a `u32`) are
//! skipped and counted rather than failing the load. Text fields are kept
//! even when they are not valid UTF-8; bad bytes become U+FFFD. Only a file
//! that cannot be opened or read is an error.

use crate::error::Result;
use crate::file_reader;
use crate::range_index::IpRange;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace};

/// Rows logged at debug level after a load
pub const PREVIEW_ROWS: usize = 5;

/// Column layout of a table file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableLayout {
    /// `range_start,range_end,country_code,region`
    #[default]
    Location,
    /// `range_start,range_end,country_code`, region optional
    CountryOnly,
}

impl TableLayout {
    fn min_fields(self) -> usize {
        match self {
            TableLayout::Location => 4,
            TableLayout::CountryOnly => 3,
        }
    }
}

/// Outcome of loading a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Parsed rows in file order (unsorted)
    pub ranges: Vec<IpRange>,
    /// Rows dropped as malformed
    pub skipped: usize,
}

/// Why a row was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    TooFewFields(usize),
    BadStart,
    BadEnd,
}

/// Load a range table, returning its rows in file order
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Vec<IpRange>> {
    load_table_report(path).map(|report| report.ranges)
}

/// Load a range table along with the count of skipped rows
pub fn load_table_report<P: AsRef<Path>>(path: P) -> Result<LoadReport> {
    load_table_with(path, TableLayout::Location)
}

/// Load a table of the given layout along with the count of skipped rows
pub fn load_table_with<P: AsRef<Path>>(path: P, layout: TableLayout) -> Result<LoadReport> {
    let path = path.as_ref();
    let reader = file_reader::open(path)?;
    let report = load_from_reader_with(reader, layout)?;
    debug!(
        path = %path.display(),
        ?layout,
        loaded = report.ranges.len(),
        skipped = report.skipped,
        "range table loaded"
    );
    Ok(report)
}

/// Load a four-column range table from any reader
pub fn load_from_reader<R: Read>(reader: R) -> Result<LoadReport> {
    load_from_reader_with(reader, TableLayout::Location)
}

/// Load a table of the given layout from any reader
///
/// The whole stream is consumed before returning. A read error anywhere in
/// the stream fails the load; no partial table is returned.
pub fn load_from_reader_with<R: Read>(reader: R, layout: TableLayout) -> Result<LoadReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut report = LoadReport::default();

    for record in csv_reader.byte_records() {
        let record = record?;
        match parse_row(&record, layout) {
            Ok(range) => {
                if report.ranges.len() < PREVIEW_ROWS {
                    debug!(
                        "{}: {}-{}, {}, {}",
                        report.ranges.len(),
                        range.start,
                        range.end,
                        range.country_code,
                        range.region
                    );
                }
                report.ranges.push(range);
            }
            Err(reason) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                trace!(line, ?reason, "skipping malformed row");
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

fn parse_bound(field: &[u8]) -> Option<u32> {
    std::str::from_utf8(field).ok()?.parse().ok()
}

fn parse_row(
    record: &csv::ByteRecord,
    layout: TableLayout,
) -> std::result::Result<IpRange, SkipReason> {
    if record.len() < layout.min_fields() {
        return Err(SkipReason::TooFewFields(record.len()));
    }

    let start = parse_bound(&record[0]).ok_or(SkipReason::BadStart)?;
    let end = parse_bound(&record[1]).ok_or(SkipReason::BadEnd)?;
    let country_code = String::from_utf8_lossy(&record[2]);
    let region = record.get(3).map(String::from_utf8_lossy).unwrap_or_default();

    Ok(IpRange::new(start, end, country_code, region))
}
