//! Sorted range table and containing-range search
//!
//! The table is sorted once by range start and is read-only afterwards.
//! A lookup finds the rightmost range whose start is `<=` the query and
//! then checks the query against that range's end, so queries that land
//! in a gap between ranges miss even though the search stops on the
//! preceding range.
//!
//! Ranges are assumed to be non-overlapping. If a table does contain
//! overlaps, the rightmost start `<=` query wins; among equal starts the
//! range that came last in file order wins, since the sort is stable.

use crate::error::{GeoError, Result};
use crate::ip_codec::parse_ipv4;
use serde::Serialize;
use std::mem;

/// One row of a range table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpRange {
    /// First address of the range (inclusive)
    pub start: u32,
    /// Last address of the range (inclusive)
    pub end: u32,
    /// Country code, e.g. `VN`, or `-` for unassigned space
    pub country_code: String,
    /// Region/subdivision name (country name in DB1 tables)
    pub region: String,
}

impl IpRange {
    /// Build a record from its four columns
    pub fn new(start: u32, end: u32, country_code: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            start,
            end,
            country_code: country_code.into(),
            region: region.into(),
        }
    }

    /// Inclusive on both bounds
    #[inline]
    pub fn contains(&self, ip: u32) -> bool {
        self.start <= ip && ip <= self.end
    }

    /// Bytes owned on the heap by this record's strings
    fn heap_bytes(&self) -> usize {
        self.country_code.capacity() + self.region.capacity()
    }
}

/// Sort ranges ascending by start
pub fn sort_ranges(ranges: &mut [IpRange]) {
    ranges.sort_by_key(|r| r.start);
}

/// Find the range containing `ip` in a slice sorted by start
pub fn find_range(sorted: &[IpRange], ip: u32) -> Option<&IpRange> {
    // First index whose start is > ip, then step back one
    let idx = sorted.partition_point(|r| r.start <= ip);
    let candidate = sorted.get(idx.checked_sub(1)?)?;
    candidate.contains(ip).then_some(candidate)
}

/// Resolve a query IP to `(country_code, region)` in a slice sorted by start
///
/// Codec errors are returned unchanged; a miss is [`GeoError::NotFound`].
pub fn find_region(sorted: &[IpRange], query: &str) -> Result<(String, String)> {
    let ip = parse_ipv4(query)?;
    find_range(sorted, ip)
        .map(|r| (r.country_code.clone(), r.region.clone()))
        .ok_or_else(|| GeoError::NotFound(query.to_string()))
}

/// An owned range table, sorted on construction
#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    ranges: Vec<IpRange>,
}

impl RangeTable {
    /// Take ownership of loaded ranges and sort them by start
    pub fn from_ranges(mut ranges: Vec<IpRange>) -> Self {
        sort_ranges(&mut ranges);
        Self { ranges }
    }

    /// Range containing `ip`, if any
    pub fn find(&self, ip: u32) -> Option<&IpRange> {
        find_range(&self.ranges, ip)
    }

    /// Parse `query` and return the range containing it
    pub fn lookup(&self, query: &str) -> Result<&IpRange> {
        let ip = parse_ipv4(query)?;
        self.find(ip)
            .ok_or_else(|| GeoError::NotFound(query.to_string()))
    }

    /// Parse `query` and return its `(country_code, region)`
    pub fn find_region(&self, query: &str) -> Result<(String, String)> {
        find_region(&self.ranges, query)
    }

    /// Whether any range contains `ip`
    pub fn contains(&self, ip: u32) -> bool {
        self.find(ip).is_some()
    }

    /// Number of ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True if the table has no ranges
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Ranges in ascending start order
    pub fn ranges(&self) -> &[IpRange] {
        &self.ranges
    }

    /// Number of ranges that start at or before the end of their predecessor
    pub fn overlap_count(&self) -> usize {
        self.ranges
            .windows(2)
            .filter(|pair| pair[1].start <= pair[0].end)
            .count()
    }

    /// Number of ranges whose start is greater than their end
    pub fn inverted_count(&self) -> usize {
        self.ranges.iter().filter(|r| r.start > r.end).count()
    }

    /// Total addresses covered, counting overlapping addresses once
    pub fn coverage(&self) -> u64 {
        let mut covered = 0u64;
        // One past the highest address counted so far
        let mut next_free = 0u64;
        for r in self.ranges.iter().filter(|r| r.start <= r.end) {
            let start = (r.start as u64).max(next_free);
            let end = r.end as u64 + 1;
            if end > start {
                covered += end - start;
                next_free = end;
            }
        }
        covered
    }

    /// Approximate bytes held by the table, including string contents
    pub fn heap_usage(&self) -> usize {
        mem::size_of::<Self>()
            + self.ranges.capacity() * mem::size_of::<IpRange>()
            + self.ranges.iter().map(IpRange::heap_bytes).sum::<usize>()
    }
}
