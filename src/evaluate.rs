//! Accuracy evaluation against a ground-truth range table
//!
//! Query addresses are drawn from the ranges of a second table whose
//! country codes are taken as correct, resolved against the table under
//! test, and the share of matching country codes is reported. Codes are
//! compared ignoring ASCII case; an address the table cannot resolve, or
//! one whose expected code is empty, counts as a mismatch.

use crate::range_index::{IpRange, RangeTable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// One query address and the country code it should resolve to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvalCase {
    /// Query address as its big-endian integer
    pub ip: u32,
    /// Country code from the ground-truth table
    pub expected: String,
}

/// Outcome of an evaluation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvalReport {
    /// Cases evaluated
    pub total: usize,
    /// Cases whose resolved country code matched
    pub correct: usize,
    /// Cases the table under test could not resolve at all
    pub unresolved: usize,
}

impl EvalReport {
    /// Percentage of correct cases, 0 for an empty run
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 * 100.0 / self.total as f64
        }
    }
}

/// Draw `samples` query addresses uniformly from the addresses covered by `truth`
///
/// When `truth` covers no more than `samples` addresses, every covered
/// address is used exactly once, in table order, and `rng` is not
/// consulted. Otherwise addresses are drawn with replacement, weighted so
/// that every covered address is equally likely. Inverted ranges are ignored.
pub fn sample_cases<R: Rng>(truth: &[IpRange], samples: usize, rng: &mut R) -> Vec<EvalCase> {
    let valid: Vec<&IpRange> = truth.iter().filter(|r| r.start <= r.end).collect();

    // cumulative[i] = addresses covered by valid[..=i]
    let cumulative: Vec<u64> = valid
        .iter()
        .scan(0u64, |acc, r| {
            *acc += r.end as u64 - r.start as u64 + 1;
            Some(*acc)
        })
        .collect();
    let total = cumulative.last().copied().unwrap_or(0);

    if total == 0 || samples == 0 {
        return Vec::new();
    }

    if total <= samples as u64 {
        return valid
            .iter()
            .flat_map(|r| {
                (r.start..=r.end).map(move |ip| EvalCase {
                    ip,
                    expected: r.country_code.clone(),
                })
            })
            .collect();
    }

    (0..samples)
        .map(|_| {
            let offset = rng.random_range(0..total);
            let idx = cumulative.partition_point(|&c| c <= offset);
            let range = valid[idx];
            let before = if idx == 0 { 0 } else { cumulative[idx - 1] };
            EvalCase {
                ip: range.start + (offset - before) as u32,
                expected: range.country_code.clone(),
            }
        })
        .collect()
}

/// Same as [`sample_cases`] with a reproducible generator
pub fn sample_cases_seeded(truth: &[IpRange], samples: usize, seed: u64) -> Vec<EvalCase> {
    sample_cases(truth, samples, &mut StdRng::seed_from_u64(seed))
}

/// Whether a resolved country code counts as a match for the expected one
pub fn codes_match(found: Option<&str>, expected: &str) -> bool {
    match found {
        Some(code) => !code.is_empty() && !expected.is_empty() && code.eq_ignore_ascii_case(expected),
        None => false,
    }
}

/// Resolve every case against `table` and tally the matches
pub fn evaluate(table: &RangeTable, cases: &[EvalCase]) -> EvalReport {
    cases.iter().fold(EvalReport::default(), |mut report, case| {
        let found = table.find(case.ip);
        report.total += 1;
        if found.is_none() {
            report.unresolved += 1;
        }
        if codes_match(found.map(|r| r.country_code.as_str()), &case.expected) {
            report.correct += 1;
        }
        report
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truth() -> Vec<IpRange> {
        vec![
            IpRange::new(100, 103, "US", ""),
            IpRange::new(200, 205, "CA", ""),
        ]
    }

    #[test]
    fn test_small_truth_is_enumerated() {
        let cases = sample_cases_seeded(&truth(), 1000, 7);
        assert_eq!(cases.len(), 10);
        assert_eq!(cases[0], EvalCase { ip: 100, expected: "US".to_string() });
        assert_eq!(cases[9], EvalCase { ip: 205, expected: "CA".to_string() });
    }

    #[test]
    fn test_sampled_addresses_stay_inside_truth() {
        let truth = vec![
            IpRange::new(0, 9, "A", ""),
            IpRange::new(1_000_000, 3_000_000, "B", ""),
            IpRange::new(50, 10, "X", ""),
        ];
        let cases = sample_cases_seeded(&truth, 500, 42);
        assert_eq!(cases.len(), 500);
        for case in &cases {
            let owner = truth[..2].iter().find(|r| r.contains(case.ip)).unwrap();
            assert_eq!(owner.country_code, case.expected);
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let truth = vec![IpRange::new(0, u32::MAX, "ZZ", "")];
        assert_eq!(
            sample_cases_seeded(&truth, 50, 3),
            sample_cases_seeded(&truth, 50, 3)
        );
    }

    #[test]
    fn test_empty_truth() {
        assert!(sample_cases_seeded(&[], 10, 1).is_empty());
        assert!(sample_cases_seeded(&truth(), 0, 1).is_empty());
    }

    #[test]
    fn test_codes_match_ignores_case() {
        assert!(codes_match(Some("us"), "US"));
        assert!(!codes_match(Some("US"), "CA"));
        assert!(!codes_match(None, "US"));
        assert!(!codes_match(Some(""), ""));
    }

    #[test]
    fn test_evaluate_counts() {
        let table = RangeTable::from_ranges(vec![
            IpRange::new(100, 103, "us", "A"),
            IpRange::new(200, 202, "CA", "B"),
            IpRange::new(203, 204, "MX", "C"),
        ]);
        let report = evaluate(&table, &sample_cases_seeded(&truth(), 100, 0));
        assert_eq!(
            report,
            EvalReport {
                total: 10,
                correct: 7,
                unresolved: 1
            }
        );
        assert!((report.accuracy() - 70.0).abs() < 1e-9);
        assert_eq!(EvalReport::default().accuracy(), 0.0);
    }
}
