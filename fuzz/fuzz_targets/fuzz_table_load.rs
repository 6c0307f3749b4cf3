#![no_main]
use libfuzzer_sys::fuzz_target;
use ipgeo::{load_from_reader, RangeTable};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a table: must load or fail cleanly, never panic
    if let Ok(report) = load_from_reader(data) {
        let table = RangeTable::from_ranges(report.ranges);
        for ip in [0u32, 1, 0x7f00_0001, u32::MAX] {
            if let Some(r) = table.find(ip) {
                assert!(r.contains(ip));
            }
        }
        let _ = table.coverage();
    }
});
