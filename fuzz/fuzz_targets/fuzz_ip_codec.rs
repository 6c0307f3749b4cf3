#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Any accepted address must decode back to the same integer
        if let Ok(ip) = ipgeo::parse_ipv4(s) {
            let text = ipgeo::format_ipv4(ip).to_string();
            assert_eq!(ipgeo::parse_ipv4(&text), Ok(ip));
        }
    }
});
