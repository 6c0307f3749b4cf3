//! IPv4 text/integer conversion
//!
//! Range tables in the IP2Location family store range bounds as the
//! big-endian (network order) integer value of an IPv4 address, so
//! `1.2.3.4` is `0x01020304`.

use crate::error::{GeoError, Result};
use std::net::{IpAddr, Ipv4Addr};

/// Parse a dotted-decimal IPv4 address into its big-endian integer value
///
/// IPv4-mapped IPv6 literals (`::ffff:a.b.c.d`) are accepted and unwrapped
/// to their IPv4 address. Any other IPv6 literal is rejected with
/// [`GeoError::NotIpv4`]; text that is not an IP literal at all is rejected
/// with [`GeoError::InvalidAddress`].
///
/// # Example
///
/// ```
/// use ipgeo::ip_codec::parse_ipv4;
///
/// assert_eq!(parse_ipv4("113.161.50.126")?, 1906389630);
/// # Ok::<(), ipgeo::GeoError>(())
/// ```
pub fn parse_ipv4(text: &str) -> Result<u32> {
    let addr: IpAddr = text
        .parse()
        .map_err(|_| GeoError::InvalidAddress(text.to_string()))?;

    let v4 = match addr {
        IpAddr::V4(v4) => v4,
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .ok_or_else(|| GeoError::NotIpv4(text.to_string()))?,
    };

    Ok(u32::from_be_bytes(v4.octets()))
}

/// Convert a big-endian integer back into an IPv4 address
pub fn format_ipv4(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value.to_be_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_address() {
        // 113*2^24 + 161*2^16 + 50*2^8 + 126
        assert_eq!(parse_ipv4("113.161.50.126").unwrap(), 1906389630);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(parse_ipv4("0.0.0.0").unwrap(), 0);
        assert_eq!(parse_ipv4("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(parse_ipv4("1.2.3.4").unwrap(), 0x0102_0304);
    }

    #[test]
    fn test_invalid_address() {
        for bad in ["999.1.1.1", "", "1.2.3", "1.2.3.4.5", "abc", " 1.2.3.4", "1.2.3.4/24"] {
            assert_eq!(
                parse_ipv4(bad),
                Err(GeoError::InvalidAddress(bad.to_string())),
                "{:?} should be rejected as invalid",
                bad
            );
        }
    }

    #[test]
    fn test_not_ipv4() {
        assert_eq!(parse_ipv4("::1"), Err(GeoError::NotIpv4("::1".to_string())));
        assert_eq!(
            parse_ipv4("2001:db8::1"),
            Err(GeoError::NotIpv4("2001:db8::1".to_string()))
        );
    }

    #[test]
    fn test_ipv4_mapped_ipv6() {
        assert_eq!(parse_ipv4("::ffff:1.2.3.4").unwrap(), 0x0102_0304);
    }

    #[test]
    fn test_format_ipv4() {
        assert_eq!(format_ipv4(1906389630), Ipv4Addr::new(113, 161, 50, 126));
        assert_eq!(format_ipv4(0), Ipv4Addr::UNSPECIFIED);
        assert_eq!(format_ipv4(u32::MAX), Ipv4Addr::BROADCAST);
    }
}
