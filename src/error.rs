/// Error types for the ipgeo library
use std::fmt;

/// Result type alias for ipgeo operations
pub type Result<T> = std::result::Result<T, GeoError>;

/// Main error type for table loading and lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
    /// Text is not a syntactically valid IP literal
    InvalidAddress(String),

    /// Text is a valid IP literal but not IPv4
    NotIpv4(String),

    /// I/O errors (table file cannot be opened or read)
    Io(String),

    /// Tabular structure of the table cannot be decoded
    Parse(String),

    /// Query address is outside every known range
    NotFound(String),
}

impl GeoError {
    /// True for errors caused by bad input (query or table), false for a lookup miss
    pub fn is_input_error(&self) -> bool {
        !matches!(self, GeoError::NotFound(_))
    }
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidAddress(ip) => write!(f, "invalid IP address: {}", ip),
            GeoError::NotIpv4(ip) => write!(f, "not an IPv4 address: {}", ip),
            GeoError::Io(msg) => write!(f, "error opening file: {}", msg),
            GeoError::Parse(msg) => write!(f, "error reading CSV: {}", msg),
            GeoError::NotFound(ip) => write!(f, "region not found for IP: {}", ip),
        }
    }
}

impl std::error::Error for GeoError {}

impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::Io(err.to_string())
    }
}

impl From<csv::Error> for GeoError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(io_err) => GeoError::Io(io_err.to_string()),
            _ => GeoError::Parse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            GeoError::InvalidAddress("999.1.1.1".to_string()).to_string(),
            "invalid IP address: 999.1.1.1"
        );
        assert_eq!(
            GeoError::NotIpv4("::1".to_string()).to_string(),
            "not an IPv4 address: ::1"
        );
        assert_eq!(
            GeoError::NotFound("10.0.0.1".to_string()).to_string(),
            "region not found for IP: 10.0.0.1"
        );
    }

    #[test]
    fn test_input_error_classification() {
        assert!(GeoError::InvalidAddress(String::new()).is_input_error());
        assert!(GeoError::NotIpv4(String::new()).is_input_error());
        assert!(GeoError::Io(String::new()).is_input_error());
        assert!(GeoError::Parse(String::new()).is_input_error());
        assert!(!GeoError::NotFound(String::new()).is_input_error());
    }

    #[test]
    fn test_from_io_error() {
        let err: GeoError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, GeoError::Io(ref msg) if msg.contains("gone")));
    }
}
