use thiserror::Error;

/// Error type for geohex-rs operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeohexError {
    /// An argument is outside the domain of the operation (level, coordinate, extent).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Two zones of different levels were compared.
    #[error("Level mismatch: {left} != {right}")]
    LevelMismatch { left: u8, right: u8 },
    /// The zone code is too short, too long, or contains an invalid character.
    #[error("Malformed code: {0}")]
    MalformedCode(String),
    /// File I/O or serialization error.
    #[error("IO error: {0}")]
    IoError(String),
    /// CSV parsing or reading error.
    #[error("CSV error: {0}")]
    CsvError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    #[error("Geometry parse error: {0}")]
    GeometryParseError(String),
}

impl GeohexError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GeohexError::InvalidArgument(msg.into())
    }

    pub(crate) fn malformed(code: &str, reason: &str) -> Self {
        GeohexError::MalformedCode(format!("'{}': {}", code, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GeohexError::LevelMismatch { left: 3, right: 4 };
        assert_eq!(err.to_string(), "Level mismatch: 3 != 4");

        let err = GeohexError::malformed("1A", "bad head");
        assert_eq!(err.to_string(), "Malformed code: '1A': bad head");
    }
}
