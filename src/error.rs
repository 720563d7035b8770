use crate::format::Format;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conversion {from} → {to} is not supported")]
    UnsupportedConversion { from: Format, to: Format },

    #[error("Converter not available: {0} is not installed")]
    AdapterUnavailable(String),

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),
}

/// Coarse classification of a [`ConvertError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidRequest,
    UnsupportedConversion,
    AdapterUnavailable,
    ConversionFailed,
}

impl ConvertError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ConvertError::InvalidRequest(_) => FailureKind::InvalidRequest,
            ConvertError::UnsupportedConversion { .. } => FailureKind::UnsupportedConversion,
            ConvertError::AdapterUnavailable(_) => FailureKind::AdapterUnavailable,
            ConvertError::ConversionFailed(_) => FailureKind::ConversionFailed,
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::ConversionFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
