use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    Format(String),

    #[error("Magnitude has no suffix in table: {0}")]
    UnsupportedMagnitude(String),

    #[error("Invalid suffix table: {0}")]
    InvalidSuffixTable(String),
}
