use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised when turning user-supplied strings into filter settings.
///
/// The engine itself never fails; these only surface at the edges where
/// option names arrive as text (CLI flags, query strings).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid amount filter: {0}")]
    InvalidAmountFilter(String),

    #[error("invalid sort option: {0}")]
    InvalidSortBy(String),

    #[error("invalid date preset: {0}")]
    InvalidDatePreset(String),

    #[error("invalid date '{value}': expected DD-MM-YYYY")]
    InvalidDate { value: String },
}
