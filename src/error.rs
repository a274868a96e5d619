use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreativeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid color '{0}': expected '#rrggbb' or 'r,g,b'")]
    InvalidColor(String),

    // === Structural (request-level) errors ===
    #[error("Duplicate text block id '{0}'")]
    DuplicateTextBlock(String),

    #[error("Canvas dimensions must be positive (got {width}x{height})")]
    NonPositiveDimension { width: u32, height: u32 },

    #[error("Text block '{0}' has a non-positive font size")]
    NonPositiveFontSize(String),

    #[error("Text block '{0}' has empty text")]
    EmptyText(String),
}

impl CreativeError {
    /// True for malformed-layout errors, as opposed to IO/config failures.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTextBlock(_)
                | Self::NonPositiveDimension { .. }
                | Self::NonPositiveFontSize(_)
                | Self::EmptyText(_)
        )
    }
}

pub type AdResult<T> = Result<T, CreativeError>;
