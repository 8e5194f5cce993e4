use thiserror::Error;

/// All errors that can occur in cardbase-core.
#[derive(Debug, Error)]
pub enum CardbaseError {
    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Invalid edition number: {0}")]
    InvalidEditionNumber(String),

    #[error(
        "Invalid collection entry '{0}': expected '<count> <foil count> <number> <set code>'"
    )]
    InvalidCollectionEntry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, CardbaseError>;
