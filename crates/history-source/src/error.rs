use core_types::DataError;
use thiserror::Error;

/// The history source could not produce a series for an asset.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to reach the history source: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("history source returned status {status} for '{asset}': {body}")]
    Status {
        asset: String,
        status: u16,
        body: String,
    },

    #[error("failed to deserialize the history payload for '{asset}': {message}")]
    Deserialization { asset: String, message: String },

    #[error("no history available for asset '{0}'")]
    MissingAsset(String),
}

/// Everything that can keep one asset out of a run: the source failed, or
/// the series it produced was structurally unusable. Callers catch this at
/// the loader boundary, log it, and continue with the remaining assets.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Data(#[from] DataError),
}
