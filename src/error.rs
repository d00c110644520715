use thiserror::Error;

/// Errors raised by a [`PokemonStore`](crate::PokemonStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record shape was rejected on write.
    #[error("Pokemon validation failed: {0}")]
    Validation(String),

    #[error("could not allocate a unique pokemon id after {attempts} attempts")]
    IdAllocation { attempts: u32 },

    #[error("document conversion failed: {0}")]
    Serialization(String),

    #[error("store backend failure: {0}")]
    Backend(String),

    /// The configured backend was compiled out.
    #[error("{0} backend disabled at compile time")]
    Unavailable(&'static str),

    #[cfg(feature = "backend-mongo")]
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

impl StoreError {
    pub fn validation<E: ToString>(err: E) -> Self {
        StoreError::Validation(err.to_string())
    }

    pub fn backend<E: ToString>(err: E) -> Self {
        StoreError::Backend(err.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
