use thiserror::Error;

use crate::catalog::ItemId;
use crate::fit::HolderRef;

/// Convenient result alias for the fitting engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a typed holder is built from an item of the wrong classification.
    #[error("item {item_id} ({name}) is not a valid {expected}: {found}")]
    InvalidItem {
        item_id: ItemId,
        name: String,
        expected: &'static str,
        found: String,
    },

    /// Raised when a structural or handler-required attribute is absent.
    #[error("item {item_id} is missing required attribute {attribute}")]
    MissingAttribute { item_id: ItemId, attribute: String },

    /// Raised when an administrative field is assigned an out-of-range value.
    #[error("{value} is not a valid value for {field}: {message}")]
    Validation {
        field: &'static str,
        value: String,
        message: String,
    },

    /// Raised when an item ID cannot be resolved through the catalog.
    #[error("unknown item id: {item_id}")]
    UnknownItem { item_id: ItemId },

    /// Raised when an item references an effect the catalog does not define.
    #[error("item {item_id} references unknown effect {effect}")]
    UnknownEffect { item_id: ItemId, effect: String },

    /// Raised when catalog data fails validation.
    #[error("invalid catalog data: {message}")]
    CatalogValidation { message: String },

    /// Raised when a holder reference does not resolve within a fit.
    #[error("no holder at {holder} in fit")]
    UnknownHolder { holder: HolderRef },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn validation(
        field: &'static str,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Error::Validation {
            field,
            value: value.to_string(),
            message: message.into(),
        }
    }
}
