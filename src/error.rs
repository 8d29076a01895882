// Domain errors
//
// Application edges (binaries, config loading, the UI loop) use anyhow.
// Everything that can be rejected at a module boundary gets a typed error here.

use thiserror::Error;

/// Input rejected before it reaches the chart renderer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("viewport must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("duplicate month label: {0}")]
    DuplicateLabel(String),

    #[error("series holds at most {max} points, got {got}")]
    TooManyPoints { max: usize, got: usize },

    #[error("margin must be non-negative and finite, got {0}")]
    InvalidMargin(f64),
}

/// Dialog validation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be a whole number between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },

    #[error("{field} is not a valid date (expected YYYY-MM-DD): {value}")]
    InvalidDate { field: &'static str, value: String },
}

/// Inventory operation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InventoryError {
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error("unknown merchant: {0}")]
    UnknownMerchant(String),

    #[error("outbound operations require a merchant")]
    MerchantRequired,

    #[error("quantity must be between 1 and {max}, got {got}")]
    InvalidQuantity { max: u32, got: u32 },

    #[error("insufficient stock for {product}: current {current}, requested {requested}")]
    InsufficientStock {
        product: String,
        current: u32,
        requested: u32,
    },

    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: String, end: String },
}

/// Umbrella error for library callers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrmError {
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("please select a merchant first")]
    NoMerchantSelected,
}

pub type Result<T> = std::result::Result<T, CrmError>;
