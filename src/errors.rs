//! Unified error types for the crate.
//!
//! Validation variants fire before any persistence call; `Database` wraps
//! every storage failure and is propagated up unchanged.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// User input failed a precondition
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// A monetary amount or weight was not a usable number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending value
        amount: f64,
    },

    /// A save was requested while another save was still in flight
    #[error("A save is already in progress")]
    SaveInProgress,

    /// Referenced store does not exist
    #[error("Store not found: {id}")]
    StoreNotFound {
        /// The store id that was looked up
        id: i64,
    },

    /// Referenced shopping list does not exist
    #[error("Shopping list not found: {id}")]
    ListNotFound {
        /// The list id that was looked up
        id: i64,
    },

    /// Referenced purchase does not exist
    #[error("Purchase not found: {id}")]
    PurchaseNotFound {
        /// The purchase id that was looked up
        id: i64,
    },

    /// Referenced line item does not exist
    #[error("Item not found: {id}")]
    ItemNotFound {
        /// The item id that was looked up
        id: i64,
    },

    /// Configuration loading or parsing failed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any failure from the storage layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
