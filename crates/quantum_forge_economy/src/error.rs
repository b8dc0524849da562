//! # Economy Error Types
//!
//! Faults raised by the economy core.
//!
//! Running out of resources is NOT an error: `remove`, `try_consume`,
//! `place` and `start` report that through their return value. The variants
//! here mean the caller passed something the fixed catalogs do not know, or
//! broke an argument contract.

use thiserror::Error;

use crate::kind::ResourceKind;

/// Errors that can occur in the economy core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EconomyError {
    /// A resource name does not match any kind in the catalog.
    #[error("unknown resource kind: {0}")]
    UnknownResource(String),

    /// Recipe identifier not present in the catalog.
    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    /// Station identifier does not belong to a live building.
    #[error("station not found: {0}")]
    StationNotFound(u32),

    /// Ledger operations require a strictly positive amount.
    #[error("zero amount for resource {0}")]
    ZeroAmount(ResourceKind),

    /// Elapsed time must be finite and non-negative.
    #[error("invalid elapsed time: {0}")]
    InvalidElapsed(f32),

    /// Puzzle coordinate outside the 3x3 grid.
    #[error("cell ({x}, {y}) is outside the puzzle grid")]
    OutOfBounds {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },

    /// Detected a production cycle in the recipe graph.
    #[error("cycle detected in recipe graph: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    /// Arithmetic overflow in a balance.
    #[error("balance overflow for resource {0}")]
    ArithmeticOverflow(ResourceKind),

    /// Invalid configuration data.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;
