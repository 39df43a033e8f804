//! Core abstractions shared by the catalog reader and the schema model.
//!
//! - [`traits`]: the execution-collaborator seam and positional row decoding
//! - [`value`]: SQL values and result rows
//! - [`identifier`]: identifier validation, normalization and literal escaping

pub mod identifier;
pub mod traits;
pub mod value;

pub use traits::{query_as, query_scalar, Executor, FromRow};
pub use value::{Row, SqlValue};
