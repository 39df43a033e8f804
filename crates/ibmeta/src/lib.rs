//! # ibmeta
//!
//! Schema metadata and DDL synthesis for InterBase/Firebird databases.
//!
//! This library reads the system catalog into an in-memory schema model and
//! renders that model back into DDL, with support for:
//!
//! - **Type mapping** from engine field type codes to portable column types
//! - **Typed defaults** parsed from and rendered to catalog default sources
//! - **Full-table DDL** for tables, indices, primary and foreign keys
//! - **Column changes** the engine cannot do in one statement, via a shadow column
//! - **Table and index rename** by create, copy and drop
//!
//! Statements go through the [`Executor`] trait, implemented by the caller
//! over an open connection.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ibmeta::{Catalog, Config, RenderScope, Table};
//!
//! let config = Config::load("ibmeta.yaml")?;
//! let mut table = Table::with_catalog("mtest", Catalog::new(config));
//! table.load(&mut conn)?;
//! for sql in table.render(RenderScope::All)? {
//!     println!("{};", sql);
//! }
//! table.rename_table(&mut conn, "mtest_archive")?;
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod schema;
pub mod typemap;


// Re-exports for convenient access
pub use catalog::{Catalog, ColumnLookup, ColumnSet};
pub use config::{Config, DdlConfig, TypeDefaults};
pub use crate::core::{Executor, FromRow, Row, SqlValue};
pub use error::{ErrorKind, MetaError, Result};
pub use schema::{
    Column, Constraint, ConstraintDefinition, ConstraintKind, DefaultValue, Index,
    IndexDirection, RenderScope, Table,
};
pub use typemap::{to_portable_type, ColumnType};
