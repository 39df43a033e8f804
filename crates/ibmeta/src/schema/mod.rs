//! In-memory schema model and the DDL it renders.
//!
//! - [`Column`]: definition, structural equality, DDL and column mutations
//! - [`DefaultValue`]: typed column defaults and their literal forms
//! - [`Index`]: index definition, creation, activation and rename
//! - [`Constraint`]: primary and foreign keys
//! - [`Table`]: aggregate of the above, full-table DDL and table rename

mod column;
mod constraint;
mod default;
mod index;
mod table;

pub use column::Column;
pub use constraint::{Constraint, ConstraintDefinition, ConstraintKind};
pub use default::{parse_default_source, quote, DefaultValue};
pub use index::{Index, IndexDirection};
pub use table::{RenderScope, Table};

use tracing::debug;

use crate::core::Executor;
use crate::error::Result;

/// Execute one DDL statement, logging it first.
pub(crate) fn run_ddl(exec: &mut dyn Executor, sql: &str) -> Result<()> {
    debug!("Executing: {}", sql);
    exec.execute(sql)
}
