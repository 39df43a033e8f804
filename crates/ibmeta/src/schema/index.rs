//! Index definitions and index DDL.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::identifier::validate_identifier;
use crate::core::Executor;
use crate::error::Result;

use super::run_ddl;

/// Sort direction recorded for an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexDirection {
    Ascending,
    Descending,
}

impl IndexDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            IndexDirection::Ascending => "ASC",
            IndexDirection::Descending => "DESC",
        }
    }
}

/// Index metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Table the index is defined on.
    pub table: String,

    /// Index name.
    pub name: String,

    /// Whether the index is unique.
    pub unique: bool,

    /// Indexed column names in segment order.
    pub columns: Vec<String>,

    /// Sort direction, if one was recorded.
    pub direction: Option<IndexDirection>,

    /// Whether the index is active.
    pub active: bool,
}

impl Index {
    /// Create an active, non-unique index with no explicit direction.
    pub fn new(table: impl Into<String>, name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            unique: false,
            columns,
            direction: None,
            active: true,
        }
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn with_direction(mut self, direction: Option<IndexDirection>) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// CREATE INDEX statement for this index.
    pub fn render(&self) -> String {
        let mut sql = String::from("CREATE");
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        if let Some(direction) = self.direction {
            sql.push(' ');
            sql.push_str(direction.keyword());
        }
        sql.push_str(&format!(
            " INDEX {} ON {} ({})",
            self.name,
            self.table,
            self.columns.join(", ")
        ));
        sql
    }

    pub fn create(&self, exec: &mut dyn Executor) -> Result<()> {
        run_ddl(exec, &self.render())
    }

    pub fn remove(&self, exec: &mut dyn Executor) -> Result<()> {
        run_ddl(exec, &format!("DROP INDEX {}", self.name))
    }

    /// Rename by creating the index under `new_name` and dropping the old one.
    ///
    /// The in-memory name is restored if either statement fails. When the
    /// drop fails the index exists under both names.
    pub fn rename(&mut self, exec: &mut dyn Executor, new_name: &str) -> Result<()> {
        validate_identifier(new_name)?;
        let old_name = std::mem::replace(&mut self.name, new_name.to_string());

        let result = self.create(exec).and_then(|()| {
            run_ddl(exec, &format!("DROP INDEX {}", old_name))
        });

        match result {
            Ok(()) => {
                debug!("Renamed index {} to {}", old_name, self.name);
                Ok(())
            }
            Err(e) => {
                self.name = old_name;
                Err(e)
            }
        }
    }

    /// Activate or deactivate the index.
    pub fn change_activation(&mut self, exec: &mut dyn Executor, active: bool) -> Result<()> {
        let state = if active { "ACTIVE" } else { "INACTIVE" };
        run_ddl(exec, &format!("ALTER INDEX {} {}", self.name, state))?;
        self.active = active;
        Ok(())
    }
}
