//! Primary and foreign key constraints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::Executor;
use crate::error::{MetaError, Result};

use super::run_ddl;

/// Constraint kinds this crate models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
}

impl ConstraintKind {
    /// Keyword as stored in the relation constraints catalog.
    pub fn keyword(self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "PRIMARY KEY",
            ConstraintKind::ForeignKey => "FOREIGN KEY",
        }
    }
}

impl FromStr for ConstraintKind {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "PRIMARY KEY" => Ok(ConstraintKind::PrimaryKey),
            "FOREIGN KEY" => Ok(ConstraintKind::ForeignKey),
            other => Err(MetaError::UnsupportedConstraint(other.to_string())),
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Key columns, plus the referenced side for foreign keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintDefinition {
    PrimaryKey {
        columns: Vec<String>,
    },
    ForeignKey {
        columns: Vec<String>,
        foreign_table: String,
        foreign_columns: Vec<String>,
    },
}

/// A key constraint attached to a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Catalog name; engine-generated names are not reused when recreating.
    pub name: Option<String>,

    /// Name of the table the constraint is attached to.
    pub table: String,

    pub definition: ConstraintDefinition,
}

impl Constraint {
    pub fn primary_key(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: None,
            table: table.into(),
            definition: ConstraintDefinition::PrimaryKey { columns },
        }
    }

    pub fn foreign_key(
        table: impl Into<String>,
        columns: Vec<String>,
        foreign_table: impl Into<String>,
        foreign_columns: Vec<String>,
    ) -> Self {
        Self {
            name: None,
            table: table.into(),
            definition: ConstraintDefinition::ForeignKey {
                columns,
                foreign_table: foreign_table.into(),
                foreign_columns,
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(&self) -> ConstraintKind {
        match self.definition {
            ConstraintDefinition::PrimaryKey { .. } => ConstraintKind::PrimaryKey,
            ConstraintDefinition::ForeignKey { .. } => ConstraintKind::ForeignKey,
        }
    }

    /// Key columns on the owning table.
    pub fn columns(&self) -> &[String] {
        match &self.definition {
            ConstraintDefinition::PrimaryKey { columns } => columns,
            ConstraintDefinition::ForeignKey { columns, .. } => columns,
        }
    }

    /// ALTER TABLE statement adding this constraint.
    pub fn render(&self) -> String {
        match &self.definition {
            ConstraintDefinition::PrimaryKey { columns } => format!(
                "ALTER TABLE {} ADD PRIMARY KEY ({})",
                self.table,
                columns.join(", ")
            ),
            ConstraintDefinition::ForeignKey {
                columns,
                foreign_table,
                foreign_columns,
            } => format!(
                "ALTER TABLE {} ADD FOREIGN KEY ({}) REFERENCES {} ({})",
                self.table,
                columns.join(", "),
                foreign_table,
                foreign_columns.join(", ")
            ),
        }
    }

    pub fn create(&self, exec: &mut dyn Executor) -> Result<()> {
        run_ddl(exec, &self.render())
    }
}
