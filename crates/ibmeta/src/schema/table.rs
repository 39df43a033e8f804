//! Table aggregate: full-table DDL generation and table rename.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::core::identifier::{normalize, validate_table_name};
use crate::core::Executor;
use crate::error::Result;

use super::column::Column;
use super::constraint::{Constraint, ConstraintKind};
use super::index::Index;
use super::run_ddl;

/// Which statements [`Table::render`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderScope {
    /// Table, then indices, then primary keys, then foreign keys.
    All,
    TableOnly,
    Indices,
    PrimaryKeys,
    ForeignKeys,
}

/// Table metadata.
///
/// A table owns its columns, indices and constraints. Children carry the
/// table's name as a plain back-reference, kept in step by [`Table::set_name`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Table name, upper-cased.
    pub name: String,

    /// Column definitions in field position order.
    pub columns: Vec<Column>,

    /// User-defined indices.
    pub indices: Vec<Index>,

    /// Primary and foreign keys.
    pub constraints: Vec<Constraint>,

    /// Whether the children were last replaced from the catalog.
    pub loaded: bool,

    #[serde(skip)]
    catalog: Catalog,
}

impl Table {
    /// Create an empty table model read through a default [`Catalog`].
    pub fn new(name: &str) -> Self {
        Self::with_catalog(name, Catalog::default())
    }

    pub fn with_catalog(name: &str, catalog: Catalog) -> Self {
        Self {
            name: normalize(name),
            columns: Vec::new(),
            indices: Vec::new(),
            constraints: Vec::new(),
            loaded: false,
            catalog,
        }
    }

    pub fn with_column(mut self, mut column: Column) -> Self {
        column.table_name = self.name.clone();
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, mut index: Index) -> Self {
        index.table = self.name.clone();
        self.indices.push(index);
        self
    }

    pub fn with_constraint(mut self, mut constraint: Constraint) -> Self {
        constraint.table = self.name.clone();
        self.constraints.push(constraint);
        self
    }

    /// Rename the model (not the database table) and re-point every child.
    pub fn set_name(&mut self, name: &str) {
        self.name = normalize(name);
        for column in &mut self.columns {
            column.table_name = self.name.clone();
        }
        for index in &mut self.indices {
            index.table = self.name.clone();
        }
        for constraint in &mut self.constraints {
            constraint.table = self.name.clone();
        }
    }

    /// Look up a column by name, ignoring case.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Look up an index by name, ignoring case.
    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indices
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Replace columns, indices and constraints with what the catalog holds.
    ///
    /// Nothing is replaced unless every catalog read succeeds.
    pub fn load(&mut self, exec: &mut dyn Executor) -> Result<()> {
        let columns = self.catalog.ordered_columns(exec, &self.name)?;
        let indices = self.catalog.indices_of(exec, &self.name)?;
        let constraints = self.catalog.constraints_of(exec, &self.name)?;

        debug!(
            "Loaded table {}: {} columns, {} indices, {} constraints",
            self.name,
            columns.len(),
            indices.len(),
            constraints.len()
        );

        self.columns = columns;
        self.indices = indices;
        self.constraints = constraints;
        self.loaded = true;
        Ok(())
    }

    /// DDL statements recreating the parts of the table selected by `scope`.
    pub fn render(&self, scope: RenderScope) -> Result<Vec<String>> {
        let mut statements = Vec::new();
        match scope {
            RenderScope::All => {
                for part in [
                    RenderScope::TableOnly,
                    RenderScope::Indices,
                    RenderScope::PrimaryKeys,
                    RenderScope::ForeignKeys,
                ] {
                    statements.extend(self.render(part)?);
                }
            }
            RenderScope::TableOnly => statements.push(self.render_create_table()?),
            RenderScope::Indices => statements.extend(self.indices.iter().map(Index::render)),
            RenderScope::PrimaryKeys => {
                statements.extend(self.render_constraints(ConstraintKind::PrimaryKey))
            }
            RenderScope::ForeignKeys => {
                statements.extend(self.render_constraints(ConstraintKind::ForeignKey))
            }
        }
        Ok(statements)
    }

    fn render_create_table(&self) -> Result<String> {
        let columns = self
            .columns
            .iter()
            .map(Column::render)
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("CREATE TABLE {} ({})", self.name, columns.join(", ")))
    }

    fn render_constraints(&self, kind: ConstraintKind) -> impl Iterator<Item = String> + '_ {
        self.constraints
            .iter()
            .filter(move |c| c.kind() == kind)
            .map(Constraint::render)
    }

    /// Create the table with its indices and keys.
    pub fn create_table(&self, exec: &mut dyn Executor) -> Result<()> {
        for sql in self.render(RenderScope::All)? {
            run_ddl(exec, &sql)?;
        }
        debug!("Created table {}", self.name);
        Ok(())
    }

    pub fn drop_table(&self, exec: &mut dyn Executor) -> Result<()> {
        run_ddl(exec, &format!("DROP TABLE {}", self.name))
    }

    /// Rename the table by creating a copy under `new_name` and dropping
    /// the original.
    ///
    /// The definition is reloaded from the catalog first. Keys and indices
    /// are recreated on the copy; each index is dropped from the original
    /// before it is recreated, since index names are database-wide. The
    /// model's name is set back to the old name before the original is
    /// dropped, and also when any step fails. Statements already executed
    /// are not undone.
    pub fn rename_table(&mut self, exec: &mut dyn Executor, new_name: &str) -> Result<()> {
        validate_table_name(new_name.trim())?;
        self.load(exec)?;

        let old_name = self.name.clone();
        self.set_name(new_name);
        let renamed = self.name.clone();
        let copied = self.copy_to_current_name(exec, &old_name);
        self.set_name(&old_name);
        copied?;

        self.drop_table(exec)?;
        info!("Renamed table {} to {}", old_name, renamed);
        Ok(())
    }

    fn copy_to_current_name(&self, exec: &mut dyn Executor, old_name: &str) -> Result<()> {
        for sql in self.render(RenderScope::TableOnly)? {
            run_ddl(exec, &sql)?;
        }
        run_ddl(
            exec,
            &format!("INSERT INTO {} SELECT * FROM {}", self.name, old_name),
        )?;

        for sql in self.render(RenderScope::PrimaryKeys)? {
            run_ddl(exec, &sql)?;
        }
        for sql in self.render(RenderScope::ForeignKeys)? {
            run_ddl(exec, &sql)?;
        }

        for index in &self.indices {
            Catalog::remove_index(exec, &index.name)?;
            index.create(exec)?;
            if !index.active {
                run_ddl(exec, &format!("ALTER INDEX {} INACTIVE", index.name))?;
            }
        }
        Ok(())
    }
}
