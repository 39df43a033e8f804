//! System catalog introspection.
//!
//! [`Catalog`] reads the engine's metadata relations and assembles the schema
//! model: columns from `RDB$RELATION_FIELDS` joined with `RDB$FIELDS`,
//! indices from `RDB$INDICES` and `RDB$INDEX_SEGMENTS`, and keys from
//! `RDB$RELATION_CONSTRAINTS`. Every name embedded in a query is upper-cased
//! and escaped as a string literal.

pub mod rows;

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::Config;
use crate::core::identifier::{
    catalog_literal, normalize, string_literal, validate_identifier, validate_table_name,
    SYSTEM_PREFIX,
};
use crate::core::{query_as, query_scalar, Executor, SqlValue};
use crate::error::{MetaError, Result};
use crate::schema::{run_ddl, Column, Constraint, ConstraintKind, Index, IndexDirection};
use crate::typemap::{to_portable_type, ColumnType};

use rows::{ConstraintRow, FieldRow, ForeignIndexRow, IndexRow, RelationNameRow, SegmentRow};

const FIELDS_QUERY: &str = "SELECT r.RDB$FIELD_NAME, f.RDB$FIELD_TYPE, f.RDB$FIELD_LENGTH, \
     f.RDB$FIELD_PRECISION, f.RDB$FIELD_SCALE * -1, f.RDB$FIELD_SUB_TYPE, \
     COALESCE(r.RDB$DEFAULT_SOURCE, f.RDB$DEFAULT_SOURCE), \
     COALESCE(r.RDB$NULL_FLAG, f.RDB$NULL_FLAG), f.RDB$CHARACTER_LENGTH \
     FROM RDB$RELATION_FIELDS r JOIN RDB$FIELDS f ON r.RDB$FIELD_SOURCE = f.RDB$FIELD_NAME";

/// How [`Catalog::columns_of`] selects and shapes its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLookup<'a> {
    /// All columns in field position order.
    Ordered,
    /// All columns keyed by name.
    ByName,
    /// The one named column, if it exists.
    Single(&'a str),
}

/// Result of [`Catalog::columns_of`], shaped by the [`ColumnLookup`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSet {
    Ordered(Vec<Column>),
    ByName(BTreeMap<String, Column>),
    Single(Option<Column>),
}

/// Reader for the system catalog.
///
/// Columns built by the catalog carry the configured [`TypeDefaults`](crate::config::TypeDefaults).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    config: Config,
}

impl Catalog {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Names of all user tables.
    pub fn table_names(&self, exec: &mut dyn Executor) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT RDB$RELATION_NAME FROM RDB$RELATIONS \
             WHERE RDB$RELATION_NAME NOT STARTING WITH {} AND RDB$FLAGS = 1",
            string_literal(SYSTEM_PREFIX)
        );
        debug!("Querying: {}", sql);
        let rows: Vec<RelationNameRow> = query_as(exec, &sql)?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    /// Whether a user table called `table` exists.
    pub fn table_exists(&self, exec: &mut dyn Executor, table: &str) -> Result<bool> {
        validate_table_name(table)?;
        let sql = format!(
            "SELECT RDB$RELATION_NAME FROM RDB$RELATIONS WHERE RDB$RELATION_NAME = {}",
            catalog_literal(table)
        );
        debug!("Querying: {}", sql);
        Ok(query_scalar(exec, &sql)?.is_some())
    }

    /// Read the columns of `table`, shaped by `lookup`.
    ///
    /// Fails with [`MetaError::InvalidTableName`] if `table` contains
    /// whitespace, before any query is issued.
    pub fn columns_of(
        &self,
        exec: &mut dyn Executor,
        table: &str,
        lookup: ColumnLookup<'_>,
    ) -> Result<ColumnSet> {
        Ok(match lookup {
            ColumnLookup::Ordered => ColumnSet::Ordered(self.read_columns(exec, table, None)?),
            ColumnLookup::ByName => ColumnSet::ByName(self.column_map(exec, table)?),
            ColumnLookup::Single(name) => ColumnSet::Single(self.column(exec, table, name)?),
        })
    }

    /// Columns of `table` in field position order.
    pub fn ordered_columns(&self, exec: &mut dyn Executor, table: &str) -> Result<Vec<Column>> {
        self.read_columns(exec, table, None)
    }

    /// Columns of `table` keyed by name.
    pub fn column_map(
        &self,
        exec: &mut dyn Executor,
        table: &str,
    ) -> Result<BTreeMap<String, Column>> {
        let columns = self.read_columns(exec, table, None)?;
        Ok(columns.into_iter().map(|c| (c.name.clone(), c)).collect())
    }

    /// A single column of `table`, if it exists.
    pub fn column(
        &self,
        exec: &mut dyn Executor,
        table: &str,
        name: &str,
    ) -> Result<Option<Column>> {
        let columns = self.read_columns(exec, table, Some(name))?;
        Ok(columns.into_iter().next())
    }

    /// Run the field query for `table`, restricted to `field` when given and
    /// ordered by field position otherwise.
    fn read_columns(
        &self,
        exec: &mut dyn Executor,
        table: &str,
        field: Option<&str>,
    ) -> Result<Vec<Column>> {
        validate_table_name(table)?;

        let mut sql = format!(
            "{} WHERE r.RDB$RELATION_NAME = {}",
            FIELDS_QUERY,
            catalog_literal(table)
        );
        match field {
            Some(name) => {
                validate_identifier(name.trim())?;
                sql.push_str(&format!(" AND r.RDB$FIELD_NAME = {}", catalog_literal(name)));
            }
            None => sql.push_str(" ORDER BY r.RDB$FIELD_POSITION"),
        }

        debug!("Querying: {}", sql);
        let fields: Vec<FieldRow> = query_as(exec, &sql)?;

        let mut columns = Vec::with_capacity(fields.len());
        for field in fields {
            columns.push(self.build_column(exec, table, field)?);
        }
        Ok(columns)
    }

    fn build_column(&self, exec: &mut dyn Executor, table: &str, field: FieldRow) -> Result<Column> {
        let column_type = to_portable_type(field.field_type, field.sub_type)?;
        let mut column = Column::new(field.field_name, normalize(table), column_type)
            .with_type_defaults(self.config.types)
            .with_not_null(field.null_flag.is_some_and(|flag| flag != 0));

        if column_type == ColumnType::Blob {
            column.sub_type = field.sub_type;
        } else if column_type.is_character() {
            // Field length is in bytes and depends on the character set.
            column.length = field
                .character_length
                .or(field.field_length)
                .and_then(|l| u32::try_from(l).ok());
        } else if column_type.is_fixed_point() {
            column.precision = field.precision.and_then(|p| u16::try_from(p).ok());
            column.scale = field.scale.and_then(|s| u16::try_from(s).ok());
        }

        let default = column.parse_default_source(field.default_source.as_deref(), exec)?;
        Ok(column.with_default(default))
    }

    /// User-defined indices of `table`, with their segments in order.
    ///
    /// Engine-named indices and indices backing a primary or foreign key are
    /// left out; keys are recreated from [`Catalog::constraints_of`].
    pub fn indices_of(&self, exec: &mut dyn Executor, table: &str) -> Result<Vec<Index>> {
        validate_table_name(table)?;
        let table_name = normalize(table);
        let sql = format!(
            "SELECT i.RDB$INDEX_NAME, i.RDB$UNIQUE_FLAG, i.RDB$INDEX_INACTIVE, i.RDB$INDEX_TYPE \
             FROM RDB$INDICES i WHERE i.RDB$RELATION_NAME = {} \
             AND i.RDB$INDEX_NAME NOT STARTING WITH {} \
             AND NOT EXISTS (SELECT 1 FROM RDB$RELATION_CONSTRAINTS c \
             WHERE c.RDB$INDEX_NAME = i.RDB$INDEX_NAME \
             AND c.RDB$CONSTRAINT_TYPE IN ('PRIMARY KEY', 'FOREIGN KEY'))",
            catalog_literal(table),
            string_literal(SYSTEM_PREFIX)
        );
        debug!("Querying: {}", sql);
        let headers: Vec<IndexRow> = query_as(exec, &sql)?;

        let mut indices = Vec::with_capacity(headers.len());
        for header in headers {
            let columns = self.segments(exec, &header.name)?;
            let direction = header.index_type.map(|t| {
                if t == 1 {
                    IndexDirection::Descending
                } else {
                    IndexDirection::Ascending
                }
            });
            indices.push(
                Index::new(table_name.clone(), header.name, columns)
                    .with_unique(header.unique_flag == Some(1))
                    .with_direction(direction)
                    .with_active(header.inactive != Some(1)),
            );
        }
        Ok(indices)
    }

    /// Primary and foreign keys of `table`.
    pub fn constraints_of(&self, exec: &mut dyn Executor, table: &str) -> Result<Vec<Constraint>> {
        validate_table_name(table)?;
        let table_name = normalize(table);
        let sql = format!(
            "SELECT RDB$CONSTRAINT_NAME, RDB$CONSTRAINT_TYPE, RDB$INDEX_NAME \
             FROM RDB$RELATION_CONSTRAINTS WHERE RDB$RELATION_NAME = {} \
             AND RDB$CONSTRAINT_TYPE IN ('PRIMARY KEY', 'FOREIGN KEY')",
            catalog_literal(table)
        );
        debug!("Querying: {}", sql);
        let rows: Vec<ConstraintRow> = query_as(exec, &sql)?;

        let mut constraints = Vec::with_capacity(rows.len());
        for row in rows {
            let kind: ConstraintKind = row.constraint_type.parse()?;
            let index_name = row.index_name.ok_or(MetaError::RowDecode {
                index: 2,
                expected: "backing index name",
            })?;
            let columns = self.segments(exec, &index_name)?;

            let constraint = match kind {
                ConstraintKind::PrimaryKey => Constraint::primary_key(table_name.clone(), columns),
                ConstraintKind::ForeignKey => {
                    let (foreign_table, foreign_columns) =
                        self.referenced_key(exec, &index_name)?;
                    Constraint::foreign_key(
                        table_name.clone(),
                        columns,
                        foreign_table,
                        foreign_columns,
                    )
                }
            };
            constraints.push(constraint.with_name(row.name));
        }
        Ok(constraints)
    }

    /// Table and columns referenced through the foreign key index `index_name`.
    fn referenced_key(
        &self,
        exec: &mut dyn Executor,
        index_name: &str,
    ) -> Result<(String, Vec<String>)> {
        let sql = format!(
            "SELECT RDB$FOREIGN_KEY FROM RDB$INDICES WHERE RDB$INDEX_NAME = {}",
            catalog_literal(index_name)
        );
        debug!("Querying: {}", sql);
        let foreign_index = query_as::<ForeignIndexRow>(exec, &sql)?
            .into_iter()
            .next()
            .and_then(|r| r.foreign_index)
            .ok_or(MetaError::RowDecode {
                index: 0,
                expected: "referenced index name",
            })?;

        let sql = format!(
            "SELECT RDB$RELATION_NAME FROM RDB$INDICES WHERE RDB$INDEX_NAME = {}",
            catalog_literal(&foreign_index)
        );
        debug!("Querying: {}", sql);
        let foreign_table = query_as::<RelationNameRow>(exec, &sql)?
            .into_iter()
            .next()
            .map(|r| r.name)
            .ok_or(MetaError::RowDecode {
                index: 0,
                expected: "referenced relation name",
            })?;

        let foreign_columns = self.segments(exec, &foreign_index)?;
        Ok((foreign_table, foreign_columns))
    }

    /// Column names of an index in segment order.
    fn segments(&self, exec: &mut dyn Executor, index_name: &str) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT RDB$FIELD_NAME FROM RDB$INDEX_SEGMENTS WHERE RDB$INDEX_NAME = {} \
             ORDER BY RDB$FIELD_POSITION",
            catalog_literal(index_name)
        );
        debug!("Querying: {}", sql);
        let rows: Vec<SegmentRow> = query_as(exec, &sql)?;
        Ok(rows.into_iter().map(|r| r.field_name).collect())
    }

    /// Ask the engine to cast `literal_expression` to `target_type`.
    ///
    /// Returns [`SqlValue::Null`] if the engine produced no row.
    pub fn cast_value(
        exec: &mut dyn Executor,
        target_type: &str,
        literal_expression: &str,
    ) -> Result<SqlValue> {
        let sql = format!(
            "SELECT CAST({} AS {}) FROM RDB$DATABASE",
            literal_expression, target_type
        );
        debug!("Querying: {}", sql);
        Ok(query_scalar(exec, &sql)?.unwrap_or(SqlValue::Null))
    }

    pub fn remove_index(exec: &mut dyn Executor, index_name: &str) -> Result<()> {
        run_ddl(exec, &format!("DROP INDEX {}", index_name))
    }
}
