//! Column definitions and column-level DDL.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{DdlConfig, TypeDefaults};
use crate::core::identifier::{catalog_literal, validate_identifier};
use crate::core::Executor;
use crate::error::Result;
use crate::typemap::ColumnType;

use super::default::{self, DefaultValue};
use super::run_ddl;

/// A column as recorded in the catalog or as requested by a caller.
///
/// Parameters that do not apply to the type (a length on an INTEGER) are left
/// as `None`. Missing parameters that do apply are filled from
/// [`TypeDefaults`] only when the column is rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Name of the owning table.
    pub table_name: String,

    /// Portable column type.
    pub column_type: ColumnType,

    /// Length in characters for CHAR/VARCHAR.
    pub length: Option<u32>,

    /// Precision for DECIMAL/NUMERIC.
    pub precision: Option<u16>,

    /// Scale for DECIMAL/NUMERIC.
    pub scale: Option<u16>,

    /// BLOB sub type (0 binary, 1 text).
    pub sub_type: Option<i16>,

    /// Whether the column rejects NULL.
    pub not_null: bool,

    /// Default value, if one was recorded or supplied.
    pub default: Option<DefaultValue>,

    /// Fallback parameters used at render time.
    #[serde(default)]
    pub type_defaults: TypeDefaults,
}

/// Structural equality: type, length, precision, scale and sub type.
///
/// Name, nullability and default are ignored so that drift in a column's
/// storage can be detected independently of renames and default changes.
impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.column_type == other.column_type
            && self.length == other.length
            && self.precision == other.precision
            && self.scale == other.scale
            && self.sub_type == other.sub_type
    }
}

impl Eq for Column {}

impl Column {
    /// Create a nullable column with no default and no type parameters.
    pub fn new(name: impl Into<String>, table_name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            column_type,
            length: None,
            precision: None,
            scale: None,
            sub_type: None,
            not_null: false,
            default: None,
            type_defaults: TypeDefaults::default(),
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u16, scale: u16) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn with_sub_type(mut self, sub_type: i16) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    pub fn with_not_null(mut self, not_null: bool) -> Self {
        self.not_null = not_null;
        self
    }

    pub fn with_default(mut self, default: Option<DefaultValue>) -> Self {
        self.default = default;
        self
    }

    pub fn with_type_defaults(mut self, type_defaults: TypeDefaults) -> Self {
        self.type_defaults = type_defaults;
        self
    }

    /// BLOB sub type after applying the configured fallback.
    fn effective_sub_type(&self) -> i16 {
        self.sub_type.unwrap_or(self.type_defaults.blob_sub_type)
    }

    /// Type clause as written in DDL, e.g. `DECIMAL(18,5)` or `BLOB SUB_TYPE 1`.
    pub fn type_syntax(&self) -> String {
        let defaults = &self.type_defaults;
        match self.column_type {
            t if t.is_fixed_point() => format!(
                "{}({},{})",
                self.column_type.keyword(),
                self.precision.unwrap_or(defaults.precision),
                self.scale.unwrap_or(defaults.scale)
            ),
            t if t.is_character() => format!(
                "{}({})",
                self.column_type.keyword(),
                self.length.unwrap_or(defaults.length)
            ),
            ColumnType::Blob => format!("BLOB SUB_TYPE {}", self.effective_sub_type()),
            other => other.keyword().to_string(),
        }
    }

    /// Whether default literals for this column are single-quoted.
    pub fn expects_quoting(&self) -> bool {
        let sub_type = match self.column_type {
            ColumnType::Blob => Some(self.effective_sub_type()),
            _ => self.sub_type,
        };
        default::expects_quoting(self.column_type, sub_type)
    }

    /// Column definition as used in CREATE TABLE and ALTER TABLE ADD.
    pub fn render(&self) -> Result<String> {
        let mut sql = format!("{} {}", self.name, self.type_syntax());
        if let Some(value) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&value.render(self)?);
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        Ok(sql)
    }

    /// Parse a catalog default source into a default for this column.
    pub fn parse_default_source(
        &self,
        source: Option<&str>,
        exec: &mut dyn Executor,
    ) -> Result<Option<DefaultValue>> {
        default::parse_default_source(self, source, exec)
    }

    /// Rename the column in place.
    pub fn rename(&mut self, exec: &mut dyn Executor, new_name: &str) -> Result<()> {
        validate_identifier(new_name)?;
        let sql = format!(
            "ALTER TABLE {} ALTER COLUMN {} TO {}",
            self.table_name, self.name, new_name
        );
        run_ddl(exec, &sql)?;
        self.name = new_name.to_string();
        Ok(())
    }

    /// Add this column to its table.
    pub fn add(&self, exec: &mut dyn Executor) -> Result<()> {
        let sql = format!("ALTER TABLE {} ADD {}", self.table_name, self.render()?);
        run_ddl(exec, &sql)
    }

    /// Drop this column from its table.
    pub fn remove(&self, exec: &mut dyn Executor) -> Result<()> {
        let sql = format!("ALTER TABLE {} DROP {}", self.table_name, self.name);
        run_ddl(exec, &sql)
    }

    /// Change type, nullability and default to match `new`, using the
    /// default shadow column.
    pub fn change_definition(&mut self, exec: &mut dyn Executor, new: &Column) -> Result<()> {
        self.change_definition_with(exec, new, &DdlConfig::default())
    }

    /// Change type, nullability and default to match `new`.
    ///
    /// Statements are issued in this order, each only when needed:
    ///
    /// 1. `ALTER TABLE .. ALTER .. TYPE ..` when the structure differs
    /// 2. a direct patch of the catalog null flag when nullability differs
    /// 3. the shadow-column transfer when the default or the structure differs
    ///
    /// On success this column takes on the new definition; its name and
    /// table are kept.
    pub fn change_definition_with(
        &mut self,
        exec: &mut dyn Executor,
        new: &Column,
        ddl: &DdlConfig,
    ) -> Result<()> {
        let structure_changed = self != new;
        let table = catalog_literal(&self.table_name);
        let field = catalog_literal(&self.name);

        if structure_changed {
            let sql = format!(
                "ALTER TABLE {} ALTER {} TYPE {}",
                self.table_name,
                self.name,
                new.type_syntax()
            );
            run_ddl(exec, &sql)?;
        }

        if self.not_null != new.not_null {
            let flag = if new.not_null { "1" } else { "NULL" };
            let sql = format!(
                "UPDATE RDB$RELATION_FIELDS SET RDB$NULL_FLAG = {} \
                 WHERE RDB$RELATION_NAME = {} AND RDB$FIELD_NAME = {}",
                flag, table, field
            );
            run_ddl(exec, &sql)?;
        }

        if structure_changed || self.default != new.default {
            let default_clause = match &new.default {
                Some(value) => format!("DEFAULT {}", value.render(new)?),
                None => "DEFAULT NULL".to_string(),
            };
            let definition = format!("{} {}", new.type_syntax(), default_clause);
            let shadow = catalog_literal(&ddl.shadow_column);

            with_shadow_column(
                exec,
                &self.table_name,
                &ddl.shadow_column,
                &definition,
                |exec| {
                    let copy_from = |field_name: &str| {
                        format!(
                            "(SELECT {} FROM RDB$RELATION_FIELDS \
                             WHERE RDB$FIELD_NAME = {} AND RDB$RELATION_NAME = {})",
                            field_name, shadow, table
                        )
                    };
                    let sql = format!(
                        "UPDATE RDB$RELATION_FIELDS SET RDB$DEFAULT_SOURCE = {}, \
                         RDB$DEFAULT_VALUE = {} \
                         WHERE RDB$FIELD_NAME = {} AND RDB$RELATION_NAME = {}",
                        copy_from("RDB$DEFAULT_SOURCE"),
                        copy_from("RDB$DEFAULT_VALUE"),
                        field,
                        table
                    );
                    run_ddl(exec, &sql)
                },
            )?;
        }

        self.column_type = new.column_type;
        self.length = new.length;
        self.precision = new.precision;
        self.scale = new.scale;
        self.sub_type = new.sub_type;
        self.not_null = new.not_null;
        self.default = new.default.clone();
        debug!("Changed definition of {}.{}", self.table_name, self.name);
        Ok(())
    }
}

/// Add `shadow` to `table`, run `body`, then drop `shadow` whatever `body`
/// returned.
///
/// An error from `body` takes precedence over an error from the drop.
fn with_shadow_column<F>(
    exec: &mut dyn Executor,
    table: &str,
    shadow: &str,
    definition: &str,
    body: F,
) -> Result<()>
where
    F: FnOnce(&mut dyn Executor) -> Result<()>,
{
    run_ddl(exec, &format!("ALTER TABLE {} ADD {} {}", table, shadow, definition))?;

    let outcome = body(exec);
    let cleanup = run_ddl(exec, &format!("ALTER TABLE {} DROP {}", table, shadow));

    match (outcome, cleanup) {
        (Ok(()), cleanup) => cleanup,
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup_err)) => {
            warn!(
                "Failed to drop shadow column {}.{}: {}",
                table, shadow, cleanup_err
            );
            Err(e)
        }
    }
}
