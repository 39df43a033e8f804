//! Identifier validation, normalization and literal escaping.
//!
//! Catalog identifiers are stored upper-cased and blank-padded; every lookup
//! against the catalog compares upper-cased names. Identifiers are embedded in
//! catalog queries only as escaped string literals, never spliced raw.
//!
//! DDL emitted by this crate uses unquoted identifiers so the engine applies
//! its own case folding, matching how the catalog stores them.

use crate::error::{MetaError, Result};

/// Maximum identifier length accepted by the engine family.
pub const MAX_IDENTIFIER_LENGTH: usize = 31;

/// Prefix reserved for engine-owned relations, indices and constraints.
pub const SYSTEM_PREFIX: &str = "RDB$";

/// Validate an identifier before it is embedded in SQL.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes or quote characters
/// - Identifiers exceeding [`MAX_IDENTIFIER_LENGTH`]
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MetaError::InvalidIdentifier(
            "identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') || name.contains('\'') || name.contains('"') {
        return Err(MetaError::InvalidIdentifier(format!(
            "identifier contains a forbidden character: {:?}",
            name
        )));
    }

    if name.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(MetaError::InvalidIdentifier(format!(
            "identifier exceeds maximum length of {} characters: {:?}",
            MAX_IDENTIFIER_LENGTH, name
        )));
    }

    Ok(())
}

/// Validate a table name as supplied by a caller.
///
/// Whitespace anywhere in the name is rejected with
/// [`MetaError::InvalidTableName`].
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.chars().any(char::is_whitespace) {
        return Err(MetaError::InvalidTableName(name.to_string()));
    }
    validate_identifier(name)
}

/// Normalize an identifier the way the catalog stores it.
pub fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Render `value` as a single-quoted SQL string literal.
pub fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Literal for comparing against a catalog name column.
pub fn catalog_literal(name: &str) -> String {
    string_literal(&normalize(name))
}
