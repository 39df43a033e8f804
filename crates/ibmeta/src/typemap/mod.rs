//! Type mapping between engine field type codes and portable column types.
//!
//! The catalog records a column's storage as a numeric field type plus a sub
//! type. Fixed-point DECIMAL/NUMERIC columns share storage codes with the
//! integer and double types; the sub type tells them apart:
//!
//! | sub type      | meaning                      |
//! |---------------|------------------------------|
//! | NULL or 0     | plain integer / double       |
//! | 1             | NUMERIC                      |
//! | anything else | DECIMAL                      |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MetaError, Result};

/// Engine field type codes as stored in the field definitions catalog.
pub mod codes {
    pub const SMALLINT: i16 = 7;
    pub const INTEGER: i16 = 8;
    pub const FLOAT: i16 = 10;
    pub const DATE: i16 = 12;
    pub const TIME: i16 = 13;
    pub const CHAR: i16 = 14;
    pub const INT64: i16 = 16;
    pub const BOOLEAN: i16 = 17;
    pub const DOUBLE: i16 = 27;
    pub const TIMESTAMP: i16 = 35;
    pub const VARCHAR: i16 = 37;
    pub const BLOB: i16 = 261;
}

/// BLOB sub type holding text.
pub const BLOB_SUB_TYPE_TEXT: i16 = 1;

/// Portable column type, independent of the engine's storage codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Boolean,
    Blob,
    Char,
    Varchar,
    Date,
    Time,
    Timestamp,
    Integer,
    Smallint,
    Decimal,
    Numeric,
    Double,
    Float,
    /// 64-bit integer; also produced by arithmetic on narrower integers.
    Int64,
}

impl ColumnType {
    /// Keyword used for this type in DDL, without any parameters.
    pub fn keyword(self) -> &'static str {
        match self {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Blob => "BLOB",
            ColumnType::Char => "CHAR",
            ColumnType::Varchar => "VARCHAR",
            ColumnType::Date => "DATE",
            ColumnType::Time => "TIME",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Integer => "INTEGER",
            ColumnType::Smallint => "SMALLINT",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Numeric => "NUMERIC",
            ColumnType::Double => "DOUBLE PRECISION",
            ColumnType::Float => "FLOAT",
            ColumnType::Int64 => "BIGINT",
        }
    }

    /// DECIMAL or NUMERIC.
    pub fn is_fixed_point(self) -> bool {
        matches!(self, ColumnType::Decimal | ColumnType::Numeric)
    }

    /// CHAR or VARCHAR.
    pub fn is_character(self) -> bool {
        matches!(self, ColumnType::Char | ColumnType::Varchar)
    }

    /// DATE, TIME or TIMESTAMP.
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            ColumnType::Date | ColumnType::Time | ColumnType::Timestamp
        )
    }

    /// SMALLINT, INTEGER or INT64.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            ColumnType::Smallint | ColumnType::Integer | ColumnType::Int64
        )
    }

    /// FLOAT or DOUBLE.
    pub fn is_floating(self) -> bool {
        matches!(self, ColumnType::Float | ColumnType::Double)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Map an engine field type and sub type to a portable [`ColumnType`].
///
/// Unknown type codes fail with [`MetaError::UnsupportedType`].
pub fn to_portable_type(type_code: i16, sub_type: Option<i16>) -> Result<ColumnType> {
    let scaled = |plain: ColumnType| match sub_type {
        None | Some(0) => plain,
        Some(1) => ColumnType::Numeric,
        Some(_) => ColumnType::Decimal,
    };

    let column_type = match type_code {
        codes::SMALLINT => scaled(ColumnType::Smallint),
        codes::INTEGER => scaled(ColumnType::Integer),
        codes::INT64 => scaled(ColumnType::Int64),
        codes::DOUBLE => scaled(ColumnType::Double),
        codes::FLOAT => ColumnType::Float,
        codes::BOOLEAN => ColumnType::Boolean,
        codes::BLOB => ColumnType::Blob,
        codes::CHAR => ColumnType::Char,
        codes::VARCHAR => ColumnType::Varchar,
        codes::DATE => ColumnType::Date,
        codes::TIME => ColumnType::Time,
        codes::TIMESTAMP => ColumnType::Timestamp,
        _ => {
            return Err(MetaError::UnsupportedType {
                type_code,
                sub_type,
            })
        }
    };

    Ok(column_type)
}
