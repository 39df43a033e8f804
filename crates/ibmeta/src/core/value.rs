//! SQL values and result rows exchanged with the execution collaborator.
//!
//! The engine binding materializes every result row as a [`Row`] of
//! [`SqlValue`]s. Catalog queries decode those rows positionally into one
//! projection struct per query (see [`FromRow`](super::traits::FromRow)).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{MetaError, Result};

/// SQL value as handed over by the engine binding.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL.
    Null,

    /// Boolean value.
    Bool(bool),

    /// 16-bit signed integer (smallint).
    I16(i16),

    /// 32-bit signed integer (integer).
    I32(i32),

    /// 64-bit signed integer (int64).
    I64(i64),

    /// Floating point (float/double precision).
    F64(f64),

    /// Text data (char, varchar, text blobs).
    Text(String),

    /// Binary data (binary blobs).
    Bytes(Vec<u8>),

    /// Scaled fixed-point value (decimal/numeric).
    Decimal(Decimal),

    /// Date without time component.
    Date(NaiveDate),

    /// Time without date component.
    Time(NaiveTime),

    /// Timestamp without timezone.
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Integer view of any integral value.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::I16(v) => Some(i64::from(*v)),
            SqlValue::I32(v) => Some(i64::from(*v)),
            SqlValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Text view, with trailing blank padding of fixed-length columns removed.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(v) => Some(v.trim_end()),
            _ => None,
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::I16(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::I32(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// One result row, accessed by projected column position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    /// Create a row from its values in projection order.
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    /// Number of projected columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value at `index`.
    pub fn get(&self, index: usize) -> Result<&SqlValue> {
        self.values.get(index).ok_or(MetaError::RowDecode {
            index,
            expected: "a projected column",
        })
    }

    /// Nullable text at `index`, trailing padding removed.
    pub fn text(&self, index: usize) -> Result<Option<String>> {
        match self.get(index)? {
            SqlValue::Null => Ok(None),
            value => value
                .as_text()
                .map(|s| Some(s.to_string()))
                .ok_or(MetaError::RowDecode {
                    index,
                    expected: "text",
                }),
        }
    }

    /// Non-null text at `index`.
    pub fn required_text(&self, index: usize) -> Result<String> {
        self.text(index)?.ok_or(MetaError::RowDecode {
            index,
            expected: "non-null text",
        })
    }

    /// Nullable small integer at `index`.
    pub fn small_int(&self, index: usize) -> Result<Option<i16>> {
        match self.get(index)? {
            SqlValue::Null => Ok(None),
            value => value
                .as_i64()
                .and_then(|v| i16::try_from(v).ok())
                .map(Some)
                .ok_or(MetaError::RowDecode {
                    index,
                    expected: "smallint",
                }),
        }
    }

    /// Non-null small integer at `index`.
    pub fn required_small_int(&self, index: usize) -> Result<i16> {
        self.small_int(index)?.ok_or(MetaError::RowDecode {
            index,
            expected: "non-null smallint",
        })
    }
}

impl From<Vec<SqlValue>> for Row {
    fn from(values: Vec<SqlValue>) -> Self {
        Row::new(values)
    }
}
