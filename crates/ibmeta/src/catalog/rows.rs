//! Projections of the catalog queries, one struct per query shape.
//!
//! Each [`FromRow`] implementation reads its columns by position, in the
//! order the matching query in [`super`] projects them.

use crate::core::{FromRow, Row};
use crate::error::Result;

/// A relation name (`RDB$RELATION_NAME`).
#[derive(Debug, Clone, PartialEq)]
pub struct RelationNameRow {
    pub name: String,
}

impl FromRow for RelationNameRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.required_text(0)?,
        })
    }
}

/// One field of a relation joined with its domain.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub field_name: String,
    pub field_type: i16,
    pub field_length: Option<i16>,
    pub precision: Option<i16>,
    /// Scale as a positive digit count (the catalog stores it negated).
    pub scale: Option<i16>,
    pub sub_type: Option<i16>,
    pub default_source: Option<String>,
    pub null_flag: Option<i16>,
    pub character_length: Option<i16>,
}

impl FromRow for FieldRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            field_name: row.required_text(0)?,
            field_type: row.required_small_int(1)?,
            field_length: row.small_int(2)?,
            precision: row.small_int(3)?,
            scale: row.small_int(4)?,
            sub_type: row.small_int(5)?,
            default_source: row.text(6)?,
            null_flag: row.small_int(7)?,
            character_length: row.small_int(8)?,
        })
    }
}

/// An index header from `RDB$INDICES`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRow {
    pub name: String,
    pub unique_flag: Option<i16>,
    pub inactive: Option<i16>,
    pub index_type: Option<i16>,
}

impl FromRow for IndexRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.required_text(0)?,
            unique_flag: row.small_int(1)?,
            inactive: row.small_int(2)?,
            index_type: row.small_int(3)?,
        })
    }
}

/// One index segment (`RDB$INDEX_SEGMENTS.RDB$FIELD_NAME`).
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRow {
    pub field_name: String,
}

impl FromRow for SegmentRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            field_name: row.required_text(0)?,
        })
    }
}

/// A key constraint and its backing index.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintRow {
    pub name: String,
    pub constraint_type: String,
    pub index_name: Option<String>,
}

impl FromRow for ConstraintRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            name: row.required_text(0)?,
            constraint_type: row.required_text(1)?,
            index_name: row.text(2)?,
        })
    }
}

/// The index a foreign key index references (`RDB$FOREIGN_KEY`).
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignIndexRow {
    pub foreign_index: Option<String>,
}

impl FromRow for ForeignIndexRow {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            foreign_index: row.text(0)?,
        })
    }
}
