//! Column default values: parsing catalog default sources and rendering DDL literals.
//!
//! The catalog stores a default as the source text of its clause, e.g.
//! `DEFAULT 'fred'` or `DEFAULT 1.345`. Parsing strips the keyword and, for
//! columns whose literals are quoted, exactly one layer of surrounding single
//! quotes; the remainder is coerced into the column's native representation.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::core::identifier::string_literal;
use crate::core::{Executor, SqlValue};
use crate::error::{MetaError, Result};
use crate::typemap::{ColumnType, BLOB_SUB_TYPE_TEXT};

use super::column::Column;

static DEFAULT_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*DEFAULT\s+(.*?)\s*$").expect("valid default regex"));

/// Quoted date/time literals the engine evaluates at insert time.
const TEMPORAL_MNEMONICS: &[&str] = &["NOW", "TODAY", "TOMORROW", "YESTERDAY"];

/// A column default, typed after the column it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    /// Expression evaluated by the engine, rendered verbatim (`CURRENT_DATE`).
    Expression(String),
}

impl DefaultValue {
    /// Literal text before any quoting.
    fn literal_text(&self) -> String {
        match self {
            DefaultValue::Boolean(true) => "TRUE".to_string(),
            DefaultValue::Boolean(false) => "FALSE".to_string(),
            DefaultValue::Integer(v) => v.to_string(),
            DefaultValue::Float(v) => v.to_string(),
            DefaultValue::Decimal(v) => v.to_string(),
            DefaultValue::Text(v) => v.clone(),
            DefaultValue::Date(v) => v.format("%Y-%m-%d").to_string(),
            DefaultValue::Time(v) => v.format("%H:%M:%S%.f").to_string(),
            DefaultValue::Timestamp(v) => v.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
            DefaultValue::Expression(v) => v.clone(),
        }
    }

    /// Render as a DDL literal for `column`.
    pub fn render(&self, column: &Column) -> Result<String> {
        match self {
            DefaultValue::Expression(expr) => Ok(expr.clone()),
            value => quote(&value.literal_text(), column),
        }
    }
}

/// Quote `value` the way literals for `column` are written in DDL.
///
/// Fails with [`MetaError::InvalidDefault`] for binary BLOB columns, which
/// cannot carry a literal default.
pub fn quote(value: &str, column: &Column) -> Result<String> {
    if column.expects_quoting() {
        Ok(string_literal(value))
    } else if column.column_type == ColumnType::Blob {
        Err(MetaError::invalid_default(
            &column.name,
            value,
            "only text BLOBs (sub type 1) accept a default",
        ))
    } else {
        Ok(value.to_string())
    }
}

/// Whether literals for this type and sub type are single-quoted.
pub(crate) fn expects_quoting(column_type: ColumnType, sub_type: Option<i16>) -> bool {
    match column_type {
        ColumnType::Blob => sub_type == Some(BLOB_SUB_TYPE_TEXT),
        t => t.is_character() || t.is_temporal(),
    }
}

/// Parse a catalog default source for `column`.
///
/// Returns `None` when there is no source or the default is `NULL`.
/// Date/time literals that are not engine expressions are canonicalized by
/// asking the engine to cast them, which is the only use of `exec`.
pub fn parse_default_source(
    column: &Column,
    source: Option<&str>,
    exec: &mut dyn Executor,
) -> Result<Option<DefaultValue>> {
    let Some(source) = source else {
        return Ok(None);
    };

    let expr = match DEFAULT_CLAUSE.captures(source) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => source.trim(),
    };
    if expr.is_empty() || expr.eq_ignore_ascii_case("NULL") {
        return Ok(None);
    }

    let invalid = |message: &str| MetaError::invalid_default(&column.name, expr, message);

    let value = match column.column_type {
        ColumnType::Boolean => DefaultValue::Boolean(expr.eq_ignore_ascii_case("true")),
        ColumnType::Blob => parse_text(expr),
        t if t.is_character() => parse_text(expr),
        t if t.is_integral() => expr
            .parse::<i64>()
            .map(DefaultValue::Integer)
            .map_err(|e| invalid(&e.to_string()))?,
        t if t.is_floating() => expr
            .parse::<f64>()
            .map(DefaultValue::Float)
            .map_err(|e| invalid(&e.to_string()))?,
        t if t.is_fixed_point() => Decimal::from_str(expr)
            .map(DefaultValue::Decimal)
            .map_err(|e| invalid(&e.to_string()))?,
        _ => parse_temporal(column, expr, exec)?,
    };

    Ok(Some(value))
}

/// A quoted literal is text; anything else (`USER`, `CURRENT_ROLE`) is an
/// engine expression.
fn parse_text(expr: &str) -> DefaultValue {
    match unquote(expr) {
        Some(text) => DefaultValue::Text(text),
        None => DefaultValue::Expression(expr.to_string()),
    }
}

fn parse_temporal(column: &Column, expr: &str, exec: &mut dyn Executor) -> Result<DefaultValue> {
    if expr.to_ascii_uppercase().starts_with("CURRENT") {
        return Ok(DefaultValue::Expression(expr.to_string()));
    }

    let literal = strip_quotes(expr);
    if TEMPORAL_MNEMONICS
        .iter()
        .any(|m| literal.trim().eq_ignore_ascii_case(m))
    {
        return Ok(DefaultValue::Expression(expr.to_string()));
    }

    match Catalog::cast_value(exec, &column.type_syntax(), &string_literal(&literal))? {
        SqlValue::Date(d) => Ok(DefaultValue::Date(d)),
        SqlValue::Time(t) => Ok(DefaultValue::Time(t)),
        SqlValue::Timestamp(ts) => Ok(DefaultValue::Timestamp(ts)),
        other => Err(MetaError::invalid_default(
            &column.name,
            expr,
            format!("engine cast returned {:?}", other),
        )),
    }
}

/// Drop exactly one leading and one trailing quote, unescaping doubled quotes.
fn unquote(expr: &str) -> Option<String> {
    expr.strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .map(|inner| inner.replace("''", "'"))
}

fn strip_quotes(expr: &str) -> String {
    unquote(expr).unwrap_or_else(|| expr.to_string())
}
