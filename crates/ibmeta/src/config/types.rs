//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Defaults applied to partially-specified column types at render time.
    #[serde(default)]
    pub types: TypeDefaults,

    /// DDL protocol settings.
    #[serde(default)]
    pub ddl: DdlConfig,
}

/// Fallback type parameters for columns that leave them unset.
///
/// These are applied only when a column is rendered to DDL, never at
/// construction, so partially-specified columns stay comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefaults {
    /// Precision for DECIMAL/NUMERIC (default: 10).
    #[serde(default = "default_precision")]
    pub precision: u16,

    /// Scale for DECIMAL/NUMERIC (default: 2).
    #[serde(default = "default_scale")]
    pub scale: u16,

    /// Length for CHAR/VARCHAR (default: 252).
    #[serde(default = "default_length")]
    pub length: u32,

    /// BLOB sub type when none was recorded (default: 0, binary).
    #[serde(default)]
    pub blob_sub_type: i16,
}

impl Default for TypeDefaults {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            scale: default_scale(),
            length: default_length(),
            blob_sub_type: 0,
        }
    }
}

/// Settings for the multi-statement DDL protocols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdlConfig {
    /// Temporary column used to transfer a new default (default: "IB$$TEMP").
    #[serde(default = "default_shadow_column")]
    pub shadow_column: String,
}

impl Default for DdlConfig {
    fn default() -> Self {
        Self {
            shadow_column: default_shadow_column(),
        }
    }
}

// Default value functions for serde
fn default_precision() -> u16 {
    10
}

fn default_scale() -> u16 {
    2
}

fn default_length() -> u32 {
    252
}

fn default_shadow_column() -> String {
    "IB$$TEMP".to_string()
}
