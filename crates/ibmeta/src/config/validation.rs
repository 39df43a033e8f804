//! Configuration validation.

use super::Config;
use crate::core::identifier::validate_identifier;
use crate::error::{MetaError, Result};

/// Largest precision the engine stores in a 64-bit scaled integer.
const MAX_PRECISION: u16 = 18;

/// Largest CHAR/VARCHAR length in bytes.
const MAX_LENGTH: u32 = 32_765;

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let types = &config.types;

    if types.precision == 0 || types.precision > MAX_PRECISION {
        return Err(MetaError::Config(format!(
            "types.precision must be between 1 and {}, got {}",
            MAX_PRECISION, types.precision
        )));
    }
    if types.scale > types.precision {
        return Err(MetaError::Config(format!(
            "types.scale ({}) cannot exceed types.precision ({})",
            types.scale, types.precision
        )));
    }
    if types.length == 0 || types.length > MAX_LENGTH {
        return Err(MetaError::Config(format!(
            "types.length must be between 1 and {}, got {}",
            MAX_LENGTH, types.length
        )));
    }
    if !matches!(types.blob_sub_type, 0 | 1) {
        return Err(MetaError::Config(format!(
            "types.blob_sub_type must be 0 (binary) or 1 (text), got {}",
            types.blob_sub_type
        )));
    }

    let shadow = &config.ddl.shadow_column;
    if shadow.chars().any(char::is_whitespace) {
        return Err(MetaError::Config(format!(
            "ddl.shadow_column cannot contain whitespace: {:?}",
            shadow
        )));
    }
    validate_identifier(shadow)
        .map_err(|e| MetaError::Config(format!("ddl.shadow_column: {}", e)))?;

    Ok(())
}
