use crate::utils::error::{FixtureError, Result};
use std::path::{Component, Path};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FixtureError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FixtureError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(FixtureError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FixtureError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }
    Ok(())
}

pub const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

pub fn validate_log_level(field_name: &str, level: &str) -> Result<()> {
    if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        return Err(FixtureError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: level.to_string(),
            reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
        });
    }
    Ok(())
}

/// Asset names are plain file names: they become both a lookup key and a
/// directory suffix, so anything that could escape the scratch directory is refused.
pub fn validate_asset_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| FixtureError::InvalidAssetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.contains('\0') {
        return Err(invalid("name contains null bytes"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name cannot contain path separators"));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid("name must be a single file name")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("cache_dir", "/tmp/rsdroid").is_ok());
        assert!(validate_path("cache_dir", "").is_err());
        assert!(validate_path("cache_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("iterations", 1, 1).is_ok());
        assert!(validate_positive_number("iterations", 0, 1).is_err());
    }

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("log_level", "debug").is_ok());
        assert!(validate_log_level("log_level", "WARN").is_ok());
        assert!(validate_log_level("log_level", "verbose").is_err());
    }

    #[test]
    fn test_validate_asset_name() {
        assert!(validate_asset_name("initial_version_2_12_1.anki2").is_ok());
        assert!(validate_asset_name("").is_err());
        assert!(validate_asset_name("..").is_err());
        assert!(validate_asset_name(".").is_err());
        assert!(validate_asset_name("nested/file.anki2").is_err());
        assert!(validate_asset_name("/etc/passwd").is_err());
    }
}
