use crate::utils::error::{EtlError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Lower-cased extension of `path`, if it has one.
pub fn file_extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn validate_file_extension(field_name: &str, path: &str, allowed: &[&str]) -> Result<()> {
    match file_extension(path) {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                ext,
                allowed.join(", ")
            ),
        }),
        None => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| EtlError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Budgets and bids must read as a non-negative number.
pub fn validate_amount(field_name: &str, value: &str) -> Result<()> {
    match value.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(()),
        _ => Err(EtlError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("'{}' is not a non-negative amount", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "  ").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("keywords", "kw.CSV", &["csv", "json"]).is_ok());
        assert!(validate_file_extension("keywords", "kw.xlsx", &["csv", "json"]).is_err());
        assert!(validate_file_extension("keywords", "keywords", &["csv"]).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("default_budget", "1000").is_ok());
        assert!(validate_amount("default_max_cpc", " 12.5 ").is_ok());
        assert!(validate_amount("default_budget", "-1").is_err());
        assert!(validate_amount("default_budget", "lots").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("kw.csv".to_string());
        assert_eq!(validate_required_field("keywords", &present).unwrap(), "kw.csv");
        let absent: Option<String> = None;
        assert!(matches!(
            validate_required_field("keywords", &absent),
            Err(EtlError::MissingConfigError { .. })
        ));
    }
}
