use crate::utils::error::{DashboardError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Parses a whole number from raw user input.
pub fn parse_int(raw: &str, error_message: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| DashboardError::validation(error_message))
}

/// Parses a decimal number; a decimal comma ("1,7") is accepted.
pub fn parse_float(raw: &str, error_message: &str) -> Result<f64> {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DashboardError::validation(error_message)),
    }
}

pub fn ensure_non_empty(raw: &str, error_message: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::validation(error_message));
    }
    Ok(trimmed.to_string())
}

pub fn ensure_positive<T: PartialOrd + Default>(value: T, error_message: &str) -> Result<T> {
    if value <= T::default() {
        return Err(DashboardError::validation(error_message));
    }
    Ok(value)
}
