use thiserror::Error;

/// A construction parameter outside its allowed range.
///
/// Raised only when building tanks, motivators and selectors. Runtime
/// "nothing to do" conditions are ordinary return values, never errors.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} must be in {range}, got {value}")]
pub struct ValidationError {
    pub field: &'static str,
    pub range: String,
    pub value: f64,
}

impl ValidationError {
    pub fn new(field: &'static str, range: impl Into<String>, value: f64) -> Self {
        Self {
            field,
            range: range.into(),
            value,
        }
    }
}

/// `lo <= value <= hi`; NaN never passes.
pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    lo: f64,
    hi: f64,
) -> Result<(), ValidationError> {
    if (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(field, format!("[{lo}, {hi}]"), value))
    }
}

pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new(field, "[0, inf)", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_field_and_range() {
        let err = check_range("target_level", 1.5, 0.0, 1.0).unwrap_err();
        assert_eq!(err.field, "target_level");
        assert_eq!(err.to_string(), "target_level must be in [0, 1], got 1.5");
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(check_range("x", f64::NAN, 0.0, 1.0).is_err());
        assert!(check_non_negative("x", f64::NAN).is_err());
        assert!(check_non_negative("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(check_range("x", 0.0, 0.0, 1.0).is_ok());
        assert!(check_range("x", 1.0, 0.0, 1.0).is_ok());
        assert!(check_non_negative("x", 0.0).is_ok());
        assert!(check_non_negative("x", -0.001).is_err());
    }
}
