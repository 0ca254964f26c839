//! Request validation helpers.

use crate::analytics::period::{MAX_YEAR, MIN_YEAR};
use crate::error::{AppError, ValidationBuilder};

/// Validation result type
pub type ValidationResult<T> = Result<T, AppError>;

/// Validator builder for multi-field checks
pub struct Validator {
    builder: ValidationBuilder,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            builder: ValidationBuilder::new(),
        }
    }

    fn error(mut self, field: &str, message: &str) -> Self {
        self.builder = self.builder.error(field, message);
        self
    }

    /// Validate an optional number lies in `[min, max]`
    pub fn in_range(self, value: Option<i64>, field: &str, min: i64, max: i64) -> Self {
        match value {
            Some(v) if v < min || v > max => {
                self.error(field, &format!("{} must be between {} and {}", field, min, max))
            }
            _ => self,
        }
    }

    /// Validate the year/month pair of a reporting query
    pub fn period(self, year: Option<i64>, month: Option<i64>) -> Self {
        self.in_range(year, "year", i64::from(MIN_YEAR), i64::from(MAX_YEAR))
            .in_range(month, "month", 1, 12)
    }

    /// Finish validation, returning error if any
    pub fn finish(self) -> ValidationResult<()> {
        match self.builder.build() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
