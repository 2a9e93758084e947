//! Boundary checks on [`TaxInput`].
//!
//! Serde already rejects unknown fields, malformed years and unknown
//! regimes; what remains are the range checks below.

use rust_decimal::Decimal;

use crate::ValidationError;
use crate::models::{MAX_AGE, MAX_AMOUNT, TaxInput};

impl TaxInput {
    /// Rejects an empty employee id, an age above [`MAX_AGE`] and any
    /// amount that is negative or above [`MAX_AMOUNT`] (reported with its
    /// dotted field path).
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.employee_id.trim().is_empty() {
            return Err(ValidationError::MissingEmployeeId);
        }
        if self.age > MAX_AGE {
            return Err(ValidationError::AgeOutOfRange(self.age));
        }

        for (field, value) in self.amounts() {
            if value < Decimal::ZERO {
                return Err(ValidationError::NegativeAmount {
                    field: field.to_string(),
                    value,
                });
            }
            if value > MAX_AMOUNT {
                return Err(ValidationError::AmountOutOfRange {
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}
