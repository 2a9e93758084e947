//! Progressive slab tax.
//!
//! Each slab taxes the slice of income that falls inside it:
//!
//! ```text
//! tax = Σ rate × (min(income, max_income) − min_income)   for every slab with income > min_income
//! ```
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itax_core::calculations::SlabTaxCalculator;
//! use itax_core::{SlabTable, TaxSlab};
//!
//! let table = SlabTable::new(vec![
//!     TaxSlab { min_income: dec!(0), max_income: Some(dec!(300000)), rate: dec!(0) },
//!     TaxSlab { min_income: dec!(300000), max_income: Some(dec!(600000)), rate: dec!(0.05) },
//!     TaxSlab { min_income: dec!(600000), max_income: Some(dec!(900000)), rate: dec!(0.10) },
//!     TaxSlab { min_income: dec!(900000), max_income: None, rate: dec!(0.15) },
//! ])
//! .unwrap();
//!
//! let tax = SlabTaxCalculator::new(&table).calculate(dec!(700000)).unwrap();
//!
//! assert_eq!(tax, dec!(25000.00));
//! ```

use rust_decimal::Decimal;

use crate::ValidationError;
use crate::calculations::common::round_half_up;
use crate::models::{SlabTable, TaxSlab};

/// Applies a [`SlabTable`] to a taxable income.
#[derive(Debug, Clone, Copy)]
pub struct SlabTaxCalculator<'a> {
    table: &'a SlabTable,
}

impl<'a> SlabTaxCalculator<'a> {
    /// The table is expected to have passed [`SlabTable::validate`].
    pub fn new(table: &'a SlabTable) -> Self {
        Self { table }
    }

    /// Base income tax on `taxable_income`, rounded half-up to paise.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeAmount`] for negative income; the
    /// caller clamps to zero first.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
    ) -> Result<Decimal, ValidationError> {
        if taxable_income < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "taxable_income".to_string(),
                value: taxable_income,
            });
        }

        let tax: Decimal = self
            .table
            .slabs
            .iter()
            .take_while(|slab| taxable_income > slab.min_income)
            .map(|slab| Self::slab_portion(slab, taxable_income))
            .sum();

        Ok(round_half_up(tax))
    }

    /// Tax on the part of `income` that falls inside `slab`.
    fn slab_portion(
        slab: &TaxSlab,
        income: Decimal,
    ) -> Decimal {
        let upper = slab.max_income.map_or(income, |max| income.min(max));
        slab.rate * (upper - slab.min_income)
    }
}
