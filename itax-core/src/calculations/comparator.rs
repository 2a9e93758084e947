//! Old-versus-new regime comparison.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ValidationError;
use crate::calculations::TaxCalculator;
use crate::models::{Regime, TaxBreakdown, TaxInput};
use crate::schedules::RateCatalogue;

/// Both regimes' breakdowns for the same income, and the cheaper one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub old: TaxBreakdown,
    pub new: TaxBreakdown,
    /// The regime with the lower liability; the new regime on a tie.
    pub recommended: Regime,
    /// Absolute difference between the two liabilities.
    pub savings: Decimal,
}

impl RegimeComparison {
    pub fn breakdown(
        &self,
        regime: Regime,
    ) -> &TaxBreakdown {
        match regime {
            Regime::Old => &self.old,
            Regime::New => &self.new,
        }
    }

    pub fn recommended_breakdown(&self) -> &TaxBreakdown {
        self.breakdown(self.recommended)
    }

    /// The lower of the two liabilities.
    pub fn best_liability(&self) -> Decimal {
        self.recommended_breakdown().total_tax_liability
    }
}

/// Runs the same input through both regimes.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::RegimeComparator;
/// use itax_core::{AssessmentYear, RateCatalogue, Regime, TaxInput};
///
/// let catalogue = RateCatalogue::builtin();
/// let mut input = TaxInput::empty("E-7", AssessmentYear::new(2025), Regime::Old, 30);
/// input.salary.basic = dec!(1500000);
///
/// let comparison = RegimeComparator::new(&catalogue).compare(&input).unwrap();
///
/// assert_eq!(comparison.recommended, Regime::New);
/// assert!(comparison.new.total_tax_liability < comparison.old.total_tax_liability);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RegimeComparator<'a> {
    calculator: TaxCalculator<'a>,
}

impl<'a> RegimeComparator<'a> {
    pub fn new(catalogue: &'a RateCatalogue) -> Self {
        Self {
            calculator: TaxCalculator::new(catalogue),
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError`] if the input is invalid or either regime
    /// lacks a schedule for the input's year.
    pub fn compare(
        &self,
        input: &TaxInput,
    ) -> Result<RegimeComparison, ValidationError> {
        let old = self.calculator.calculate_with_regime(input, Regime::Old)?;
        let new = self.calculator.calculate_with_regime(input, Regime::New)?;

        let recommended = if old.total_tax_liability < new.total_tax_liability {
            Regime::Old
        } else {
            Regime::New
        };
        let savings = (old.total_tax_liability - new.total_tax_liability).abs();

        debug!(
            employee_id = %input.employee_id,
            old = %old.total_tax_liability,
            new = %new.total_tax_liability,
            %recommended,
            "compared regimes"
        );

        Ok(RegimeComparison {
            old,
            new,
            recommended,
            savings,
        })
    }
}
