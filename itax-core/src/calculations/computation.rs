//! End-to-end liability computation.
//!
//! # Pipeline
//!
//! | Step | Value |
//! |------|-------|
//! | 1 | Gross total income (see [`crate::calculations::income`]) |
//! | 2 | Standard deduction, limited to salary and pension income |
//! | 3 | Chapter VI-A deductions, limited to gross total income − standard deduction |
//! | 4 | Taxable income = max(0, step 1 − step 3 − step 2) |
//! | 5 | Tax before rebate from the age band's slab table |
//! | 6 | Section 87A rebate |
//! | 7 | Surcharge on tax after rebate, tiered by gross total income |
//! | 8 | Cess on tax after rebate + surcharge |
//! | 9 | Total liability = step 6 result + step 7 + step 8 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itax_core::calculations::TaxCalculator;
//! use itax_core::{AssessmentYear, RateCatalogue, Regime, TaxInput};
//!
//! let catalogue = RateCatalogue::builtin();
//! let mut input = TaxInput::empty("E-1001", AssessmentYear::new(2025), Regime::New, 34);
//! input.salary.basic = dec!(1275000);
//!
//! let breakdown = TaxCalculator::new(&catalogue).calculate(&input).unwrap();
//!
//! assert_eq!(breakdown.taxable_income, dec!(1200000));
//! assert_eq!(breakdown.tax_before_rebate, dec!(80000.00));
//! assert_eq!(breakdown.total_tax_liability, dec!(83200.00));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::ValidationError;
use crate::calculations::common::non_negative;
use crate::calculations::deductions::{DeductionAggregator, DeductionSummary};
use crate::calculations::income::IncomeCalculator;
use crate::calculations::rebate::rebate_87a;
use crate::calculations::slab::SlabTaxCalculator;
use crate::calculations::{cess, surcharge};
use crate::models::{RateSchedule, Regime, TaxBreakdown, TaxInput};
use crate::schedules::RateCatalogue;

/// Computes [`TaxBreakdown`]s against a [`RateCatalogue`].
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    catalogue: &'a RateCatalogue,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(catalogue: &'a RateCatalogue) -> Self {
        Self { catalogue }
    }

    /// Computes the liability under the regime named on the input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the input fails validation or no
    /// schedule exists for its year and regime.
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> Result<TaxBreakdown, ValidationError> {
        self.calculate_with_regime(input, input.regime)
    }

    /// Computes the liability under `regime`, ignoring `input.regime`.
    ///
    /// # Errors
    ///
    /// Same as [`TaxCalculator::calculate`].
    pub fn calculate_with_regime(
        &self,
        input: &TaxInput,
        regime: Regime,
    ) -> Result<TaxBreakdown, ValidationError> {
        input.validate()?;
        let schedule = self.catalogue.get(input.tax_year, regime)?;
        compute(input, schedule)
    }
}

/// Computes the liability under an explicit schedule.
///
/// The breakdown's regime and year are the schedule's.
///
/// # Errors
///
/// Returns [`ValidationError`] if the input fails validation.
pub fn calculate_with_schedule(
    input: &TaxInput,
    schedule: &RateSchedule,
) -> Result<TaxBreakdown, ValidationError> {
    input.validate()?;
    compute(input, schedule)
}

/// Runs the pipeline on an input that has already been validated.
fn compute(
    input: &TaxInput,
    schedule: &RateSchedule,
) -> Result<TaxBreakdown, ValidationError> {
    let income = IncomeCalculator::new(schedule).calculate(input);
    let gross_total_income = income.gross_total_income;
    let standard_deduction = income.standard_deduction;

    let DeductionSummary { lines, total } = DeductionAggregator::new(schedule).aggregate(input);
    let deduction_room = non_negative(gross_total_income - standard_deduction);
    let total_deductions = if total > deduction_room {
        warn!(
            employee_id = %input.employee_id,
            claimed = %total,
            limit = %deduction_room,
            "deductions exceed income; limiting to income"
        );
        deduction_room
    } else {
        total
    };

    let taxable_income =
        non_negative(gross_total_income - total_deductions - standard_deduction);

    let tax_before_rebate = SlabTaxCalculator::new(schedule.slab_table(input.age_band()))
        .calculate(taxable_income)?;
    let rebate = rebate_87a(taxable_income, tax_before_rebate, schedule.rebate.as_ref());
    let tax_after_rebate = tax_before_rebate - rebate;
    let surcharge = surcharge(gross_total_income, tax_after_rebate, &schedule.surcharge);
    let cess = cess(tax_after_rebate, surcharge, schedule.cess_rate);
    let total_tax_liability = tax_after_rebate + surcharge + cess;

    debug!(
        employee_id = %input.employee_id,
        year = %schedule.assessment_year,
        regime = %schedule.regime,
        %taxable_income,
        %total_tax_liability,
        "computed tax liability"
    );

    Ok(TaxBreakdown {
        employee_id: input.employee_id.clone(),
        tax_year: schedule.assessment_year,
        regime: schedule.regime,
        income: income.summary,
        gross_total_income,
        standard_deduction,
        deductions: lines,
        total_deductions,
        taxable_income,
        tax_before_rebate,
        rebate_87a: rebate,
        tax_after_rebate,
        surcharge,
        cess,
        total_tax_liability,
    })
}
