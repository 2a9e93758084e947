//! What-if analysis over a base [`TaxInput`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ValidationError;
use crate::calculations::comparator::{RegimeComparator, RegimeComparison};
use crate::models::{DeductionSection, MAX_AMOUNT, Regime, TaxBreakdown, TaxInput};
use crate::schedules::RateCatalogue;

/// A single change applied to a copy of the base input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    /// Adds to `salary.other_allowances`.
    AddSalary { amount: Decimal },
    /// Adds to `other_income.other`.
    AddOtherIncome { amount: Decimal },
    /// Adds a contribution to a section's primary input field.
    AddDeduction {
        section: DeductionSection,
        amount: Decimal,
    },
    SetRegime { regime: Regime },
    SetAge { age: u8 },
}

impl Adjustment {
    /// # Errors
    ///
    /// Amounts outside `0..=MAX_AMOUNT` are rejected, as are sections whose
    /// allowance is derived rather than contributed (80U, 80TTA, 80TTB).
    pub fn apply(
        &self,
        input: &mut TaxInput,
    ) -> Result<(), ValidationError> {
        match *self {
            Adjustment::AddSalary { amount } => add_to(
                &mut input.salary.other_allowances,
                "salary.other_allowances",
                amount,
            ),
            Adjustment::AddOtherIncome { amount } => {
                add_to(&mut input.other_income.other, "other_income.other", amount)
            }
            Adjustment::AddDeduction { section, amount } => {
                let deductions = &mut input.deductions;
                let (field, path) = match section {
                    DeductionSection::Section80C => (
                        &mut deductions.section_80c.ppf,
                        "deductions.section_80c.ppf",
                    ),
                    DeductionSection::Section80CCD1B => (
                        &mut deductions.nps_additional_80ccd1b,
                        "deductions.nps_additional_80ccd1b",
                    ),
                    DeductionSection::Section80CCD2 => (
                        &mut deductions.nps_employer_80ccd2,
                        "deductions.nps_employer_80ccd2",
                    ),
                    DeductionSection::Section80D => (
                        &mut deductions.section_80d.self_family,
                        "deductions.section_80d.self_family",
                    ),
                    DeductionSection::Section80E => (
                        &mut deductions.education_loan_interest_80e,
                        "deductions.education_loan_interest_80e",
                    ),
                    DeductionSection::Section80G => (
                        &mut deductions.donations_80g.full_deduction,
                        "deductions.donations_80g.full_deduction",
                    ),
                    DeductionSection::Section80GG => {
                        (&mut deductions.rent_paid_80gg, "deductions.rent_paid_80gg")
                    }
                    DeductionSection::Section80EEA => (
                        &mut deductions.home_loan_interest_80eea,
                        "deductions.home_loan_interest_80eea",
                    ),
                    DeductionSection::Section80U
                    | DeductionSection::Section80TTA
                    | DeductionSection::Section80TTB => {
                        return Err(ValidationError::UnsupportedAdjustment(section));
                    }
                };
                add_to(field, path, amount)
            }
            Adjustment::SetRegime { regime } => {
                input.regime = regime;
                Ok(())
            }
            Adjustment::SetAge { age } => {
                input.age = age;
                Ok(())
            }
        }
    }
}

/// Adds `amount` to `field`; a sum that leaves `Decimal`'s range is
/// reported against `path` rather than panicking.
fn add_to(
    field: &mut Decimal,
    path: &'static str,
    amount: Decimal,
) -> Result<(), ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount {
            field: "adjustment.amount".to_string(),
            value: amount,
        });
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountOutOfRange {
            field: "adjustment.amount".to_string(),
            value: amount,
        });
    }

    let current = *field;
    *field = current
        .checked_add(amount)
        .ok_or_else(|| ValidationError::AmountOutOfRange {
            field: path.to_string(),
            value: current,
        })?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub adjustments: Vec<Adjustment>,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        adjustments: Vec<Adjustment>,
    ) -> Self {
        Self {
            name: name.into(),
            adjustments,
        }
    }

    /// Returns a copy of `base` with every adjustment applied in order.
    ///
    /// # Errors
    ///
    /// Propagates the first failing [`Adjustment::apply`].
    pub fn apply(
        &self,
        base: &TaxInput,
    ) -> Result<TaxInput, ValidationError> {
        let mut input = base.clone();
        for adjustment in &self.adjustments {
            adjustment.apply(&mut input)?;
        }
        Ok(input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub comparison: RegimeComparison,
    /// The regime on the adjusted input.
    pub selected: Regime,
    /// Change in old-regime liability against the base.
    pub delta_old: Decimal,
    /// Change in new-regime liability against the base.
    pub delta_new: Decimal,
}

impl ScenarioOutcome {
    pub fn selected_breakdown(&self) -> &TaxBreakdown {
        self.comparison.breakdown(self.selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub base: RegimeComparison,
    pub outcomes: Vec<ScenarioOutcome>,
}

/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::{Adjustment, Scenario, ScenarioAnalyzer};
/// use itax_core::{AssessmentYear, RateCatalogue, Regime, TaxInput};
///
/// let catalogue = RateCatalogue::builtin();
/// let mut input = TaxInput::empty("E-3", AssessmentYear::new(2025), Regime::Old, 35);
/// input.salary.basic = dec!(1000000);
///
/// let raise = Scenario::new("raise", vec![Adjustment::AddSalary { amount: dec!(100000) }]);
/// let report = ScenarioAnalyzer::new(&catalogue).analyze(&input, &[raise]).unwrap();
///
/// assert_eq!(report.outcomes[0].delta_old, dec!(26000));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScenarioAnalyzer<'a> {
    comparator: RegimeComparator<'a>,
}

impl<'a> ScenarioAnalyzer<'a> {
    pub fn new(catalogue: &'a RateCatalogue) -> Self {
        Self {
            comparator: RegimeComparator::new(catalogue),
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError`] if the base input, any adjustment, or
    /// any adjusted input is invalid.
    pub fn analyze(
        &self,
        base: &TaxInput,
        scenarios: &[Scenario],
    ) -> Result<ScenarioReport, ValidationError> {
        let base_comparison = self.comparator.compare(base)?;

        let outcomes = scenarios
            .iter()
            .map(|scenario| {
                let input = scenario.apply(base)?;
                let comparison = self.comparator.compare(&input)?;

                let delta_old =
                    comparison.old.total_tax_liability - base_comparison.old.total_tax_liability;
                let delta_new =
                    comparison.new.total_tax_liability - base_comparison.new.total_tax_liability;
                debug!(scenario = %scenario.name, %delta_old, %delta_new, "analysed scenario");

                Ok(ScenarioOutcome {
                    name: scenario.name.clone(),
                    comparison,
                    selected: input.regime,
                    delta_old,
                    delta_new,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(ScenarioReport {
            base: base_comparison,
            outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::AssessmentYear;

    fn base() -> TaxInput {
        let mut input = TaxInput::empty("E1", AssessmentYear::new(2025), Regime::Old, 35);
        input.salary.basic = dec!(1000000);
        input
    }

    fn analyze(adjustments: Vec<Adjustment>) -> Result<ScenarioOutcome, ValidationError> {
        let catalogue = RateCatalogue::builtin();
        let report = ScenarioAnalyzer::new(&catalogue)
            .analyze(&base(), &[Scenario::new("test", adjustments)])?;
        Ok(report.outcomes[0].clone())
    }

    // =========================================================================
    // Adjustments
    // =========================================================================

    #[test]
    fn add_salary_moves_both_regimes() {
        let outcome = analyze(vec![Adjustment::AddSalary {
            amount: dec!(100000),
        }])
        .unwrap();

        assert_eq!(outcome.delta_old, dec!(26000));
        assert_eq!(outcome.delta_new, dec!(11700));
    }

    #[test]
    fn add_deduction_only_moves_old_regime() {
        let outcome = analyze(vec![Adjustment::AddDeduction {
            section: DeductionSection::Section80C,
            amount: dec!(150000),
        }])
        .unwrap();

        assert_eq!(outcome.delta_old, dec!(-31200));
        assert_eq!(outcome.delta_new, dec!(0));
    }

    #[test]
    fn set_age_switches_to_senior_slabs() {
        let outcome = analyze(vec![Adjustment::SetAge { age: 65 }]).unwrap();

        assert_eq!(outcome.delta_old, dec!(-2600));
        assert_eq!(outcome.delta_new, dec!(0));
    }

    #[test]
    fn set_regime_changes_selected_breakdown() {
        let outcome = analyze(vec![Adjustment::SetRegime {
            regime: Regime::New,
        }])
        .unwrap();

        assert_eq!(outcome.selected, Regime::New);
        assert_eq!(outcome.selected_breakdown().regime, Regime::New);
        assert_eq!(outcome.delta_old, dec!(0));
    }

    #[test]
    fn adjustments_apply_in_order() {
        let scenario = Scenario::new(
            "ordered",
            vec![
                Adjustment::SetAge { age: 70 },
                Adjustment::SetAge { age: 82 },
                Adjustment::AddOtherIncome {
                    amount: dec!(5000),
                },
            ],
        );

        let input = scenario.apply(&base()).unwrap();

        assert_eq!(input.age, 82);
        assert_eq!(input.other_income.other, dec!(5000));
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn derived_sections_cannot_be_adjusted() {
        let result = analyze(vec![Adjustment::AddDeduction {
            section: DeductionSection::Section80U,
            amount: dec!(1000),
        }]);

        assert_eq!(
            result,
            Err(ValidationError::UnsupportedAdjustment(
                DeductionSection::Section80U
            ))
        );
    }

    #[test]
    fn negative_adjustment_is_rejected() {
        let result = analyze(vec![Adjustment::AddSalary {
            amount: dec!(-1),
        }]);

        assert_eq!(
            result,
            Err(ValidationError::NegativeAmount {
                field: "adjustment.amount".to_string(),
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn oversized_adjustment_is_rejected() {
        let huge = Decimal::from_scientific("5e28").unwrap();

        let result = analyze(vec![Adjustment::AddOtherIncome { amount: huge }]);

        assert_eq!(
            result,
            Err(ValidationError::AmountOutOfRange {
                field: "adjustment.amount".to_string(),
                value: huge,
            })
        );
    }

    #[test]
    fn adjustments_pushing_a_field_past_the_limit_fail_validation() {
        let raise = Adjustment::AddSalary { amount: MAX_AMOUNT };

        let result = analyze(vec![raise.clone(), raise]);

        assert_eq!(
            result,
            Err(ValidationError::AmountOutOfRange {
                field: "salary.other_allowances".to_string(),
                value: MAX_AMOUNT * dec!(2),
            })
        );
    }

    #[test]
    fn apply_reports_overflowing_sum_instead_of_panicking() {
        let mut input = base();
        input.deductions.education_loan_interest_80e = Decimal::MAX;

        let result = Adjustment::AddDeduction {
            section: DeductionSection::Section80E,
            amount: dec!(1),
        }
        .apply(&mut input);

        assert_eq!(
            result,
            Err(ValidationError::AmountOutOfRange {
                field: "deductions.education_loan_interest_80e".to_string(),
                value: Decimal::MAX,
            })
        );
        assert_eq!(input.deductions.education_loan_interest_80e, Decimal::MAX);
    }

    #[test]
    fn out_of_range_age_fails_validation() {
        let result = analyze(vec![Adjustment::SetAge { age: 130 }]);

        assert_eq!(result, Err(ValidationError::AgeOutOfRange(130)));
    }

    // =========================================================================
    // Serde
    // =========================================================================

    #[test]
    fn adjustment_uses_kind_tag() {
        let json = r#"{"kind": "add_deduction", "section": "80ccd_1b", "amount": "50000"}"#;

        let adjustment: Adjustment = serde_json::from_str(json).unwrap();

        assert_eq!(
            adjustment,
            Adjustment::AddDeduction {
                section: DeductionSection::Section80CCD1B,
                amount: dec!(50000),
            }
        );
    }
}
