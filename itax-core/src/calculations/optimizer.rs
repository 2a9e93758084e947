//! Deduction headroom suggestions.
//!
//! Only the old regime rewards voluntary investments, so headroom is
//! measured and priced against the old-regime schedule. The comparison
//! after filling every suggestion shows whether that is enough to beat
//! the new regime.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ValidationError;
use crate::calculations::comparator::{RegimeComparator, RegimeComparison};
use crate::calculations::common::{capped, non_negative};
use crate::calculations::computation::TaxCalculator;
use crate::models::{DeductionSection, RateSchedule, Regime, TaxInput};
use crate::schedules::RateCatalogue;

/// A deduction bucket with its own statutory limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Section80C,
    NpsAdditional,
    HealthInsuranceSelf,
    HealthInsuranceParents,
}

impl SuggestionKind {
    pub const ALL: [SuggestionKind; 4] = [
        SuggestionKind::Section80C,
        SuggestionKind::NpsAdditional,
        SuggestionKind::HealthInsuranceSelf,
        SuggestionKind::HealthInsuranceParents,
    ];

    pub fn section(self) -> DeductionSection {
        match self {
            SuggestionKind::Section80C => DeductionSection::Section80C,
            SuggestionKind::NpsAdditional => DeductionSection::Section80CCD1B,
            SuggestionKind::HealthInsuranceSelf | SuggestionKind::HealthInsuranceParents => {
                DeductionSection::Section80D
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub section: DeductionSection,
    /// Additional contribution that would still be deductible.
    pub headroom: Decimal,
    /// Old-regime liability reduction from contributing the full headroom.
    pub tax_saving: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub employee_id: String,
    /// Sorted by `tax_saving`, largest first.
    pub suggestions: Vec<Suggestion>,
    /// Old-regime liability as filed.
    pub current_old_regime: Decimal,
    /// Old-regime liability with every suggestion applied.
    pub optimized_old_regime: Decimal,
    /// Both regimes after every suggestion is applied.
    pub comparison: RegimeComparison,
}

impl OptimizationReport {
    pub fn total_saving(&self) -> Decimal {
        self.current_old_regime - self.optimized_old_regime
    }
}

/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::{SuggestionKind, TaxOptimizer};
/// use itax_core::{AssessmentYear, RateCatalogue, Regime, TaxInput};
///
/// let catalogue = RateCatalogue::builtin();
/// let mut input = TaxInput::empty("E-9", AssessmentYear::new(2025), Regime::Old, 35);
/// input.salary.basic = dec!(1000000);
///
/// let report = TaxOptimizer::new(&catalogue).suggest(&input).unwrap();
///
/// assert_eq!(report.suggestions[0].kind, SuggestionKind::Section80C);
/// assert_eq!(report.suggestions[0].headroom, dec!(150000));
/// assert_eq!(report.suggestions[0].tax_saving, dec!(31200));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TaxOptimizer<'a> {
    catalogue: &'a RateCatalogue,
}

impl<'a> TaxOptimizer<'a> {
    pub fn new(catalogue: &'a RateCatalogue) -> Self {
        Self { catalogue }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError`] if the input is invalid or a regime lacks
    /// a schedule for the input's year.
    pub fn suggest(
        &self,
        input: &TaxInput,
    ) -> Result<OptimizationReport, ValidationError> {
        let calculator = TaxCalculator::new(self.catalogue);
        let schedule = self.catalogue.get(input.tax_year, Regime::Old)?;
        let current = calculator
            .calculate_with_regime(input, Regime::Old)?
            .total_tax_liability;

        let mut suggestions = Vec::new();
        let mut optimized = input.clone();

        for kind in SuggestionKind::ALL {
            if !schedule.eligibility.allows(kind.section()) {
                continue;
            }
            let headroom = Self::headroom(kind, schedule, input);
            if headroom <= Decimal::ZERO {
                continue;
            }

            let mut filled = input.clone();
            Self::contribute(&mut filled, kind, headroom);
            Self::contribute(&mut optimized, kind, headroom);

            let liability = calculator
                .calculate_with_regime(&filled, Regime::Old)?
                .total_tax_liability;
            let tax_saving = current - liability;
            if tax_saving <= Decimal::ZERO {
                debug!(?kind, %headroom, "headroom carries no saving");
                continue;
            }

            suggestions.push(Suggestion {
                kind,
                section: kind.section(),
                headroom,
                tax_saving,
            });
        }

        suggestions.sort_by(|a, b| b.tax_saving.cmp(&a.tax_saving));

        let optimized_old_regime = calculator
            .calculate_with_regime(&optimized, Regime::Old)?
            .total_tax_liability;
        let comparison = RegimeComparator::new(self.catalogue).compare(&optimized)?;

        Ok(OptimizationReport {
            employee_id: input.employee_id.clone(),
            suggestions,
            current_old_regime: current,
            optimized_old_regime,
            comparison,
        })
    }

    fn headroom(
        kind: SuggestionKind,
        schedule: &RateSchedule,
        input: &TaxInput,
    ) -> Decimal {
        let limits = &schedule.limits;
        let deductions = &input.deductions;
        let health = &deductions.section_80d;

        let (limit, used) = match kind {
            SuggestionKind::Section80C => (limits.section_80c, deductions.section_80c.total()),
            SuggestionKind::NpsAdditional => {
                (limits.section_80ccd_1b, deductions.nps_additional_80ccd1b)
            }
            SuggestionKind::HealthInsuranceSelf => {
                let limit = if input.age_band().is_senior() {
                    limits.health_insurance_senior
                } else {
                    limits.health_insurance
                };
                let checkup = capped(health.preventive_checkup, limits.preventive_checkup);
                (limit, health.self_family + checkup)
            }
            SuggestionKind::HealthInsuranceParents => {
                let limit = if health.parents_senior {
                    limits.health_insurance_senior
                } else {
                    limits.health_insurance
                };
                (limit, health.parents)
            }
        };

        non_negative(limit - used)
    }

    fn contribute(
        input: &mut TaxInput,
        kind: SuggestionKind,
        amount: Decimal,
    ) {
        let deductions = &mut input.deductions;
        match kind {
            SuggestionKind::Section80C => deductions.section_80c.ppf += amount,
            SuggestionKind::NpsAdditional => deductions.nps_additional_80ccd1b += amount,
            SuggestionKind::HealthInsuranceSelf => deductions.section_80d.self_family += amount,
            SuggestionKind::HealthInsuranceParents => deductions.section_80d.parents += amount,
        }
    }
}
