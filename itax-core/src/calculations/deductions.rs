//! Chapter VI-A deduction aggregation.
//!
//! Every section is capped on its own with `min(contribution, cap)`; the
//! only cross-section rules are that 80TTA and 80TTB are mutually exclusive
//! by age band and that 80GG is unavailable when HRA is received. Sections
//! the schedule's [`crate::Eligibility`] does not list contribute zero.
//!
//! | Section | Cap |
//! |---------|-----|
//! | 80C / 80CCC / 80CCD(1) | combined `section_80c` |
//! | 80CCD(1B) | `section_80ccd_1b` |
//! | 80CCD(2) | `employer_nps_rate` (or the government rate) × (basic + DA) |
//! | 80D | self/family and parents each `health_insurance`, or `health_insurance_senior` for seniors; check-ups within `preventive_checkup` |
//! | 80E | none |
//! | 80G | 100% and 50% categories |
//! | 80TTA / 80TTB | savings interest below sixty / all deposit interest for seniors |
//! | 80GG | `rent_paid_80gg` |
//! | 80U | flat `disability_80u` or `severe_disability_80u` |
//! | 80EEA | `home_loan_interest_80eea` |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculations::common::{capped, non_negative, round_half_up};
use crate::models::{DeductionLine, DeductionSection, Disability, RateSchedule, TaxInput};

/// Allowed deductions by section plus their sum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeductionSummary {
    pub lines: Vec<DeductionLine>,
    pub total: Decimal,
}

/// Caps and sums deduction claims under one schedule.
#[derive(Debug, Clone, Copy)]
pub struct DeductionAggregator<'a> {
    schedule: &'a RateSchedule,
}

impl<'a> DeductionAggregator<'a> {
    pub fn new(schedule: &'a RateSchedule) -> Self {
        Self { schedule }
    }

    /// Lines are emitted for every section with a non-zero claim, in
    /// [`DeductionSection::ALL`] order.
    pub fn aggregate(
        &self,
        input: &TaxInput,
    ) -> DeductionSummary {
        let eligibility = &self.schedule.eligibility;

        let lines: Vec<DeductionLine> = DeductionSection::ALL
            .into_iter()
            .map(|section| {
                let (claimed, capped_amount) = self.section_amounts(section, input);
                let allowed = if eligibility.allows(section) {
                    capped_amount
                } else {
                    Decimal::ZERO
                };
                if allowed < claimed {
                    debug!(
                        employee_id = %input.employee_id,
                        %section,
                        %claimed,
                        %allowed,
                        eligible = eligibility.allows(section),
                        "deduction limited"
                    );
                }
                DeductionLine {
                    section,
                    claimed,
                    allowed,
                }
            })
            .filter(|line| line.claimed > Decimal::ZERO)
            .collect();

        let total = lines.iter().map(|line| line.allowed).sum();

        DeductionSummary { lines, total }
    }

    /// Raw claim and capped amount for a section, before eligibility.
    fn section_amounts(
        &self,
        section: DeductionSection,
        input: &TaxInput,
    ) -> (Decimal, Decimal) {
        let limits = &self.schedule.limits;
        let deductions = &input.deductions;
        let senior = input.age_band().is_senior();

        match section {
            DeductionSection::Section80C => {
                let claimed = deductions.section_80c.total();
                (claimed, capped(claimed, limits.section_80c))
            }
            DeductionSection::Section80CCD1B => {
                let claimed = deductions.nps_additional_80ccd1b;
                (claimed, capped(claimed, limits.section_80ccd_1b))
            }
            DeductionSection::Section80CCD2 => {
                let claimed = deductions.nps_employer_80ccd2;
                (claimed, capped(claimed, self.employer_nps_cap(input)))
            }
            DeductionSection::Section80D => {
                let health = &deductions.section_80d;
                let self_cap = self.health_insurance_cap(senior);
                let parents_cap = self.health_insurance_cap(health.parents_senior);

                let checkup = capped(health.preventive_checkup, limits.preventive_checkup);
                let self_allowed = capped(health.self_family + checkup, self_cap);
                let parents_allowed = capped(health.parents, parents_cap);

                let claimed = health.self_family + health.preventive_checkup + health.parents;
                (claimed, self_allowed + parents_allowed)
            }
            DeductionSection::Section80E => {
                let claimed = deductions.education_loan_interest_80e;
                (claimed, non_negative(claimed))
            }
            DeductionSection::Section80G => {
                let donations = &deductions.donations_80g;
                let claimed = donations.full_deduction + donations.half_deduction;
                let allowed = non_negative(donations.full_deduction)
                    + round_half_up(non_negative(donations.half_deduction) * dec!(0.5));
                (claimed, allowed)
            }
            DeductionSection::Section80TTA if !senior => {
                let claimed = input.other_income.savings_interest;
                (claimed, capped(claimed, limits.savings_interest_80tta))
            }
            DeductionSection::Section80TTB if senior => {
                let claimed = input.other_income.savings_interest + input.other_income.deposit_interest;
                (claimed, capped(claimed, limits.deposit_interest_80ttb))
            }
            DeductionSection::Section80TTA | DeductionSection::Section80TTB => {
                (Decimal::ZERO, Decimal::ZERO)
            }
            DeductionSection::Section80GG => {
                let claimed = deductions.rent_paid_80gg;
                if input.salary.hra_received > Decimal::ZERO {
                    (claimed, Decimal::ZERO)
                } else {
                    (claimed, capped(claimed, limits.rent_paid_80gg))
                }
            }
            DeductionSection::Section80U => {
                let amount = match deductions.disability_80u {
                    Disability::None => Decimal::ZERO,
                    Disability::Normal => limits.disability_80u,
                    Disability::Severe => limits.severe_disability_80u,
                };
                (amount, amount)
            }
            DeductionSection::Section80EEA => {
                let claimed = deductions.home_loan_interest_80eea;
                (claimed, capped(claimed, limits.home_loan_interest_80eea))
            }
        }
    }

    fn employer_nps_cap(
        &self,
        input: &TaxInput,
    ) -> Decimal {
        let limits = &self.schedule.limits;
        let rate = if input.government_employee {
            limits.government_employer_nps_rate
        } else {
            limits.employer_nps_rate
        };
        round_half_up(input.salary.salary_base() * rate)
    }

    fn health_insurance_cap(
        &self,
        senior: bool,
    ) -> Decimal {
        if senior {
            self.schedule.limits.health_insurance_senior
        } else {
            self.schedule.limits.health_insurance
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::RateCatalogue;
    use crate::models::{AssessmentYear, Regime, Section80C};

    fn schedule(
        year: u16,
        regime: Regime,
    ) -> RateSchedule {
        RateCatalogue::builtin()
            .get(AssessmentYear::new(year), regime)
            .unwrap()
            .clone()
    }

    fn input(age: u8) -> TaxInput {
        TaxInput::empty("E1", AssessmentYear::new(2025), Regime::Old, age)
    }

    fn allowed(
        summary: &DeductionSummary,
        section: DeductionSection,
    ) -> Decimal {
        summary
            .lines
            .iter()
            .find(|line| line.section == section)
            .map_or(Decimal::ZERO, |line| line.allowed)
    }

    // =========================================================================
    // 80C family tests
    // =========================================================================

    #[test]
    fn section_80c_caps_combined_contributions() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.deductions.section_80c = Section80C {
            lic: dec!(80000),
            epf: dec!(60000),
            ppf: dec!(40000),
            ..Section80C::default()
        };

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(
            summary.lines,
            vec![DeductionLine {
                section: DeductionSection::Section80C,
                claimed: dec!(180000),
                allowed: dec!(150000),
            }]
        );
        assert_eq!(summary.total, dec!(150000));
    }

    #[test]
    fn section_80c_two_lakh_caps_at_one_and_half() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.deductions.section_80c.elss = dec!(200000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(summary.total, dec!(150000));
    }

    #[test]
    fn section_80ccd_1b_is_outside_80c_cap() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.deductions.section_80c.ppf = dec!(150000);
        input.deductions.nps_additional_80ccd1b = dec!(75000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(allowed(&summary, DeductionSection::Section80CCD1B), dec!(50000));
        assert_eq!(summary.total, dec!(200000));
    }

    // =========================================================================
    // 80CCD(2) tests
    // =========================================================================

    #[test]
    fn employer_nps_capped_at_ten_percent_of_salary_base() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.salary.basic = dec!(800000);
        input.salary.dearness_allowance = dec!(200000);
        input.deductions.nps_employer_80ccd2 = dec!(150000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(allowed(&summary, DeductionSection::Section80CCD2), dec!(100000));
    }

    #[test]
    fn employer_nps_government_rate_is_fourteen_percent() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.government_employee = true;
        input.salary.basic = dec!(1000000);
        input.deductions.nps_employer_80ccd2 = dec!(150000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(allowed(&summary, DeductionSection::Section80CCD2), dec!(140000));
    }

    #[test]
    fn new_regime_allows_employer_nps_only() {
        let schedule = schedule(2025, Regime::New);
        let mut input = input(35);
        input.regime = Regime::New;
        input.salary.basic = dec!(1000000);
        input.deductions.section_80c.ppf = dec!(150000);
        input.deductions.section_80d.self_family = dec!(20000);
        input.deductions.nps_employer_80ccd2 = dec!(150000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(allowed(&summary, DeductionSection::Section80C), dec!(0));
        assert_eq!(allowed(&summary, DeductionSection::Section80D), dec!(0));
        // 14% for every employee from AY 2025-26
        assert_eq!(allowed(&summary, DeductionSection::Section80CCD2), dec!(140000));
        assert_eq!(summary.total, dec!(140000));
    }

    #[test]
    fn new_regime_2024_employer_nps_is_ten_percent() {
        let schedule = schedule(2024, Regime::New);
        let mut input = input(35);
        input.salary.basic = dec!(1000000);
        input.deductions.nps_employer_80ccd2 = dec!(150000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(summary.total, dec!(100000));
    }

    #[test]
    fn schedule_without_any_sections_zeroes_everything() {
        let mut schedule = schedule(2025, Regime::New);
        schedule.eligibility.sections.clear();
        let mut input = input(35);
        input.salary.basic = dec!(1000000);
        input.deductions.nps_employer_80ccd2 = dec!(50000);
        input.deductions.section_80c.lic = dec!(10000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(summary.total, dec!(0));
        assert_eq!(summary.lines.len(), 2);
    }

    // =========================================================================
    // 80D tests
    // =========================================================================

    #[test]
    fn health_insurance_caps_by_age_band() {
        let schedule = schedule(2025, Regime::Old);
        let mut young = input(35);
        young.deductions.section_80d.self_family = dec!(40000);
        let mut senior = input(65);
        senior.deductions.section_80d.self_family = dec!(40000);

        let aggregator = DeductionAggregator::new(&schedule);

        assert_eq!(aggregator.aggregate(&young).total, dec!(25000));
        assert_eq!(aggregator.aggregate(&senior).total, dec!(40000));
    }

    #[test]
    fn health_insurance_parents_cap_depends_on_parents_age() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.deductions.section_80d.parents = dec!(60000);
        input.deductions.section_80d.parents_senior = true;

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(summary.total, dec!(50000));
    }

    #[test]
    fn preventive_checkup_counts_within_self_limit() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.deductions.section_80d.self_family = dec!(22000);
        input.deductions.section_80d.preventive_checkup = dec!(8000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        // 22,000 + min(8,000, 5,000) capped at 25,000
        assert_eq!(summary.total, dec!(25000));
        assert_eq!(summary.lines[0].claimed, dec!(30000));
    }

    // =========================================================================
    // interest, rent, disability, donations tests
    // =========================================================================

    #[test]
    fn savings_interest_uses_80tta_below_sixty() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.other_income.savings_interest = dec!(15000);
        input.other_income.deposit_interest = dec!(40000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(allowed(&summary, DeductionSection::Section80TTA), dec!(10000));
        assert_eq!(allowed(&summary, DeductionSection::Section80TTB), dec!(0));
    }

    #[test]
    fn seniors_use_80ttb_on_all_deposit_interest() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(70);
        input.other_income.savings_interest = dec!(15000);
        input.other_income.deposit_interest = dec!(40000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(allowed(&summary, DeductionSection::Section80TTA), dec!(0));
        assert_eq!(allowed(&summary, DeductionSection::Section80TTB), dec!(50000));
    }

    #[test]
    fn rent_deduction_unavailable_with_hra() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.deductions.rent_paid_80gg = dec!(90000);

        let without_hra = DeductionAggregator::new(&schedule).aggregate(&input);
        input.salary.hra_received = dec!(1);
        let with_hra = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(without_hra.total, dec!(60000));
        assert_eq!(with_hra.total, dec!(0));
    }

    #[test]
    fn disability_is_a_flat_amount() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.deductions.disability_80u = Disability::Severe;

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(summary.total, dec!(125000));
    }

    #[test]
    fn donations_half_category_counts_half() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.deductions.donations_80g.full_deduction = dec!(10000);
        input.deductions.donations_80g.half_deduction = dec!(20001);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(summary.total, dec!(20000.50));
    }

    #[test]
    fn education_loan_interest_is_uncapped() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.deductions.education_loan_interest_80e = dec!(400000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        assert_eq!(summary.total, dec!(400000));
    }

    #[test]
    fn no_claims_produce_no_lines() {
        let schedule = schedule(2025, Regime::Old);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input(35));

        assert_eq!(summary, DeductionSummary::default());
    }

    #[test]
    fn allowed_never_exceeds_cap_for_oversized_claims() {
        let schedule = schedule(2025, Regime::Old);
        let mut input = input(35);
        input.salary.basic = dec!(500000);
        input.other_income.savings_interest = dec!(9000000);
        input.deductions.section_80c.lic = dec!(9000000);
        input.deductions.nps_additional_80ccd1b = dec!(9000000);
        input.deductions.nps_employer_80ccd2 = dec!(9000000);
        input.deductions.section_80d.self_family = dec!(9000000);
        input.deductions.section_80d.parents = dec!(9000000);
        input.deductions.home_loan_interest_80eea = dec!(9000000);

        let summary = DeductionAggregator::new(&schedule).aggregate(&input);

        let allowed: Vec<_> = summary
            .lines
            .iter()
            .map(|line| (line.section, line.allowed))
            .collect();
        assert_eq!(
            allowed,
            vec![
                (DeductionSection::Section80C, dec!(150000)),
                (DeductionSection::Section80CCD1B, dec!(50000)),
                (DeductionSection::Section80CCD2, dec!(50000)),
                (DeductionSection::Section80D, dec!(50000)),
                (DeductionSection::Section80TTA, dec!(10000)),
                (DeductionSection::Section80EEA, dec!(150000)),
            ]
        );
    }
}
