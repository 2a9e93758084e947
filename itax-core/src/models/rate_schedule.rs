use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::ValidationError;
use crate::models::{AgeBand, AssessmentYear, DeductionSection, Regime};

/// A contiguous income bracket taxed at a single marginal rate.
///
/// `max_income` of `None` means the bracket is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxSlab {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// An ordered, contiguous, exhaustive list of [`TaxSlab`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlabTable {
    pub slabs: Vec<TaxSlab>,
}

impl SlabTable {
    /// Builds a table and validates it.
    pub fn new(slabs: Vec<TaxSlab>) -> Result<Self, ValidationError> {
        let table = Self { slabs };
        table.validate()?;
        Ok(table)
    }

    /// Checks that the slabs start at zero, are contiguous, end with an
    /// unbounded slab and carry rates within `[0, 1]`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |reason: String| Err(ValidationError::InvalidSlabTable(reason));

        let Some(first) = self.slabs.first() else {
            return invalid("no slabs".to_string());
        };
        if first.min_income != Decimal::ZERO {
            return invalid(format!("first slab starts at {}, not 0", first.min_income));
        }

        let last_index = self.slabs.len() - 1;
        for (index, slab) in self.slabs.iter().enumerate() {
            if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
                return invalid(format!("rate {} is outside [0, 1]", slab.rate));
            }

            match slab.max_income {
                None if index != last_index => {
                    return invalid(format!(
                        "slab starting at {} is unbounded but is not the last slab",
                        slab.min_income
                    ));
                }
                None => {}
                Some(max) if max <= slab.min_income => {
                    return invalid(format!(
                        "slab upper bound {max} is not above its lower bound {}",
                        slab.min_income
                    ));
                }
                Some(max) => match self.slabs.get(index + 1) {
                    Some(next) if next.min_income != max => {
                        return invalid(format!(
                            "gap or overlap between {max} and {}",
                            next.min_income
                        ));
                    }
                    Some(_) => {}
                    None => return invalid(format!("last slab ends at {max}")),
                },
            }
        }

        Ok(())
    }
}

/// Slab tables by age band.
///
/// Bands without their own table fall back to `below_sixty`, which is how
/// the new regime (one table for all ages) is expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgeSlabs {
    pub below_sixty: SlabTable,
    #[serde(default)]
    pub senior: Option<SlabTable>,
    #[serde(default)]
    pub super_senior: Option<SlabTable>,
}

impl AgeSlabs {
    pub fn uniform(table: SlabTable) -> Self {
        Self {
            below_sixty: table,
            senior: None,
            super_senior: None,
        }
    }

    pub fn for_band(
        &self,
        band: AgeBand,
    ) -> &SlabTable {
        match band {
            AgeBand::BelowSixty => &self.below_sixty,
            AgeBand::Senior => self.senior.as_ref().unwrap_or(&self.below_sixty),
            AgeBand::SuperSenior => self.super_senior.as_ref().unwrap_or(&self.below_sixty),
        }
    }

    /// Replaces the table for a band.
    pub fn set(
        &mut self,
        band: AgeBand,
        table: SlabTable,
    ) {
        match band {
            AgeBand::BelowSixty => self.below_sixty = table,
            AgeBand::Senior => self.senior = Some(table),
            AgeBand::SuperSenior => self.super_senior = Some(table),
        }
    }

    fn tables(&self) -> impl Iterator<Item = &SlabTable> {
        std::iter::once(&self.below_sixty)
            .chain(self.senior.as_ref())
            .chain(self.super_senior.as_ref())
    }
}

/// Surcharge rate that applies once gross total income exceeds `threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurchargeTier {
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Section 87A rebate parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RebateRule {
    /// Taxable income at or below which the rebate applies in full.
    pub income_threshold: Decimal,
    pub max_rebate: Decimal,
    /// Caps tax just above the threshold at the income in excess of it.
    #[serde(default)]
    pub marginal_relief: bool,
}

/// Statutory caps and exemption limits for one schedule.
///
/// The defaults are the limits in force for AY 2024-25 through 2026-27.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatutoryLimits {
    pub section_80c: Decimal,
    pub section_80ccd_1b: Decimal,
    /// Employer NPS cap as a fraction of basic + DA.
    pub employer_nps_rate: Decimal,
    pub government_employer_nps_rate: Decimal,
    pub health_insurance: Decimal,
    pub health_insurance_senior: Decimal,
    pub preventive_checkup: Decimal,
    pub savings_interest_80tta: Decimal,
    pub deposit_interest_80ttb: Decimal,
    pub rent_paid_80gg: Decimal,
    pub disability_80u: Decimal,
    pub severe_disability_80u: Decimal,
    pub home_loan_interest_80eea: Decimal,
    pub self_occupied_interest: Decimal,
    pub house_property_loss_set_off: Decimal,
    pub professional_tax: Decimal,
    pub gratuity_exemption: Decimal,
    pub leave_encashment_exemption: Decimal,
}

impl Default for StatutoryLimits {
    fn default() -> Self {
        Self {
            section_80c: dec!(150000),
            section_80ccd_1b: dec!(50000),
            employer_nps_rate: dec!(0.10),
            government_employer_nps_rate: dec!(0.14),
            health_insurance: dec!(25000),
            health_insurance_senior: dec!(50000),
            preventive_checkup: dec!(5000),
            savings_interest_80tta: dec!(10000),
            deposit_interest_80ttb: dec!(50000),
            rent_paid_80gg: dec!(60000),
            disability_80u: dec!(75000),
            severe_disability_80u: dec!(125000),
            home_loan_interest_80eea: dec!(150000),
            self_occupied_interest: dec!(200000),
            house_property_loss_set_off: dec!(200000),
            professional_tax: dec!(2500),
            gratuity_exemption: dec!(2000000),
            leave_encashment_exemption: dec!(2500000),
        }
    }
}

impl StatutoryLimits {
    fn amounts(&self) -> [(&'static str, Decimal); 18] {
        [
            ("section_80c", self.section_80c),
            ("section_80ccd_1b", self.section_80ccd_1b),
            ("employer_nps_rate", self.employer_nps_rate),
            ("government_employer_nps_rate", self.government_employer_nps_rate),
            ("health_insurance", self.health_insurance),
            ("health_insurance_senior", self.health_insurance_senior),
            ("preventive_checkup", self.preventive_checkup),
            ("savings_interest_80tta", self.savings_interest_80tta),
            ("deposit_interest_80ttb", self.deposit_interest_80ttb),
            ("rent_paid_80gg", self.rent_paid_80gg),
            ("disability_80u", self.disability_80u),
            ("severe_disability_80u", self.severe_disability_80u),
            ("home_loan_interest_80eea", self.home_loan_interest_80eea),
            ("self_occupied_interest", self.self_occupied_interest),
            ("house_property_loss_set_off", self.house_property_loss_set_off),
            ("professional_tax", self.professional_tax),
            ("gratuity_exemption", self.gratuity_exemption),
            ("leave_encashment_exemption", self.leave_encashment_exemption),
        ]
    }
}

/// Which deductions and salary/house-property concessions a schedule allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Eligibility {
    pub sections: BTreeSet<DeductionSection>,
    pub hra_exemption: bool,
    pub professional_tax: bool,
    pub self_occupied_interest: bool,
    pub house_property_loss_set_off: bool,
}

impl Eligibility {
    /// Every section and concession.
    pub fn all() -> Self {
        Self {
            sections: DeductionSection::ALL.into_iter().collect(),
            hra_exemption: true,
            professional_tax: true,
            self_occupied_interest: true,
            house_property_loss_set_off: true,
        }
    }

    /// Only the listed sections; no salary or house-property concessions.
    pub fn only(sections: impl IntoIterator<Item = DeductionSection>) -> Self {
        Self {
            sections: sections.into_iter().collect(),
            hra_exemption: false,
            professional_tax: false,
            self_occupied_interest: false,
            house_property_loss_set_off: false,
        }
    }

    pub fn allows(
        &self,
        section: DeductionSection,
    ) -> bool {
        self.sections.contains(&section)
    }
}

/// The complete rate schedule for one assessment year under one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateSchedule {
    pub assessment_year: AssessmentYear,
    pub regime: Regime,
    pub slabs: AgeSlabs,
    pub standard_deduction: Decimal,
    #[serde(default)]
    pub rebate: Option<RebateRule>,
    #[serde(default)]
    pub surcharge: Vec<SurchargeTier>,
    pub cess_rate: Decimal,
    #[serde(default)]
    pub limits: StatutoryLimits,
    pub eligibility: Eligibility,
}

impl RateSchedule {
    /// Validates every slab table, the surcharge tiers and the scalar rates.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for table in self.slabs.tables() {
            table.validate()?;
        }
        crate::calculations::surcharge::validate_tiers(&self.surcharge)?;

        let invalid = |reason: String| ValidationError::InvalidSchedule {
            year: self.assessment_year,
            regime: self.regime,
            reason,
        };

        if self.cess_rate < Decimal::ZERO || self.cess_rate > Decimal::ONE {
            return Err(invalid(format!("cess rate {} is outside [0, 1]", self.cess_rate)));
        }
        if self.standard_deduction < Decimal::ZERO {
            return Err(invalid(format!(
                "standard deduction {} is negative",
                self.standard_deduction
            )));
        }
        if let Some(rebate) = &self.rebate {
            if rebate.income_threshold < Decimal::ZERO || rebate.max_rebate < Decimal::ZERO {
                return Err(invalid("rebate threshold and maximum must be non-negative".to_string()));
            }
        }
        for (name, value) in self.limits.amounts() {
            if value < Decimal::ZERO {
                return Err(invalid(format!("limit {name} is negative ({value})")));
            }
        }
        for (name, rate) in [
            ("employer_nps_rate", self.limits.employer_nps_rate),
            (
                "government_employer_nps_rate",
                self.limits.government_employer_nps_rate,
            ),
        ] {
            if rate > Decimal::ONE {
                return Err(invalid(format!("{name} {rate} exceeds 1")));
            }
        }

        Ok(())
    }

    pub fn slab_table(
        &self,
        band: AgeBand,
    ) -> &SlabTable {
        self.slabs.for_band(band)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn slab(
        min: Decimal,
        max: Option<Decimal>,
        rate: Decimal,
    ) -> TaxSlab {
        TaxSlab {
            min_income: min,
            max_income: max,
            rate,
        }
    }

    fn valid_table() -> SlabTable {
        SlabTable {
            slabs: vec![
                slab(dec!(0), Some(dec!(300000)), dec!(0)),
                slab(dec!(300000), Some(dec!(600000)), dec!(0.05)),
                slab(dec!(600000), None, dec!(0.10)),
            ],
        }
    }

    // =========================================================================
    // SlabTable::validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_contiguous_table() {
        assert_eq!(valid_table().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_table() {
        let result = SlabTable::new(vec![]);

        assert_eq!(
            result,
            Err(ValidationError::InvalidSlabTable("no slabs".to_string()))
        );
    }

    #[test]
    fn validate_rejects_nonzero_start() {
        let table = SlabTable {
            slabs: vec![slab(dec!(100), None, dec!(0.1))],
        };

        assert!(matches!(
            table.validate(),
            Err(ValidationError::InvalidSlabTable(_))
        ));
    }

    #[test]
    fn validate_rejects_gap_between_slabs() {
        let mut table = valid_table();
        table.slabs[1].min_income = dec!(300001);

        assert!(table.validate().is_err());
    }

    #[test]
    fn validate_rejects_bounded_last_slab() {
        let mut table = valid_table();
        table.slabs[2].max_income = Some(dec!(900000));

        assert!(table.validate().is_err());
    }

    #[test]
    fn validate_rejects_unbounded_middle_slab() {
        let mut table = valid_table();
        table.slabs[1].max_income = None;

        assert!(table.validate().is_err());
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut table = valid_table();
        table.slabs[2].rate = dec!(1.5);

        assert!(table.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let table = SlabTable {
            slabs: vec![
                slab(dec!(0), Some(dec!(0)), dec!(0)),
                slab(dec!(0), None, dec!(0.1)),
            ],
        };

        assert!(table.validate().is_err());
    }

    // =========================================================================
    // AgeSlabs tests
    // =========================================================================

    #[test]
    fn age_slabs_fall_back_to_below_sixty() {
        let slabs = AgeSlabs::uniform(valid_table());

        assert_eq!(slabs.for_band(AgeBand::SuperSenior), &valid_table());
    }

    #[test]
    fn age_slabs_set_replaces_band_table() {
        let mut slabs = AgeSlabs::uniform(valid_table());
        let senior = SlabTable {
            slabs: vec![slab(dec!(0), None, dec!(0))],
        };

        slabs.set(AgeBand::Senior, senior.clone());

        assert_eq!(slabs.for_band(AgeBand::Senior), &senior);
        assert_eq!(slabs.for_band(AgeBand::BelowSixty), &valid_table());
    }

    #[test]
    fn eligibility_only_disables_concessions() {
        let eligibility = Eligibility::only([DeductionSection::Section80CCD2]);

        assert!(eligibility.allows(DeductionSection::Section80CCD2));
        assert!(!eligibility.allows(DeductionSection::Section80C));
        assert!(!eligibility.hra_exemption);
    }
}
