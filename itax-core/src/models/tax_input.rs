use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{AgeBand, AssessmentYear, Regime};

/// Largest amount accepted in any single input field (₹10^15).
///
/// Every head and total is a sum of at most a few dozen fields scaled by
/// rates no greater than one, so inputs within this bound stay far inside
/// `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Everything needed to compute one employee's liability for one
/// assessment year.
///
/// The schema is strict: unknown fields are rejected, and every field of a
/// group that is present must be supplied. A whole group may be omitted,
/// which means the employee has no income or claims of that kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxInput {
    pub employee_id: String,
    pub tax_year: AssessmentYear,
    pub regime: Regime,
    pub age: u8,
    pub government_employee: bool,

    // Income heads
    #[serde(default)]
    pub salary: SalaryIncome,
    #[serde(default)]
    pub perquisites: Perquisites,
    #[serde(default)]
    pub house_property: HouseProperty,
    #[serde(default)]
    pub capital_gains: CapitalGains,
    #[serde(default)]
    pub other_income: OtherIncome,
    #[serde(default)]
    pub retirement_benefits: RetirementBenefits,

    // Chapter VI-A claims
    #[serde(default)]
    pub deductions: Deductions,
}

impl TaxInput {
    /// An input with no income and no claims, useful as a starting point.
    pub fn empty(
        employee_id: impl Into<String>,
        tax_year: AssessmentYear,
        regime: Regime,
        age: u8,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            tax_year,
            regime,
            age,
            government_employee: false,
            salary: SalaryIncome::default(),
            perquisites: Perquisites::default(),
            house_property: HouseProperty::default(),
            capital_gains: CapitalGains::default(),
            other_income: OtherIncome::default(),
            retirement_benefits: RetirementBenefits::default(),
            deductions: Deductions::default(),
        }
    }

    pub fn age_band(&self) -> AgeBand {
        AgeBand::from_age(self.age)
    }

    /// Every monetary field with its dotted path, in declaration order.
    pub fn amounts(&self) -> Vec<(&'static str, Decimal)> {
        let mut amounts = Vec::new();
        amounts.extend(self.salary.amounts());
        amounts.extend(self.perquisites.amounts());
        amounts.extend(self.house_property.amounts());
        amounts.extend(self.capital_gains.amounts());
        amounts.extend(self.other_income.amounts());
        amounts.extend(self.retirement_benefits.amounts());
        amounts.extend(self.deductions.amounts());
        amounts
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SalaryIncome {
    pub basic: Decimal,
    pub dearness_allowance: Decimal,
    pub hra_received: Decimal,
    pub special_allowance: Decimal,
    pub bonus: Decimal,
    pub other_allowances: Decimal,
    /// Annual rent actually paid, used for the HRA exemption.
    pub rent_paid: Decimal,
    /// Whether the rented accommodation is in a metro city (50% vs 40% HRA limb).
    pub metro_city: bool,
    pub professional_tax: Decimal,
}

impl SalaryIncome {
    /// All cash salary components.
    pub fn gross(&self) -> Decimal {
        self.basic
            + self.dearness_allowance
            + self.hra_received
            + self.special_allowance
            + self.bonus
            + self.other_allowances
    }

    /// Basic plus dearness allowance, the base for HRA and employer NPS limits.
    pub fn salary_base(&self) -> Decimal {
        self.basic + self.dearness_allowance
    }

    fn amounts(&self) -> [(&'static str, Decimal); 8] {
        [
            ("salary.basic", self.basic),
            ("salary.dearness_allowance", self.dearness_allowance),
            ("salary.hra_received", self.hra_received),
            ("salary.special_allowance", self.special_allowance),
            ("salary.bonus", self.bonus),
            ("salary.other_allowances", self.other_allowances),
            ("salary.rent_paid", self.rent_paid),
            ("salary.professional_tax", self.professional_tax),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Perquisites {
    pub rent_free_accommodation: Decimal,
    pub motor_car: Decimal,
    pub other: Decimal,
}

impl Perquisites {
    pub fn total(&self) -> Decimal {
        self.rent_free_accommodation + self.motor_car + self.other
    }

    fn amounts(&self) -> [(&'static str, Decimal); 3] {
        [
            ("perquisites.rent_free_accommodation", self.rent_free_accommodation),
            ("perquisites.motor_car", self.motor_car),
            ("perquisites.other", self.other),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HouseProperty {
    /// Interest on a loan for a self-occupied house (section 24(b)).
    pub self_occupied_interest: Decimal,
    /// Gross annual rent of a let-out property.
    pub let_out_rent: Decimal,
    pub let_out_municipal_tax: Decimal,
    pub let_out_interest: Decimal,
}

impl HouseProperty {
    fn amounts(&self) -> [(&'static str, Decimal); 4] {
        [
            ("house_property.self_occupied_interest", self.self_occupied_interest),
            ("house_property.let_out_rent", self.let_out_rent),
            ("house_property.let_out_municipal_tax", self.let_out_municipal_tax),
            ("house_property.let_out_interest", self.let_out_interest),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapitalGains {
    pub short_term: Decimal,
    pub long_term: Decimal,
}

impl CapitalGains {
    pub fn total(&self) -> Decimal {
        self.short_term + self.long_term
    }

    fn amounts(&self) -> [(&'static str, Decimal); 2] {
        [
            ("capital_gains.short_term", self.short_term),
            ("capital_gains.long_term", self.long_term),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtherIncome {
    pub savings_interest: Decimal,
    pub deposit_interest: Decimal,
    pub dividends: Decimal,
    pub family_pension: Decimal,
    pub other: Decimal,
}

impl OtherIncome {
    pub fn total(&self) -> Decimal {
        self.savings_interest + self.deposit_interest + self.dividends + self.family_pension + self.other
    }

    fn amounts(&self) -> [(&'static str, Decimal); 5] {
        [
            ("other_income.savings_interest", self.savings_interest),
            ("other_income.deposit_interest", self.deposit_interest),
            ("other_income.dividends", self.dividends),
            ("other_income.family_pension", self.family_pension),
            ("other_income.other", self.other),
        ]
    }
}

/// Lump sums received on retirement or separation, before exemptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetirementBenefits {
    pub gratuity: Decimal,
    pub leave_encashment: Decimal,
    pub commuted_pension: Decimal,
}

impl RetirementBenefits {
    fn amounts(&self) -> [(&'static str, Decimal); 3] {
        [
            ("retirement_benefits.gratuity", self.gratuity),
            ("retirement_benefits.leave_encashment", self.leave_encashment),
            ("retirement_benefits.commuted_pension", self.commuted_pension),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Deductions {
    #[serde(default)]
    pub section_80c: Section80C,
    pub nps_additional_80ccd1b: Decimal,
    pub nps_employer_80ccd2: Decimal,
    #[serde(default)]
    pub section_80d: Section80D,
    pub education_loan_interest_80e: Decimal,
    #[serde(default)]
    pub donations_80g: Donations80G,
    pub rent_paid_80gg: Decimal,
    #[serde(default)]
    pub disability_80u: Disability,
    pub home_loan_interest_80eea: Decimal,
}

impl Deductions {
    fn amounts(&self) -> Vec<(&'static str, Decimal)> {
        let mut amounts = self.section_80c.amounts().to_vec();
        amounts.extend([
            ("deductions.nps_additional_80ccd1b", self.nps_additional_80ccd1b),
            ("deductions.nps_employer_80ccd2", self.nps_employer_80ccd2),
        ]);
        amounts.extend(self.section_80d.amounts());
        amounts.push((
            "deductions.education_loan_interest_80e",
            self.education_loan_interest_80e,
        ));
        amounts.extend(self.donations_80g.amounts());
        amounts.extend([
            ("deductions.rent_paid_80gg", self.rent_paid_80gg),
            ("deductions.home_loan_interest_80eea", self.home_loan_interest_80eea),
        ]);
        amounts
    }
}

/// Contributions that share the combined 80C/80CCC/80CCD(1) limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section80C {
    pub lic: Decimal,
    pub epf: Decimal,
    pub ppf: Decimal,
    pub elss: Decimal,
    pub nsc: Decimal,
    pub tuition_fees: Decimal,
    pub home_loan_principal: Decimal,
    pub sukanya_samriddhi: Decimal,
    pub tax_saver_fd: Decimal,
    pub pension_80ccc: Decimal,
    pub nps_employee_80ccd1: Decimal,
}

impl Section80C {
    /// Raw contribution before the combined cap.
    pub fn total(&self) -> Decimal {
        self.amounts().iter().map(|(_, amount)| *amount).sum()
    }

    fn amounts(&self) -> [(&'static str, Decimal); 11] {
        [
            ("deductions.section_80c.lic", self.lic),
            ("deductions.section_80c.epf", self.epf),
            ("deductions.section_80c.ppf", self.ppf),
            ("deductions.section_80c.elss", self.elss),
            ("deductions.section_80c.nsc", self.nsc),
            ("deductions.section_80c.tuition_fees", self.tuition_fees),
            ("deductions.section_80c.home_loan_principal", self.home_loan_principal),
            ("deductions.section_80c.sukanya_samriddhi", self.sukanya_samriddhi),
            ("deductions.section_80c.tax_saver_fd", self.tax_saver_fd),
            ("deductions.section_80c.pension_80ccc", self.pension_80ccc),
            ("deductions.section_80c.nps_employee_80ccd1", self.nps_employee_80ccd1),
        ]
    }
}

/// Health insurance premiums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section80D {
    /// Premium for self, spouse and children.
    pub self_family: Decimal,
    /// Preventive health check-up, counted within the self/family limit.
    pub preventive_checkup: Decimal,
    pub parents: Decimal,
    /// Whether either parent is a senior citizen (raises the parents' limit).
    pub parents_senior: bool,
}

impl Section80D {
    fn amounts(&self) -> [(&'static str, Decimal); 3] {
        [
            ("deductions.section_80d.self_family", self.self_family),
            ("deductions.section_80d.preventive_checkup", self.preventive_checkup),
            ("deductions.section_80d.parents", self.parents),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Donations80G {
    /// Donations eligible for a 100% deduction.
    pub full_deduction: Decimal,
    /// Donations eligible for a 50% deduction.
    pub half_deduction: Decimal,
}

impl Donations80G {
    fn amounts(&self) -> [(&'static str, Decimal); 2] {
        [
            ("deductions.donations_80g.full_deduction", self.full_deduction),
            ("deductions.donations_80g.half_deduction", self.half_deduction),
        ]
    }
}

/// Disability status for section 80U.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disability {
    #[default]
    None,
    /// 40% or more.
    Normal,
    /// 80% or more.
    Severe,
}
