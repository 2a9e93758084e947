use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AssessmentYear, DeductionSection, Regime};

/// Income by head after head-level exemptions and deductions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSummary {
    /// Salary and perquisites net of HRA exemption and professional tax.
    pub salary: Decimal,
    /// HRA exemption granted.
    pub hra_exemption: Decimal,
    /// Taxable portion of retirement benefits.
    pub retirement_benefits: Decimal,
    /// Exempt portion of retirement benefits.
    pub retirement_exemption: Decimal,
    /// May be negative when a loss is set off against other heads.
    pub house_property: Decimal,
    pub capital_gains: Decimal,
    pub other_sources: Decimal,
}

/// One section's contribution to the deduction total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionLine {
    pub section: DeductionSection,
    /// Raw contribution as claimed.
    pub claimed: Decimal,
    /// Amount allowed after the section cap and eligibility.
    pub allowed: Decimal,
}

/// The derived liability for one [`crate::TaxInput`] under one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub employee_id: String,
    pub tax_year: AssessmentYear,
    pub regime: Regime,
    pub income: IncomeSummary,
    pub gross_total_income: Decimal,
    pub standard_deduction: Decimal,
    pub deductions: Vec<DeductionLine>,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub tax_before_rebate: Decimal,
    pub rebate_87a: Decimal,
    pub tax_after_rebate: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    pub total_tax_liability: Decimal,
}

impl TaxBreakdown {
    /// Allowed amount for a section, zero when it was not claimed.
    pub fn allowed(
        &self,
        section: DeductionSection,
    ) -> Decimal {
        self.deductions
            .iter()
            .find(|line| line.section == section)
            .map_or(Decimal::ZERO, |line| line.allowed)
    }
}
