mod age_band;
mod assessment_year;
mod breakdown;
mod rate_schedule;
mod regime;
mod section;
mod tax_input;

pub use age_band::{AgeBand, MAX_AGE};
pub use assessment_year::AssessmentYear;
pub use breakdown::{DeductionLine, IncomeSummary, TaxBreakdown};
pub use rate_schedule::{
    AgeSlabs, Eligibility, RateSchedule, RebateRule, SlabTable, StatutoryLimits, SurchargeTier,
    TaxSlab,
};
pub use regime::Regime;
pub use section::DeductionSection;
pub use tax_input::{
    CapitalGains, Deductions, Disability, Donations80G, HouseProperty, MAX_AMOUNT, OtherIncome,
    Perquisites, RetirementBenefits, SalaryIncome, Section80C, Section80D, TaxInput,
};
