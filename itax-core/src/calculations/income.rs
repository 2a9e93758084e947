//! Aggregation of income heads into gross total income.
//!
//! | Head | Treatment |
//! |------|-----------|
//! | Salary | cash components + perquisites − HRA exemption − professional tax |
//! | Retirement | gratuity and leave encashment above their exemption limits (fully exempt for government employees) + commuted pension |
//! | House property | 70% of net annual value of a let-out house − its loan interest − self-occupied interest (capped); a loss is set off up to the limit where allowed |
//! | Capital gains | short + long term, at slab rates |
//! | Other sources | interest, dividends, family pension, other |
//!
//! The HRA exemption, professional tax, self-occupied interest and loss
//! set-off are each gated by the schedule's [`crate::Eligibility`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculations::common::{capped, non_negative, round_half_up};
use crate::models::{IncomeSummary, RateSchedule, SalaryIncome, TaxInput};

/// Share of net annual value left after the 30% standard deduction on a
/// let-out house.
const LET_OUT_TAXABLE_SHARE: Decimal = dec!(0.70);

/// Result of aggregating the income heads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeComputation {
    pub summary: IncomeSummary,
    pub gross_total_income: Decimal,
    /// Standard deduction allowed against salary and pension income.
    pub standard_deduction: Decimal,
}

/// Computes income heads for one schedule.
#[derive(Debug, Clone, Copy)]
pub struct IncomeCalculator<'a> {
    schedule: &'a RateSchedule,
}

impl<'a> IncomeCalculator<'a> {
    pub fn new(schedule: &'a RateSchedule) -> Self {
        Self { schedule }
    }

    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> IncomeComputation {
        let hra_exemption = self.hra_exemption(&input.salary);
        let salary = self.salary_head(input, hra_exemption);
        let (retirement_benefits, retirement_exemption) = self.retirement_benefits(input);
        let house_property = self.house_property(input);
        let capital_gains = input.capital_gains.total();
        let other_sources = input.other_income.total();

        let gross_total_income = non_negative(
            salary + retirement_benefits + house_property + capital_gains + other_sources,
        );
        let standard_deduction = self.standard_deduction(salary + retirement_benefits);

        debug!(
            employee_id = %input.employee_id,
            regime = %self.schedule.regime,
            %gross_total_income,
            %standard_deduction,
            "aggregated income heads"
        );

        IncomeComputation {
            summary: IncomeSummary {
                salary,
                hra_exemption,
                retirement_benefits,
                retirement_exemption,
                house_property,
                capital_gains,
                other_sources,
            },
            gross_total_income,
            standard_deduction,
        }
    }

    /// Least of HRA received, rent paid over 10% of salary, and 50% (metro)
    /// or 40% of salary, where salary is basic + DA.
    fn hra_exemption(
        &self,
        salary: &SalaryIncome,
    ) -> Decimal {
        if !self.schedule.eligibility.hra_exemption || salary.hra_received <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let base = salary.salary_base();
        let rent_over_tenth = salary.rent_paid - base * dec!(0.10);
        let city_share = if salary.metro_city {
            dec!(0.50)
        } else {
            dec!(0.40)
        };

        let exemption = salary
            .hra_received
            .min(rent_over_tenth)
            .min(base * city_share);
        round_half_up(non_negative(exemption))
    }

    fn salary_head(
        &self,
        input: &TaxInput,
        hra_exemption: Decimal,
    ) -> Decimal {
        let professional_tax = if self.schedule.eligibility.professional_tax {
            capped(
                input.salary.professional_tax,
                self.schedule.limits.professional_tax,
            )
        } else {
            Decimal::ZERO
        };

        non_negative(
            input.salary.gross() + input.perquisites.total() - hra_exemption - professional_tax,
        )
    }

    /// Returns `(taxable, exempt)`.
    fn retirement_benefits(
        &self,
        input: &TaxInput,
    ) -> (Decimal, Decimal) {
        let benefits = &input.retirement_benefits;
        let limits = &self.schedule.limits;

        let exempt = if input.government_employee {
            benefits.gratuity + benefits.leave_encashment
        } else {
            capped(benefits.gratuity, limits.gratuity_exemption)
                + capped(benefits.leave_encashment, limits.leave_encashment_exemption)
        };
        let taxable =
            benefits.gratuity + benefits.leave_encashment + benefits.commuted_pension - exempt;

        (non_negative(taxable), exempt)
    }

    fn house_property(
        &self,
        input: &TaxInput,
    ) -> Decimal {
        let property = &input.house_property;
        let eligibility = &self.schedule.eligibility;
        let limits = &self.schedule.limits;

        let net_annual_value = non_negative(property.let_out_rent - property.let_out_municipal_tax);
        let mut income = round_half_up(net_annual_value * LET_OUT_TAXABLE_SHARE)
            - property.let_out_interest;

        if eligibility.self_occupied_interest {
            income -= capped(property.self_occupied_interest, limits.self_occupied_interest);
        }

        if income < Decimal::ZERO {
            income = if eligibility.house_property_loss_set_off {
                income.max(-limits.house_property_loss_set_off)
            } else {
                Decimal::ZERO
            };
        }

        income
    }

    fn standard_deduction(
        &self,
        salary_income: Decimal,
    ) -> Decimal {
        self.schedule.standard_deduction.min(non_negative(salary_income))
    }
}
