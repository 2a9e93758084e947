//! Section 87A rebate.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::non_negative;
use crate::models::RebateRule;

/// Rebate against `tax` for a resident with the given taxable income.
///
/// At or below the threshold the rebate is the tax, up to `max_rebate`.
/// Above it, a rule with marginal relief limits the tax payable to the
/// income in excess of the threshold and reports the difference as rebate.
pub fn rebate_87a(
    taxable_income: Decimal,
    tax: Decimal,
    rule: Option<&RebateRule>,
) -> Decimal {
    let Some(rule) = rule else {
        return Decimal::ZERO;
    };
    let tax = non_negative(tax);

    if taxable_income <= rule.income_threshold {
        return tax.min(rule.max_rebate);
    }

    if rule.marginal_relief {
        let excess = taxable_income - rule.income_threshold;
        if tax > excess {
            debug!(%taxable_income, %tax, %excess, "87A marginal relief applied");
            return tax - excess;
        }
    }

    Decimal::ZERO
}
