//! Surcharge on income tax for high incomes.
//!
//! The rate is a straight tier lookup on gross total income: the highest
//! tier whose threshold the income exceeds applies to the whole base tax.
//! Marginal relief at tier boundaries is not applied.

use rust_decimal::Decimal;

use crate::ValidationError;
use crate::calculations::common::round_half_up;
use crate::models::SurchargeTier;

/// Surcharge rate for a gross total income; zero below the first tier.
pub fn surcharge_rate(
    gross_total_income: Decimal,
    tiers: &[SurchargeTier],
) -> Decimal {
    tiers
        .iter()
        .rev()
        .find(|tier| gross_total_income > tier.threshold)
        .map_or(Decimal::ZERO, |tier| tier.rate)
}

/// Surcharge levied on `base_tax`, rounded half-up to paise.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::SurchargeTier;
/// use itax_core::calculations::surcharge;
///
/// let tiers = vec![
///     SurchargeTier { threshold: dec!(5000000), rate: dec!(0.10) },
///     SurchargeTier { threshold: dec!(10000000), rate: dec!(0.15) },
/// ];
///
/// assert_eq!(surcharge(dec!(5000000), dec!(1312500), &tiers), dec!(0));
/// assert_eq!(surcharge(dec!(6000000), dec!(1612500), &tiers), dec!(161250.00));
/// ```
pub fn surcharge(
    gross_total_income: Decimal,
    base_tax: Decimal,
    tiers: &[SurchargeTier],
) -> Decimal {
    if base_tax <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(base_tax * surcharge_rate(gross_total_income, tiers))
}

/// Tiers must have non-negative, strictly ascending thresholds and
/// non-decreasing rates within `[0, 1]`.
pub(crate) fn validate_tiers(tiers: &[SurchargeTier]) -> Result<(), ValidationError> {
    let invalid = |reason: String| Err(ValidationError::InvalidSurcharge(reason));

    for tier in tiers {
        if tier.threshold < Decimal::ZERO {
            return invalid(format!("threshold {} is negative", tier.threshold));
        }
        if tier.rate < Decimal::ZERO || tier.rate > Decimal::ONE {
            return invalid(format!("rate {} is outside [0, 1]", tier.rate));
        }
    }
    for pair in tiers.windows(2) {
        if pair[1].threshold <= pair[0].threshold {
            return invalid(format!(
                "threshold {} does not exceed {}",
                pair[1].threshold, pair[0].threshold
            ));
        }
        if pair[1].rate < pair[0].rate {
            return invalid(format!(
                "rate {} at {} is lower than the previous tier",
                pair[1].rate, pair[1].threshold
            ));
        }
    }

    Ok(())
}
