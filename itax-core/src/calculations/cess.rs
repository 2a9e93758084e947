//! Health and education cess.

use rust_decimal::Decimal;

/// Cess at `rate` on tax plus surcharge. Not rounded, so the result is
/// exactly `rate × (tax + surcharge)`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use itax_core::calculations::cess;
///
/// assert_eq!(cess(dec!(25000), dec!(0), dec!(0.04)), dec!(1000));
/// ```
pub fn cess(
    tax: Decimal,
    surcharge: Decimal,
    rate: Decimal,
) -> Decimal {
    rate * (tax + surcharge)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn cess_on_tax_only() {
        assert_eq!(cess(dec!(25000), dec!(0), dec!(0.04)), dec!(1000));
    }

    #[test]
    fn cess_includes_surcharge() {
        assert_eq!(cess(dec!(1612500), dec!(161250), dec!(0.04)), dec!(70950));
    }

    #[test]
    fn cess_is_exact_for_paise() {
        let result = cess(dec!(1234.57), dec!(123.46), dec!(0.04));

        assert_eq!(result, dec!(54.3212));
    }

    #[test]
    fn cess_of_zero_is_zero() {
        assert_eq!(cess(dec!(0), dec!(0), dec!(0.04)), dec!(0));
    }
}
