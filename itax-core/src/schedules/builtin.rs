use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    AgeSlabs, AssessmentYear, DeductionSection, Eligibility, RateSchedule, RebateRule, Regime,
    SlabTable, StatutoryLimits, SurchargeTier, TaxSlab,
};

const CESS_RATE: Decimal = dec!(0.04);

/// Builds a table from `(lower bound, rate)` pairs; each slab ends where the
/// next begins and the last is unbounded.
fn table(bounds: &[(Decimal, Decimal)]) -> SlabTable {
    let slabs = bounds
        .iter()
        .enumerate()
        .map(|(index, &(min_income, rate))| TaxSlab {
            min_income,
            max_income: bounds.get(index + 1).map(|&(next, _)| next),
            rate,
        })
        .collect();
    SlabTable { slabs }
}

fn tiers(bounds: &[(Decimal, Decimal)]) -> Vec<SurchargeTier> {
    bounds
        .iter()
        .map(|&(threshold, rate)| SurchargeTier { threshold, rate })
        .collect()
}

fn old_regime(year: u16) -> RateSchedule {
    RateSchedule {
        assessment_year: AssessmentYear::new(year),
        regime: Regime::Old,
        slabs: AgeSlabs {
            below_sixty: table(&[
                (dec!(0), dec!(0)),
                (dec!(250000), dec!(0.05)),
                (dec!(500000), dec!(0.20)),
                (dec!(1000000), dec!(0.30)),
            ]),
            senior: Some(table(&[
                (dec!(0), dec!(0)),
                (dec!(300000), dec!(0.05)),
                (dec!(500000), dec!(0.20)),
                (dec!(1000000), dec!(0.30)),
            ])),
            super_senior: Some(table(&[
                (dec!(0), dec!(0)),
                (dec!(500000), dec!(0.20)),
                (dec!(1000000), dec!(0.30)),
            ])),
        },
        standard_deduction: dec!(50000),
        rebate: Some(RebateRule {
            income_threshold: dec!(500000),
            max_rebate: dec!(12500),
            marginal_relief: false,
        }),
        surcharge: tiers(&[
            (dec!(5000000), dec!(0.10)),
            (dec!(10000000), dec!(0.15)),
            (dec!(20000000), dec!(0.25)),
            (dec!(50000000), dec!(0.37)),
        ]),
        cess_rate: CESS_RATE,
        limits: StatutoryLimits::default(),
        eligibility: Eligibility::all(),
    }
}

/// New-regime surcharge stops at 25%.
fn new_regime_surcharge() -> Vec<SurchargeTier> {
    tiers(&[
        (dec!(5000000), dec!(0.10)),
        (dec!(10000000), dec!(0.15)),
        (dec!(20000000), dec!(0.25)),
    ])
}

fn new_regime(
    year: u16,
    slabs: SlabTable,
    standard_deduction: Decimal,
    rebate: RebateRule,
    employer_nps_rate: Decimal,
) -> RateSchedule {
    RateSchedule {
        assessment_year: AssessmentYear::new(year),
        regime: Regime::New,
        slabs: AgeSlabs::uniform(slabs),
        standard_deduction,
        rebate: Some(rebate),
        surcharge: new_regime_surcharge(),
        cess_rate: CESS_RATE,
        limits: StatutoryLimits {
            employer_nps_rate,
            ..StatutoryLimits::default()
        },
        eligibility: Eligibility::only([DeductionSection::Section80CCD2]),
    }
}

pub(super) fn schedules() -> Vec<RateSchedule> {
    vec![
        old_regime(2024),
        new_regime(
            2024,
            table(&[
                (dec!(0), dec!(0)),
                (dec!(300000), dec!(0.05)),
                (dec!(600000), dec!(0.10)),
                (dec!(900000), dec!(0.15)),
                (dec!(1200000), dec!(0.20)),
                (dec!(1500000), dec!(0.30)),
            ]),
            dec!(50000),
            RebateRule {
                income_threshold: dec!(700000),
                max_rebate: dec!(25000),
                marginal_relief: true,
            },
            dec!(0.10),
        ),
        old_regime(2025),
        new_regime(
            2025,
            table(&[
                (dec!(0), dec!(0)),
                (dec!(300000), dec!(0.05)),
                (dec!(700000), dec!(0.10)),
                (dec!(1000000), dec!(0.15)),
                (dec!(1200000), dec!(0.20)),
                (dec!(1500000), dec!(0.30)),
            ]),
            dec!(75000),
            RebateRule {
                income_threshold: dec!(700000),
                max_rebate: dec!(25000),
                marginal_relief: true,
            },
            dec!(0.14),
        ),
        old_regime(2026),
        new_regime(
            2026,
            table(&[
                (dec!(0), dec!(0)),
                (dec!(400000), dec!(0.05)),
                (dec!(800000), dec!(0.10)),
                (dec!(1200000), dec!(0.15)),
                (dec!(1600000), dec!(0.20)),
                (dec!(2000000), dec!(0.25)),
                (dec!(2400000), dec!(0.30)),
            ]),
            dec!(75000),
            RebateRule {
                income_threshold: dec!(1200000),
                max_rebate: dec!(60000),
                marginal_relief: true,
            },
            dec!(0.14),
        ),
    ]
}
