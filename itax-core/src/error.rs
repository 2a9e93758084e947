use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AssessmentYear, DeductionSection, Regime};

/// The single failure kind of the computation core.
///
/// Every calculator is a total function over well-formed input; anything
/// that is not well-formed is rejected up front with one of these variants
/// and is never retried or patched internally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A monetary field (identified by its dotted path) was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    /// A monetary field exceeded [`crate::MAX_AMOUNT`].
    #[error("{field} must not exceed {max}, got {value}", max = crate::MAX_AMOUNT)]
    AmountOutOfRange { field: String, value: Decimal },

    #[error("age {0} is outside the supported range 0-120")]
    AgeOutOfRange(u8),

    #[error("employee_id must not be empty")]
    MissingEmployeeId,

    #[error("unknown regime '{0}' (expected 'old' or 'new')")]
    UnknownRegime(String),

    #[error("invalid assessment year '{0}' (expected a form like '2025-26')")]
    InvalidAssessmentYear(String),

    #[error("unknown age band '{0}'")]
    UnknownAgeBand(String),

    #[error("unknown deduction section '{0}'")]
    UnknownSection(String),

    /// No rate schedule is registered for the requested year/regime pair.
    #[error("no rate schedule for assessment year {year} under the {regime} regime")]
    UnsupportedYear { year: AssessmentYear, regime: Regime },

    #[error("invalid slab table: {0}")]
    InvalidSlabTable(String),

    #[error("invalid surcharge tiers: {0}")]
    InvalidSurcharge(String),

    #[error("invalid rate schedule for {year} ({regime}): {reason}")]
    InvalidSchedule {
        year: AssessmentYear,
        regime: Regime,
        reason: String,
    },

    /// A scenario asked to add an amount to a section that has no single
    /// contribution field (e.g. 80U is a status, not an amount).
    #[error("section {0} cannot be adjusted by an amount")]
    UnsupportedAdjustment(DeductionSection),
}
