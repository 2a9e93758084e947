//! Tax calculators.
//!
//! Each stage of the liability computation lives in its own module and
//! borrows the [`crate::RateSchedule`] it needs; [`TaxCalculator`] chains
//! them for one input, [`RegimeComparator`] runs it for both regimes.

pub mod cess;
pub mod common;
pub mod comparator;
pub mod computation;
pub mod deductions;
pub mod income;
pub mod optimizer;
pub mod rebate;
pub mod scenario;
pub mod slab;
pub mod surcharge;

pub use cess::cess;
pub use comparator::{RegimeComparator, RegimeComparison};
pub use computation::{TaxCalculator, calculate_with_schedule};
pub use deductions::{DeductionAggregator, DeductionSummary};
pub use income::{IncomeCalculator, IncomeComputation};
pub use optimizer::{OptimizationReport, Suggestion, SuggestionKind, TaxOptimizer};
pub use rebate::rebate_87a;
pub use scenario::{Adjustment, Scenario, ScenarioAnalyzer, ScenarioOutcome, ScenarioReport};
pub use slab::SlabTaxCalculator;
pub use surcharge::{surcharge, surcharge_rate};
