//! Rate schedules keyed by assessment year and regime.
//!
//! Slab tables, rebate and surcharge parameters, caps and deduction
//! eligibility all live in a [`RateSchedule`]; nothing in the calculators is
//! hardcoded to a particular year. [`RateCatalogue::builtin`] ships the
//! schedules for AY 2024-25 through 2026-27, and callers may insert their
//! own (see the `itax-data` loaders).

mod builtin;

use std::collections::BTreeMap;

use tracing::debug;

use crate::ValidationError;
use crate::models::{AssessmentYear, RateSchedule, Regime};

/// A set of validated [`RateSchedule`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateCatalogue {
    schedules: BTreeMap<(AssessmentYear, Regime), RateSchedule>,
}

impl RateCatalogue {
    /// Creates an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// The schedules shipped with the crate.
    pub fn builtin() -> Self {
        let schedules = builtin::schedules()
            .into_iter()
            .map(|schedule| ((schedule.assessment_year, schedule.regime), schedule))
            .collect();
        Self { schedules }
    }

    /// Validates and stores a schedule, returning the one it replaced.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] produced by [`RateSchedule::validate`].
    pub fn insert(
        &mut self,
        schedule: RateSchedule,
    ) -> Result<Option<RateSchedule>, ValidationError> {
        schedule.validate()?;
        let key = (schedule.assessment_year, schedule.regime);
        debug!(year = %key.0, regime = %key.1, "registering rate schedule");
        Ok(self.schedules.insert(key, schedule))
    }

    /// Looks up the schedule for a year and regime.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedYear`] when none is registered.
    pub fn get(
        &self,
        year: AssessmentYear,
        regime: Regime,
    ) -> Result<&RateSchedule, ValidationError> {
        self.schedules
            .get(&(year, regime))
            .ok_or(ValidationError::UnsupportedYear { year, regime })
    }

    /// Every assessment year with at least one schedule, ascending.
    pub fn years(&self) -> Vec<AssessmentYear> {
        let mut years: Vec<_> = self.schedules.keys().map(|(year, _)| *year).collect();
        years.dedup();
        years
    }

    pub fn schedules(&self) -> impl Iterator<Item = &RateSchedule> {
        self.schedules.values()
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}
