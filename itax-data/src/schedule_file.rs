//! Rate schedules supplied as TOML.
//!
//! A schedule file holds any number of `[[schedules]]` tables in the same
//! shape as [`RateSchedule`]. Amounts and rates are best written as strings
//! (`rate = "0.05"`) so they reach [`rust_decimal::Decimal`] without passing
//! through a float.

use std::fs;
use std::path::Path;

use itax_core::{RateCatalogue, RateSchedule};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ScheduleLoadError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleFile {
    #[serde(default)]
    pub schedules: Vec<RateSchedule>,
}

impl ScheduleFile {
    /// Parses and validates every schedule in `source`.
    pub fn from_toml_str(source: &str) -> Result<Self, ScheduleLoadError> {
        let file: ScheduleFile = toml::from_str(source)?;
        for schedule in &file.schedules {
            schedule.validate()?;
        }
        Ok(file)
    }

    pub fn load_path(path: &Path) -> Result<Self, ScheduleLoadError> {
        let source = fs::read_to_string(path).map_err(|source| ScheduleLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Inserts every schedule into `catalogue`, replacing any with the same
    /// year and regime. Returns how many schedules were replaced.
    pub fn merge_into(
        self,
        catalogue: &mut RateCatalogue,
    ) -> Result<usize, ScheduleLoadError> {
        let mut replaced = 0;
        for schedule in self.schedules {
            let year = schedule.assessment_year;
            let regime = schedule.regime;
            if catalogue.insert(schedule)?.is_some() {
                info!(%year, %regime, "replaced built-in rate schedule");
                replaced += 1;
            }
        }
        Ok(replaced)
    }
}
