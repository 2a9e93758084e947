use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// An Indian assessment year such as `2025-26`.
///
/// The assessment year follows the financial (previous) year in which the
/// income was earned: income earned April 2024 – March 2025 is assessed in
/// AY 2025-26. The value stored is the first calendar year of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssessmentYear(u16);

impl AssessmentYear {
    /// Creates an assessment year from the first calendar year of the pair.
    pub fn new(start_year: u16) -> Self {
        Self(start_year)
    }

    pub fn start_year(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for AssessmentYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}-{:02}", self.0, (u32::from(self.0) + 1) % 100)
    }
}

impl FromStr for AssessmentYear {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidAssessmentYear(s.to_string());

        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        if start.len() != 4 || end.len() != 2 {
            return Err(invalid());
        }

        let start: u16 = start.parse().map_err(|_| invalid())?;
        let end: u16 = end.parse().map_err(|_| invalid())?;
        if start < 1000 || (start + 1) % 100 != end {
            return Err(invalid());
        }

        Ok(Self(start))
    }
}

impl TryFrom<String> for AssessmentYear {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AssessmentYear> for String {
    fn from(value: AssessmentYear) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_reads_start_year() {
        let year: AssessmentYear = "2025-26".parse().unwrap();

        assert_eq!(year.start_year(), 2025);
        assert_eq!(year.to_string(), "2025-26");
    }

    #[test]
    fn parse_handles_century_rollover() {
        let year: AssessmentYear = "2099-00".parse().unwrap();

        assert_eq!(year.to_string(), "2099-00");
    }

    #[test]
    fn parse_rejects_non_consecutive_years() {
        assert_eq!(
            "2025-27".parse::<AssessmentYear>(),
            Err(ValidationError::InvalidAssessmentYear("2025-27".to_string()))
        );
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for bad in ["2025", "25-26", "2025/26", "abcd-ef", "2025-2026", ""] {
            assert!(bad.parse::<AssessmentYear>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn serde_uses_display_form() {
        let year = AssessmentYear::new(2024);

        let json = serde_json::to_string(&year).unwrap();
        let back: AssessmentYear = serde_json::from_str(&json).unwrap();

        assert_eq!(json, "\"2024-25\"");
        assert_eq!(back, year);
    }

    #[test]
    fn deserialize_rejects_invalid_year() {
        let result: Result<AssessmentYear, _> = serde_json::from_str("\"2024-26\"");

        assert!(result.is_err());
    }
}
