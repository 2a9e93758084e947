use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Oldest age accepted on a [`crate::TaxInput`].
pub const MAX_AGE: u8 = 120;

/// Age bands that select the old-regime basic exemption and some
/// deduction caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    BelowSixty,
    /// 60 to 79 years.
    Senior,
    /// 80 years and above.
    SuperSenior,
}

impl AgeBand {
    pub fn from_age(age: u8) -> Self {
        match age {
            0..=59 => Self::BelowSixty,
            60..=79 => Self::Senior,
            _ => Self::SuperSenior,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BelowSixty => "below_sixty",
            Self::Senior => "senior",
            Self::SuperSenior => "super_senior",
        }
    }

    /// Senior and super-senior citizens share the higher deduction caps.
    pub fn is_senior(&self) -> bool {
        !matches!(self, Self::BelowSixty)
    }
}

impl fmt::Display for AgeBand {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeBand {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "below_sixty" => Ok(Self::BelowSixty),
            "senior" => Ok(Self::Senior),
            "super_senior" => Ok(Self::SuperSenior),
            _ => Err(ValidationError::UnknownAgeBand(s.to_string())),
        }
    }
}
