use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// One of the two parallel income-tax schedules.
///
/// The old regime permits the full set of Chapter VI-A deductions and
/// salary exemptions; the new regime offers lower slab rates with almost
/// none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Old,
    New,
}

impl Regime {
    pub const ALL: [Regime; 2] = [Regime::Old, Regime::New];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    /// The opposite regime.
    pub fn other(self) -> Self {
        match self {
            Self::Old => Self::New,
            Self::New => Self::Old,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" => Ok(Self::Old),
            "new" => Ok(Self::New),
            _ => Err(ValidationError::UnknownRegime(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_mixed_case_and_whitespace() {
        assert_eq!(" Old ".parse::<Regime>(), Ok(Regime::Old));
        assert_eq!("NEW".parse::<Regime>(), Ok(Regime::New));
    }

    #[test]
    fn parse_rejects_unknown_regime() {
        assert_eq!(
            "flat".parse::<Regime>(),
            Err(ValidationError::UnknownRegime("flat".to_string()))
        );
    }

    #[test]
    fn other_flips_regime() {
        assert_eq!(Regime::Old.other(), Regime::New);
        assert_eq!(Regime::New.other(), Regime::Old);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Regime::New).unwrap();

        assert_eq!(json, "\"new\"");
    }
}
