use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Chapter VI-A deduction sections understood by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeductionSection {
    /// 80C family, including 80CCC and 80CCD(1), under the combined 80CCE cap.
    #[serde(rename = "80c")]
    Section80C,
    /// Additional employee NPS contribution.
    #[serde(rename = "80ccd_1b")]
    Section80CCD1B,
    /// Employer NPS contribution.
    #[serde(rename = "80ccd_2")]
    Section80CCD2,
    /// Health insurance premiums.
    #[serde(rename = "80d")]
    Section80D,
    /// Education loan interest.
    #[serde(rename = "80e")]
    Section80E,
    /// Donations.
    #[serde(rename = "80g")]
    Section80G,
    /// Savings account interest (below sixty).
    #[serde(rename = "80tta")]
    Section80TTA,
    /// Deposit interest (senior citizens).
    #[serde(rename = "80ttb")]
    Section80TTB,
    /// Rent paid without HRA.
    #[serde(rename = "80gg")]
    Section80GG,
    /// Taxpayer disability.
    #[serde(rename = "80u")]
    Section80U,
    /// Affordable-housing loan interest.
    #[serde(rename = "80eea")]
    Section80EEA,
}

impl DeductionSection {
    pub const ALL: [DeductionSection; 11] = [
        Self::Section80C,
        Self::Section80CCD1B,
        Self::Section80CCD2,
        Self::Section80D,
        Self::Section80E,
        Self::Section80G,
        Self::Section80TTA,
        Self::Section80TTB,
        Self::Section80GG,
        Self::Section80U,
        Self::Section80EEA,
    ];

    /// The identifier used in configuration files.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Section80C => "80c",
            Self::Section80CCD1B => "80ccd_1b",
            Self::Section80CCD2 => "80ccd_2",
            Self::Section80D => "80d",
            Self::Section80E => "80e",
            Self::Section80G => "80g",
            Self::Section80TTA => "80tta",
            Self::Section80TTB => "80ttb",
            Self::Section80GG => "80gg",
            Self::Section80U => "80u",
            Self::Section80EEA => "80eea",
        }
    }
}

impl fmt::Display for DeductionSection {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let label = match self {
            Self::Section80CCD1B => "80CCD(1B)",
            Self::Section80CCD2 => "80CCD(2)",
            other => return f.write_str(&other.code().to_ascii_uppercase()),
        };
        f.write_str(label)
    }
}

impl FromStr for DeductionSection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.code() == code)
            .ok_or_else(|| ValidationError::UnknownSection(s.to_string()))
    }
}
