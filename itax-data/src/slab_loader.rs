use std::collections::BTreeMap;
use std::io::Read;

use itax_core::{AgeBand, AssessmentYear, RateCatalogue, Regime, SlabTable, TaxSlab};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::ScheduleLoadError;

/// A single row from a slab CSV file.
///
/// - `assessment_year`: e.g. `2025-26`
/// - `regime`: `old` or `new`
/// - `age_band`: `below_sixty`, `senior` or `super_senior`
/// - `min_income`: lower bound of the slab
/// - `max_income`: upper bound (empty for the open-ended top slab)
/// - `rate`: marginal rate as a decimal (e.g. `0.05` for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub assessment_year: AssessmentYear,
    pub regime: Regime,
    pub age_band: AgeBand,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

type SlabGroups = BTreeMap<(AssessmentYear, Regime), BTreeMap<AgeBand, Vec<TaxSlab>>>;

/// Loader for slab tables from CSV files.
///
/// Rows replace whole tables: every (year, regime, age band) present in the
/// file becomes a fresh [`SlabTable`] on the matching schedule, and tables
/// the file does not mention are left alone.
pub struct SlabLoader;

impl SlabLoader {
    /// Parse slab records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SlabRecord>, ScheduleLoadError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: SlabRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Replace slab tables in `catalogue` with those described by `records`.
    ///
    /// Records may appear in any order. Each table is validated, and each
    /// affected schedule is re-validated on insert. Returns the number of
    /// tables replaced.
    pub fn apply(
        catalogue: &mut RateCatalogue,
        records: &[SlabRecord],
    ) -> Result<usize, ScheduleLoadError> {
        let mut groups = SlabGroups::new();
        for record in records {
            groups
                .entry((record.assessment_year, record.regime))
                .or_default()
                .entry(record.age_band)
                .or_default()
                .push(TaxSlab {
                    min_income: record.min_income,
                    max_income: record.max_income,
                    rate: record.rate,
                });
        }

        let mut replaced = 0;
        for ((year, regime), bands) in groups {
            let mut schedule = catalogue
                .get(year, regime)
                .map_err(|_| ScheduleLoadError::ScheduleNotFound { year, regime })?
                .clone();

            for (band, mut slabs) in bands {
                slabs.sort_by(|a, b| a.min_income.cmp(&b.min_income));
                debug!(%year, %regime, %band, slabs = slabs.len(), "replacing slab table");
                schedule.slabs.set(band, SlabTable::new(slabs)?);
                replaced += 1;
            }

            catalogue.insert(schedule)?;
        }

        info!(tables = replaced, "loaded slab tables");
        Ok(replaced)
    }
}

#[cfg(test)]
mod tests {
    use itax_core::ValidationError;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "assessment_year,regime,age_band,min_income,max_income,rate\n";

    fn slab_csv(rows: &str) -> String {
        format!("{HEADER}{rows}")
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn test_parse_single_slab() {
        let input = slab_csv("2025-26,old,senior,300000,500000,0.05");

        let records = SlabLoader::parse(input.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![SlabRecord {
                assessment_year: AssessmentYear::new(2025),
                regime: Regime::Old,
                age_band: AgeBand::Senior,
                min_income: dec!(300000),
                max_income: Some(dec!(500000)),
                rate: dec!(0.05),
            }]
        );
    }

    #[test]
    fn test_parse_unlimited_max_income() {
        let input = slab_csv("2025-26,new,below_sixty,1500000,,0.30");

        let records = SlabLoader::parse(input.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].max_income, None);
        assert_eq!(records[0].rate, dec!(0.30));
    }

    #[test]
    fn test_parse_empty_csv() {
        let records = SlabLoader::parse(HEADER.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_unknown_regime() {
        let input = slab_csv("2025-26,legacy,below_sixty,0,,0");

        let err = SlabLoader::parse(input.as_bytes()).expect_err("Should fail for bad regime");

        let ScheduleLoadError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("legacy"), "Expected regime in error, got: {}", msg);
    }

    #[test]
    fn test_parse_bad_decimal() {
        let input = slab_csv("2025-26,old,senior,abc,500000,0.05");

        let err = SlabLoader::parse(input.as_bytes()).expect_err("Should fail for bad decimal");

        assert!(matches!(err, ScheduleLoadError::CsvParse(_)));
    }

    #[test]
    fn test_parse_missing_column() {
        let input = "assessment_year,regime,min_income\n2025-26,old,0";

        let err = SlabLoader::parse(input.as_bytes()).expect_err("Should fail for missing column");

        let ScheduleLoadError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    // =========================================================================
    // Applying
    // =========================================================================

    #[test]
    fn test_apply_replaces_only_listed_band() {
        let mut catalogue = RateCatalogue::builtin();
        let original_below_sixty = catalogue
            .get(AssessmentYear::new(2025), Regime::Old)
            .unwrap()
            .slab_table(AgeBand::BelowSixty)
            .clone();
        let input = slab_csv(
            "2025-26,old,super_senior,600000,,0.25\n2025-26,old,super_senior,0,600000,0\n",
        );
        let records = SlabLoader::parse(input.as_bytes()).unwrap();

        let replaced = SlabLoader::apply(&mut catalogue, &records).unwrap();

        assert_eq!(replaced, 1);
        let schedule = catalogue
            .get(AssessmentYear::new(2025), Regime::Old)
            .unwrap();
        assert_eq!(
            schedule.slab_table(AgeBand::SuperSenior).slabs,
            vec![
                TaxSlab {
                    min_income: dec!(0),
                    max_income: Some(dec!(600000)),
                    rate: dec!(0),
                },
                TaxSlab {
                    min_income: dec!(600000),
                    max_income: None,
                    rate: dec!(0.25),
                },
            ]
        );
        assert_eq!(schedule.slab_table(AgeBand::BelowSixty), &original_below_sixty);
    }

    #[test]
    fn test_apply_requires_existing_schedule() {
        let mut catalogue = RateCatalogue::builtin();
        let input = slab_csv("2030-31,new,below_sixty,0,,0.1");
        let records = SlabLoader::parse(input.as_bytes()).unwrap();

        let err = SlabLoader::apply(&mut catalogue, &records).expect_err("Should fail");

        assert!(matches!(
            err,
            ScheduleLoadError::ScheduleNotFound {
                regime: Regime::New,
                ..
            }
        ));
    }

    #[test]
    fn test_apply_rejects_gapped_table() {
        let mut catalogue = RateCatalogue::builtin();
        let input =
            slab_csv("2025-26,new,below_sixty,0,300000,0\n2025-26,new,below_sixty,400000,,0.1");
        let records = SlabLoader::parse(input.as_bytes()).unwrap();

        let err = SlabLoader::apply(&mut catalogue, &records).expect_err("Should fail");

        assert!(matches!(
            err,
            ScheduleLoadError::Invalid(ValidationError::InvalidSlabTable(_))
        ));
        assert_eq!(
            catalogue
                .get(AssessmentYear::new(2025), Regime::New)
                .unwrap(),
            RateCatalogue::builtin()
                .get(AssessmentYear::new(2025), Regime::New)
                .unwrap()
        );
    }
}
