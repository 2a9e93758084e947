//! Employee inputs supplied as JSON.

use std::fs;
use std::path::Path;

use itax_core::TaxInput;
use tracing::debug;

use crate::InputLoadError;

/// Parses a single [`TaxInput`] object or an array of them, validating each.
pub fn parse_json(source: &str) -> Result<Vec<TaxInput>, InputLoadError> {
    let inputs = if source.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<TaxInput>>(source)?
    } else {
        vec![serde_json::from_str::<TaxInput>(source)?]
    };

    for input in &inputs {
        input.validate().map_err(|source| InputLoadError::Invalid {
            employee_id: input.employee_id.clone(),
            source,
        })?;
    }

    debug!(count = inputs.len(), "loaded employee inputs");
    Ok(inputs)
}

pub fn load_json(path: &Path) -> Result<Vec<TaxInput>, InputLoadError> {
    let source = fs::read_to_string(path).map_err(|source| InputLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&source)
}
