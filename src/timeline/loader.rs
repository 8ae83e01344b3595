//! Load case timelines from JSON case files

use super::CaseTimelines;
use crate::error::CaseLoadError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Sample case shipped with the crate
pub const DEFAULT_CASE_PATH: &str = "data/cases/sample_case.json";

/// Load a case from a JSON file
pub fn load_case<P: AsRef<Path>>(path: P) -> Result<CaseTimelines, CaseLoadError> {
    let file = File::open(path)?;
    load_case_from_reader(BufReader::new(file))
}

/// Load a case from any reader (e.g., string buffer, network stream)
pub fn load_case_from_reader<R: std::io::Read>(reader: R) -> Result<CaseTimelines, CaseLoadError> {
    let case = serde_json::from_reader(reader)?;
    Ok(case)
}
