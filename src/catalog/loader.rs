//! CSV-based catalog loader
//!
//! Loads lookup tables from CSV files in data/catalog/

use crate::error::CatalogError;
use crate::timeline::{ActivityStatus, OutcomeActivityType, ReasonCode};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Default path to catalog directory
pub const DEFAULT_CATALOG_PATH: &str = "data/catalog";

const ACTIVITY_TYPES_FILE: &str = "activity_types.csv";
const MERGE_CLASSES_FILE: &str = "merge_classes.csv";
const SETTINGS_FILE: &str = "settings.csv";

fn open_reader(path: &Path, file_name: &str) -> Result<Option<csv::Reader<File>>, CatalogError> {
    let full_path = path.join(file_name);
    if !full_path.exists() {
        return Ok(None);
    }
    let file = File::open(&full_path).map_err(|source| CatalogError::Io {
        path: full_path.display().to_string(),
        source,
    })?;
    Ok(Some(csv::Reader::from_reader(file)))
}

fn csv_error(path: &Path, file_name: &str) -> impl Fn(csv::Error) -> CatalogError {
    let full_path = path.join(file_name).display().to_string();
    move |source| CatalogError::Csv {
        path: full_path.clone(),
        source,
    }
}

/// Load the activity status to outcome-activity type table
/// Columns: status, outcome_type
pub fn load_activity_types(
    path: &Path,
) -> Result<Option<HashMap<ActivityStatus, OutcomeActivityType>>, CatalogError> {
    let Some(mut reader) = open_reader(path, ACTIVITY_TYPES_FILE)? else {
        return Ok(None);
    };
    let to_err = csv_error(path, ACTIVITY_TYPES_FILE);

    let mut table = HashMap::new();
    for result in reader.records() {
        let record = result.map_err(&to_err)?;
        let status = ActivityStatus::from_label(&record[0])
            .ok_or_else(|| CatalogError::UnknownActivityStatus(record[0].to_string()))?;
        let outcome_type = OutcomeActivityType::from_label(&record[1])
            .ok_or_else(|| CatalogError::UnknownActivityType(record[1].to_string()))?;
        table.insert(status, outcome_type);
    }

    Ok(Some(table))
}

/// Load the reason-code merge classes
/// Columns: class, code. A code may belong to one class only.
pub fn load_merge_classes(path: &Path) -> Result<Option<HashMap<ReasonCode, String>>, CatalogError> {
    let Some(mut reader) = open_reader(path, MERGE_CLASSES_FILE)? else {
        return Ok(None);
    };
    let to_err = csv_error(path, MERGE_CLASSES_FILE);

    let mut classes: HashMap<ReasonCode, String> = HashMap::new();
    for result in reader.records() {
        let record = result.map_err(&to_err)?;
        let class = record[0].trim().to_string();
        let code = ReasonCode::new(record[1].trim());

        if let Some(existing) = classes.get(&code) {
            if existing != &class {
                return Err(CatalogError::DuplicateMergeClass {
                    code: code.to_string(),
                    first: existing.clone(),
                    second: class,
                });
            }
        }
        classes.insert(code, class);
    }

    Ok(Some(classes))
}

/// Settings read from settings.csv
/// Columns: role, value. Roles: gap_denial, lack_of_care, share_label
#[derive(Debug, Default)]
struct Settings {
    gap_denial_code: Option<ReasonCode>,
    lack_of_care_codes: Vec<ReasonCode>,
    share_label: Option<String>,
}

fn load_settings(path: &Path) -> Result<Settings, CatalogError> {
    let mut settings = Settings::default();
    let Some(mut reader) = open_reader(path, SETTINGS_FILE)? else {
        return Ok(settings);
    };
    let to_err = csv_error(path, SETTINGS_FILE);

    for result in reader.records() {
        let record = result.map_err(&to_err)?;
        let value = record[1].trim();
        match record[0].trim() {
            "gap_denial" => settings.gap_denial_code = Some(ReasonCode::new(value)),
            "lack_of_care" => settings.lack_of_care_codes.push(ReasonCode::new(value)),
            "share_label" => settings.share_label = Some(value.to_string()),
            other => return Err(CatalogError::UnknownRole(other.to_string())),
        }
    }

    Ok(settings)
}

/// All catalog tables loaded from a directory
///
/// `None` (or empty) entries mean the file was absent and the built-in
/// table applies.
#[derive(Debug, Default)]
pub struct LoadedCatalog {
    pub activity_types: Option<HashMap<ActivityStatus, OutcomeActivityType>>,
    pub merge_classes: Option<HashMap<ReasonCode, String>>,
    pub gap_denial_code: Option<ReasonCode>,
    pub lack_of_care_codes: Vec<ReasonCode>,
    pub share_label: Option<String>,
}

impl LoadedCatalog {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self, CatalogError> {
        Self::load_from(Path::new(DEFAULT_CATALOG_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        let settings = load_settings(path)?;
        Ok(Self {
            activity_types: load_activity_types(path)?,
            merge_classes: load_merge_classes(path)?,
            gap_denial_code: settings.gap_denial_code,
            lack_of_care_codes: settings.lack_of_care_codes,
            share_label: settings.share_label,
        })
    }
}
