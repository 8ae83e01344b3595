//! Lookup tables used while reconciling timelines
//!
//! The catalog holds the data that is not algorithm:
//! - which outcome-activity type each activity status is recorded under
//! - the partition of reason codes into merge-equivalence classes
//! - reason codes with special handling (gap denials, lack of care)
//!
//! It is built once, either from the built-in defaults or from CSV files in
//! `data/catalog/`, and passed by reference into the payout mapping.

pub mod loader;

use crate::timeline::{ActivityStatus, OutcomeActivityType, ReasonCode};
use std::collections::HashMap;
use std::path::Path;

pub use loader::{LoadedCatalog, DEFAULT_CATALOG_PATH};

/// Label used for employment shares without a known employer
pub const DEFAULT_SHARE_LABEL: &str = "Andel";

/// Denial reason for a gap between the parents' periods
pub const DEFAULT_GAP_DENIAL_CODE: &str = "4005";

/// Immutable reason-code and activity tables
#[derive(Debug, Clone)]
pub struct Catalog {
    activity_types: HashMap<ActivityStatus, OutcomeActivityType>,
    merge_classes: HashMap<ReasonCode, String>,
    gap_denial_code: ReasonCode,
    lack_of_care_codes: Vec<ReasonCode>,
    share_label: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Built-in tables
    ///
    /// The merge classes only contain the pairings confirmed so far; load the
    /// full partition from the reason-code catalog with [`Catalog::from_csv_path`].
    pub fn builtin() -> Self {
        let activity_types = HashMap::from([
            (ActivityStatus::Employee, OutcomeActivityType::OrdinaryWork),
            (ActivityStatus::Freelancer, OutcomeActivityType::Freelance),
            (ActivityStatus::SelfEmployed, OutcomeActivityType::SelfEmployed),
        ]);

        let merge_classes = [("4040", "4040"), ("4112", "4040"), ("2003", "2003"), ("2007", "2003")]
            .into_iter()
            .map(|(code, class)| (ReasonCode::new(code), class.to_string()))
            .collect();

        Self {
            activity_types,
            merge_classes,
            gap_denial_code: ReasonCode::new(DEFAULT_GAP_DENIAL_CODE),
            lack_of_care_codes: vec![ReasonCode::new("4003"), ReasonCode::new("4012")],
            share_label: DEFAULT_SHARE_LABEL.to_string(),
        }
    }

    /// Load tables from CSV files in the default location (data/catalog/)
    pub fn from_csv() -> Result<Self, crate::error::CatalogError> {
        Self::from_csv_path(Path::new(DEFAULT_CATALOG_PATH))
    }

    /// Load tables from CSV files in a specific directory
    ///
    /// Files that are missing fall back to the built-in table for that concern.
    pub fn from_csv_path(path: &Path) -> Result<Self, crate::error::CatalogError> {
        let loaded = LoadedCatalog::load_from(path)?;
        Ok(Self::from_loaded(loaded))
    }

    /// Assemble a catalog from loaded tables
    pub fn from_loaded(loaded: LoadedCatalog) -> Self {
        let mut catalog = Self::builtin();

        if let Some(activity_types) = loaded.activity_types {
            catalog.activity_types = activity_types;
        }
        if let Some(merge_classes) = loaded.merge_classes {
            catalog.merge_classes = merge_classes;
        }
        if let Some(code) = loaded.gap_denial_code {
            catalog.gap_denial_code = code;
        }
        if !loaded.lack_of_care_codes.is_empty() {
            catalog.lack_of_care_codes = loaded.lack_of_care_codes;
        }
        if let Some(label) = loaded.share_label {
            catalog.share_label = label;
        }

        catalog
    }

    /// Outcome-activity type an activity status is recorded under
    pub fn outcome_activity_type(&self, status: ActivityStatus) -> OutcomeActivityType {
        self.activity_types
            .get(&status)
            .copied()
            .unwrap_or(OutcomeActivityType::Other)
    }

    /// Whether two reason codes may be merged into one letter period
    pub fn same_merge_class(&self, a: &ReasonCode, b: &ReasonCode) -> bool {
        if a == b {
            return true;
        }
        match (self.merge_classes.get(a), self.merge_classes.get(b)) {
            (Some(class_a), Some(class_b)) => class_a == class_b,
            _ => false,
        }
    }

    pub fn is_gap_denial(&self, code: &ReasonCode) -> bool {
        code == &self.gap_denial_code
    }

    pub fn is_lack_of_care(&self, code: &ReasonCode) -> bool {
        self.lack_of_care_codes.contains(code)
    }

    /// Fallback label for employment shares without a known employer
    pub fn share_label(&self) -> &str {
        &self.share_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_activity_types() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.outcome_activity_type(ActivityStatus::Employee),
            OutcomeActivityType::OrdinaryWork
        );
        assert_eq!(
            catalog.outcome_activity_type(ActivityStatus::SelfEmployed),
            OutcomeActivityType::SelfEmployed
        );
        assert_eq!(
            catalog.outcome_activity_type(ActivityStatus::DailyAllowance),
            OutcomeActivityType::Other
        );
    }

    #[test]
    fn test_builtin_merge_classes() {
        let catalog = Catalog::builtin();
        let code = ReasonCode::new;

        assert!(catalog.same_merge_class(&code("4040"), &code("4112")));
        assert!(catalog.same_merge_class(&code("2007"), &code("2003")));
        assert!(catalog.same_merge_class(&code("2001"), &code("2001")));
        assert!(catalog.same_merge_class(&ReasonCode::unknown(), &ReasonCode::unknown()));

        assert!(!catalog.same_merge_class(&code("4040"), &code("2001")));
        assert!(!catalog.same_merge_class(&code("4030"), &code("4502")));
        assert!(!catalog.same_merge_class(&code("4040"), &code("2003")));
    }

    #[test]
    fn test_special_codes() {
        let catalog = Catalog::default();
        assert!(catalog.is_gap_denial(&ReasonCode::new("4005")));
        assert!(!catalog.is_gap_denial(&ReasonCode::new("4040")));
        assert!(catalog.is_lack_of_care(&ReasonCode::new("4012")));
        assert_eq!(catalog.share_label(), "Andel");
    }
}
