//! Payout Periods - reconciliation engine for parental-benefit decision letters
//!
//! This library provides:
//! - Case timelines (awarded payments, leave outcomes, calculation basis) and JSON case loading
//! - Interval matching across independently bounded timelines
//! - Per-activity payout breakdowns with natural-benefit change detection
//! - Payout period building and merging of adjacent equivalent periods
//! - Reason-code and activity catalogs loaded from CSV
//! - Letter-level summaries and locale date formatting

pub mod catalog;
pub mod error;
pub mod format;
pub mod payout;
pub mod timeline;

// Re-export commonly used types
pub use catalog::Catalog;
pub use error::{CaseLoadError, CatalogError, PayoutError, TimelineKind};
pub use format::{DateFormatter, Language, LocaleDateFormatter};
pub use payout::{build_payout_periods, map_payout_periods, merge_periods, PayoutPeriod, PayoutSummary};
pub use timeline::{load_case, CaseTimelines};
