//! Error types for timeline reconciliation and catalog/case loading

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Which input timeline an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineKind {
    Awarded,
    Outcome,
    Basis,
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimelineKind::Awarded => "awarded-payment",
            TimelineKind::Outcome => "leave-outcome",
            TimelineKind::Basis => "calculation-basis",
        };
        f.write_str(name)
    }
}

/// Failures while reconciling the three timelines
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayoutError {
    /// A containing period was structurally required but none exists
    #[error("no {timeline} period contains {from} - {}", display_end(.to))]
    MatchNotFound {
        timeline: TimelineKind,
        from: NaiveDate,
        to: Option<NaiveDate>,
    },

    /// Input timeline is unsorted, overlapping or malformed
    #[error("{timeline} timeline is inconsistent: {detail}")]
    InconsistentTimeline { timeline: TimelineKind, detail: String },
}

fn display_end(to: &Option<NaiveDate>) -> String {
    to.map(|d| d.to_string()).unwrap_or_else(|| "open".to_string())
}

/// Failures while loading catalog tables from CSV
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog file {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("unknown activity status '{0}'")]
    UnknownActivityStatus(String),

    #[error("unknown outcome activity type '{0}'")]
    UnknownActivityType(String),

    #[error("unknown reason-code role '{0}'")]
    UnknownRole(String),

    #[error("reason code {code} is assigned to both class {first} and class {second}")]
    DuplicateMergeClass {
        code: String,
        first: String,
        second: String,
    },
}

/// Failures while loading a case file
#[derive(Error, Debug)]
pub enum CaseLoadError {
    #[error("failed to read case file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed case file: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_not_found_message() {
        let err = PayoutError::MatchNotFound {
            timeline: TimelineKind::Basis,
            from: NaiveDate::from_ymd_opt(2021, 1, 4).unwrap(),
            to: None,
        };
        assert_eq!(
            err.to_string(),
            "no calculation-basis period contains 2021-01-04 - open"
        );
    }
}
