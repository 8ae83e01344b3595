//! Calendar-day intervals and timeline validation

use crate::error::{PayoutError, TimelineKind};
use chrono::NaiveDate;

/// Anything covering a closed range of calendar days
///
/// `end() == None` means the range is open-ended and is treated as
/// extending forever.
pub trait Timespan {
    fn start(&self) -> NaiveDate;
    fn end(&self) -> Option<NaiveDate>;

    /// True when `other` lies entirely inside `self`
    fn contains<T: Timespan + ?Sized>(&self, other: &T) -> bool {
        if other.start() < self.start() {
            return false;
        }
        match (self.end(), other.end()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(own), Some(theirs)) => theirs <= own,
        }
    }
}

/// Check that a timeline is sorted ascending and non-overlapping
///
/// Every period must end on or after its start, and only the final
/// period may be open-ended.
pub fn validate_timeline<P: Timespan>(kind: TimelineKind, periods: &[P]) -> Result<(), PayoutError> {
    let inconsistent = |detail: String| PayoutError::InconsistentTimeline { timeline: kind, detail };

    for (idx, period) in periods.iter().enumerate() {
        if let Some(end) = period.end() {
            if end < period.start() {
                return Err(inconsistent(format!(
                    "period {} ends ({}) before it starts ({})",
                    idx,
                    end,
                    period.start()
                )));
            }
        }
    }

    for (idx, pair) in periods.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        match prev.end() {
            None => {
                return Err(inconsistent(format!(
                    "open-ended period {} is followed by another period",
                    idx
                )));
            }
            Some(prev_end) if prev_end >= next.start() => {
                return Err(inconsistent(format!(
                    "period {} ({} - {}) overlaps or precedes period {} starting {}",
                    idx,
                    prev.start(),
                    prev_end,
                    idx + 1,
                    next.start()
                )));
            }
            Some(_) => {}
        }
    }

    Ok(())
}
