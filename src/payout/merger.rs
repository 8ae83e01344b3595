//! Collapsing adjacent payout periods that read the same in a letter

use super::types::{EmploymentBreakdown, OtherActivityBreakdown, PayoutPeriod, SelfEmployedBreakdown};
use crate::catalog::Catalog;
use crate::timeline::ActivityStatus;
use chrono::NaiveDate;

/// Merge each run of equivalent, strictly adjacent periods into one
///
/// The input must be sorted by start date. A merged period keeps the first
/// period's fields, takes the last period's end and sums the lost days.
/// Running the merge on its own output changes nothing.
pub fn merge_periods(periods: &[PayoutPeriod], catalog: &Catalog) -> Vec<PayoutPeriod> {
    let mut merged: Vec<PayoutPeriod> = Vec::with_capacity(periods.len());

    for current in periods {
        if let Some(previous) = merged.last_mut() {
            if can_merge(previous, current, catalog) {
                log::trace!(
                    "merging {} - {} into {} - {}",
                    current.from,
                    current.to,
                    previous.from,
                    previous.to
                );
                previous.to = current.to;
                previous.lost_days += current.lost_days;
                previous.lost_days_fraction += current.lost_days_fraction;
                continue;
            }
        }
        merged.push(current.clone());
    }

    log::debug!("merged {} payout periods into {}", periods.len(), merged.len());
    merged
}

/// Whether `current` may be folded into `previous`
pub fn can_merge(previous: &PayoutPeriod, current: &PayoutPeriod, catalog: &Catalog) -> bool {
    previous.is_followed_by(current)
        && previous.approved == current.approved
        && catalog.same_merge_class(&previous.reason, &current.reason)
        && previous.daily_rate == current.daily_rate
        && same_activities(previous, current)
}

/// Breakdowns describe the same activities, ignoring percentages and graduation
pub fn same_activities(a: &PayoutPeriod, b: &PayoutPeriod) -> bool {
    same_self_employment(a.self_employed.as_ref(), b.self_employed.as_ref())
        && other_activity_keys(&a.other_activities) == other_activity_keys(&b.other_activities)
        && employment_keys(&a.employment) == employment_keys(&b.employment)
}

fn same_self_employment(a: Option<&SelfEmployedBreakdown>, b: Option<&SelfEmployedBreakdown>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.last_assessed_year == b.last_assessed_year && a.daily_rate == b.daily_rate,
        _ => false,
    }
}

fn other_activity_keys(entries: &[OtherActivityBreakdown]) -> Vec<(&'static str, i64)> {
    let mut keys: Vec<_> = entries
        .iter()
        .map(|o| (ActivityStatus::as_str(&o.status), o.daily_rate))
        .collect();
    keys.sort_unstable();
    keys
}

type EmploymentKey<'a> = (&'a str, i64, Option<(NaiveDate, i64)>);

fn employment_keys(entries: &[EmploymentBreakdown]) -> Vec<EmploymentKey<'_>> {
    let mut keys: Vec<_> = entries
        .iter()
        .map(|e| {
            let change = e.natural_benefit.as_ref().map(|n| (n.date, n.new_daily_rate));
            (e.employer_name.as_str(), e.daily_rate, change)
        })
        .collect();
    keys.sort_unstable();
    keys
}
