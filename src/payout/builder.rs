//! Building payout periods from the three case timelines
//!
//! One pass over the awarded-payment timeline pairs every awarded period with
//! the leave outcome and calculation basis covering it. Leave outcomes that
//! never received a payment are then added on their own, and the result is
//! sorted by start date.

use super::breakdown::{build_breakdown, BreakdownContext};
use super::matcher::{count_contained, find_containing, position_containing};
use super::merger::merge_periods;
use super::natural_benefit::first_basis_start;
use super::types::{Percentage, PayoutPeriod};
use crate::catalog::Catalog;
use crate::error::{PayoutError, TimelineKind};
use crate::format::DateFormatter;
use crate::timeline::{
    validate_timeline, AwardedPeriod, CalcBasisPeriod, CaseTimelines, LeaveOutcomePeriod, ReasonCode,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept when lost days are split across awarded periods
const LOST_DAYS_SCALE: u32 = 2;

/// Denied for the gap between the parents' periods, with no days drawn
pub fn is_zero_day_gap_denial(outcome: &LeaveOutcomePeriod, catalog: &Catalog) -> bool {
    outcome
        .reason
        .as_ref()
        .is_some_and(|reason| catalog.is_gap_denial(reason))
        && outcome.lost_days() == 0
}

/// Whether an outcome period ends up in the letter at all
pub fn is_reportable(outcome: &LeaveOutcomePeriod, catalog: &Catalog) -> bool {
    outcome.has_known_reason() && !is_zero_day_gap_denial(outcome, catalog)
}

/// Reason shown for a matched outcome
///
/// An approved period whose graduation was denied is explained by the
/// graduation denial instead of the ordinary reason.
fn resolve_reason(outcome: &LeaveOutcomePeriod) -> ReasonCode {
    if outcome.approved {
        if let Some(denial) = outcome.graduation_denial_reason().filter(|_| outcome.graduation_denied()) {
            return denial.clone();
        }
    }
    outcome
        .reason
        .clone()
        .filter(|reason| !reason.is_unknown())
        .unwrap_or_else(ReasonCode::unknown)
}

fn is_approved(outcome: &LeaveOutcomePeriod) -> bool {
    outcome.approved && !outcome.graduation_denied()
}

/// Lost days of `outcome` attributed to each of the awarded periods it contains
fn split_lost_days(whole: u32, awarded_in_outcome: usize) -> Decimal {
    let whole = Decimal::from(whole);
    if awarded_in_outcome > 1 {
        (whole / Decimal::from(awarded_in_outcome as u64))
            .round_dp_with_strategy(LOST_DAYS_SCALE, RoundingStrategy::MidpointAwayFromZero)
    } else {
        whole
    }
}

/// Payout period for an outcome that never received an awarded period
fn outcome_only_period(outcome: &LeaveOutcomePeriod) -> PayoutPeriod {
    let lost_days = outcome.lost_days();
    PayoutPeriod {
        from: outcome.from,
        to: outcome.to,
        approved: is_approved(outcome),
        reason: outcome.reason.clone().unwrap_or_else(ReasonCode::unknown),
        lost_days,
        lost_days_fraction: Decimal::from(lost_days),
        daily_rate: None,
        employment: Vec::new(),
        self_employed: None,
        other_activities: Vec::new(),
        prioritized_payout_percentage: Percentage::ZERO,
        account: outcome.account(),
    }
}

fn matched_period(
    index: usize,
    awarded: &AwardedPeriod,
    all_awarded: &[AwardedPeriod],
    outcome: &LeaveOutcomePeriod,
    breakdown_ctx: &BreakdownContext<'_>,
    basis: &CalcBasisPeriod,
) -> PayoutPeriod {
    let from = if index == 0 && outcome.from < awarded.from {
        outcome.from
    } else {
        awarded.from
    };

    let lost_days = outcome.lost_days();
    let awarded_in_outcome = count_contained(outcome, all_awarded);
    let breakdown = build_breakdown(awarded, outcome, basis, breakdown_ctx);
    let prioritized_payout_percentage = breakdown.prioritized_payout_percentage();

    PayoutPeriod {
        from,
        to: awarded.to,
        approved: is_approved(outcome),
        reason: resolve_reason(outcome),
        lost_days,
        lost_days_fraction: split_lost_days(lost_days, awarded_in_outcome),
        daily_rate: awarded.daily_rate,
        employment: breakdown.employment,
        self_employed: breakdown.self_employed,
        other_activities: breakdown.other_activities,
        prioritized_payout_percentage,
        account: outcome.account(),
    }
}

/// Build the unmerged payout periods of a case, sorted by start date
///
/// Fails before any matching when a timeline is unsorted or overlapping, and
/// when an awarded period lacks a covering outcome or basis period.
pub fn build_payout_periods(
    case: &CaseTimelines,
    catalog: &Catalog,
    formatter: &dyn DateFormatter,
) -> Result<Vec<PayoutPeriod>, PayoutError> {
    validate_timeline(TimelineKind::Awarded, &case.awarded)?;
    validate_timeline(TimelineKind::Outcome, &case.outcomes)?;
    validate_timeline(TimelineKind::Basis, &case.basis)?;

    log::debug!(
        "building payout periods from {} awarded, {} outcome and {} basis periods",
        case.awarded.len(),
        case.outcomes.len(),
        case.basis.len()
    );

    let breakdown_ctx = BreakdownContext {
        catalog,
        first_basis_start: first_basis_start(&case.basis),
        formatter,
    };

    let mut consumed = vec![false; case.outcomes.len()];
    let mut periods = Vec::with_capacity(case.awarded.len() + case.outcomes.len());

    for (index, awarded) in case.awarded.iter().enumerate() {
        let outcome_idx = position_containing(awarded, &case.outcomes, TimelineKind::Outcome)?;
        let outcome = &case.outcomes[outcome_idx];

        if !is_reportable(outcome, catalog) {
            log::trace!(
                "skipping awarded period {} - {}: outcome reason {:?} is not reported",
                awarded.from,
                awarded.to,
                outcome.reason
            );
            continue;
        }
        consumed[outcome_idx] = true;

        let basis = find_containing(awarded, &case.basis, TimelineKind::Basis)?;
        periods.push(matched_period(
            index,
            awarded,
            &case.awarded,
            outcome,
            &breakdown_ctx,
            basis,
        ));
    }

    for (outcome, _) in case
        .outcomes
        .iter()
        .zip(&consumed)
        .filter(|(_, consumed)| !**consumed)
    {
        if is_reportable(outcome, catalog) {
            log::trace!("outcome {} - {} has no awarded period", outcome.from, outcome.to);
            periods.push(outcome_only_period(outcome));
        }
    }

    periods.sort_by_key(|period| period.from);
    Ok(periods)
}

/// Build and merge the payout periods shown in a letter
pub fn map_payout_periods(
    case: &CaseTimelines,
    catalog: &Catalog,
    formatter: &dyn DateFormatter,
) -> Result<Vec<PayoutPeriod>, PayoutError> {
    let periods = build_payout_periods(case, catalog, formatter)?;
    Ok(merge_periods(&periods, catalog))
}
