//! Detection of natural benefits starting or stopping
//!
//! A natural benefit (company car, phone, housing) changes the calculation
//! basis when it is added or falls away. The basis timeline marks such
//! changes either with an explicit period reason or only through the yearly
//! amounts on the employment arrangement.

use super::breakdown::{employer_label, find_basis_share};
use super::matcher::find_containing;
use super::types::{NaturalBenefitChange, NaturalBenefitEvent};
use crate::catalog::Catalog;
use crate::error::{PayoutError, TimelineKind};
use crate::format::DateFormatter;
use crate::timeline::{Arrangement, AwardedPeriod, BasisPeriodReason, BasisShare, CalcBasisPeriod};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of change signalled by an arrangement within a basis period
///
/// Explicit period reasons take precedence over the yearly amounts.
pub fn detect_change(
    arrangement: &Arrangement,
    reasons: &[BasisPeriodReason],
) -> Option<NaturalBenefitChange> {
    if reasons.contains(&BasisPeriodReason::NaturalBenefitLost) {
        return Some(NaturalBenefitChange::Stop);
    }
    if reasons.contains(&BasisPeriodReason::NaturalBenefitGained) {
        return Some(NaturalBenefitChange::Start);
    }

    match (
        arrangement.natural_benefit_lost_per_year,
        arrangement.natural_benefit_gained_per_year,
    ) {
        (Some(_), None) => Some(NaturalBenefitChange::Stop),
        (None, Some(_)) => Some(NaturalBenefitChange::Start),
        (Some(lost), Some(gained)) if gained >= lost => Some(NaturalBenefitChange::Start),
        (Some(_), Some(_)) => Some(NaturalBenefitChange::Stop),
        (None, None) => None,
    }
}

/// Event for a basis share, if its arrangement carries a natural benefit
///
/// Nothing is reported for the first basis period of the case: a benefit
/// held from day one is not a change.
pub fn natural_benefit_event(
    share: &BasisShare,
    basis: &CalcBasisPeriod,
    first_basis_start: Option<NaiveDate>,
    formatter: &dyn DateFormatter,
) -> Option<NaturalBenefitEvent> {
    let arrangement = share.arrangement.as_ref().filter(|a| a.has_natural_benefit())?;
    if first_basis_start.map_or(true, |first| first == basis.from) {
        return None;
    }

    let change = detect_change(arrangement, &basis.reasons)?;
    Some(NaturalBenefitEvent {
        change,
        date: basis.from,
        date_text: formatter.format_date(basis.from),
        new_daily_rate: basis.daily_rate,
    })
}

/// Earliest start among the basis periods
pub fn first_basis_start(basis: &[CalcBasisPeriod]) -> Option<NaiveDate> {
    basis.iter().map(|period| period.from).min()
}

/// A natural-benefit change listed on its own in a letter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalBenefitNotice {
    /// Employer the benefit belongs to
    pub employer_name: String,

    #[serde(flatten)]
    pub event: NaturalBenefitEvent,
}

/// Every natural-benefit change across the awarded timeline
///
/// One notice per change date, earliest first. When several shares change
/// on the same date the first one seen is kept.
pub fn collect_natural_benefit_notices(
    awarded: &[AwardedPeriod],
    basis: &[CalcBasisPeriod],
    catalog: &Catalog,
    formatter: &dyn DateFormatter,
) -> Result<Vec<NaturalBenefitNotice>, PayoutError> {
    let first_start = first_basis_start(basis);
    let mut notices: Vec<NaturalBenefitNotice> = Vec::new();

    for period in awarded {
        let matched_basis = find_containing(period, basis, TimelineKind::Basis)?;

        for share in &period.shares {
            let Some(basis_share) = find_basis_share(share, matched_basis) else {
                continue;
            };
            let Some(event) = natural_benefit_event(basis_share, matched_basis, first_start, formatter) else {
                continue;
            };
            if notices.iter().any(|n| n.event.date == event.date) {
                continue;
            }
            notices.push(NaturalBenefitNotice {
                employer_name: employer_label(share, catalog),
                event,
            });
        }
    }

    notices.sort_by_key(|n| n.event.date);
    Ok(notices)
}
