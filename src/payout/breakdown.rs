//! Per-activity breakdown of an awarded period
//!
//! Each awarded share is paired with its leave-outcome activity and its
//! calculation-basis share, then sorted into the three groups a letter shows:
//! employments, self-employment and other activities.

use super::natural_benefit::natural_benefit_event;
use super::types::{EmploymentBreakdown, OtherActivityBreakdown, Percentage, SelfEmployedBreakdown};
use crate::catalog::Catalog;
use crate::format::DateFormatter;
use crate::timeline::{
    ActivityShare, ActivityStatus, AwardedPeriod, BasisShare, CalcBasisPeriod, LeaveOutcomePeriod,
    OutcomeActivity,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Shared inputs for building breakdowns within one case
#[derive(Clone, Copy)]
pub struct BreakdownContext<'a> {
    pub catalog: &'a Catalog,

    /// Start of the first calculation-basis period of the case
    pub first_basis_start: Option<NaiveDate>,

    pub formatter: &'a dyn DateFormatter,
}

/// All activity groups of one payout period
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityBreakdown {
    pub employment: Vec<EmploymentBreakdown>,
    pub self_employed: Option<SelfEmployedBreakdown>,
    pub other_activities: Vec<OtherActivityBreakdown>,
}

impl ActivityBreakdown {
    /// Payout percentage that best represents the period
    ///
    /// Employments first (a graduated one, else the first paying one), then
    /// self-employment, then other activities by the same rule as employments.
    /// Capped at 100.
    pub fn prioritized_payout_percentage(&self) -> Percentage {
        let from_employment = pick_prioritized(
            self.employment
                .iter()
                .map(|e| (e.graduated, e.payout_percentage)),
        );

        let from_self_employed = || {
            self.self_employed
                .as_ref()
                .and_then(|s| s.payout_percentage)
                .filter(|p| !p.is_zero())
        };

        let from_other = || {
            pick_prioritized(
                self.other_activities
                    .iter()
                    .map(|o| (o.graduated, o.payout_percentage)),
            )
        };

        from_employment
            .or_else(from_self_employed)
            .or_else(from_other)
            .map(Percentage::clamped)
            .unwrap_or(Percentage::ZERO)
    }
}

fn pick_prioritized<I>(entries: I) -> Option<Decimal>
where
    I: Iterator<Item = (bool, Option<Decimal>)> + Clone,
{
    let graduated = entries
        .clone()
        .find(|(graduated, _)| *graduated)
        .and_then(|(_, pct)| pct);

    graduated
        .or_else(|| {
            entries
                .filter_map(|(_, pct)| pct)
                .find(|pct| !pct.is_zero())
        })
        .filter(|pct| !pct.is_zero())
}

/// Label shown for the employer of a share
pub(crate) fn employer_label(share: &ActivityShare, catalog: &Catalog) -> String {
    share
        .employer
        .as_ref()
        .map(|e| e.name.clone())
        .unwrap_or_else(|| catalog.share_label().to_string())
}

/// Leave-outcome activity belonging to an awarded share
///
/// The activity type must be the one the share's status is recorded under.
/// Employer id and arrangement reference must match when the share has them.
pub(crate) fn find_outcome_activity<'a>(
    share: &ActivityShare,
    outcome: &'a LeaveOutcomePeriod,
    catalog: &Catalog,
) -> Option<&'a OutcomeActivity> {
    let activity_type = catalog.outcome_activity_type(share.status);

    outcome.activities.iter().find(|activity| {
        if activity.activity_type != activity_type {
            return false;
        }
        if let Some(employer) = &share.employer {
            if activity.employer_id.as_deref() != Some(employer.id.as_str()) {
                return false;
            }
        }
        match &share.arrangement_ref {
            Some(reference) => activity.arrangement_ref.as_ref() == Some(reference),
            None => true,
        }
    })
}

/// Calculation-basis share belonging to an awarded share
///
/// Same status and the same employer. Self-employment has no employer and
/// matches on status alone; any other share without an employer has no
/// basis share. Arrangement references only have to agree when both sides
/// carry one.
pub(crate) fn find_basis_share<'a>(
    share: &ActivityShare,
    basis: &'a CalcBasisPeriod,
) -> Option<&'a BasisShare> {
    basis.shares.iter().find(|candidate| {
        if candidate.status != share.status {
            return false;
        }
        let Some(employer) = &share.employer else {
            return share.status == ActivityStatus::SelfEmployed;
        };
        let same_employer = candidate
            .employer
            .as_ref()
            .is_some_and(|e| e.id == employer.id);

        let candidate_ref = candidate
            .arrangement
            .as_ref()
            .and_then(|a| a.arrangement_ref.as_ref());
        let compatible_ref = match (&share.arrangement_ref, candidate_ref) {
            (Some(own), Some(theirs)) => own == theirs,
            _ => true,
        };

        same_employer && compatible_ref
    })
}

fn employment_breakdown(
    share: &ActivityShare,
    outcome: &LeaveOutcomePeriod,
    basis: &CalcBasisPeriod,
    ctx: &BreakdownContext<'_>,
) -> EmploymentBreakdown {
    let activity = find_outcome_activity(share, outcome, ctx.catalog);
    let natural_benefit = find_basis_share(share, basis)
        .and_then(|basis_share| natural_benefit_event(basis_share, basis, ctx.first_basis_start, ctx.formatter));

    EmploymentBreakdown {
        employer_name: employer_label(share, ctx.catalog),
        employer_id: share.employer.as_ref().map(|e| e.id.clone()),
        daily_rate: share.daily_rate,
        position_percentage: share.position_percentage,
        work_percentage: activity.map(|a| a.work_percentage),
        payout_percentage: activity.map(|a| a.payout_percentage),
        graduated: activity.is_some_and(|a| a.graduation_granted),
        natural_benefit,
    }
}

fn self_employed_breakdown(
    share: &ActivityShare,
    outcome: &LeaveOutcomePeriod,
    basis: &CalcBasisPeriod,
    catalog: &Catalog,
) -> SelfEmployedBreakdown {
    let activity = find_outcome_activity(share, outcome, catalog);
    let basis_share = find_basis_share(share, basis);

    SelfEmployedBreakdown {
        daily_rate: basis_share.and_then(|b| b.daily_rate),
        last_assessed_year: basis_share.and_then(|b| b.last_assessed_year),
        work_percentage: activity.map(|a| a.work_percentage),
        payout_percentage: activity.map(|a| a.payout_percentage),
        graduated: activity.is_some_and(|a| a.graduation_granted),
    }
}

fn other_activity_breakdown(
    share: &ActivityShare,
    outcome: &LeaveOutcomePeriod,
    catalog: &Catalog,
) -> OtherActivityBreakdown {
    let activity = find_outcome_activity(share, outcome, catalog);

    OtherActivityBreakdown {
        status: share.status,
        daily_rate: share.daily_rate,
        work_percentage: activity.map(|a| a.work_percentage),
        payout_percentage: activity.map(|a| a.payout_percentage),
        graduated: activity.is_some_and(|a| a.graduation_granted),
    }
}

/// Build the activity groups for one matched triple
///
/// Employment and other-activity entries are ordered graduated first; the
/// sort is stable so the awarded share order is kept otherwise. Only the
/// first self-employment share is reported.
pub fn build_breakdown(
    awarded: &AwardedPeriod,
    outcome: &LeaveOutcomePeriod,
    basis: &CalcBasisPeriod,
    ctx: &BreakdownContext<'_>,
) -> ActivityBreakdown {
    let mut breakdown = ActivityBreakdown::default();

    for share in &awarded.shares {
        match share.status {
            ActivityStatus::Employee => {
                breakdown
                    .employment
                    .push(employment_breakdown(share, outcome, basis, ctx));
            }
            ActivityStatus::SelfEmployed => {
                if breakdown.self_employed.is_none() {
                    breakdown.self_employed =
                        Some(self_employed_breakdown(share, outcome, basis, ctx.catalog));
                }
            }
            _ => {
                breakdown
                    .other_activities
                    .push(other_activity_breakdown(share, outcome, ctx.catalog));
            }
        }
    }

    breakdown.employment.sort_by_key(|e| !e.graduated);
    breakdown.other_activities.sort_by_key(|o| !o.graduated);
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::LocaleDateFormatter;
    use crate::payout::types::NaturalBenefitChange;
    use crate::timeline::{AccountType, Arrangement, BasisPeriodReason, Employer, OutcomeActivityType, ReasonCode};
    use rust_decimal_macros::dec;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, month, day).unwrap()
    }

    fn employer(id: &str, name: &str) -> Employer {
        Employer {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn share(status: ActivityStatus, employer: Option<Employer>, daily_rate: i64) -> ActivityShare {
        ActivityShare {
            status,
            employer,
            arrangement_ref: None,
            daily_rate,
            position_percentage: dec!(100),
        }
    }

    fn activity(
        activity_type: OutcomeActivityType,
        employer_id: Option<&str>,
        payout: Decimal,
        graduated: bool,
    ) -> OutcomeActivity {
        OutcomeActivity {
            activity_type,
            employer_id: employer_id.map(str::to_string),
            arrangement_ref: None,
            payout_percentage: payout,
            work_percentage: if graduated { dec!(100) - payout } else { Decimal::ZERO },
            graduation_granted: graduated,
            lost_days: Decimal::ZERO,
            graduation_denial_reason: None,
            account: AccountType::SharedPeriod,
        }
    }

    fn outcome(activities: Vec<OutcomeActivity>) -> LeaveOutcomePeriod {
        LeaveOutcomePeriod {
            from: d(3, 1),
            to: d(3, 31),
            approved: true,
            reason: Some(ReasonCode::new("2003")),
            activities,
            counted_stop_gap: None,
        }
    }

    fn basis(from: NaiveDate, shares: Vec<BasisShare>) -> CalcBasisPeriod {
        CalcBasisPeriod {
            from,
            to: None,
            daily_rate: 2100,
            gross_per_year: dec!(546000),
            reduced_per_year: dec!(546000),
            reasons: vec![],
            shares,
        }
    }

    fn awarded(shares: Vec<ActivityShare>) -> AwardedPeriod {
        AwardedPeriod {
            from: d(3, 1),
            to: d(3, 31),
            daily_rate: Some(shares.iter().map(|s| s.daily_rate).sum()),
            shares,
        }
    }

    fn with_context<R>(first_basis_start: Option<NaiveDate>, f: impl FnOnce(&BreakdownContext<'_>) -> R) -> R {
        let catalog = Catalog::default();
        let formatter = LocaleDateFormatter::default();
        let ctx = BreakdownContext {
            catalog: &catalog,
            first_basis_start,
            formatter: &formatter,
        };
        f(&ctx)
    }

    #[test]
    fn test_groups_shares_by_status() {
        let awarded = awarded(vec![
            share(ActivityStatus::Employee, Some(employer("1", "Bakeriet AS")), 800),
            share(ActivityStatus::SelfEmployed, None, 500),
            share(ActivityStatus::Freelancer, None, 300),
            share(ActivityStatus::DailyAllowance, None, 200),
        ]);
        let outcome = outcome(vec![
            activity(OutcomeActivityType::OrdinaryWork, Some("1"), dec!(100), false),
            activity(OutcomeActivityType::SelfEmployed, None, dec!(100), false),
            activity(OutcomeActivityType::Freelance, None, dec!(100), false),
        ]);
        let basis = basis(
            d(1, 1),
            vec![BasisShare {
                status: ActivityStatus::SelfEmployed,
                employer: None,
                arrangement: None,
                daily_rate: Some(510),
                last_assessed_year: Some(2019),
            }],
        );

        let result = with_context(Some(d(1, 1)), |ctx| build_breakdown(&awarded, &outcome, &basis, ctx));

        assert_eq!(result.employment.len(), 1);
        assert_eq!(result.employment[0].employer_name, "Bakeriet AS");
        assert_eq!(result.employment[0].daily_rate, 800);
        assert_eq!(result.employment[0].payout_percentage, Some(dec!(100)));

        let self_employed = result.self_employed.expect("self-employment missing");
        assert_eq!(self_employed.daily_rate, Some(510));
        assert_eq!(self_employed.last_assessed_year, Some(2019));
        assert_eq!(self_employed.payout_percentage, Some(dec!(100)));

        assert_eq!(result.other_activities.len(), 2);
        assert_eq!(result.other_activities[0].status_label(), "FREELANCER");
        assert_eq!(result.other_activities[0].payout_percentage, Some(dec!(100)));
        // Daily allowance is recorded under OTHER, which has no outcome activity here
        assert_eq!(result.other_activities[1].payout_percentage, None);
    }

    #[test]
    fn test_unknown_employer_uses_share_label() {
        let awarded = awarded(vec![share(ActivityStatus::Employee, None, 900)]);
        let outcome = outcome(vec![activity(OutcomeActivityType::OrdinaryWork, None, dec!(80), false)]);
        let basis = basis(d(1, 1), vec![]);

        let result = with_context(Some(d(1, 1)), |ctx| build_breakdown(&awarded, &outcome, &basis, ctx));

        assert_eq!(result.employment[0].employer_name, "Andel");
        assert_eq!(result.employment[0].employer_id, None);
        assert_eq!(result.employment[0].payout_percentage, Some(dec!(80)));
        assert!(result.employment[0].natural_benefit.is_none());
    }

    #[test]
    fn test_share_without_employer_ignores_other_employers_natural_benefit() {
        let awarded = awarded(vec![share(ActivityStatus::Employee, None, 900)]);
        let outcome = outcome(vec![activity(OutcomeActivityType::OrdinaryWork, None, dec!(100), false)]);
        let basis = basis(
            d(3, 1),
            vec![BasisShare {
                status: ActivityStatus::Employee,
                employer: Some(employer("1", "Bakeriet AS")),
                arrangement: Some(Arrangement {
                    arrangement_ref: None,
                    natural_benefit_lost_per_year: Some(dec!(6000)),
                    natural_benefit_gained_per_year: None,
                }),
                daily_rate: Some(900),
                last_assessed_year: None,
            }],
        );

        assert!(find_basis_share(&awarded.shares[0], &basis).is_none());

        let result = with_context(Some(d(1, 1)), |ctx| build_breakdown(&awarded, &outcome, &basis, ctx));
        assert_eq!(result.employment[0].employer_name, "Andel");
        assert!(result.employment[0].natural_benefit.is_none());
    }

    #[test]
    fn test_self_employed_basis_share_matches_on_status() {
        let self_employed = share(ActivityStatus::SelfEmployed, None, 500);
        let freelancer = share(ActivityStatus::Freelancer, None, 300);
        let basis = basis(
            d(1, 1),
            vec![
                BasisShare {
                    status: ActivityStatus::Freelancer,
                    employer: None,
                    arrangement: None,
                    daily_rate: Some(300),
                    last_assessed_year: None,
                },
                BasisShare {
                    status: ActivityStatus::SelfEmployed,
                    employer: None,
                    arrangement: None,
                    daily_rate: Some(510),
                    last_assessed_year: Some(2019),
                },
            ],
        );

        let found = find_basis_share(&self_employed, &basis).expect("self-employed basis share");
        assert_eq!(found.last_assessed_year, Some(2019));
        assert!(find_basis_share(&freelancer, &basis).is_none());
    }

    #[test]
    fn test_outcome_match_requires_same_employer() {
        let awarded = awarded(vec![share(ActivityStatus::Employee, Some(employer("2", "Verkstedet AS")), 900)]);
        let outcome = outcome(vec![activity(OutcomeActivityType::OrdinaryWork, Some("1"), dec!(100), false)]);
        let basis = basis(d(1, 1), vec![]);

        let result = with_context(Some(d(1, 1)), |ctx| build_breakdown(&awarded, &outcome, &basis, ctx));

        assert_eq!(result.employment[0].payout_percentage, None);
        assert_eq!(result.employment[0].work_percentage, None);
        assert!(!result.employment[0].graduated);
    }

    #[test]
    fn test_arrangement_reference_must_match() {
        let mut employment = share(ActivityStatus::Employee, Some(employer("1", "Bakeriet AS")), 900);
        employment.arrangement_ref = Some("ARB-2".to_string());

        let mut first = activity(OutcomeActivityType::OrdinaryWork, Some("1"), dec!(40), true);
        first.arrangement_ref = Some("ARB-1".to_string());
        let mut second = activity(OutcomeActivityType::OrdinaryWork, Some("1"), dec!(100), false);
        second.arrangement_ref = Some("ARB-2".to_string());

        let outcome = outcome(vec![first, second]);
        let found = find_outcome_activity(&employment, &outcome, &Catalog::default()).unwrap();
        assert_eq!(found.payout_percentage, dec!(100));
    }

    #[test]
    fn test_graduated_entries_sorted_first() {
        let awarded = awarded(vec![
            share(ActivityStatus::Employee, Some(employer("1", "Bakeriet AS")), 500),
            share(ActivityStatus::Employee, Some(employer("2", "Verkstedet AS")), 400),
            share(ActivityStatus::Freelancer, None, 300),
            share(ActivityStatus::MilitaryService, None, 200),
        ]);
        let outcome = outcome(vec![
            activity(OutcomeActivityType::OrdinaryWork, Some("1"), dec!(100), false),
            activity(OutcomeActivityType::OrdinaryWork, Some("2"), dec!(60), true),
            activity(OutcomeActivityType::Other, None, dec!(50), true),
        ]);
        let basis = basis(d(1, 1), vec![]);

        let result = with_context(Some(d(1, 1)), |ctx| build_breakdown(&awarded, &outcome, &basis, ctx));

        assert_eq!(result.employment[0].employer_name, "Verkstedet AS");
        assert_eq!(result.employment[1].employer_name, "Bakeriet AS");
        assert_eq!(result.other_activities[0].status, ActivityStatus::MilitaryService);
        assert_eq!(result.other_activities[1].status, ActivityStatus::Freelancer);
    }

    #[test]
    fn test_employment_natural_benefit_event() {
        let awarded = awarded(vec![share(ActivityStatus::Employee, Some(employer("1", "Bakeriet AS")), 900)]);
        let outcome = outcome(vec![activity(OutcomeActivityType::OrdinaryWork, Some("1"), dec!(100), false)]);
        let mut basis = basis(
            d(3, 1),
            vec![BasisShare {
                status: ActivityStatus::Employee,
                employer: Some(employer("1", "Bakeriet AS")),
                arrangement: Some(Arrangement {
                    arrangement_ref: None,
                    natural_benefit_lost_per_year: None,
                    natural_benefit_gained_per_year: Some(dec!(12000)),
                }),
                daily_rate: Some(2100),
                last_assessed_year: None,
            }],
        );
        basis.reasons = vec![BasisPeriodReason::NaturalBenefitGained];

        let result = with_context(Some(d(1, 1)), |ctx| build_breakdown(&awarded, &outcome, &basis, ctx));
        let event = result.employment[0].natural_benefit.as_ref().expect("event missing");
        assert_eq!(event.change, NaturalBenefitChange::Start);
        assert_eq!(event.date, d(3, 1));
        assert_eq!(event.new_daily_rate, 2100);

        let suppressed = with_context(Some(d(3, 1)), |ctx| build_breakdown(&awarded, &outcome, &basis, ctx));
        assert!(suppressed.employment[0].natural_benefit.is_none());
    }

    #[test]
    fn test_prioritized_prefers_graduated_employment() {
        let breakdown = ActivityBreakdown {
            employment: vec![
                employment_entry(Some(dec!(100)), false),
                employment_entry(Some(dec!(40)), true),
            ],
            self_employed: None,
            other_activities: vec![],
        };
        assert_eq!(breakdown.prioritized_payout_percentage().value(), dec!(40));
    }

    #[test]
    fn test_prioritized_takes_first_paying_employment() {
        let breakdown = ActivityBreakdown {
            employment: vec![
                employment_entry(Some(dec!(0)), false),
                employment_entry(Some(dec!(60)), false),
            ],
            self_employed: None,
            other_activities: vec![other_entry(Some(dec!(30)), true)],
        };
        assert_eq!(breakdown.prioritized_payout_percentage().value(), dec!(60));
    }

    #[test]
    fn test_prioritized_falls_through_groups() {
        let mut breakdown = ActivityBreakdown {
            employment: vec![employment_entry(Some(dec!(0)), false), employment_entry(None, false)],
            self_employed: Some(SelfEmployedBreakdown {
                daily_rate: Some(500),
                last_assessed_year: Some(2019),
                work_percentage: None,
                payout_percentage: Some(dec!(75)),
                graduated: false,
            }),
            other_activities: vec![other_entry(Some(dec!(30)), true)],
        };
        assert_eq!(breakdown.prioritized_payout_percentage().value(), dec!(75));

        breakdown.self_employed = None;
        assert_eq!(breakdown.prioritized_payout_percentage().value(), dec!(30));

        breakdown.other_activities.clear();
        assert_eq!(breakdown.prioritized_payout_percentage(), Percentage::ZERO);
    }

    #[test]
    fn test_prioritized_is_clamped() {
        let breakdown = ActivityBreakdown {
            employment: vec![employment_entry(Some(dec!(120)), false)],
            self_employed: None,
            other_activities: vec![],
        };
        assert_eq!(breakdown.prioritized_payout_percentage(), Percentage::FULL);
    }

    fn employment_entry(payout: Option<Decimal>, graduated: bool) -> EmploymentBreakdown {
        EmploymentBreakdown {
            employer_name: "Bakeriet AS".to_string(),
            employer_id: Some("1".to_string()),
            daily_rate: 500,
            position_percentage: dec!(100),
            work_percentage: None,
            payout_percentage: payout,
            graduated,
            natural_benefit: None,
        }
    }

    fn other_entry(payout: Option<Decimal>, graduated: bool) -> OtherActivityBreakdown {
        OtherActivityBreakdown {
            status: ActivityStatus::Freelancer,
            daily_rate: 300,
            work_percentage: None,
            payout_percentage: payout,
            graduated,
        }
    }
}
