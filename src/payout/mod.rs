//! Payout period reconciliation: matching, breakdowns, building and merging

mod breakdown;
mod builder;
mod matcher;
mod merger;
mod natural_benefit;
mod summary;
mod types;

pub use breakdown::{build_breakdown, ActivityBreakdown, BreakdownContext};
pub use builder::{build_payout_periods, is_reportable, is_zero_day_gap_denial, map_payout_periods};
pub use matcher::{count_contained, find_containing, position_containing, try_find_containing};
pub use merger::{can_merge, merge_periods, same_activities};
pub use natural_benefit::{
    collect_natural_benefit_notices, detect_change, first_basis_start, natural_benefit_event,
    NaturalBenefitNotice,
};
pub use summary::PayoutSummary;
pub use types::{
    EmploymentBreakdown, NaturalBenefitChange, NaturalBenefitEvent, OtherActivityBreakdown, PayoutPeriod,
    Percentage, SelfEmployedBreakdown,
};
