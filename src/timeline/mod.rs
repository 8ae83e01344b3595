//! Case timelines: awarded payments, leave outcomes and calculation basis

mod data;
mod interval;
pub mod loader;

pub use data::{
    ActivityShare, ActivityStatus, AccountType, Arrangement, AwardedPeriod, BasisPeriodReason,
    BasisShare, CalcBasisPeriod, CaseTimelines, Employer, LeaveOutcomePeriod, OutcomeActivity,
    OutcomeActivityType, ReasonCode, UNKNOWN_REASON_CODE,
};
pub use interval::{validate_timeline, Timespan};
pub use loader::{load_case, load_case_from_reader};
