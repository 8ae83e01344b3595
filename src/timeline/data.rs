//! Input period records for the three case timelines

use super::interval::Timespan;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Code used upstream for "no reason given"
pub const UNKNOWN_REASON_CODE: &str = "-";

/// Legal reason code attached to a leave outcome (e.g. "4040")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasonCode(String);

impl ReasonCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The placeholder code used when no reason is known
    pub fn unknown() -> Self {
        Self(UNKNOWN_REASON_CODE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        let code = self.0.trim();
        code.is_empty() || code == UNKNOWN_REASON_CODE
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Activity status of an awarded or basis share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    /// Ordinary employee
    Employee,
    /// Freelancer
    Freelancer,
    /// Self-employed business owner
    SelfEmployed,
    /// Unemployment benefit recipient
    DailyAllowance,
    /// Work assessment allowance recipient
    WorkAssessmentAllowance,
    /// Military or civil service
    MilitaryService,
    /// Anything the upstream system does not classify further
    #[serde(other)]
    Other,
}

impl ActivityStatus {
    /// Label used in letters and in the catalog files
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Employee => "EMPLOYEE",
            ActivityStatus::Freelancer => "FREELANCER",
            ActivityStatus::SelfEmployed => "SELF_EMPLOYED",
            ActivityStatus::DailyAllowance => "DAILY_ALLOWANCE",
            ActivityStatus::WorkAssessmentAllowance => "WORK_ASSESSMENT_ALLOWANCE",
            ActivityStatus::MilitaryService => "MILITARY_SERVICE",
            ActivityStatus::Other => "OTHER",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "EMPLOYEE" => Some(ActivityStatus::Employee),
            "FREELANCER" => Some(ActivityStatus::Freelancer),
            "SELF_EMPLOYED" => Some(ActivityStatus::SelfEmployed),
            "DAILY_ALLOWANCE" => Some(ActivityStatus::DailyAllowance),
            "WORK_ASSESSMENT_ALLOWANCE" => Some(ActivityStatus::WorkAssessmentAllowance),
            "MILITARY_SERVICE" => Some(ActivityStatus::MilitaryService),
            "OTHER" => Some(ActivityStatus::Other),
            _ => None,
        }
    }
}

/// Activity type as recorded on a leave outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeActivityType {
    OrdinaryWork,
    Freelance,
    SelfEmployed,
    #[serde(other)]
    Other,
}

impl OutcomeActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeActivityType::OrdinaryWork => "ORDINARY_WORK",
            OutcomeActivityType::Freelance => "FREELANCE",
            OutcomeActivityType::SelfEmployed => "SELF_EMPLOYED",
            OutcomeActivityType::Other => "OTHER",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "ORDINARY_WORK" => Some(OutcomeActivityType::OrdinaryWork),
            "FREELANCE" => Some(OutcomeActivityType::Freelance),
            "SELF_EMPLOYED" => Some(OutcomeActivityType::SelfEmployed),
            "OTHER" => Some(OutcomeActivityType::Other),
            _ => None,
        }
    }
}

/// Benefit account the leave days are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    MaternalQuota,
    PaternalQuota,
    SharedPeriod,
    ParentalBenefit,
    PreBirth,
    FlexibleExtension,
    #[default]
    #[serde(other)]
    Undefined,
}

/// Employer behind an employment share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employer {
    /// Organisation number or person id
    pub id: String,
    /// Display name used in letters
    pub name: String,
}

/// One activity's share of an awarded period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityShare {
    pub status: ActivityStatus,

    #[serde(default)]
    pub employer: Option<Employer>,

    /// Reference to a specific employment arrangement with the employer
    #[serde(default)]
    pub arrangement_ref: Option<String>,

    /// Daily rate paid for this share
    pub daily_rate: i64,

    /// Position percentage of the employment
    #[serde(default)]
    pub position_percentage: Decimal,
}

/// A period of awarded payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardedPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,

    /// Total daily rate for the period
    #[serde(default)]
    pub daily_rate: Option<i64>,

    #[serde(default)]
    pub shares: Vec<ActivityShare>,
}

impl Timespan for AwardedPeriod {
    fn start(&self) -> NaiveDate {
        self.from
    }
    fn end(&self) -> Option<NaiveDate> {
        Some(self.to)
    }
}

/// Per-activity result within a leave outcome period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeActivity {
    pub activity_type: OutcomeActivityType,

    #[serde(default)]
    pub employer_id: Option<String>,

    #[serde(default)]
    pub arrangement_ref: Option<String>,

    #[serde(default)]
    pub payout_percentage: Decimal,

    #[serde(default)]
    pub work_percentage: Decimal,

    #[serde(default)]
    pub graduation_granted: bool,

    /// Days drawn from the account (may be fractional)
    #[serde(default)]
    pub lost_days: Decimal,

    #[serde(default)]
    pub graduation_denial_reason: Option<ReasonCode>,

    #[serde(default)]
    pub account: AccountType,
}

/// A period of approved or denied leave
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveOutcomePeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,

    pub approved: bool,

    #[serde(default)]
    pub reason: Option<ReasonCode>,

    #[serde(default)]
    pub activities: Vec<OutcomeActivity>,

    /// Set on hull-type denials whose days were counted against the account
    #[serde(default)]
    pub counted_stop_gap: Option<bool>,
}

impl LeaveOutcomePeriod {
    /// True when the period carries a usable reason code
    pub fn has_known_reason(&self) -> bool {
        self.reason.as_ref().is_some_and(|r| !r.is_unknown())
    }

    /// No activity was granted graduation and a denial reason is recorded
    pub fn graduation_denied(&self) -> bool {
        !self.activities.iter().any(|a| a.graduation_granted) && self.graduation_denial_reason().is_some()
    }

    /// First known graduation-denial reason among the activities
    pub fn graduation_denial_reason(&self) -> Option<&ReasonCode> {
        self.activities
            .iter()
            .filter_map(|a| a.graduation_denial_reason.as_ref())
            .find(|r| !r.is_unknown())
    }

    /// Whole lost days for the period
    ///
    /// Days only count as lost when no activity received any payout; the
    /// count is then the largest per-activity value, truncated.
    pub fn lost_days(&self) -> u32 {
        let nothing_paid = self.activities.iter().all(|a| a.payout_percentage.is_zero());
        if !nothing_paid {
            return 0;
        }
        self.activities
            .iter()
            .map(|a| a.lost_days)
            .max()
            .map(|days| days.trunc().to_u32().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Account of the first activity, or `Undefined`
    pub fn account(&self) -> AccountType {
        self.activities.first().map(|a| a.account).unwrap_or_default()
    }
}

impl Timespan for LeaveOutcomePeriod {
    fn start(&self) -> NaiveDate {
        self.from
    }
    fn end(&self) -> Option<NaiveDate> {
        Some(self.to)
    }
}

/// Reason a calculation-basis period starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BasisPeriodReason {
    NaturalBenefitLost,
    NaturalBenefitGained,
    NewEmployment,
    EmploymentEnded,
    GraduationStarted,
    GraduationEnded,
    #[serde(other)]
    Other,
}

/// Employment arrangement details on a basis share
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    #[serde(default)]
    pub arrangement_ref: Option<String>,

    /// Yearly value of natural benefits that fell away
    #[serde(default)]
    pub natural_benefit_lost_per_year: Option<Decimal>,

    /// Yearly value of natural benefits that were added
    #[serde(default)]
    pub natural_benefit_gained_per_year: Option<Decimal>,
}

impl Arrangement {
    pub fn has_natural_benefit(&self) -> bool {
        self.natural_benefit_lost_per_year.is_some() || self.natural_benefit_gained_per_year.is_some()
    }
}

/// One activity's share of a calculation-basis period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasisShare {
    pub status: ActivityStatus,

    #[serde(default)]
    pub employer: Option<Employer>,

    #[serde(default)]
    pub arrangement: Option<Arrangement>,

    #[serde(default)]
    pub daily_rate: Option<i64>,

    /// Last tax-assessed year (self-employment only)
    #[serde(default)]
    pub last_assessed_year: Option<i32>,
}

/// A period of the calculation basis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcBasisPeriod {
    pub from: NaiveDate,

    /// `None` for an open-ended final period
    #[serde(default)]
    pub to: Option<NaiveDate>,

    pub daily_rate: i64,

    #[serde(default)]
    pub gross_per_year: Decimal,

    #[serde(default)]
    pub reduced_per_year: Decimal,

    #[serde(default)]
    pub reasons: Vec<BasisPeriodReason>,

    #[serde(default)]
    pub shares: Vec<BasisShare>,
}

impl Timespan for CalcBasisPeriod {
    fn start(&self) -> NaiveDate {
        self.from
    }
    fn end(&self) -> Option<NaiveDate> {
        self.to
    }
}

/// The three timelines of one case
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseTimelines {
    #[serde(default)]
    pub awarded: Vec<AwardedPeriod>,

    #[serde(default)]
    pub outcomes: Vec<LeaveOutcomePeriod>,

    #[serde(default)]
    pub basis: Vec<CalcBasisPeriod>,
}
