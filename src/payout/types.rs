//! Output types for reconciled payout periods

use crate::timeline::{AccountType, ActivityStatus, ReasonCode};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payout percentage in the range 0 to 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(Decimal);

impl Percentage {
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);
    pub const FULL: Percentage = Percentage(Decimal::ONE_HUNDRED);

    /// Clamp a raw value into 0..=100
    pub fn clamped(value: Decimal) -> Self {
        Self(value.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Direction of a natural-benefit change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NaturalBenefitChange {
    /// A benefit was added
    Start,
    /// A benefit fell away
    Stop,
}

/// A natural benefit starting or stopping at a basis period boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalBenefitEvent {
    pub change: NaturalBenefitChange,

    /// Start of the basis period the change belongs to
    pub date: NaiveDate,

    /// `date` formatted for the letter language
    pub date_text: String,

    /// Daily rate of the basis period from the change onward
    pub new_daily_rate: i64,
}

/// Employment share of a payout period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentBreakdown {
    /// Employer name, or the generic share label when unknown
    pub employer_name: String,

    pub employer_id: Option<String>,

    /// Daily rate paid for this employment
    pub daily_rate: i64,

    /// Position percentage of the employment
    pub position_percentage: Decimal,

    /// Work percentage while receiving benefit (from the leave outcome)
    pub work_percentage: Option<Decimal>,

    /// Share of the full daily rate paid out (from the leave outcome)
    pub payout_percentage: Option<Decimal>,

    pub graduated: bool,

    pub natural_benefit: Option<NaturalBenefitEvent>,
}

/// Self-employment share of a payout period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfEmployedBreakdown {
    /// Daily rate from the calculation basis
    pub daily_rate: Option<i64>,

    /// Last tax-assessed year used in the calculation basis
    pub last_assessed_year: Option<i32>,

    pub work_percentage: Option<Decimal>,
    pub payout_percentage: Option<Decimal>,
    pub graduated: bool,
}

/// Any other activity's share of a payout period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherActivityBreakdown {
    pub status: ActivityStatus,
    pub daily_rate: i64,
    pub work_percentage: Option<Decimal>,
    pub payout_percentage: Option<Decimal>,
    pub graduated: bool,
}

impl OtherActivityBreakdown {
    /// Label used in letters
    pub fn status_label(&self) -> &'static str {
        self.status.as_str()
    }
}

/// One period of the letter's payout table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,

    pub approved: bool,

    /// Reason code shown in the letter (`"-"` when unknown)
    pub reason: ReasonCode,

    /// Whole days drawn from the account without payout
    pub lost_days: u32,

    /// Lost days after splitting across awarded periods (2 decimals)
    pub lost_days_fraction: Decimal,

    /// Total daily rate, absent for periods without payment
    pub daily_rate: Option<i64>,

    pub employment: Vec<EmploymentBreakdown>,
    pub self_employed: Option<SelfEmployedBreakdown>,
    pub other_activities: Vec<OtherActivityBreakdown>,

    /// The payout percentage that best represents the period
    pub prioritized_payout_percentage: Percentage,

    pub account: AccountType,
}

impl PayoutPeriod {
    /// Whether `next` starts on the day after this period ends
    pub fn is_followed_by(&self, next: &PayoutPeriod) -> bool {
        self.to.succ_opt() == Some(next.from)
    }
}
