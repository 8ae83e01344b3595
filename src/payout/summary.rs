//! Letter-level aggregates over the final payout sequence

use super::types::PayoutPeriod;
use crate::catalog::Catalog;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Figures a decision letter states next to its payout table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutSummary {
    /// First day of the benefit period (earliest approved start)
    pub benefit_from: Option<NaiveDate>,

    /// Last day of the benefit period (latest approved end)
    pub benefit_to: Option<NaiveDate>,

    pub period_count: usize,
    pub approved_count: usize,
    pub denied_count: usize,

    /// Sum of the split lost-day counts
    pub total_lost_days: Decimal,

    /// Some period was denied because a parent lacks care of the child
    pub lacks_care: bool,
}

impl PayoutSummary {
    pub fn from_periods(periods: &[PayoutPeriod], catalog: &Catalog) -> Self {
        let approved = || periods.iter().filter(|p| p.approved);
        let approved_count = approved().count();

        Self {
            benefit_from: approved().map(|p| p.from).min(),
            benefit_to: approved().map(|p| p.to).max(),
            period_count: periods.len(),
            approved_count,
            denied_count: periods.len() - approved_count,
            total_lost_days: periods.iter().map(|p| p.lost_days_fraction).sum(),
            lacks_care: periods.iter().any(|p| catalog.is_lack_of_care(&p.reason)),
        }
    }
}
