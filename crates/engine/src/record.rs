//! Archived monthly snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Expense, Money};

/// A point-in-time snapshot of one month's ledger, produced by
/// [`Ledger::archive_month`] and never edited afterwards.
///
/// [`Ledger::archive_month`]: crate::Ledger::archive_month
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub id: String,
    pub month_label: String,
    pub salary: Money,
    pub total_expenses: Money,
    pub expenses: Vec<Expense>,
    pub archived_at: DateTime<Utc>,
    pub owner_id: String,
}

impl MonthlyRecord {
    pub(crate) fn new(
        salary: Money,
        total_expenses: Money,
        expenses: Vec<Expense>,
        owner_id: &str,
        archived_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            month_label: archived_at.format("%B %Y").to_string(),
            salary,
            total_expenses,
            expenses,
            archived_at,
            owner_id: owner_id.to_string(),
        }
    }
}
