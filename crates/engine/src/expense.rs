//! The module contains the representation of a monthly expense.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine,
    util::{normalize_optional, normalize_required},
};

/// Default category labels offered when recording an expense. Free-text
/// custom labels are also accepted.
pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 7] = [
    "Water",
    "Gas",
    "Electricity",
    "Internet",
    "Landline",
    "Savings circle",
    "Bank installment",
];

/// A recurring monthly expense inside one user's ledger.
///
/// `value` and `owner_id` are immutable after creation; the only mutations
/// the ledger performs are toggling `paid` and deletion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub name: String,
    pub category: String,
    pub value: Money,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub paid: bool,
    pub owner_id: String,
}

impl Expense {
    /// Creates a new unpaid expense, rejecting negative values and blank
    /// required fields.
    pub fn new(
        name: &str,
        category: &str,
        value: Money,
        due_date: NaiveDate,
        owner_id: &str,
    ) -> ResultEngine<Self> {
        if value.is_negative() {
            return Err(EngineError::Validation(
                "expense value must not be negative".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: normalize_required(name, "expense name")?,
            category: normalize_optional(category),
            value,
            due_date,
            paid: false,
            owner_id: normalize_required(owner_id, "owner id")?,
        })
    }
}
