//! The per-user ledger document and its operations.
//!
//! A `Ledger` is the value stored at `data/{userId}`. All mutation goes
//! through the methods here; each produces the replacement collection state
//! that the sync layer then writes as one document, so concurrent observers
//! never see a half-applied transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Commitment, EngineError, Expense, Money, MonthlyRecord, ResultEngine, calc,
};

/// UI theme persisted alongside the financial state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// One user's full financial state: salary, active expenses, commitments,
/// archived history, and theme.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub salary: Money,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
    #[serde(default)]
    pub history: Vec<MonthlyRecord>,
    #[serde(default)]
    pub theme: Theme,
}

impl Ledger {
    /// Monthly salary figure; negative input is rejected, zero is fine.
    pub fn set_salary(&mut self, salary: Money) -> ResultEngine<()> {
        if salary.is_negative() {
            return Err(EngineError::Validation(
                "salary must not be negative".to_string(),
            ));
        }
        self.salary = salary;
        Ok(())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn add_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    /// Flips the paid flag of one expense. Missing id is a soft no-op
    /// (`false`): another session may have deleted it already.
    pub fn toggle_expense_paid(&mut self, id: &str) -> bool {
        match self.expenses.iter_mut().find(|e| e.id == id) {
            Some(expense) => {
                expense.paid = !expense.paid;
                true
            }
            None => false,
        }
    }

    /// Removes an expense by id; idempotent.
    pub fn delete_expense(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        self.expenses.len() != before
    }

    pub fn add_commitment(&mut self, commitment: Commitment) {
        self.commitments.push(commitment);
    }

    /// Pays one installment of the identified commitment.
    ///
    /// Returns `false` without touching state when the commitment is missing
    /// (deletion race) or already completed (disabled action).
    pub fn pay_installment(&mut self, id: &str) -> bool {
        let Some(slot) = self.commitments.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        match slot.pay_installment() {
            Some(updated) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Removes a commitment by id; idempotent.
    pub fn delete_commitment(&mut self, id: &str) -> bool {
        let before = self.commitments.len();
        self.commitments.retain(|c| c.id != id);
        self.commitments.len() != before
    }

    /// Archives the current month: snapshots the active expenses into a new
    /// [`MonthlyRecord`] prepended to history (most recent first) and clears
    /// the active list. Archiving an empty list is allowed and yields a
    /// valid, empty record. The salary figure itself is untouched.
    pub fn archive_month(&mut self, owner_id: &str, now: DateTime<Utc>) -> &MonthlyRecord {
        let total = calc::active_expense_total(&self.expenses);
        let record = MonthlyRecord::new(
            self.salary,
            total,
            std::mem::take(&mut self.expenses),
            owner_id,
            now,
        );
        self.history.insert(0, record);
        &self.history[0]
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn ledger_with_expenses(values: &[(i64, bool)]) -> Ledger {
        let mut ledger = Ledger::default();
        for (value, paid) in values {
            let mut e = Expense::new("Gas", "Gas", Money::new(*value), due(), "sara").unwrap();
            e.paid = *paid;
            ledger.add_expense(e);
        }
        ledger
    }

    #[test]
    fn set_salary_rejects_negative() {
        let mut ledger = Ledger::default();
        assert!(ledger.set_salary(Money::new(-1)).is_err());
        assert_eq!(ledger.salary, Money::ZERO);
        ledger.set_salary(Money::new(4000_00)).unwrap();
        assert_eq!(ledger.salary, Money::new(4000_00));
    }

    #[test]
    fn toggle_and_delete_are_soft_on_missing_ids() {
        let mut ledger = ledger_with_expenses(&[(100, false)]);
        assert!(!ledger.toggle_expense_paid("no-such-id"));
        assert!(!ledger.delete_expense("no-such-id"));
        assert!(!ledger.delete_commitment("no-such-id"));
        assert!(!ledger.pay_installment("no-such-id"));
        assert_eq!(ledger.expenses.len(), 1);
    }

    #[test]
    fn delete_expense_is_idempotent() {
        let mut ledger = ledger_with_expenses(&[(100, false)]);
        let id = ledger.expenses[0].id.clone();
        assert!(ledger.delete_expense(&id));
        assert!(!ledger.delete_expense(&id));
        assert!(ledger.expenses.is_empty());
    }

    #[test]
    fn pay_installment_stops_at_completion() {
        let mut ledger = Ledger::default();
        let commitment =
            Commitment::new("Other", Money::new(300), 3, "", due(), "sara").unwrap();
        let id = commitment.id.clone();
        ledger.add_commitment(commitment);

        assert!(ledger.pay_installment(&id));
        assert!(ledger.pay_installment(&id));
        assert!(ledger.pay_installment(&id));
        let done = &ledger.commitments[0];
        assert!(done.completed);
        assert_eq!(done.paid, Money::new(300));

        let before = ledger.clone();
        assert!(!ledger.pay_installment(&id));
        assert_eq!(ledger, before);
    }

    #[test]
    fn archive_month_snapshots_and_clears() {
        // salary 4000, active expenses totaling 1500.
        let mut ledger = ledger_with_expenses(&[(1000_00, false), (500_00, false)]);
        ledger.set_salary(Money::new(4000_00)).unwrap();
        let expected = ledger.expenses.clone();

        let now = "2024-05-31T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let record = ledger.archive_month("sara", now);
        assert_eq!(record.total_expenses, Money::new(1500_00));
        assert_eq!(record.salary, Money::new(4000_00));
        assert_eq!(record.month_label, "May 2024");
        assert_eq!(record.owner_id, "sara");

        assert!(ledger.expenses.is_empty());
        assert_eq!(ledger.salary, Money::new(4000_00));
        assert_eq!(ledger.history.len(), 1);
        // Deep copy, not a shared reference.
        assert_eq!(ledger.history[0].expenses, expected);
    }

    #[test]
    fn archive_prepends_most_recent_first() {
        let mut ledger = ledger_with_expenses(&[(100, false)]);
        let april = "2024-04-30T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let may = "2024-05-31T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        ledger.archive_month("sara", april);
        ledger.archive_month("sara", may);
        assert_eq!(ledger.history[0].month_label, "May 2024");
        assert_eq!(ledger.history[1].month_label, "April 2024");
    }

    #[test]
    fn archiving_empty_ledger_yields_empty_record() {
        let mut ledger = Ledger::default();
        let now = "2024-05-31T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let record = ledger.archive_month("sara", now);
        assert_eq!(record.total_expenses, Money::ZERO);
        assert!(record.expenses.is_empty());
    }

    #[test]
    fn ledger_round_trips_through_json() {
        let mut ledger = ledger_with_expenses(&[(250, true)]);
        ledger.set_theme(Theme::Dark);
        let json = serde_json::to_value(&ledger).unwrap();
        let back: Ledger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }
}
