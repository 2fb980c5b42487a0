//! Derived ledger values.
//!
//! Pure, side-effect-free functions over the in-memory collections. They are
//! recomputed on every state change rather than cached: a remote-origin
//! mutation can land at any time and a cache would go stale.

use chrono::NaiveDate;

use crate::{Commitment, Expense, Ledger, Money};

/// Aggregate totals across all commitments, completed or not.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitmentTotals {
    pub total: Money,
    pub remaining: Money,
}

/// Everything the presentation layer needs in one value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerSummary {
    pub salary: Money,
    pub active_expense_total: Money,
    pub balance: Money,
    pub commitments: CommitmentTotals,
    pub due_today: bool,
}

/// Sum of `value` over expenses that are not yet paid.
#[must_use]
pub fn active_expense_total(expenses: &[Expense]) -> Money {
    expenses
        .iter()
        .filter(|e| !e.paid)
        .map(|e| e.value)
        .sum()
}

/// Remaining money after active expenses. Negative is a valid, displayed
/// state, not an error.
#[must_use]
pub fn balance(salary: Money, active_total: Money) -> Money {
    salary - active_total
}

#[must_use]
pub fn commitment_totals(commitments: &[Commitment]) -> CommitmentTotals {
    CommitmentTotals {
        total: commitments.iter().map(|c| c.total).sum(),
        remaining: commitments.iter().map(|c| c.remaining).sum(),
    }
}

/// Attention signal: anything unpaid or incomplete falls due today.
#[must_use]
pub fn has_due_today(
    expenses: &[Expense],
    commitments: &[Commitment],
    today: NaiveDate,
) -> bool {
    expenses.iter().any(|e| !e.paid && e.due_date == today)
        || commitments
            .iter()
            .any(|c| !c.completed && c.due_date == today)
}

/// Computes the full summary for one ledger.
#[must_use]
pub fn summarize(ledger: &Ledger, today: NaiveDate) -> LedgerSummary {
    let active = active_expense_total(&ledger.expenses);
    LedgerSummary {
        salary: ledger.salary,
        active_expense_total: active,
        balance: balance(ledger.salary, active),
        commitments: commitment_totals(&ledger.commitments),
        due_today: has_due_today(&ledger.expenses, &ledger.commitments, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(value: i64, paid: bool, due: NaiveDate) -> Expense {
        let mut e = Expense::new("Water", "Water", Money::new(value), due, "sara").unwrap();
        e.paid = paid;
        e
    }

    fn commitment(total: i64, due: NaiveDate) -> Commitment {
        Commitment::new("Other", Money::new(total), 10, "", due, "sara").unwrap()
    }

    #[test]
    fn active_total_ignores_paid_expenses() {
        let today = date(2024, 5, 1);
        let expenses = vec![
            expense(1200_00, false, today),
            expense(300_00, true, today),
        ];
        assert_eq!(active_expense_total(&expenses), Money::new(1200_00));

        // Adding another paid expense never changes the total.
        let mut more = expenses.clone();
        more.push(expense(999_00, true, today));
        assert_eq!(active_expense_total(&more), Money::new(1200_00));
    }

    #[test]
    fn balance_scenario() {
        // salary 5000, one unpaid 1200 and one paid 300.
        let today = date(2024, 5, 1);
        let expenses = vec![
            expense(1200_00, false, today),
            expense(300_00, true, today),
        ];
        let active = active_expense_total(&expenses);
        assert_eq!(active, Money::new(1200_00));
        assert_eq!(balance(Money::new(5000_00), active), Money::new(3800_00));
    }

    #[test]
    fn balance_may_go_negative() {
        assert_eq!(
            balance(Money::new(100), Money::new(250)),
            Money::new(-150)
        );
    }

    #[test]
    fn commitment_totals_include_completed() {
        let due = date(2024, 6, 1);
        let open = commitment(1000, due);
        let mut done = commitment(500, due);
        done = done.pay_installment().unwrap();
        while !done.completed {
            done = done.pay_installment().unwrap();
        }
        let totals = commitment_totals(&[open, done]);
        assert_eq!(totals.total, Money::new(1500));
        assert_eq!(totals.remaining, Money::new(1000));
    }

    #[test]
    fn due_today_flags_unpaid_and_incomplete_only() {
        let today = date(2024, 5, 10);
        let other_day = date(2024, 5, 11);

        assert!(has_due_today(&[expense(10, false, today)], &[], today));
        assert!(!has_due_today(&[expense(10, true, today)], &[], today));
        assert!(!has_due_today(&[expense(10, false, other_day)], &[], today));

        assert!(has_due_today(&[], &[commitment(10, today)], today));
        let mut done = commitment(10, today);
        while let Some(next) = done.pay_installment() {
            done = next;
        }
        assert!(!has_due_today(&[], &[done], today));
    }
}
