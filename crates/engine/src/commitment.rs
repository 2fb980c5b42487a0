//! Long-running financial commitments (installment plans, savings circles).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine,
    util::{normalize_optional, normalize_required},
};

/// Default commitment kind labels; free text is also accepted.
pub const COMMITMENT_KINDS: [&str; 3] = ["Savings circle", "Bank installment", "Other"];

/// A commitment paid off in fixed installments.
///
/// Invariant, re-established after every mutation:
/// `remaining == total - paid` and `completed <=> remaining <= 0`.
/// `paid` never decreases; the only way out is deleting the commitment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Commitment {
    pub id: String,
    pub kind: String,
    pub total: Money,
    pub installments_count: u32,
    pub paid: Money,
    pub remaining: Money,
    pub duration: String,
    pub due_date: NaiveDate,
    pub owner_id: String,
    pub completed: bool,
}

impl Commitment {
    /// Creates a fresh commitment with nothing paid yet.
    ///
    /// Rejects a negative total and a zero installment count.
    pub fn new(
        kind: &str,
        total: Money,
        installments_count: u32,
        duration: &str,
        due_date: NaiveDate,
        owner_id: &str,
    ) -> ResultEngine<Self> {
        if total.is_negative() {
            return Err(EngineError::Validation(
                "commitment total must not be negative".to_string(),
            ));
        }
        if installments_count == 0 {
            return Err(EngineError::Validation(
                "installment count must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            kind: normalize_required(kind, "commitment kind")?,
            total,
            installments_count,
            paid: Money::ZERO,
            remaining: total,
            duration: normalize_optional(duration),
            due_date,
            owner_id: normalize_required(owner_id, "owner id")?,
            completed: total.is_zero(),
        })
    }

    /// The fixed increment applied per payment: `total / installments_count`
    /// rounded up to a whole cent.
    ///
    /// Rounding up (instead of truncating) guarantees the commitment
    /// completes after exactly `installments_count` payments even when the
    /// total does not divide evenly; the clamp in [`pay_installment`] keeps
    /// overpayment impossible.
    ///
    /// [`pay_installment`]: Commitment::pay_installment
    #[must_use]
    pub fn installment_step(&self) -> Money {
        // The constructor rejects a zero count, but a tampered remote
        // document can still carry one; treat it as a single installment.
        let count = i64::from(self.installments_count.max(1));
        Money::new((self.total.cents() + count - 1) / count)
    }

    /// Pays one installment, producing the replacement value.
    ///
    /// Returns `None` when the commitment is already completed; callers
    /// surface that as a disabled action, not an error.
    #[must_use]
    pub fn pay_installment(&self) -> Option<Commitment> {
        if self.completed {
            return None;
        }
        let paid = (self.paid + self.installment_step()).min(self.total);
        let remaining = self.total - paid;
        Some(Self {
            paid,
            remaining,
            completed: remaining <= Money::ZERO,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commitment(total: i64, count: u32) -> Commitment {
        Commitment::new(
            "Bank installment",
            Money::new(total),
            count,
            "12 months",
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            "sara",
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_zero_installments() {
        let err = commitment_err(1200, 0);
        assert!(matches!(err, EngineError::Validation(_)));
    }

    fn commitment_err(total: i64, count: u32) -> EngineError {
        Commitment::new(
            "Bank installment",
            Money::new(total),
            count,
            "",
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            "sara",
        )
        .unwrap_err()
    }

    #[test]
    fn new_rejects_negative_total() {
        assert!(matches!(commitment_err(-1, 1), EngineError::Validation(_)));
    }

    #[test]
    fn pay_installment_advances_by_step() {
        let c = commitment(1200_00, 12);
        let paid_once = c.pay_installment().unwrap();
        assert_eq!(paid_once.paid, Money::new(100_00));
        assert_eq!(paid_once.remaining, Money::new(1100_00));
        assert!(!paid_once.completed);
    }

    #[test]
    fn completes_after_exactly_count_payments() {
        let mut c = commitment(1200_00, 12);
        for _ in 0..12 {
            c = c.pay_installment().unwrap();
        }
        assert_eq!(c.paid, Money::new(1200_00));
        assert_eq!(c.remaining, Money::ZERO);
        assert!(c.completed);
        // A thirteenth payment is a no-op.
        assert!(c.pay_installment().is_none());
    }

    #[test]
    fn uneven_totals_complete_without_overpayment() {
        // 1000 over 3 installments: step rounds up to 334, final pay clamps.
        let mut c = commitment(1000, 3);
        for _ in 0..3 {
            c = c.pay_installment().unwrap();
            assert_eq!(c.remaining, c.total - c.paid);
            assert!(c.paid <= c.total);
        }
        assert_eq!(c.paid, Money::new(1000));
        assert!(c.completed);
    }

    #[test]
    fn zero_total_is_born_completed() {
        let c = commitment(0, 4);
        assert!(c.completed);
        assert!(c.pay_installment().is_none());
    }

    #[test]
    fn tampered_zero_count_pays_as_single_installment() {
        // Bypasses the constructor, like a malformed remote document would.
        let c: Commitment = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "kind": "Other",
            "total": 500,
            "installments_count": 0,
            "paid": 0,
            "remaining": 500,
            "duration": "",
            "due_date": "2024-04-01",
            "owner_id": "sara",
            "completed": false,
        }))
        .unwrap();

        assert_eq!(c.installment_step(), Money::new(500));
        let paid = c.pay_installment().unwrap();
        assert_eq!(paid.paid, Money::new(500));
        assert!(paid.completed);
    }
}
