//! Local persisted fallback.
//!
//! The non-networked variant of the tracker keeps a single namespaced JSON
//! blob on disk: read once at startup, rewritten on every state change. The
//! blob carries the financial state only; the theme lives in the remote
//! document and defaults when restoring from disk.

use std::{fs, path::Path};

use engine::{Commitment, Expense, Ledger, Money, MonthlyRecord};
use serde::{Deserialize, Serialize};

use crate::ResultSync;

const DEFAULT_STATE_PATH: &str = "config/masareef_state.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalState {
    #[serde(default)]
    pub salary: Money,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
    #[serde(default)]
    pub history: Vec<MonthlyRecord>,
}

impl LocalState {
    /// Loads the blob; a missing file is the empty state, not an error.
    pub fn load(path: &str) -> ResultSync<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> ResultSync<()> {
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            salary: ledger.salary,
            expenses: ledger.expenses.clone(),
            commitments: ledger.commitments.clone(),
            history: ledger.history.clone(),
        }
    }

    #[must_use]
    pub fn into_ledger(self) -> Ledger {
        Ledger {
            salary: self.salary,
            expenses: self.expenses,
            commitments: self.commitments,
            history: self.history,
            theme: Default::default(),
        }
    }
}

#[must_use]
pub fn default_state_path() -> &'static str {
    DEFAULT_STATE_PATH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_default() {
        let state = LocalState::load("/nonexistent/masareef_state.json").unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("masareef_test_{}", std::process::id()));
        let path = dir.join("state.json").to_string_lossy().into_owned();

        let mut ledger = Ledger::default();
        ledger.set_salary(Money::new(4000_00)).unwrap();
        let state = LocalState::from_ledger(&ledger);
        state.save(&path).unwrap();

        let loaded = LocalState::load(&path).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.into_ledger().salary, Money::new(4000_00));

        let _ = std::fs::remove_dir_all(dir);
    }
}
