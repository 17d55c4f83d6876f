//! Memory budget accounting.
//!
//! The effects were sized for a device with 20 KiB of application RAM. This
//! is a bookkeeping layer only: state lives in ordinary Rust containers, and
//! callers charge the budget with what those containers would occupy on the
//! device so overruns show up in the logs.

use log::{debug, warn};
use thiserror::Error;

pub const DEVICE_RAM_BYTES: usize = 20 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label} needs {requested} bytes but only {available} of {capacity} remain")]
pub struct BudgetError {
    pub label: String,
    pub requested: usize,
    pub available: usize,
    pub capacity: usize,
}

#[derive(Debug, Clone)]
pub struct MemoryBudget {
    capacity: usize,
    used: usize,
    charges: Vec<(String, usize)>,
}

impl MemoryBudget {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            used: 0,
            charges: Vec::new(),
        }
    }

    /// Record `bytes` against the budget. An overrun is rejected and leaves
    /// the budget unchanged.
    pub fn charge(&mut self, label: &str, bytes: usize) -> Result<(), BudgetError> {
        let available = self.remaining();
        if bytes > available {
            warn!("memory budget exceeded by {}: {} > {}", label, bytes, available);
            return Err(BudgetError {
                label: label.to_string(),
                requested: bytes,
                available,
                capacity: self.capacity,
            });
        }

        self.used += bytes;
        self.charges.push((label.to_string(), bytes));
        debug!("{} charged {} bytes ({}/{})", label, bytes, self.used, self.capacity);
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    pub fn charges(&self) -> &[(String, usize)] {
        &self.charges
    }
}

impl Default for MemoryBudget {
    fn default() -> Self {
        Self::new(DEVICE_RAM_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charges_accumulate() {
        let mut budget = MemoryBudget::new(100);
        budget.charge("stars", 60).unwrap();
        budget.charge("view", 40).unwrap();
        assert_eq!(budget.used(), 100);
        assert_eq!(budget.remaining(), 0);
        assert_eq!(budget.charges().len(), 2);
    }

    #[test]
    fn test_overrun_is_rejected() {
        let mut budget = MemoryBudget::new(100);
        budget.charge("stars", 80).unwrap();
        let err = budget.charge("trail", 30).unwrap_err();
        assert_eq!(err.available, 20);
        assert_eq!(err.requested, 30);
        assert_eq!(budget.used(), 80);
        assert!(err.to_string().contains("trail"));
    }

    #[test]
    fn test_default_is_device_ram() {
        assert_eq!(MemoryBudget::default().capacity(), 20480);
    }
}
