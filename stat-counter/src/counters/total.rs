use crate::{Result, StatCounter};

/// A lifetime accumulator without any decay.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TotalCounter {
    total: i64,
}

impl TotalCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatCounter for TotalCounter {
    fn event(&mut self, delta: i64) -> Result<()> {
        self.total = self.total.saturating_add(delta);
        Ok(())
    }

    /// Overwrite the running total.
    fn value(&mut self, value: i64) {
        self.total = value;
    }

    fn sum(&mut self) -> i64 {
        self.total
    }

    /// The average of a single running value is the value itself.
    fn avg(&mut self) -> f64 {
        self.total as f64
    }

    fn is_empty(&mut self) -> bool {
        self.total == 0
    }
}
