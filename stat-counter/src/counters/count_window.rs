use std::collections::VecDeque;

use log::debug;

use crate::{CountWindowConfig, Result, StatCounter, DEFAULT_WINDOW_SIZE};

/// A sliding window over the last `window_size` observations.
/// The oldest observation is evicted first once the window is full.
#[derive(Debug, Clone, PartialEq)]
pub struct CountWindowCounter {
    window_size: usize,
    values: VecDeque<i64>,
}

impl CountWindowCounter {
    /// Create a new counter retaining the last `window_size` observations.
    ///
    /// It returns [crate::Error::InvalidCapacity] when the window size is `0`.
    pub fn new(window_size: usize) -> Result<Self> {
        Self::from_config(&CountWindowConfig { window_size })
    }

    /// Create a new counter from the given config.
    pub fn from_config(config: &CountWindowConfig) -> Result<Self> {
        config.validate()?;
        debug!("Creating count window counter with {}", config);
        Ok(Self {
            window_size: config.window_size,
            values: VecDeque::with_capacity(config.window_size),
        })
    }

    /// Returns the maximum amount of retained observations.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns the amount of currently retained observations.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    fn push(&mut self, value: i64) {
        self.values.push_back(value);
        if self.values.len() > self.window_size {
            self.values.pop_front();
        }
    }
}

impl StatCounter for CountWindowCounter {
    fn event(&mut self, delta: i64) -> Result<()> {
        self.push(delta);
        Ok(())
    }

    /// Push the value into the window, identical to [CountWindowCounter::event].
    fn value(&mut self, value: i64) {
        self.push(value);
    }

    fn sum(&mut self) -> i64 {
        self.values
            .iter()
            .fold(0i64, |sum, value| sum.saturating_add(*value))
    }

    /// Returns `0` when no observations are retained.
    fn avg(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }

        self.sum() as f64 / self.values.len() as f64
    }

    fn is_empty(&mut self) -> bool {
        self.values.is_empty()
    }
}

impl Default for CountWindowCounter {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE as usize,
            values: VecDeque::with_capacity(DEFAULT_WINDOW_SIZE as usize),
        }
    }
}
