use std::sync::Arc;

use crate::counters::window::TimeWindow;
use crate::{BucketListener, Clock, Result, StatCounter, SystemClock, ValueBucket, WindowConfig};

/// A time-bucketed counter which averages the observed values over wall-clock time,
/// e.g. the throughput in bytes per second.
#[derive(Debug)]
pub struct TimeValueWindowCounter {
    window: TimeWindow<ValueBucket>,
}

impl TimeValueWindowCounter {
    /// Returns a builder instance for the counter.
    pub fn builder() -> TimeValueWindowCounterBuilder {
        TimeValueWindowCounterBuilder::default()
    }

    /// Returns the effective amount of buckets currently covered by the window.
    pub fn window_size(&self) -> u32 {
        self.window.window_size()
    }

    /// Returns the configured maximum amount of buckets of the window.
    pub fn max_window_size(&self) -> u32 {
        self.window.max_window_size()
    }

    /// Returns the duration in seconds of a single bucket.
    pub fn window_interval(&self) -> i64 {
        self.window.window_interval()
    }
}

impl StatCounter for TimeValueWindowCounter {
    fn event(&mut self, delta: i64) -> Result<()> {
        self.window.record(delta);
        Ok(())
    }

    /// Overwrite the value of the open bucket.
    fn value(&mut self, value: i64) {
        self.window.set(value);
    }

    fn sum(&mut self) -> i64 {
        self.window.sum()
    }

    /// Returns the rate per second over the effective window.
    /// While the first interval is still open, the open bucket counts as a single interval.
    fn avg(&mut self) -> f64 {
        let sum = self.sum();
        let window_size = self.window.window_size().max(1) as i64;
        let window_interval = self.window.window_interval();
        if window_interval <= 0 {
            return 0.0;
        }

        sum as f64 / (window_size * window_interval) as f64
    }

    fn is_empty(&mut self) -> bool {
        self.window.is_empty()
    }
}

impl Default for TimeValueWindowCounter {
    fn default() -> Self {
        Self {
            window: TimeWindow::new(WindowConfig::default(), Arc::new(SystemClock), None),
        }
    }
}

/// The builder of a [TimeValueWindowCounter].
#[derive(Debug, Default)]
pub struct TimeValueWindowCounterBuilder {
    config: Option<WindowConfig>,
    window_size: Option<u32>,
    window_interval: Option<u32>,
    clock: Option<Arc<dyn Clock>>,
    listener: Option<Box<dyn BucketListener<ValueBucket>>>,
}

impl TimeValueWindowCounterBuilder {
    /// Set the window config of the counter.
    pub fn config(&mut self, config: WindowConfig) -> &mut Self {
        self.config = Some(config);
        self
    }

    /// Set the maximum amount of retained buckets.
    pub fn window_size(&mut self, window_size: u32) -> &mut Self {
        self.window_size = Some(window_size);
        self
    }

    /// Set the duration in seconds of a single bucket.
    pub fn window_interval(&mut self, window_interval: u32) -> &mut Self {
        self.window_interval = Some(window_interval);
        self
    }

    /// Set the time source of the counter, defaults to the [SystemClock].
    pub fn clock(&mut self, clock: Arc<dyn Clock>) -> &mut Self {
        self.clock = Some(clock);
        self
    }

    /// Set the listener which is invoked for each committed bucket.
    pub fn listener<L>(&mut self, listener: L) -> &mut Self
    where
        L: BucketListener<ValueBucket> + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Consumes the builder and creates a new counter.
    pub fn build(&mut self) -> Result<TimeValueWindowCounter> {
        let mut config = self.config.take().unwrap_or_default();
        if let Some(window_size) = self.window_size.take() {
            config.window_size = window_size;
        }
        if let Some(window_interval) = self.window_interval.take() {
            config.window_interval = window_interval;
        }
        config.validate()?;

        let clock = self.clock.take().unwrap_or_else(|| Arc::new(SystemClock));
        Ok(TimeValueWindowCounter {
            window: TimeWindow::new(config, clock, self.listener.take()),
        })
    }
}
