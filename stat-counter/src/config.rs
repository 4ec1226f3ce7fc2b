use std::sync::Arc;

use derive_more::Display;
use log::{debug, trace};
use serde::Deserialize;

use crate::{
    Clock, CountWindowCounter, Error, Result, StatCounter, TimeEventWindowCounter,
    TimeValueWindowCounter, TotalCounter,
};

/// The default amount of retained buckets or observations of a window.
pub const DEFAULT_WINDOW_SIZE: u32 = 300;
/// The default duration in seconds of a single time bucket.
pub const DEFAULT_WINDOW_INTERVAL: u32 = 10;

const DEFAULT_SIZE: fn() -> u32 = || DEFAULT_WINDOW_SIZE;
const DEFAULT_INTERVAL: fn() -> u32 = || DEFAULT_WINDOW_INTERVAL;
const DEFAULT_CAPACITY: fn() -> usize = || DEFAULT_WINDOW_SIZE as usize;

/// The configuration of a time-bucketed window.
#[derive(Debug, Display, Clone, Copy, Deserialize, PartialEq)]
#[display("window_size: {}, window_interval: {}s", window_size, window_interval)]
pub struct WindowConfig {
    /// The maximum amount of buckets retained by the window
    #[serde(default = "DEFAULT_SIZE")]
    pub window_size: u32,
    /// The duration of a single bucket in seconds
    #[serde(default = "DEFAULT_INTERVAL")]
    pub window_interval: u32,
}

impl WindowConfig {
    /// Create a new validated window config.
    pub fn new(window_size: u32, window_interval: u32) -> Result<Self> {
        let config = Self {
            window_size,
            window_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Verify that the window can be used by a counter.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::InvalidWindowSize(self.window_size));
        }
        if self.window_interval == 0 {
            return Err(Error::InvalidWindowInterval(self.window_interval));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_SIZE(),
            window_interval: DEFAULT_INTERVAL(),
        }
    }
}

/// The configuration of a fixed-count sliding window.
#[derive(Debug, Display, Clone, Copy, Deserialize, PartialEq)]
#[display("window_size: {}", window_size)]
pub struct CountWindowConfig {
    /// The maximum amount of retained observations
    #[serde(default = "DEFAULT_CAPACITY")]
    pub window_size: usize,
}

impl CountWindowConfig {
    /// Verify that the window can be used by a counter.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::InvalidCapacity(self.window_size));
        }
        Ok(())
    }
}

impl Default for CountWindowConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_CAPACITY(),
        }
    }
}

/// The declarative description of a counter.
///
/// # Example
///
/// ```yaml
/// type: time_value
/// window_size: 60
/// window_interval: 1
/// ```
#[derive(Debug, Display, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CounterConfig {
    #[display("total")]
    Total,
    #[display("count_window({})", _0)]
    CountWindow(CountWindowConfig),
    #[display("time_event({})", _0)]
    TimeEvent(WindowConfig),
    #[display("time_value({})", _0)]
    TimeValue(WindowConfig),
}

impl CounterConfig {
    /// Parse the counter config from the given YAML data.
    pub fn from_str(value: &str) -> Result<Self> {
        trace!("Parsing counter config {}", value);
        let config: CounterConfig = serde_yaml::from_str(value)?;
        debug!("Parsed counter config {}", config);
        Ok(config)
    }

    /// Create a new counter for this config.
    /// The time-bucketed counters read the current time from the given clock.
    pub fn build(&self, clock: Arc<dyn Clock>) -> Result<Box<dyn StatCounter>> {
        let counter: Box<dyn StatCounter> = match self {
            CounterConfig::Total => Box::new(TotalCounter::new()),
            CounterConfig::CountWindow(config) => {
                Box::new(CountWindowCounter::from_config(config)?)
            }
            CounterConfig::TimeEvent(config) => Box::new(
                TimeEventWindowCounter::builder()
                    .config(*config)
                    .clock(clock)
                    .build()?,
            ),
            CounterConfig::TimeValue(config) => Box::new(
                TimeValueWindowCounter::builder()
                    .config(*config)
                    .clock(clock)
                    .build()?,
            ),
        };

        debug!("Created new {} counter", self);
        Ok(counter)
    }
}
