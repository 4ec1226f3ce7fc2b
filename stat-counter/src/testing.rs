use crate::Clock;

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Initializes the logger once, defaulting to the trace level.
#[macro_export]
macro_rules! init_logger {
    ($level:expr) => {
        $crate::testing::init_logger_level($level)
    };
    () => {
        $crate::testing::init_logger_level(log::LevelFilter::Trace)
    };
}

/// Initializes the logger with the specified log level.
pub fn init_logger_level(level: LevelFilter) {
    INIT.call_once(|| {
        log4rs::init_config(Config::builder()
            .appender(Appender::builder().build("stdout", Box::new(ConsoleAppender::builder()
                .encoder(Box::new(PatternEncoder::new("\x1B[37m{d(%Y-%m-%d %H:%M:%S%.3f)}\x1B[0m {h({l:>5.5})} \x1B[35m{I:>6.6}\x1B[0m \x1B[37m---\x1B[0m \x1B[37m[{T:>15.15}]\x1B[0m \x1B[36m{t:<60.60}\x1B[0m \x1B[37m:\x1B[0m {m}{n}")))
                .build())))
            .logger(Logger::builder().build("mockall", LevelFilter::Info))
            .build(Root::builder().appender("stdout").build(level))
            .unwrap())
            .unwrap();
    })
}

/// A clock which only moves when told to.
/// Clones share the same time, so a test can keep a handle while the counter owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a new clock starting at the given time in seconds.
    pub fn new(now: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now)),
        }
    }

    /// Move the clock forward by the given amount of seconds.
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::Relaxed);
    }

    /// Set the clock to the given time in seconds.
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::Relaxed)
    }
}
