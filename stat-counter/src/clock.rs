use std::fmt::Debug;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// The time source of the time-bucketed counters.
/// It returns the current time in whole seconds since the UNIX epoch.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait Clock: Debug + Send + Sync {
    /// Returns the current time in seconds.
    fn now(&self) -> i64;
}

/// The wall clock of the system.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
