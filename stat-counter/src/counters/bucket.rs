use std::fmt;
use std::fmt::Debug;

use derive_more::Display;
#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// An aggregation of the observations within a single window interval.
///
/// A bucket is **open** while it accepts observations, it becomes **committed**
/// once its interval has elapsed and is **evicted** when it falls outside the horizon.
pub trait WindowBucket: Debug + fmt::Display + Clone + Send + 'static {
    /// Create a new empty bucket starting at the given time.
    fn new(start: i64) -> Self;

    /// Returns the start time in seconds of the bucket.
    fn start(&self) -> i64;

    /// Returns the accumulated value of the bucket.
    fn value(&self) -> i64;

    /// Fold the given observation into the bucket.
    fn record(&mut self, value: i64);

    /// Overwrite the accumulated value of the bucket.
    fn set_value(&mut self, value: i64);
}

/// A bucket which also tracks the amount of observations folded into it.
#[derive(Debug, Display, Clone, PartialEq)]
#[display("bucket {} (value: {}, events: {})", start, value, events)]
pub struct EventBucket {
    pub start: i64,
    pub value: i64,
    pub events: u64,
}

impl WindowBucket for EventBucket {
    fn new(start: i64) -> Self {
        Self {
            start,
            value: 0,
            events: 0,
        }
    }

    fn start(&self) -> i64 {
        self.start
    }

    fn value(&self) -> i64 {
        self.value
    }

    fn record(&mut self, value: i64) {
        self.value = self.value.saturating_add(value);
        self.events = self.events.saturating_add(1);
    }

    fn set_value(&mut self, value: i64) {
        self.value = value;
    }
}

/// A bucket which only tracks the accumulated value.
#[derive(Debug, Display, Clone, PartialEq)]
#[display("bucket {} (value: {})", start, value)]
pub struct ValueBucket {
    pub start: i64,
    pub value: i64,
}

impl WindowBucket for ValueBucket {
    fn new(start: i64) -> Self {
        Self { start, value: 0 }
    }

    fn start(&self) -> i64 {
        self.start
    }

    fn value(&self) -> i64 {
        self.value
    }

    fn record(&mut self, value: i64) {
        self.value = self.value.saturating_add(value);
    }

    fn set_value(&mut self, value: i64) {
        self.value = value;
    }
}

/// Observes the buckets committed by a time-bucketed counter,
/// e.g. to forward them to a downstream sink.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait BucketListener<B: WindowBucket>: Debug + Send {
    /// Invoked synchronously when the given bucket has been committed to the window.
    fn on_append(&self, bucket: &B);
}
