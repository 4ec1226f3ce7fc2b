use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, trace};

use crate::{BucketListener, Clock, WindowBucket, WindowConfig};

/// The rolling history of time buckets shared by the time-bucketed counters.
///
/// Observations are folded into the open bucket until its interval has elapsed,
/// after which the bucket is committed and a new one is opened.
/// Committed buckets are evicted, oldest first, once they fall outside the horizon
/// of `effective window size * window interval`.
/// The effective window size grows from `0` towards the configured window size
/// as time passes since the first observation.
#[derive(Debug)]
pub(crate) struct TimeWindow<B: WindowBucket> {
    clock: Arc<dyn Clock>,
    listener: Option<Box<dyn BucketListener<B>>>,
    max_window_size: u32,
    window_size: u32,
    window_interval: i64,
    first_observation: Option<i64>,
    last_seen: i64,
    buckets: VecDeque<B>,
    open: Option<B>,
}

impl<B: WindowBucket> TimeWindow<B> {
    /// Create a new window for the given config, which should have been validated.
    pub fn new(
        config: WindowConfig,
        clock: Arc<dyn Clock>,
        listener: Option<Box<dyn BucketListener<B>>>,
    ) -> Self {
        debug!("Creating time window with {}", config);
        Self {
            clock,
            listener,
            max_window_size: config.window_size,
            window_size: 0,
            window_interval: config.window_interval as i64,
            first_observation: None,
            last_seen: i64::MIN,
            buckets: VecDeque::new(),
            open: None,
        }
    }

    /// Returns the effective amount of buckets retained by the window.
    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    /// Returns the configured maximum amount of buckets retained by the window.
    pub fn max_window_size(&self) -> u32 {
        self.max_window_size
    }

    /// Returns the duration of a bucket in seconds.
    pub fn window_interval(&self) -> i64 {
        self.window_interval
    }

    /// Fold the given observation into the open bucket.
    pub fn record(&mut self, value: i64) {
        let now = self.observe();
        self.roll(now).record(value);
    }

    /// Overwrite the value of the open bucket.
    pub fn set(&mut self, value: i64) {
        let now = self.observe();
        self.roll(now).set_value(value);
    }

    /// Evict the stale buckets and iterate over the retained buckets, oldest first.
    /// The open bucket, if any, is always the last one.
    pub fn retained(&mut self) -> impl Iterator<Item = &B> {
        self.trim();
        self.buckets.iter().chain(self.open.iter())
    }

    /// Returns the accumulated value of the retained buckets.
    pub fn sum(&mut self) -> i64 {
        self.retained()
            .fold(0i64, |sum, bucket| sum.saturating_add(bucket.value()))
    }

    /// Returns `true` when no bucket is retained after trimming the window.
    pub fn is_empty(&mut self) -> bool {
        self.trim();
        self.buckets.is_empty() && self.open.is_none()
    }

    /// Commit an elapsed open bucket, recompute the effective window size
    /// and evict the committed buckets outside the horizon.
    pub fn trim(&mut self) {
        let now = self.now();

        if self.is_elapsed(now) {
            self.commit();
        }

        if let Some(first_observation) = self.first_observation {
            if self.window_size < self.max_window_size {
                let passed = ((now - first_observation) / self.window_interval).max(0);
                let window_size = passed.min(self.max_window_size as i64) as u32;
                if window_size != self.window_size {
                    debug!(
                        "Time window grew from {} to {} of {} buckets",
                        self.window_size, window_size, self.max_window_size
                    );
                    self.window_size = window_size;
                }
            }
        }

        let cutoff = now - self.window_size as i64 * self.window_interval;
        while let Some(bucket) = self.buckets.front() {
            if bucket.start() >= cutoff {
                break;
            }

            trace!("Evicting {} outside of horizon {}", bucket, cutoff);
            self.buckets.pop_front();
        }
    }

    /// Returns the bucket accepting observations at the given time,
    /// committing the open bucket first when its interval has elapsed.
    fn roll(&mut self, now: i64) -> &mut B {
        if self.is_elapsed(now) {
            self.commit();
        }

        self.open.get_or_insert_with(|| {
            trace!("Opening new bucket at {}", now);
            B::new(now)
        })
    }

    fn commit(&mut self) {
        if let Some(bucket) = self.open.take() {
            trace!("Committing {}", bucket);
            if let Some(listener) = self.listener.as_ref() {
                listener.on_append(&bucket);
            }
            self.buckets.push_back(bucket);
        }
    }

    fn is_elapsed(&self, now: i64) -> bool {
        self.open
            .as_ref()
            .map(|e| now - e.start() >= self.window_interval)
            .unwrap_or(false)
    }

    /// Returns the current time and marks the first observation of the window.
    fn observe(&mut self) -> i64 {
        let now = self.now();
        if self.first_observation.is_none() {
            debug!("Received first observation at {}", now);
            self.first_observation = Some(now);
        }
        now
    }

    /// Returns the current time of the clock, which never moves backwards for the window.
    fn now(&mut self) -> i64 {
        self.last_seen = self.last_seen.max(self.clock.now());
        self.last_seen
    }
}
