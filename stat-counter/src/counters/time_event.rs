use std::sync::Arc;

use crate::counters::window::TimeWindow;
use crate::{BucketListener, Clock, EventBucket, Result, StatCounter, SystemClock, WindowConfig};

/// A time-bucketed counter which averages the observed values per event,
/// e.g. the average packet size over the last hour.
///
/// Observations are folded into buckets of `window_interval` seconds,
/// of which at most `window_size` are retained.
#[derive(Debug)]
pub struct TimeEventWindowCounter {
    window: TimeWindow<EventBucket>,
}

impl TimeEventWindowCounter {
    /// Returns a builder instance for the counter.
    pub fn builder() -> TimeEventWindowCounterBuilder {
        TimeEventWindowCounterBuilder::default()
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

    /// Returns the amount of events observed within the window.
    pub fn events(&mut self) -> u64 {
        self.window
            .retained()
            .fold(0u64, |events, bucket| events.saturating_add(bucket.events))
    }
}

impl StatCounter for TimeEventWindowCounter {
    fn event(&mut self, delta: i64) -> Result<()> {
        self.window.record(delta);
        Ok(())
    }

    /// Overwrite the value of the open bucket without counting an event.
    fn value(&mut self, value: i64) {
        self.window.set(value);
    }

    fn sum(&mut self) -> i64 {
        self.window.sum()
    }

    /// Returns the average value per event, or `0` when no events are retained.
    fn avg(&mut self) -> f64 {
        let (sum, events) = self
            .window
            .retained()
            .fold((0i64, 0u64), |(sum, events), bucket| {
                (
                    sum.saturating_add(bucket.value),
                    events.saturating_add(bucket.events),
                )
            });

        if events == 0 {
            return 0.0;
        }

        sum as f64 / events as f64
    }

    fn is_empty(&mut self) -> bool {
        self.window.is_empty()
    }
}

impl Default for TimeEventWindowCounter {
    fn default() -> Self {
        Self {
            window: TimeWindow::new(WindowConfig::default(), Arc::new(SystemClock), None),
        }
    }
}

/// The builder of a [TimeEventWindowCounter].
#[derive(Debug, Default)]
pub struct TimeEventWindowCounterBuilder {
    config: Option<WindowConfig>,
    window_size: Option<u32>,
    window_interval: Option<u32>,
    clock: Option<Arc<dyn Clock>>,
    listener: Option<Box<dyn BucketListener<EventBucket>>>,
}

impl TimeEventWindowCounterBuilder {
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
        L: BucketListener<EventBucket> + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Consumes the builder and creates a new counter.
    ///
    /// It returns an error when the window size or interval is `0`.
    pub fn build(&mut self) -> Result<TimeEventWindowCounter> {
        let mut config = self.config.take().unwrap_or_default();
        if let Some(window_size) = self.window_size.take() {
            config.window_size = window_size;
        }
        if let Some(window_interval) = self.window_interval.take() {
            config.window_interval = window_interval;
        }
        config.validate()?;

        let clock = self.clock.take().unwrap_or_else(|| Arc::new(SystemClock));
        Ok(TimeEventWindowCounter {
            window: TimeWindow::new(config, clock, self.listener.take()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;
    use crate::{init_logger, Error, MockBucketListener};

    fn new_counter(
        window_size: u32,
        window_interval: u32,
        clock: &ManualClock,
    ) -> TimeEventWindowCounter {
        TimeEventWindowCounter::builder()
            .window_size(window_size)
            .window_interval(window_interval)
            .clock(Arc::new(clock.clone()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_invalid_config() {
        let result = TimeEventWindowCounter::builder().window_size(0).build();
        assert_eq!(Some(Error::InvalidWindowSize(0)), result.err());

        let result = TimeEventWindowCounter::builder().window_interval(0).build();
        assert_eq!(Some(Error::InvalidWindowInterval(0)), result.err());
    }

    #[test]
    fn test_default() {
        let counter = TimeEventWindowCounter::default();

        assert_eq!(300, counter.max_window_size());
        assert_eq!(10, counter.window_interval());
    }

    #[test]
    fn test_event_single_bucket() {
        init_logger!();
        let clock = ManualClock::new(1000);
        let mut counter = new_counter(300, 10, &clock);
        assert!(counter.is_empty(), "expected a new counter to be empty");

        counter.event(10).unwrap();
        counter.event(10).unwrap();

        assert_eq!(10.0, counter.avg());
        assert_eq!(20, counter.sum());
        assert_eq!(2, counter.events());
        assert!(!counter.is_empty(), "expected the counter to not be empty");
    }

    #[test]
    fn test_event_rolling_window() {
        init_logger!();
        let clock = ManualClock::new(0);
        let mut counter = new_counter(2, 2, &clock);

        // an event of 2 every second during 6 seconds, of which 4 seconds fit the window
        for _ in 0..6 {
            counter.event(2).unwrap();
            clock.advance(1);
        }

        assert_eq!(8, counter.sum());
        assert_eq!(2.0, counter.avg());
        assert_eq!(4, counter.events());
        assert_eq!(2, counter.window_size());
    }

    #[test]
    fn test_avg_per_event() {
        init_logger!();
        let clock = ManualClock::new(0);
        let mut counter = new_counter(10, 5, &clock);

        counter.event(100).unwrap();
        counter.event(50).unwrap();
        clock.advance(5);
        counter.event(30).unwrap();

        assert_eq!(180, counter.sum());
        assert_eq!(60.0, counter.avg());
    }

    #[test]
    fn test_avg_no_events() {
        init_logger!();
        let clock = ManualClock::new(0);
        let mut counter = new_counter(10, 5, &clock);

        assert_eq!(0.0, counter.avg(), "expected an empty counter to average 0");

        counter.value(20);
        assert_eq!(20, counter.sum());
        assert_eq!(0.0, counter.avg(), "expected a value without events to average 0");
    }

    #[test]
    fn test_value_overwrites_open_bucket() {
        init_logger!();
        let clock = ManualClock::new(0);
        let mut counter = new_counter(10, 5, &clock);

        counter.event(4).unwrap();
        counter.event(4).unwrap();
        counter.value(2);

        assert_eq!(2, counter.sum());
        assert_eq!(1.0, counter.avg());
    }

    #[test]
    fn test_value_after_elapsed_interval() {
        init_logger!();
        let clock = ManualClock::new(0);
        let mut listener = MockBucketListener::<EventBucket>::new();
        listener
            .expect_on_append()
            .withf(|bucket: &EventBucket| {
                *bucket
                    == EventBucket {
                        start: 0,
                        value: 4,
                        events: 1,
                    }
            })
            .times(1)
            .return_const(());
        let mut counter = TimeEventWindowCounter::builder()
            .window_size(10)
            .window_interval(5)
            .clock(Arc::new(clock.clone()))
            .listener(listener)
            .build()
            .unwrap();

        counter.event(4).unwrap();
        clock.advance(5);
        counter.value(9);

        // the level bucket carries no events, so only the first bucket counts as an event
        assert_eq!(13, counter.sum());
        assert_eq!(1, counter.events());
        assert_eq!(13.0, counter.avg());
    }

    #[test]
    fn test_sum_saturates() {
        init_logger!();
        let clock = ManualClock::new(0);
        let mut counter = new_counter(10, 5, &clock);

        counter.event(i64::MAX).unwrap();
        counter.event(1).unwrap();

        assert_eq!(i64::MAX, counter.sum());
        assert_eq!(i64::MAX as f64 / 2.0, counter.avg());
    }

    #[test]
    fn test_reads_are_idempotent() {
        init_logger!();
        let clock = ManualClock::new(0);
        let mut counter = new_counter(3, 2, &clock);

        for value in 1..=5 {
            counter.event(value).unwrap();
            clock.advance(1);
        }

        let sum = counter.sum();
        let avg = counter.avg();
        for _ in 0..3 {
            assert_eq!(sum, counter.sum());
            assert_eq!(avg, counter.avg());
            assert!(!counter.is_empty());
        }
    }

    #[test]
    fn test_is_empty_after_horizon() {
        init_logger!();
        let clock = ManualClock::new(0);
        let mut counter = new_counter(2, 2, &clock);

        counter.event(1).unwrap();
        clock.advance(2);
        assert!(!counter.is_empty(), "expected the committed bucket to be retained");

        clock.advance(10);
        assert!(counter.is_empty(), "expected the bucket to have been evicted");
        assert_eq!(0, counter.sum());
        assert_eq!(0.0, counter.avg());
    }

    #[test]
    fn test_listener() {
        init_logger!();
        let clock = ManualClock::new(0);
        let mut listener = MockBucketListener::<EventBucket>::new();
        listener
            .expect_on_append()
            .withf(|bucket: &EventBucket| {
                *bucket
                    == EventBucket {
                        start: 0,
                        value: 3,
                        events: 2,
                    }
            })
            .times(1)
            .return_const(());
        let mut counter = TimeEventWindowCounter::builder()
            .window_size(10)
            .window_interval(5)
            .clock(Arc::new(clock.clone()))
            .listener(listener)
            .build()
            .unwrap();

        counter.event(1).unwrap();
        counter.event(2).unwrap();
        clock.advance(5);
        counter.event(7).unwrap();

        assert_eq!(10, counter.sum());
    }
}
