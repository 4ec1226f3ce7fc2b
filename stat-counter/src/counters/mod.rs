use std::fmt::Debug;

use crate::Result;

pub use bucket::*;
pub use count_window::*;
pub use time_event::*;
pub use time_value::*;
pub use total::*;

mod bucket;
mod count_window;
mod time_event;
mod time_value;
mod total;
mod window;

/// A running-statistic counter which accumulates integer observations.
///
/// Every counter supports the same capability:
///
/// * **`event`**: records an incremental observation
/// * **`value`**: records the current level, the exact meaning differs per counter
/// * **`sum`**: the accumulated total of the counter's window
/// * **`avg`**: the derived average of the counter's window, never `NaN`
/// * **`is_empty`**: whether the window currently holds any data
///
/// Accumulation saturates at the bounds of `i64` instead of overflowing,
/// so every operation is total over its input.
///
/// Reads take `&mut self` as windowed counters evict stale data while reading.
/// Counters carry no internal locking, sharing an instance between threads
/// requires wrapping it in a [std::sync::Mutex] or similar.
pub trait StatCounter: Debug + Send {
    /// Record an incremental observation.
    fn event(&mut self, delta: i64) -> Result<()>;

    /// Record the current level of the tracked metric.
    fn value(&mut self, value: i64);

    /// Returns the accumulated total of the counter.
    fn sum(&mut self) -> i64;

    /// Returns the average of the counter.
    /// It returns `0` when the counter has nothing to average over.
    fn avg(&mut self) -> f64;

    /// Returns `true` when the counter holds no data.
    fn is_empty(&mut self) -> bool;
}
