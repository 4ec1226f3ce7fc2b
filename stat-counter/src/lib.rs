//! Running-statistic counters for tracking event rates and magnitudes.
//!
//! Each counter accepts a stream of integer observations and answers the accumulated
//! [StatCounter::sum] and the derived [StatCounter::avg] of its window.
//! The time-bucketed counters ([TimeEventWindowCounter], [TimeValueWindowCounter]) fold
//! observations into fixed-duration buckets and trim stale buckets on every read.
pub use clock::*;
pub use config::*;
pub use counters::*;
pub use errors::*;

mod clock;
mod config;
mod counters;
mod errors;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
