//! Round results and where they go.
//!
//! The engine builds one [`RoundResult`] when a round completes and hands it
//! to a [`StatsSink`]. The sink is fire-and-forget: the engine never reads a
//! result back and never waits on persistence.
//!
//! Two sinks ship with the crate:
//! - [`RecentResultsStore`]: newest results in memory
//! - [`JsonFileStore`]: the same bounded list in a JSON file

mod result;
mod store;

pub use result::{averages_for, rounded_average, MetricAverage, RoundResult};
pub use store::{JsonFileStore, RecentResultsStore, StatsSink, DEFAULT_STORE_CAPACITY};
