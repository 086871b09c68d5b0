//! Round results and metric averaging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Metric, MetricSums};
use crate::rules::GameKind;

/// Rounded average of one metric over the answered questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricAverage {
    pub metric: Metric,
    pub average: i64,
}

/// Summary of a finished round. Created once, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult<D> {
    pub timestamp: DateTime<Utc>,
    pub game: GameKind,
    /// Questions the round was configured for.
    pub total_questions: u32,
    /// Regular questions actually graded.
    pub answered: u32,
    pub total_score: i64,
    pub averages: SmallVec<[MetricAverage; 4]>,
    /// Game-specific summary.
    pub details: D,
}

impl<D> RoundResult<D> {
    /// Average for one metric, if the game tracks it.
    #[must_use]
    pub fn average(&self, metric: Metric) -> Option<i64> {
        self.averages
            .iter()
            .find(|a| a.metric == metric)
            .map(|a| a.average)
    }
}

/// `round(sum / max(1, count))`, half away from zero.
#[must_use]
pub fn rounded_average(sum: i64, count: u32) -> i64 {
    let denominator = f64::from(count.max(1));
    (sum as f64 / denominator).round() as i64
}

/// Averages for `metrics`, in the given order.
#[must_use]
pub fn averages_for(
    metrics: &[Metric],
    sums: &MetricSums,
    count: u32,
) -> SmallVec<[MetricAverage; 4]> {
    metrics
        .iter()
        .map(|&metric| MetricAverage {
            metric,
            average: rounded_average(sums.get(metric), count),
        })
        .collect()
}
