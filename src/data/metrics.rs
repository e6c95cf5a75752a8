use super::model::{Dataset, PassengerRecord};
use super::stats::mean;

// ---------------------------------------------------------------------------
// MetricsSnapshot – the four KPI scalars of a filtered view
// ---------------------------------------------------------------------------

/// Summary statistics over a filtered view. Every field is 0 for an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsSnapshot {
    pub total_count: usize,
    /// Percentage of survivors, in `[0, 100]`.
    pub survival_rate: f64,
    pub avg_age: f64,
    pub avg_fare: f64,
}

impl MetricsSnapshot {
    /// Compute the snapshot for the records at `indices`.
    ///
    /// Absent ages and fares are skipped: they count neither towards the sum
    /// nor the denominator of their mean.
    pub fn from_view(dataset: &Dataset, indices: &[usize]) -> Self {
        let total_count = indices.len();
        if total_count == 0 {
            return Self::default();
        }

        let rows: Vec<&PassengerRecord> = indices.iter().map(|&i| &dataset.records[i]).collect();
        let survivors = rows.iter().filter(|r| r.survived).count();

        MetricsSnapshot {
            total_count,
            survival_rate: survivors as f64 / total_count as f64 * 100.0,
            avg_age: mean_present(rows.iter().map(|r| r.age)),
            avg_fare: mean_present(rows.iter().map(|r| r.fare)),
        }
    }
}

/// Mean over the `Some` values, 0 when there are none.
fn mean_present(values: impl Iterator<Item = Option<f64>>) -> f64 {
    let present: Vec<f64> = values.flatten().collect();
    mean(&present)
}
