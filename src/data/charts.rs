use std::collections::BTreeSet;

use super::annotate::annotate_count_plot;
use super::model::{CategoryValue, Column, Dataset, PassengerRecord};
use super::stats::{auto_bin_edges, bin_counts, gaussian_kde};

/// Fare axis window of the fare histogram.
pub const FARE_WINDOW: (f64, f64) = (0.0, 300.0);

/// Evaluation points per density curve.
const KDE_GRIDSIZE: usize = 200;

/// Bandwidths past the data extremes covered by standalone density curves.
const KDE_CUT: f64 = 3.0;

/// Legend text for a `survived` hue level.
pub fn status_label(survived: bool) -> &'static str {
    if survived {
        "Survived"
    } else {
        "Died"
    }
}

// ---------------------------------------------------------------------------
// Count plot – categorical x, hue = survived
// ---------------------------------------------------------------------------

/// One hue level of a count plot: a bar per x category.
#[derive(Debug, Clone, PartialEq)]
pub struct BarContainer {
    pub survived: bool,
    pub bars: Vec<(CategoryValue, u64)>,
}

/// Bar counts of one categorical column split by survival.
#[derive(Debug, Clone, PartialEq)]
pub struct CountPlot {
    pub column: Column,
    /// x categories in display order.
    pub categories: Vec<CategoryValue>,
    /// One container per hue level present in the view (Died before Survived).
    pub containers: Vec<BarContainer>,
    /// Bar labels per container; empty when the view is empty.
    pub labels: Vec<Vec<String>>,
    /// Rows in the view, including those with no value in `column`.
    pub view_rows: usize,
}

impl CountPlot {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Count rows per (category, survived) pair.
///
/// Numeric categories are ordered ascending, text categories by first
/// appearance in the view. Rows with a missing category are not counted.
pub fn count_plot(dataset: &Dataset, indices: &[usize], column: Column) -> CountPlot {
    let rows: Vec<&PassengerRecord> = indices.iter().map(|&i| &dataset.records[i]).collect();

    let mut categories: Vec<CategoryValue> = Vec::new();
    for rec in &rows {
        let value = rec.category(column);
        if value != CategoryValue::Missing && !categories.contains(&value) {
            categories.push(value);
        }
    }
    if categories
        .iter()
        .all(|c| matches!(c, CategoryValue::Integer(_)))
    {
        categories.sort();
    }

    let hues: BTreeSet<bool> = rows.iter().map(|r| r.survived).collect();
    let containers = hues
        .into_iter()
        .map(|survived| BarContainer {
            survived,
            bars: categories
                .iter()
                .map(|cat| {
                    let n = rows
                        .iter()
                        .filter(|r| r.survived == survived && r.category(column) == *cat)
                        .count();
                    (cat.clone(), n as u64)
                })
                .collect(),
        })
        .collect();

    CountPlot {
        column,
        categories,
        containers,
        labels: Vec::new(),
        view_rows: indices.len(),
    }
}

/// [`count_plot`] with bar labels attached when the view is non-empty.
pub fn annotated_count_plot(dataset: &Dataset, indices: &[usize], column: Column) -> CountPlot {
    let mut plot = count_plot(dataset, indices, column);
    if !indices.is_empty() {
        plot.labels = annotate_count_plot(&plot, indices.len());
    }
    plot
}

// ---------------------------------------------------------------------------
// Fare histogram – common bins, per-hue counts and density overlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramGroup {
    pub survived: bool,
    /// One count per bin of the parent histogram.
    pub counts: Vec<u64>,
    /// Density scaled to the count axis; empty when undefined.
    pub kde: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FareHistogram {
    /// Bin edges shared by every group.
    pub edges: Vec<f64>,
    pub groups: Vec<HistogramGroup>,
    /// Visible x range.
    pub window: (f64, f64),
}

/// Histogram of present fares split by survival.
pub fn fare_histogram(dataset: &Dataset, indices: &[usize]) -> FareHistogram {
    let fares: Vec<(bool, f64)> = indices
        .iter()
        .map(|&i| &dataset.records[i])
        .filter_map(|r| r.fare.map(|f| (r.survived, f)))
        .collect();

    let all: Vec<f64> = fares.iter().map(|&(_, f)| f).collect();
    let edges = auto_bin_edges(&all);
    let bin_width = if edges.len() >= 2 {
        (edges[edges.len() - 1] - edges[0]) / (edges.len() - 1) as f64
    } else {
        0.0
    };

    let hues: BTreeSet<bool> = fares.iter().map(|&(s, _)| s).collect();
    let groups = hues
        .into_iter()
        .map(|survived| {
            let values: Vec<f64> = fares
                .iter()
                .filter(|&&(s, _)| s == survived)
                .map(|&(_, f)| f)
                .collect();
            let scale = values.len() as f64 * bin_width;
            // The overlay stays within the observed range.
            let kde = gaussian_kde(&values, 0.0, KDE_GRIDSIZE)
                .map(|curve| curve.into_iter().map(|[x, d]| [x, d * scale]).collect())
                .unwrap_or_default();
            HistogramGroup {
                survived,
                counts: bin_counts(&values, &edges),
                kde,
            }
        })
        .collect();

    FareHistogram {
        edges,
        groups,
        window: FARE_WINDOW,
    }
}

// ---------------------------------------------------------------------------
// Family size densities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub survived: bool,
    pub points: Vec<[f64; 2]>,
}

/// Unit-area `family_size` density for the Died and Survived groups.
/// A group whose density is undefined has no curve.
pub fn family_density(dataset: &Dataset, indices: &[usize]) -> Vec<DensityCurve> {
    [false, true]
        .into_iter()
        .filter_map(|survived| {
            let sizes: Vec<f64> = indices
                .iter()
                .map(|&i| &dataset.records[i])
                .filter(|r| r.survived == survived)
                .map(|r| r.family_size as f64)
                .collect();
            gaussian_kde(&sizes, KDE_CUT, KDE_GRIDSIZE).map(|points| DensityCurve { survived, points })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// All chart panels of the dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpecs {
    pub by_sex: CountPlot,
    pub by_embarkation: CountPlot,
    pub by_class: CountPlot,
    pub fare: FareHistogram,
    pub family: Vec<DensityCurve>,
}

impl ChartSpecs {
    pub fn build(dataset: &Dataset, indices: &[usize]) -> Self {
        ChartSpecs {
            by_sex: annotated_count_plot(dataset, indices, Column::Sex),
            by_embarkation: annotated_count_plot(dataset, indices, Column::EmbarkTown),
            by_class: annotated_count_plot(dataset, indices, Column::Pclass),
            fare: fare_histogram(dataset, indices),
            family: family_density(dataset, indices),
        }
    }
}
