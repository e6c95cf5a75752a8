//! Small numeric helpers behind the distribution charts: quantiles, automatic
//! histogram binning and a Gaussian kernel density estimate.

use statrs::statistics::Statistics;

/// Linear-interpolated percentile (`q` in `[0, 1]`) of an already sorted slice,
/// numpy's default method. statrs' order statistics interpolate differently.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Arithmetic mean, 0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.mean()
}

/// Sample standard deviation (ddof = 1), 0 for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.std_dev()
}

/// Histogram bin edges using the `auto` rule: the smaller of the Sturges and
/// Freedman–Diaconis bin widths (Sturges alone when the IQR is zero).
///
/// Returns `n_bins + 1` ascending edges; empty input gives no edges.
pub fn auto_bin_edges(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let first = sorted[0];
    let last = sorted[sorted.len() - 1];

    if last == first {
        return vec![first - 0.5, first + 0.5];
    }

    let n = sorted.len() as f64;
    let range = last - first;
    let sturges = range / (n.log2() + 1.0);
    let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

    let n_bins = ((range / width).ceil() as usize).max(1);
    (0..=n_bins)
        .map(|i| first + range * i as f64 / n_bins as f64)
        .collect()
}

/// Count `values` into the bins delimited by `edges`. The last bin is closed
/// on the right; values outside the edges are ignored.
pub fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<u64> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let n_bins = edges.len() - 1;
    let first = edges[0];
    let last = edges[n_bins];
    let mut counts = vec![0u64; n_bins];
    for &v in values {
        if v < first || v > last {
            continue;
        }
        let idx = (((v - first) / (last - first)) * n_bins as f64) as usize;
        counts[idx.min(n_bins - 1)] += 1;
    }
    counts
}

/// Gaussian KDE with Scott's rule bandwidth, evaluated on `gridsize` evenly
/// spaced points spanning the data extended by `cut` bandwidths each side.
///
/// Returns `None` when the density is undefined (fewer than two points or
/// zero variance). The curve integrates to one.
pub fn gaussian_kde(values: &[f64], cut: f64, gridsize: usize) -> Option<Vec<[f64; 2]>> {
    let n = values.len();
    if n < 2 || gridsize < 2 {
        return None;
    }
    let std = sample_std(values);
    if std <= 0.0 || !std.is_finite() {
        return None;
    }
    let bw = std * (n as f64).powf(-0.2);

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let lo = min - cut * bw;
    let hi = max + cut * bw;

    let norm = 1.0 / (n as f64 * bw * (2.0 * std::f64::consts::PI).sqrt());
    let curve = (0..gridsize)
        .map(|i| {
            let x = lo + (hi - lo) * i as f64 / (gridsize - 1) as f64;
            let density: f64 = values
                .iter()
                .map(|&v| {
                    let z = (x - v) / bw;
                    (-0.5 * z * z).exp()
                })
                .sum();
            [x, density * norm]
        })
        .collect();
    Some(curve)
}
