use super::charts::CountPlot;

// ---------------------------------------------------------------------------
// Bar annotation: "count\n(percentage%)" per bar segment
// ---------------------------------------------------------------------------

/// Label every bar with its count and its share of `total_count`.
///
/// Labels come back in input order. Zero-height bars get an empty label so
/// nothing is drawn over them.
///
/// # Panics
///
/// Panics if `total_count` is zero; callers only annotate non-empty views.
pub fn bar_labels<K>(bars: &[(K, u64)], total_count: usize) -> Vec<String> {
    assert!(total_count > 0, "bar labels need a non-zero total count");
    let total = total_count as f64;
    bars.iter()
        .map(|(_, height)| {
            if *height == 0 {
                String::new()
            } else {
                let percentage = *height as f64 / total * 100.0;
                format!("{height}\n({percentage:.1}%)")
            }
        })
        .collect()
}

/// Labels for every container of a count plot, one `Vec` per hue level.
pub fn annotate_count_plot(plot: &CountPlot, total_count: usize) -> Vec<Vec<String>> {
    plot.containers
        .iter()
        .map(|container| bar_labels(&container.bars, total_count))
        .collect()
}
