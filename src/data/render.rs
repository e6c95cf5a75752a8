use super::charts::ChartSpecs;
use super::filter::{filtered_indices, FilterSelection};
use super::metrics::MetricsSnapshot;
use super::model::Dataset;

/// Everything the dashboard displays for one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Indices of the rows in the filtered view, in dataset order.
    pub visible: Vec<usize>,
    pub metrics: MetricsSnapshot,
    pub charts: ChartSpecs,
}

/// Filter the dataset and derive KPIs and chart data from the result.
///
/// Pure: the shell calls this again whenever the selection changes.
pub fn render(dataset: &Dataset, selection: &FilterSelection) -> RenderOutput {
    let visible = filtered_indices(dataset, selection);
    let metrics = MetricsSnapshot::from_view(dataset, &visible);
    let charts = ChartSpecs::build(dataset, &visible);
    log::debug!(
        "rendered {} of {} rows (survival {:.1}%)",
        metrics.total_count,
        dataset.len(),
        metrics.survival_rate
    );
    RenderOutput {
        visible,
        metrics,
        charts,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::init_filter_selection;
    use crate::data::model::tests::four_passengers;
    use crate::data::model::{CategoryValue, Column};

    #[test]
    fn unfiltered_render_covers_everything() {
        let ds = four_passengers();
        let out = render(&ds, &init_filter_selection(&ds));
        assert_eq!(out.visible, vec![0, 1, 2, 3]);
        assert_eq!(out.metrics.total_count, 4);
        assert_eq!(out.charts.by_sex.labels.len(), 2);
    }

    #[test]
    fn first_class_scenario() {
        let ds = four_passengers();
        let mut selection = init_filter_selection(&ds);
        selection.insert(Column::Pclass, [CategoryValue::Integer(1)].into_iter().collect());

        let out = render(&ds, &selection);
        assert_eq!(out.visible.len(), 2);
        assert_eq!(out.metrics.total_count, 2);
        assert_eq!(out.metrics.survival_rate, 100.0);
        assert_eq!(out.charts.by_class.labels, vec![vec!["2\n(100.0%)"]]);
    }

    #[test]
    fn nobody_selected_renders_empty_charts() {
        let ds = four_passengers();
        let mut selection = init_filter_selection(&ds);
        selection.insert(Column::Sex, BTreeSet::new());

        let out = render(&ds, &selection);
        assert!(out.visible.is_empty());
        assert_eq!(out.metrics, MetricsSnapshot::default());
        assert!(out.charts.by_sex.labels.is_empty());
        assert!(out.charts.by_embarkation.is_empty());
    }

    #[test]
    fn render_does_not_touch_the_dataset() {
        let ds = four_passengers();
        let before = ds.records.clone();
        let mut selection = init_filter_selection(&ds);
        selection.insert(Column::Sex, [CategoryValue::from("female")].into_iter().collect());
        let _ = render(&ds, &selection);
        assert_eq!(ds.records, before);
    }
}
