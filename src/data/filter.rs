use std::collections::{BTreeMap, BTreeSet};

use super::model::{CategoryValue, Column, Dataset};

// ---------------------------------------------------------------------------
// Filter selection: which distinct values are permitted per column
// ---------------------------------------------------------------------------

/// Per-column selection: maps column → set of permitted values.
/// An absent column is unconstrained; a present but empty set admits nothing.
pub type FilterSelection = BTreeMap<Column, BTreeSet<CategoryValue>>;

/// Initialise a [`FilterSelection`] with every value selected (i.e., show everything).
pub fn init_filter_selection(dataset: &Dataset) -> FilterSelection {
    dataset
        .unique_values
        .iter()
        .map(|(col, vals)| (*col, vals.clone()))
        .collect()
}

/// Return indices of records that pass all filters, in dataset order.
///
/// A record passes a column filter when:
/// * The column is not present in `selection` → passes (no constraint)
/// * The permitted set for that column is empty → fails
/// * The record's value for that column is in the permitted set → passes
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    if selection.values().any(BTreeSet::is_empty) {
        return Vec::new();
    }

    // Columns where every distinct value is selected impose no constraint.
    let active: Vec<(&Column, &BTreeSet<CategoryValue>)> = selection
        .iter()
        .filter(|(col, selected)| dataset.unique_values.get(*col) != Some(*selected))
        .collect();

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            active
                .iter()
                .all(|(col, selected)| selected.contains(&rec.category(**col)))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::four_passengers;

    fn only(col: Column, values: &[CategoryValue]) -> FilterSelection {
        let mut selection = FilterSelection::new();
        selection.insert(col, values.iter().cloned().collect());
        selection
    }

    #[test]
    fn everything_selected_is_identity() {
        let ds = four_passengers();
        let selection = init_filter_selection(&ds);
        assert_eq!(filtered_indices(&ds, &selection), vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_selection_map_is_identity() {
        let ds = four_passengers();
        assert_eq!(filtered_indices(&ds, &FilterSelection::new()).len(), 4);
    }

    #[test]
    fn single_class_filter() {
        let ds = four_passengers();
        let selection = only(Column::Pclass, &[CategoryValue::Integer(1)]);
        assert_eq!(filtered_indices(&ds, &selection), vec![0, 1]);
    }

    #[test]
    fn empty_permitted_set_yields_nothing() {
        let ds = four_passengers();
        let mut selection = init_filter_selection(&ds);
        selection.insert(Column::Sex, BTreeSet::new());
        assert!(filtered_indices(&ds, &selection).is_empty());
    }

    #[test]
    fn or_within_column_and_across_columns() {
        let ds = four_passengers();
        let mut selection = init_filter_selection(&ds);
        selection.insert(
            Column::EmbarkTown,
            ["Southampton", "Queenstown"].into_iter().map(CategoryValue::from).collect(),
        );
        selection.insert(Column::Sex, [CategoryValue::from("male")].into_iter().collect());

        let visible = filtered_indices(&ds, &selection);
        assert_eq!(visible, vec![0, 2]);
        for &i in &visible {
            let rec = &ds.records[i];
            for (col, allowed) in &selection {
                assert!(allowed.contains(&rec.category(*col)));
            }
        }
    }

    #[test]
    fn missing_category_can_be_selected() {
        let mut ds = four_passengers();
        ds.records[3].embark_town = None;
        let ds = crate::data::model::Dataset::from_records(ds.records);
        let selection = only(Column::EmbarkTown, &[CategoryValue::Missing]);
        assert_eq!(filtered_indices(&ds, &selection), vec![3]);
    }
}
