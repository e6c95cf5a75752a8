use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::cache::DatasetCache;
use crate::data::filter::{init_filter_selection, FilterSelection};
use crate::data::model::{CategoryValue, Column, Dataset};
use crate::data::render::{render, RenderOutput};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Survival,
    ClassEconomics,
    Family,
    Passengers,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Survival, Tab::ClassEconomics, Tab::Family, Tab::Passengers];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Survival => "Survival Overview",
            Tab::ClassEconomics => "Class & Economics",
            Tab::Family => "Family & Demographics",
            Tab::Passengers => "Passengers",
        }
    }
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Parsed datasets, owned here so reloads can invalidate them.
    pub cache: DatasetCache,

    /// File currently shown.
    pub data_path: Option<PathBuf>,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Per-column filter selections.
    pub selection: FilterSelection,

    /// Filtered view, KPIs and chart data for the current selection.
    pub view: Option<RenderOutput>,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load `path` through the cache and show it. Failures end up in
    /// `status_message` and leave the previous dataset in place.
    pub fn open(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(dataset) => {
                log::info!(
                    "Showing {} passengers from {}",
                    dataset.len(),
                    path.display()
                );
                self.data_path = Some(path.to_path_buf());
                let empty = dataset.is_empty();
                self.set_dataset(dataset);
                if empty {
                    log::warn!("{} contains no passengers", path.display());
                    self.status_message = Some(format!("{} contains no passengers", path.display()));
                }
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Drop the cached copy of the current file and read it again.
    pub fn reload(&mut self) {
        if let Some(path) = self.data_path.clone() {
            self.cache.invalidate(&path);
            self.open(&path);
        }
    }

    /// Forget every cached dataset, then reload the current file.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        if let Some(path) = self.data_path.clone() {
            self.open(&path);
        }
    }

    /// Ingest a newly loaded dataset and reset the filters to "everything".
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selection = init_filter_selection(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the view after a selection change.
    pub fn refilter(&mut self) {
        self.view = self
            .dataset
            .as_ref()
            .map(|ds| render(ds, &self.selection));
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_filter_value(&mut self, column: Column, value: &CategoryValue) {
        let selected = self.selection.entry(column).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: Column) {
        if let Some(ds) = &self.dataset {
            if let Some(all_vals) = ds.unique_values.get(&column) {
                self.selection.insert(column, all_vals.clone());
                self.refilter();
            }
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: Column) {
        self.selection.insert(column, BTreeSet::new());
        self.refilter();
    }
}
