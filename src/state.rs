use crate::data::aggregate::DerivedView;
use crate::data::filter::FilterCriteria;
use crate::data::model::TipsDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until the user loads a file or the sample).
    pub dataset: Option<TipsDataset>,

    /// Current sidebar selection.
    pub criteria: FilterCriteria,

    /// Everything derived from (dataset, criteria): filtered indices, KPI
    /// summary, tip-percent column and groupings.
    pub derived: Option<DerivedView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: TipsDataset) {
        self.criteria = FilterCriteria::default();
        self.derived = Some(DerivedView::compute(&dataset, &self.criteria));
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Recompute the derived view after a filter change. The whole view is
    /// rebuilt from the immutable dataset; nothing is updated incrementally.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.derived = Some(DerivedView::compute(ds, &self.criteria));
        }
    }

    /// Clear all four selectors back to "All".
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_builtin_sample;
    use crate::data::model::Day;

    #[test]
    fn set_dataset_derives_an_unfiltered_view() {
        let mut state = AppState::default();
        state.set_dataset(load_builtin_sample().unwrap());

        let n = state.dataset.as_ref().unwrap().len();
        let derived = state.derived.as_ref().unwrap();
        assert_eq!(derived.len(), n);
        assert!(derived.summary.is_some());
    }

    #[test]
    fn reset_filters_restores_the_full_view() {
        let mut state = AppState::default();
        state.set_dataset(load_builtin_sample().unwrap());
        let n = state.dataset.as_ref().unwrap().len();

        state.criteria.day = Some(Day::Sun);
        state.refilter();
        assert!(state.derived.as_ref().unwrap().len() < n);

        state.reset_filters();
        assert_eq!(state.derived.as_ref().unwrap().len(), n);
    }
}
