//! The view model: dataset plus filter, sort and page state.
//!
//! The filtered sequence is kept as indices into the dataset. It is recomputed by a full rescan
//! whenever the criteria change, and after every appended batch while a filter or sort is
//! active. With no filter and no sort, appended rows are simply added to the end of the view.

use serde::Deserialize;

use crate::types::Row;

use super::filter::{FilterCriteria, filter_indices};
use super::options::FilterOptions;
use super::paginate::{DEFAULT_PAGE_SIZE, Pagination};
use super::sort::{SortKey, SortState, sort_indices};

/// View model configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub page_size: usize,
    /// Sort applied before the user picks one; `None` keeps insertion order.
    pub default_sort: Option<SortState>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: Some(SortState::ascending(SortKey::P)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewModel {
    rows: Vec<Row>,
    criteria: FilterCriteria,
    sort: Option<SortState>,
    pagination: Pagination,
    view: Vec<usize>,
    options: FilterOptions,
    options_populated: bool,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new(ViewOptions::default())
    }
}

impl ViewModel {
    /// An empty view model. One is created per loading session.
    pub fn new(opts: ViewOptions) -> Self {
        Self {
            rows: Vec::new(),
            criteria: FilterCriteria::default(),
            sort: opts.default_sort,
            pagination: Pagination::new(opts.page_size),
            view: Vec::new(),
            options: FilterOptions::default(),
            options_populated: false,
        }
    }

    /// Every row loaded so far, in arrival order.
    pub fn dataset(&self) -> &[Row] {
        &self.rows
    }

    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    /// The filtered, sorted rows.
    pub fn filtered_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.view.iter().map(|&i| &self.rows[i])
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<&Row> {
        self.view[self.pagination.range(self.view.len())]
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Append a batch of freshly ingested rows.
    ///
    /// The first non-empty batch populates the filter options. The current page is kept (and
    /// re-clamped) rather than reset.
    pub fn append_rows(&mut self, batch: Vec<Row>) {
        if batch.is_empty() {
            return;
        }
        let start = self.rows.len();
        self.rows.extend(batch);

        if !self.options_populated {
            self.refresh_filter_options();
        }

        if self.criteria.is_empty() && self.sort.is_none() {
            self.view.extend(start..self.rows.len());
        } else {
            self.view = filter_indices(&self.rows, &self.criteria);
            self.sort();
        }
        self.pagination.clamp(self.view.len());
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    /// Recompute the filter options from the whole dataset.
    pub fn refresh_filter_options(&mut self) {
        self.options = FilterOptions::from_rows(&self.rows);
        self.options_populated = !self.rows.is_empty();
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the criteria and re-filter.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.apply_filters();
    }

    /// Clear every constraint and re-filter.
    pub fn reset_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    /// Rescan the dataset against the criteria, sort, and go back to page 1.
    pub fn apply_filters(&mut self) {
        self.view = filter_indices(&self.rows, &self.criteria);
        self.sort();
        self.pagination.set_page(1, self.view.len());
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    /// Stable-sort the filtered rows by the current sort state (no-op without one).
    pub fn sort(&mut self) {
        if let Some(state) = self.sort {
            sort_indices(&self.rows, &mut self.view, state);
        }
    }

    /// Header click: flip direction if `key` is active, otherwise sort by `key` ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        let next = match self.sort {
            Some(state) => state.toggled(key),
            None => SortState::ascending(key),
        };
        self.set_sort(Some(next));
    }

    /// Replace the sort state. `None` restores dataset order.
    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
        if sort.is_some() {
            self.sort();
        } else {
            self.view.sort_unstable();
        }
    }

    pub fn page(&self) -> usize {
        self.pagination.page()
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.view.len())
    }

    /// Go to page `n`, clamped into `[1, total_pages]`. Returns the resulting page.
    pub fn set_page(&mut self, n: usize) -> usize {
        self.pagination.set_page(n, self.view.len())
    }

    /// Returns `false` when already on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.set_page(self.page() + 1);
        true
    }

    /// Returns `false` when already on the first page.
    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.set_page(self.page() - 1);
        true
    }

    pub fn has_prev(&self) -> bool {
        self.pagination.has_prev()
    }

    pub fn has_next(&self) -> bool {
        self.pagination.has_next(self.view.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewModel, ViewOptions};
    use crate::processing::filter::FilterCriteria;
    use crate::processing::sort::{SortKey, SortState};
    use crate::types::Row;

    fn row(phenotype: &str, cpg: &str, p: f64, n: Option<u64>) -> Row {
        Row {
            phenotype: phenotype.to_string(),
            tissue: "Blood".to_string(),
            r#type: "Survival".to_string(),
            method: "Beta".to_string(),
            n,
            cpg: cpg.to_string(),
            location: "chr1:1".to_string(),
            gene: "G".to_string(),
            beta: 0.1,
            p,
            source: "A.csv".to_string(),
        }
    }

    fn unsorted() -> ViewOptions {
        ViewOptions {
            page_size: 2,
            default_sort: None,
        }
    }

    fn cpgs(vm: &ViewModel) -> Vec<String> {
        vm.filtered_rows().map(|r| r.cpg.clone()).collect()
    }

    #[test]
    fn appended_rows_show_in_order_without_filter_or_sort() {
        let mut vm = ViewModel::new(unsorted());
        vm.append_rows(vec![row("AD", "a", 0.3, None), row("BMI", "b", 0.1, None)]);
        vm.append_rows(vec![row("AD", "c", 0.2, None)]);
        assert_eq!(cpgs(&vm), vec!["a", "b", "c"]);
        vm.reset_filters();
        assert_eq!(cpgs(&vm), vec!["a", "b", "c"]);
    }

    #[test]
    fn default_sort_applies_to_appended_batches() {
        let mut vm = ViewModel::default();
        vm.append_rows(vec![row("AD", "a", 0.3, None), row("AD", "b", 0.1, None)]);
        vm.append_rows(vec![row("AD", "c", 0.2, None), row("AD", "d", f64::NAN, None)]);
        assert_eq!(vm.sort_state(), Some(SortState::ascending(SortKey::P)));
        assert_eq!(cpgs(&vm), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn active_filter_is_reapplied_to_new_batches() {
        let mut vm = ViewModel::new(unsorted());
        vm.append_rows(vec![row("AD", "a", 0.3, None)]);
        vm.set_criteria(FilterCriteria::default().with_phenotype("AD"));
        vm.append_rows(vec![row("BMI", "b", 0.1, None), row("AD", "c", 0.2, None)]);
        assert_eq!(cpgs(&vm), vec!["a", "c"]);
        assert_eq!(vm.dataset().len(), 3);
    }

    #[test]
    fn filter_options_populate_on_first_batch_only_until_refreshed() {
        let mut vm = ViewModel::new(unsorted());
        vm.append_rows(vec![row("AD", "a", 0.3, None)]);
        vm.append_rows(vec![row("BMI", "b", 0.1, None)]);
        assert_eq!(vm.filter_options().phenotypes, vec!["AD"]);
        vm.refresh_filter_options();
        assert_eq!(vm.filter_options().phenotypes, vec!["AD", "BMI"]);
    }

    #[test]
    fn header_clicks_toggle_and_switch_keys() {
        let mut vm = ViewModel::default();
        vm.append_rows(vec![
            row("AD", "a", 0.3, Some(10)),
            row("AD", "b", 0.1, Some(30)),
            row("AD", "c", 0.2, Some(20)),
        ]);
        assert_eq!(cpgs(&vm), vec!["b", "c", "a"]);
        vm.toggle_sort(SortKey::P);
        assert_eq!(vm.sort_state(), Some(SortState::descending(SortKey::P)));
        assert_eq!(cpgs(&vm), vec!["a", "c", "b"]);
        vm.toggle_sort(SortKey::N);
        assert_eq!(vm.sort_state(), Some(SortState::ascending(SortKey::N)));
        assert_eq!(cpgs(&vm), vec!["a", "c", "b"]);
        vm.set_sort(None);
        assert_eq!(cpgs(&vm), vec!["a", "b", "c"]);
    }

    #[test]
    fn paging_clamps_and_apply_filters_resets_to_first_page() {
        let mut vm = ViewModel::new(unsorted());
        vm.append_rows((0..5).map(|i| row("AD", &format!("r{i}"), 0.1, None)).collect());
        assert_eq!(vm.total_pages(), 3);
        assert_eq!(vm.set_page(10), 3);
        assert_eq!(vm.page_rows().len(), 1);
        assert!(!vm.next_page());
        assert!(vm.prev_page());
        assert_eq!(vm.page(), 2);
        assert_eq!(vm.set_page(0), 1);
        assert!(!vm.prev_page());

        vm.set_page(3);
        vm.apply_filters();
        assert_eq!(vm.page(), 1);
    }

    #[test]
    fn page_is_kept_while_batches_arrive() {
        let mut vm = ViewModel::new(unsorted());
        vm.append_rows((0..4).map(|i| row("AD", &format!("r{i}"), 0.1, None)).collect());
        vm.set_page(2);
        vm.append_rows(vec![row("AD", "r4", 0.1, None)]);
        assert_eq!(vm.page(), 2);
        let page: Vec<&str> = vm.page_rows().iter().map(|r| r.cpg.as_str()).collect();
        assert_eq!(page, vec!["r2", "r3"]);
    }
}
