use tracing::debug;

use super::columns::ColumnVisibility;
use super::filter::{filter, Dimension, FilterOptions, FilterSelection};
use super::sort::{sort, SortField, SortSpec};
use crate::catalog::records::CatalogLoad;
use crate::catalog::ProductRecord;

/// Owns the loaded catalog and every piece of browse state. All mutations go
/// through the setters below so the cached view is always invalidated.
#[derive(Debug, Default)]
pub struct CatalogStore {
    records: Vec<ProductRecord>,
    options: FilterOptions,
    selection: FilterSelection,
    sort: SortSpec,
    columns: ColumnVisibility,
    /// Catalog indices of the filtered and sorted rows, rebuilt lazily.
    view: Option<Vec<usize>>,
}

impl CatalogStore {
    pub fn new(load: CatalogLoad) -> Self {
        let mut store = Self::default();
        store.replace(load);
        store
    }

    /// Swaps in a freshly loaded catalog. Selections go back to "all";
    /// sort spec and column visibility survive.
    pub fn replace(&mut self, load: CatalogLoad) {
        self.records = load.records;
        self.options = FilterOptions::from_records(&self.records);
        self.selection = FilterSelection::all();
        self.view = None;
        debug!(records = self.records.len(), "catalog store replaced");
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&ProductRecord> {
        self.records.get(index)
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    pub fn columns(&self) -> &ColumnVisibility {
        &self.columns
    }

    /// Filtered then sorted rows, paired with their catalog index.
    pub fn rows(&mut self) -> Vec<(usize, &ProductRecord)> {
        if self.view.is_none() {
            let rows = sort(filter(&self.records, &self.selection), self.sort);
            self.view = Some(rows.into_iter().map(|(i, _)| i).collect());
        }

        let records = &self.records;
        self.view
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|&i| (i, &records[i]))
            .collect()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.selection.set_query(query);
        self.invalidate();
    }

    pub fn set_values(&mut self, dimension: Dimension, values: Vec<String>) {
        self.selection.set_values(dimension, values, &self.options);
        self.invalidate();
    }

    pub fn toggle_value(&mut self, dimension: Dimension, value: &str) {
        self.selection.toggle_value(dimension, value, &self.options);
        self.invalidate();
    }

    pub fn toggle_all(&mut self, dimension: Dimension) {
        self.selection.toggle_all(dimension, &self.options);
        self.invalidate();
    }

    pub fn clear(&mut self, dimension: Dimension) {
        self.selection.clear(dimension);
        self.invalidate();
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
        self.invalidate();
    }

    /// Column visibility does not affect the rows, so the view stays cached.
    pub fn toggle_column(&mut self, id: &str) -> Option<bool> {
        self.columns.toggle(id)
    }

    pub fn show_all_columns(&mut self) {
        self.columns.show_all();
    }

    fn invalidate(&mut self) {
        self.view = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::filter::DimensionSelection;
    use crate::browse::sort::SortOrder;
    use crate::catalog::records::build_records;
    use crate::catalog::records::fixtures::HEADER;

    fn store() -> CatalogStore {
        let text = format!(
            "{HEADER}\n\
             Acme,Classic,Tuna,80,70,10,2,1,2,82,0.2,0.2,400,Japan\n\
             Bolt,Short,Beef,80,70,10,2,1,2,82\n\
             Cozy,Prime,Chicken,160,140,11,3,1,2,80,0.3,0.2,450,Thailand\n\
             Acme,Senior,Salmon,-,60,9,2,1,2,,0.2,0.2,400,Thailand"
        );
        CatalogStore::new(build_records(&text))
    }

    fn names(store: &mut CatalogStore) -> Vec<String> {
        store.rows().iter().map(|(_, r)| r.name.clone()).collect()
    }

    #[test]
    fn load_defaults_to_all_selected_and_weight_desc() {
        let mut store = store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.sort_spec(), SortSpec::default());
        for d in Dimension::ALL {
            let sel = store.selection().get(d);
            assert!(sel.is_all());
            assert_eq!(
                sel.selected_values(store.options().for_dimension(d)),
                store.options().for_dimension(d).to_vec()
            );
        }
        assert_eq!(names(&mut store), vec!["Prime", "Classic", "Senior"]);
    }

    #[test]
    fn rows_carry_catalog_indices() {
        let mut store = store();
        let rows: Vec<usize> = store.rows().iter().map(|(i, _)| *i).collect();
        assert_eq!(rows, vec![1, 0, 2]);
    }

    #[test]
    fn mutations_recompute_the_view() {
        let mut store = store();
        assert_eq!(store.rows().len(), 3);

        store.set_query("thai");
        assert_eq!(names(&mut store), vec!["Prime", "Senior"]);

        store.toggle_value(Dimension::Brand, "Cozy");
        assert_eq!(names(&mut store), vec!["Senior"]);

        store.clear(Dimension::Origin);
        assert!(store.rows().is_empty());

        store.toggle_all(Dimension::Origin);
        store.set_query("");
        store.toggle_sort(SortField::Weight);
        assert_eq!(store.sort_spec().order, Some(SortOrder::Asc));
        assert_eq!(names(&mut store), vec!["Classic", "Senior"]);
    }

    #[test]
    fn replace_resets_selection() {
        let mut store = store();
        store.clear(Dimension::Brand);
        assert!(store.rows().is_empty());

        let text = format!("{HEADER}\nZed,Only,Duck,85,75,10,2,1,2,81,0.2,0.2,400,France");
        store.replace(build_records(&text));
        assert_eq!(store.selection().get(Dimension::Brand), &DimensionSelection::All);
        assert_eq!(names(&mut store), vec!["Only"]);
    }

    #[test]
    fn empty_load_is_no_data() {
        let mut store = CatalogStore::new(CatalogLoad::default());
        assert!(store.is_empty());
        assert!(store.rows().is_empty());
        assert!(store.options().brands.is_empty());
    }
}
