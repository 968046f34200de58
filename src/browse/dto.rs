use serde::{Deserialize, Serialize};

use super::columns::{ColumnDef, TABLE_COLUMNS};
use super::filter::{Dimension, DimensionSelection, FilterOptions};
use super::sort::{SortField, SortSpec};
use super::store::CatalogStore;
use crate::catalog::ProductRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStatus {
    Ready,
    NoData,
}

#[derive(Debug, Serialize)]
pub struct CatalogRow {
    pub index: usize,
    #[serde(flatten)]
    pub record: ProductRecord,
}

#[derive(Debug, Serialize)]
pub struct DimensionView {
    pub all: bool,
    pub cleared: bool,
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub query: String,
    pub weight: DimensionView,
    pub origin: DimensionView,
    pub brand: DimensionView,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub status: CatalogStatus,
    pub total: usize,
    pub count: usize,
    pub sort: SortSpec,
    pub selection: SelectionResponse,
    pub rows: Vec<CatalogRow>,
}

#[derive(Debug, Serialize)]
pub struct ColumnView {
    #[serde(flatten)]
    pub column: ColumnDef,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct ColumnsResponse {
    pub columns: Vec<ColumnView>,
    pub visible_count: usize,
    pub total: usize,
    pub all_visible: bool,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ValuesRequest {
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ValueRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub field: SortField,
}

fn dimension_view(selection: &DimensionSelection, options: &[String]) -> DimensionView {
    DimensionView {
        all: selection.is_all(),
        cleared: matches!(selection, DimensionSelection::Cleared),
        values: selection.selected_values(options),
    }
}

impl SelectionResponse {
    pub fn from_store(store: &CatalogStore) -> Self {
        let options: &FilterOptions = store.options();
        let sel = store.selection();
        let view = |d: Dimension| dimension_view(sel.get(d), options.for_dimension(d));
        Self {
            query: sel.query().to_string(),
            weight: view(Dimension::Weight),
            origin: view(Dimension::Origin),
            brand: view(Dimension::Brand),
        }
    }
}

impl CatalogResponse {
    pub fn from_store(store: &mut CatalogStore) -> Self {
        let rows: Vec<CatalogRow> = store
            .rows()
            .into_iter()
            .map(|(index, record)| CatalogRow {
                index,
                record: record.clone(),
            })
            .collect();
        Self {
            status: if store.is_empty() {
                CatalogStatus::NoData
            } else {
                CatalogStatus::Ready
            },
            total: store.len(),
            count: rows.len(),
            sort: store.sort_spec(),
            selection: SelectionResponse::from_store(store),
            rows,
        }
    }
}

impl ColumnsResponse {
    pub fn from_store(store: &CatalogStore) -> Self {
        let visibility = store.columns();
        let columns: Vec<ColumnView> = TABLE_COLUMNS
            .iter()
            .map(|c| ColumnView {
                column: *c,
                visible: visibility.is_visible(c.id),
            })
            .collect();
        Self {
            visible_count: visibility.visible_columns().len(),
            total: columns.len(),
            all_visible: visibility.all_visible(),
            columns,
        }
    }
}
