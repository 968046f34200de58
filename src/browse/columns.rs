use std::collections::BTreeMap;

use serde::Serialize;

use super::sort::SortField;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnDef {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<SortField>,
    /// Pinned columns cannot be hidden.
    pub pinned: bool,
}

const fn column(id: &'static str, label: &'static str) -> ColumnDef {
    ColumnDef { id, label, sort_field: None, pinned: false }
}

const fn sortable(id: &'static str, label: &'static str, field: SortField) -> ColumnDef {
    ColumnDef { id, label, sort_field: Some(field), pinned: false }
}

/// Table columns in display order.
pub const TABLE_COLUMNS: &[ColumnDef] = &[
    ColumnDef { id: "flavor", label: "Flavor", sort_field: None, pinned: true },
    column("brand", "Brand"),
    column("name", "Name"),
    column("origin", "Origin"),
    sortable("weight_g", "Weight (g)", SortField::Weight),
    sortable("kcal", "Calories (kcal)", SortField::Kcal),
    sortable("moisture_content", "Moisture (ml)", SortField::MoistureContent),
    sortable("protein", "Crude protein (%)", SortField::Protein),
    sortable("fat", "Crude fat (%)", SortField::Fat),
    sortable("calcium", "Calcium (%)", SortField::Calcium),
    sortable("phosphorus", "Phosphorus (%)", SortField::Phosphorus),
    column("fiber", "Crude fiber (%)"),
    column("ash", "Ash (%)"),
    column("taurine_content", "Taurine (mg)"),
];

pub fn find_column(id: &str) -> Option<&'static ColumnDef> {
    TABLE_COLUMNS.iter().find(|c| c.id == id)
}

/// Which columns the table shows. Everything starts visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnVisibility {
    visible: BTreeMap<&'static str, bool>,
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self {
            visible: TABLE_COLUMNS.iter().map(|c| (c.id, true)).collect(),
        }
    }
}

impl ColumnVisibility {
    pub fn is_visible(&self, id: &str) -> bool {
        match find_column(id) {
            Some(c) if c.pinned => true,
            Some(c) => self.visible.get(c.id).copied().unwrap_or(true),
            None => false,
        }
    }

    /// Flips one column and returns its new state, or `None` for an unknown id.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let column = find_column(id)?;
        if column.pinned {
            return Some(true);
        }
        let entry = self.visible.entry(column.id).or_insert(true);
        *entry = !*entry;
        Some(*entry)
    }

    pub fn show_all(&mut self) {
        self.visible.values_mut().for_each(|v| *v = true);
    }

    pub fn all_visible(&self) -> bool {
        TABLE_COLUMNS.iter().all(|c| self.is_visible(c.id))
    }

    pub fn visible_columns(&self) -> Vec<&'static ColumnDef> {
        TABLE_COLUMNS.iter().filter(|c| self.is_visible(c.id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_visible_by_default() {
        let cols = ColumnVisibility::default();
        assert!(cols.all_visible());
        assert_eq!(cols.visible_columns().len(), TABLE_COLUMNS.len());
    }

    #[test]
    fn toggling_hides_and_shows() {
        let mut cols = ColumnVisibility::default();
        assert_eq!(cols.toggle("ash"), Some(false));
        assert!(!cols.is_visible("ash"));
        assert!(!cols.all_visible());
        assert_eq!(cols.visible_columns().len(), TABLE_COLUMNS.len() - 1);
        assert_eq!(cols.toggle("ash"), Some(true));
    }

    #[test]
    fn pinned_flavor_column_stays_visible() {
        let mut cols = ColumnVisibility::default();
        assert_eq!(cols.toggle("flavor"), Some(true));
        assert!(cols.is_visible("flavor"));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let mut cols = ColumnVisibility::default();
        assert_eq!(cols.toggle("price"), None);
    }

    #[test]
    fn show_all_resets_hidden_columns() {
        let mut cols = ColumnVisibility::default();
        cols.toggle("fat");
        cols.toggle("kcal");
        cols.show_all();
        assert!(cols.all_visible());
    }

    #[test]
    fn sortable_columns_map_to_sort_fields() {
        assert_eq!(find_column("kcal").and_then(|c| c.sort_field), Some(SortField::Kcal));
        assert!(find_column("brand").and_then(|c| c.sort_field).is_none());
    }
}
