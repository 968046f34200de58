use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{ProductRecord, SENTINEL};
use crate::numeric::parse_leading_number;

/// An independently filterable product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Weight,
    Origin,
    Brand,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Weight, Dimension::Origin, Dimension::Brand];

    pub fn value_of(self, record: &ProductRecord) -> &str {
        match self {
            Dimension::Weight => &record.weight_g,
            Dimension::Origin => &record.origin,
            Dimension::Brand => &record.brand,
        }
    }
}

/// Selection state of one dimension.
///
/// `All` is the canonical "no filter" state. `Only` keeps the picked values in
/// the order they were picked; an empty `Only` (everything deselected one by
/// one) does not restrict either. `Cleared` comes only from the explicit
/// clear action and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionSelection {
    All,
    Only(Vec<String>),
    Cleared,
}

impl DimensionSelection {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            DimensionSelection::All => true,
            DimensionSelection::Only(values) => {
                values.is_empty() || values.iter().any(|v| v == value)
            }
            DimensionSelection::Cleared => false,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, DimensionSelection::All)
    }

    /// The concrete list of selected values against the current options.
    pub fn selected_values(&self, options: &[String]) -> Vec<String> {
        match self {
            DimensionSelection::All => options.to_vec(),
            DimensionSelection::Only(values) => values.clone(),
            DimensionSelection::Cleared => Vec::new(),
        }
    }

    /// Collapses `values` to `All` when it covers every option.
    fn normalized(values: Vec<String>, options: &[String]) -> Self {
        if !options.is_empty() && options.iter().all(|o| values.contains(o)) {
            DimensionSelection::All
        } else {
            DimensionSelection::Only(values)
        }
    }
}

/// Distinct values offered per dimension, sentinel excluded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub weights: Vec<String>,
    pub origins: Vec<String>,
    pub brands: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[ProductRecord]) -> Self {
        let distinct = |dimension: Dimension| -> Vec<String> {
            records
                .iter()
                .map(|r| dimension.value_of(r))
                .filter(|v| *v != SENTINEL)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        };

        let mut weights = distinct(Dimension::Weight);
        // Numeric order; values without a number go last, ties keep text order.
        weights.sort_by(|a, b| {
            match (parse_leading_number(a), parse_leading_number(b)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| a.cmp(b))
        });

        Self {
            weights,
            origins: distinct(Dimension::Origin),
            brands: distinct(Dimension::Brand),
        }
    }

    pub fn for_dimension(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Weight => &self.weights,
            Dimension::Origin => &self.origins,
            Dimension::Brand => &self.brands,
        }
    }
}

/// Every active criterion of the catalog view.
#[derive(Debug, Clone)]
pub struct FilterSelection {
    query: String,
    weight: DimensionSelection,
    origin: DimensionSelection,
    brand: DimensionSelection,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FilterSelection {
    /// No query and every dimension fully selected.
    pub fn all() -> Self {
        Self {
            query: String::new(),
            weight: DimensionSelection::All,
            origin: DimensionSelection::All,
            brand: DimensionSelection::All,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn get(&self, dimension: Dimension) -> &DimensionSelection {
        match dimension {
            Dimension::Weight => &self.weight,
            Dimension::Origin => &self.origin,
            Dimension::Brand => &self.brand,
        }
    }

    fn slot(&mut self, dimension: Dimension) -> &mut DimensionSelection {
        match dimension {
            Dimension::Weight => &mut self.weight,
            Dimension::Origin => &mut self.origin,
            Dimension::Brand => &mut self.brand,
        }
    }

    /// The "all" checkbox. Turning it off keeps the first option selected so
    /// the dimension never ends up empty through this control.
    pub fn toggle_all(&mut self, dimension: Dimension, options: &FilterOptions) {
        let available = options.for_dimension(dimension);
        let slot = self.slot(dimension);
        *slot = if slot.is_all() {
            DimensionSelection::Only(available.iter().take(1).cloned().collect())
        } else {
            DimensionSelection::All
        };
    }

    /// A single option checkbox.
    pub fn toggle_value(&mut self, dimension: Dimension, value: &str, options: &FilterOptions) {
        let available = options.for_dimension(dimension);
        let slot = self.slot(dimension);
        let mut values = slot.selected_values(available);
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
            *slot = DimensionSelection::Only(values);
        } else {
            values.push(value.to_string());
            *slot = DimensionSelection::normalized(values, available);
        }
    }

    /// Replaces the selection wholesale; duplicates are dropped. An empty
    /// list is the same as [`FilterSelection::clear`].
    pub fn set_values(&mut self, dimension: Dimension, values: Vec<String>, options: &FilterOptions) {
        if values.is_empty() {
            self.clear(dimension);
            return;
        }
        let mut unique = Vec::with_capacity(values.len());
        for v in values {
            if !unique.contains(&v) {
                unique.push(v);
            }
        }
        let available = options.for_dimension(dimension);
        *self.slot(dimension) = DimensionSelection::normalized(unique, available);
    }

    /// The explicit "clear" action: the dimension then matches nothing.
    pub fn clear(&mut self, dimension: Dimension) {
        *self.slot(dimension) = DimensionSelection::Cleared;
    }

    pub fn matches(&self, record: &ProductRecord) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty() {
            let hit = [&record.origin, &record.brand, &record.name, &record.flavor]
                .iter()
                .any(|field| field.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        Dimension::ALL
            .iter()
            .all(|&d| self.get(d).matches(d.value_of(record)))
    }
}

/// Order-preserving subset of `records` passing every active criterion,
/// each paired with its catalog index.
pub fn filter<'a>(
    records: &'a [ProductRecord],
    selection: &FilterSelection,
) -> Vec<(usize, &'a ProductRecord)> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::records::fixtures::record;

    fn catalog() -> Vec<ProductRecord> {
        vec![
            record("Acme", "Classic", "Thailand", "80"),
            record("Bolt", "Prime", "Japan", "400"),
            record("Acme", "Senior", "Japan", "170"),
            record("Cozy", "Kitten", "-", "80"),
        ]
    }

    #[test]
    fn options_are_distinct_sorted_and_sentinel_free() {
        let options = FilterOptions::from_records(&catalog());
        assert_eq!(options.weights, vec!["80", "170", "400"]);
        assert_eq!(options.origins, vec!["Japan", "Thailand"]);
        assert_eq!(options.brands, vec!["Acme", "Bolt", "Cozy"]);
    }

    #[test]
    fn default_selection_matches_everything() {
        let records = catalog();
        assert_eq!(filter(&records, &FilterSelection::all()).len(), records.len());
    }

    #[test]
    fn query_is_case_insensitive_over_text_fields() {
        let records = catalog();
        let mut sel = FilterSelection::all();
        sel.set_query("  japan ");
        let names: Vec<_> = filter(&records, &sel).iter().map(|(_, r)| r.name.as_str()).collect();
        assert_eq!(names, vec!["Prime", "Senior"]);

        sel.set_query("KITT");
        assert_eq!(filter(&records, &sel).len(), 1);

        sel.set_query("   ");
        assert_eq!(filter(&records, &sel).len(), records.len());
    }

    #[test]
    fn dimensions_combine_as_conjunction() {
        let records = catalog();
        let options = FilterOptions::from_records(&records);
        let mut sel = FilterSelection::all();
        sel.set_values(Dimension::Brand, vec!["Acme".into()], &options);
        sel.set_values(Dimension::Origin, vec!["Japan".into()], &options);
        let hits = filter(&records, &sel);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1.name, "Senior");
        assert_eq!(hits[0].0, 2);
    }

    #[test]
    fn setting_no_values_clears_the_dimension() {
        let records = catalog();
        let options = FilterOptions::from_records(&records);
        let mut sel = FilterSelection::all();
        sel.set_values(Dimension::Brand, Vec::new(), &options);
        assert_eq!(sel.get(Dimension::Brand), &DimensionSelection::Cleared);
        assert!(filter(&records, &sel).is_empty());
    }

    #[test]
    fn explicit_clear_matches_nothing() {
        let records = catalog();
        let mut sel = FilterSelection::all();
        sel.clear(Dimension::Weight);
        assert!(filter(&records, &sel).is_empty());
        assert_eq!(sel.get(Dimension::Weight), &DimensionSelection::Cleared);
    }

    #[test]
    fn deselecting_everything_one_by_one_means_no_restriction() {
        let records = catalog();
        let options = FilterOptions::from_records(&records);
        let mut sel = FilterSelection::all();
        for brand in ["Acme", "Bolt", "Cozy"] {
            sel.toggle_value(Dimension::Brand, brand, &options);
        }
        assert_eq!(sel.get(Dimension::Brand), &DimensionSelection::Only(vec![]));
        assert_eq!(filter(&records, &sel).len(), records.len());
    }

    #[test]
    fn toggle_all_off_keeps_first_option_and_back_on_restores_all() {
        let options = FilterOptions::from_records(&catalog());
        let mut sel = FilterSelection::all();

        sel.toggle_all(Dimension::Weight, &options);
        let values = sel.get(Dimension::Weight).selected_values(&options.weights);
        assert_eq!(values, vec!["80"]);

        sel.toggle_all(Dimension::Weight, &options);
        assert!(sel.get(Dimension::Weight).is_all());
        assert_eq!(sel.get(Dimension::Weight).selected_values(&options.weights).len(), 3);
    }

    #[test]
    fn picking_every_option_promotes_to_all() {
        let options = FilterOptions::from_records(&catalog());
        let mut sel = FilterSelection::all();
        sel.clear(Dimension::Origin);
        sel.toggle_value(Dimension::Origin, "Thailand", &options);
        assert_eq!(
            sel.get(Dimension::Origin),
            &DimensionSelection::Only(vec!["Thailand".into()])
        );
        sel.toggle_value(Dimension::Origin, "Japan", &options);
        assert!(sel.get(Dimension::Origin).is_all());
    }

    #[test]
    fn deselecting_from_all_keeps_the_rest() {
        let records = catalog();
        let options = FilterOptions::from_records(&records);
        let mut sel = FilterSelection::all();
        sel.toggle_value(Dimension::Brand, "Acme", &options);
        assert_eq!(
            sel.get(Dimension::Brand),
            &DimensionSelection::Only(vec!["Bolt".into(), "Cozy".into()])
        );
        assert_eq!(filter(&records, &sel).len(), 2);
    }

    #[test]
    fn set_values_with_every_option_is_all() {
        let options = FilterOptions::from_records(&catalog());
        let mut sel = FilterSelection::all();
        sel.set_values(
            Dimension::Origin,
            vec!["Thailand".into(), "Japan".into(), "Japan".into()],
            &options,
        );
        assert!(sel.get(Dimension::Origin).is_all());
    }
}
