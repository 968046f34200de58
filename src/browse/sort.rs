use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::catalog::ProductRecord;
use crate::numeric::parse_leading_number;

/// Numeric columns the table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Weight,
    Kcal,
    MoistureContent,
    Protein,
    Fat,
    Calcium,
    Phosphorus,
}

impl SortField {
    pub fn value_of(self, record: &ProductRecord) -> &str {
        match self {
            SortField::Weight => &record.weight_g,
            SortField::Kcal => &record.kcal,
            SortField::MoistureContent => &record.moisture_content,
            SortField::Protein => &record.protein,
            SortField::Fat => &record.fat,
            SortField::Calcium => &record.calcium,
            SortField::Phosphorus => &record.phosphorus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub order: Option<SortOrder>,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: Some(SortField::Weight),
            order: Some(SortOrder::Desc),
        }
    }
}

impl SortSpec {
    /// Header click: the active field flips direction, a new field starts descending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == Some(field) {
            self.order = match self.order {
                Some(SortOrder::Asc) => Some(SortOrder::Desc),
                _ => Some(SortOrder::Asc),
            };
        } else {
            self.field = Some(field);
            self.order = Some(SortOrder::Desc);
        }
    }
}

/// Stable sort of `items` by `spec`. Cells without a number (sentinel or
/// garbage) always go last, whatever the direction, and keep their input order.
pub fn sort_by_spec<'r, T, F>(items: &mut [T], spec: SortSpec, record_of: F)
where
    F: Fn(&T) -> &'r ProductRecord,
{
    let (Some(field), Some(order)) = (spec.field, spec.order) else {
        return;
    };
    let rank = |item: &T| parse_leading_number(field.value_of(record_of(item)));

    items.sort_by(|a, b| match (rank(a), rank(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match order {
            SortOrder::Asc => x.total_cmp(&y),
            SortOrder::Desc => y.total_cmp(&x),
        },
    });
}

/// Orders indexed rows as produced by [`super::filter::filter`].
pub fn sort<'a>(
    mut rows: Vec<(usize, &'a ProductRecord)>,
    spec: SortSpec,
) -> Vec<(usize, &'a ProductRecord)> {
    sort_by_spec(&mut rows, spec, |(_, r)| *r);
    rows
}
