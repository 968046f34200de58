use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::parser::parse_line;
use crate::numeric::{parse_leading_number, to_fixed};

/// Marker for a value the dataset does not provide.
pub const SENTINEL: &str = "-";

/// Columns a data row must carry to become a record.
pub const MIN_COLUMNS: usize = 14;

// Source column positions.
const COL_BRAND: usize = 0;
const COL_NAME: usize = 1;
const COL_FLAVOR: usize = 2;
const COL_WEIGHT: usize = 3;
const COL_KCAL: usize = 4;
const COL_PROTEIN: usize = 5;
const COL_FAT: usize = 6;
const COL_FIBER: usize = 7;
const COL_ASH: usize = 8;
const COL_MOISTURE: usize = 9;
const COL_CALCIUM: usize = 10;
const COL_PHOSPHORUS: usize = 11;
const COL_TAURINE: usize = 12;
const COL_ORIGIN: usize = 13;

/// One can from the catalog. Every field is a display string; [`SENTINEL`]
/// stands for missing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub origin: String,
    pub brand: String,
    pub name: String,
    pub flavor: String,
    pub weight_g: String,
    pub kcal: String,
    pub protein: String,
    pub fat: String,
    pub fiber: String,
    pub ash: String,
    pub moisture: String,
    /// Water carried by the can, in ml.
    pub moisture_content: String,
    pub calcium: String,
    pub phosphorus: String,
    /// Taurine concentration, mg/kg.
    pub taurine: String,
    pub taurine_content: String,
}

impl ProductRecord {
    /// Builds a record from an already split row. Returns `None` for short rows.
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        if fields.len() < MIN_COLUMNS {
            return None;
        }
        let cell = |i: usize| -> String {
            match fields[i].as_str() {
                "" => SENTINEL.to_string(),
                v => v.to_string(),
            }
        };

        let weight = parse_leading_number(&fields[COL_WEIGHT]).unwrap_or(0.0);
        let moisture_percent = parse_leading_number(&fields[COL_MOISTURE]).unwrap_or(0.0);

        Some(Self {
            origin: cell(COL_ORIGIN),
            brand: cell(COL_BRAND),
            name: cell(COL_NAME),
            flavor: cell(COL_FLAVOR),
            weight_g: cell(COL_WEIGHT),
            kcal: cell(COL_KCAL),
            protein: cell(COL_PROTEIN),
            fat: cell(COL_FAT),
            fiber: cell(COL_FIBER),
            ash: cell(COL_ASH),
            moisture: cell(COL_MOISTURE),
            moisture_content: moisture_volume(weight, moisture_percent),
            calcium: cell(COL_CALCIUM),
            phosphorus: cell(COL_PHOSPHORUS),
            taurine: cell(COL_TAURINE),
            taurine_content: cell(COL_TAURINE),
        })
    }
}

/// moisture% x weight(g) / 100, one decimal, or the sentinel when either input is not positive.
pub fn moisture_volume(weight_g: f64, moisture_percent: f64) -> String {
    if weight_g > 0.0 && moisture_percent > 0.0 {
        to_fixed(moisture_percent * weight_g / 100.0, 1)
    } else {
        SENTINEL.to_string()
    }
}

/// Result of turning the raw catalog text into records.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    pub records: Vec<ProductRecord>,
    /// 1-based row numbers (header is row 0) that were dropped.
    pub skipped: Vec<usize>,
}

/// Parses the whole catalog text, skipping the header row and short rows.
pub fn build_records(text: &str) -> CatalogLoad {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    if lines.len() <= 1 {
        warn!("catalog text is empty or has no data rows");
        return CatalogLoad::default();
    }

    let mut load = CatalogLoad::default();
    for (row, line) in lines.iter().enumerate().skip(1) {
        let fields = parse_line(line);
        match ProductRecord::from_fields(&fields) {
            Some(record) => load.records.push(record),
            None => {
                warn!(row, columns = fields.len(), "row has insufficient columns; skipped");
                load.skipped.push(row);
            }
        }
    }

    debug!(records = load.records.len(), skipped = load.skipped.len(), "catalog parsed");
    load
}


#[cfg(test)]
mod tests {
    use super::fixtures::HEADER;
    use super::*;

    #[test]
    fn derives_moisture_volume() {
        assert_eq!(moisture_volume(100.0, 80.0), "80.0");
        assert_eq!(moisture_volume(80.0, 82.0), "65.6");
        assert_eq!(moisture_volume(70.0, 81.5), "57.0");
        assert_eq!(moisture_volume(1.0, 15.0), "0.1");
        assert_eq!(moisture_volume(0.0, 80.0), "-");
        assert_eq!(moisture_volume(100.0, 0.0), "-");
    }

    #[test]
    fn builds_record_in_column_order() {
        let text = format!(
            "{HEADER}\nAcme,Classic,\"Tuna, Chicken\",100,95,12,3,0.5,2,80,0.3,0.25,500,Thailand"
        );
        let load = build_records(&text);
        assert!(load.skipped.is_empty());
        let r = &load.records[0];
        assert_eq!(r.brand, "Acme");
        assert_eq!(r.flavor, "Tuna, Chicken");
        assert_eq!(r.weight_g, "100");
        assert_eq!(r.moisture, "80");
        assert_eq!(r.moisture_content, "80.0");
        assert_eq!(r.calcium, "0.3");
        assert_eq!(r.phosphorus, "0.25");
        assert_eq!(r.taurine_content, "500");
        assert_eq!(r.origin, "Thailand");
    }

    #[test]
    fn empty_cells_become_sentinels() {
        let text = format!("{HEADER}\nAcme,,Tuna,,95,,,,,80,,,,");
        let r = &build_records(&text).records[0];
        assert_eq!(r.name, SENTINEL);
        assert_eq!(r.weight_g, SENTINEL);
        assert_eq!(r.origin, SENTINEL);
        assert_eq!(r.moisture_content, SENTINEL);
    }

    #[test]
    fn skips_short_rows_and_keeps_loading() {
        let text = format!(
            "{HEADER}\n\
             A,n1,f,80,70,10,2,1,2,82,0.2,0.2,400,Japan\n\
             B,n2,f,80,70,10,2,1,2,82\n\
             C,n3,f,160,140,10,2,1,2,82,0.2,0.2,400,Thailand\r\n"
        );
        let load = build_records(&text);
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.skipped, vec![2]);
        assert_eq!(load.records[1].origin, "Thailand");
    }

    #[test]
    fn header_only_text_is_empty() {
        assert!(build_records(HEADER).records.is_empty());
        assert!(build_records("").records.is_empty());
    }
}
