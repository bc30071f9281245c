//! Domain models for the trade statistics normalizer.
//!
//! - [`InputTable`] - one decoded input CSV, header row included
//! - [`Category`] - the three measurement types reported per commodity
//! - [`OutputRow`] - one long-format row
//!
//! # Input layout
//!
//! ```text
//! col  0        1     2     3      4      5      6 .. 43
//!      expOrImp year  "HS"  unit1  unit2  unit3  monthly values
//! ```
//!
//! Monthly values are interleaved: the value for category offset `o` and
//! month `m` lives at column `5 + o + m * 3`.

use csv::StringRecord;
use serde::Serialize;
use std::ops::RangeInclusive;

/// Output CSV header, in column order.
pub const OUTPUT_HEADER: [&str; 7] = [
    "expOrImp",
    "year",
    "month",
    "HS",
    "data category",
    "unit",
    "value",
];

/// Minimum number of columns a data row must have.
pub const MIN_ROW_WIDTH: usize = 44;

/// Unit cell content meaning "no data reported for this category".
pub const NO_UNIT_SENTINEL: &str = "  ";

/// Months covered by one input row.
pub const MONTHS: RangeInclusive<u8> = 1..=12;

pub const EXP_OR_IMP_COLUMN: usize = 0;
pub const YEAR_COLUMN: usize = 1;
pub const HS_COLUMN: usize = 2;

/// First column of the monthly block, minus one month stride.
const VALUE_BASE_COLUMN: usize = 5;
const MONTH_STRIDE: usize = 3;

// =============================================================================
// Category
// =============================================================================

/// Measurement category of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Quantity1,
    Quantity2,
    Volume,
}

impl Category {
    /// All categories, in output order.
    pub const ALL: [Category; 3] = [Category::Quantity1, Category::Quantity2, Category::Volume];

    /// Label written to the `data category` column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Quantity1 => "Quantity1",
            Self::Quantity2 => "Quantity2",
            Self::Volume => "Volume",
        }
    }

    /// Column holding this category's unit.
    pub fn unit_column(&self) -> usize {
        match self {
            Self::Quantity1 => 3,
            Self::Quantity2 => 4,
            Self::Volume => 5,
        }
    }

    /// Offset of this category inside each month's triple.
    pub fn offset(&self) -> usize {
        self.unit_column() - 3
    }

    /// Column holding this category's value for `month` (1-based).
    pub fn value_column(&self, month: u8) -> usize {
        VALUE_BASE_COLUMN + self.offset() + usize::from(month) * MONTH_STRIDE
    }

    /// Unit emitted in the output. Volume never carries one.
    pub fn output_unit<'a>(&self, raw: &'a str) -> &'a str {
        match self {
            Self::Volume => "",
            _ => raw,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Input
// =============================================================================

/// A fully read input file.
#[derive(Debug, Clone, Default)]
pub struct InputTable {
    /// Display name (usually the file path).
    pub name: String,
    /// Encoding the bytes were decoded from.
    pub encoding: String,
    /// Every record, header first.
    pub records: Vec<StringRecord>,
}

impl InputTable {
    pub fn new(name: impl Into<String>, records: Vec<StringRecord>) -> Self {
        Self {
            name: name.into(),
            encoding: "utf-8".to_string(),
            records,
        }
    }

    /// The header row, if the file is not empty.
    pub fn header(&self) -> Option<&StringRecord> {
        self.records.first()
    }

    /// Data rows with their 1-based row number in the file.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &StringRecord)> {
        self.records
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, record)| (idx + 1, record))
    }

    /// Number of data rows (header excluded).
    pub fn data_row_count(&self) -> usize {
        self.records.len().saturating_sub(1)
    }
}

// =============================================================================
// Output
// =============================================================================

/// One long-format row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "expOrImp")]
    pub exp_or_imp: String,
    pub year: String,
    pub month: u8,
    #[serde(rename = "HS")]
    pub hs: String,
    #[serde(rename = "data category", serialize_with = "serialize_category")]
    pub category: Category,
    pub unit: String,
    pub value: String,
}

fn serialize_category<S: serde::Serializer>(category: &Category, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(category.label())
}
