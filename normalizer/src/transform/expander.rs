//! Wide-to-long row expansion.
//!
//! # Architecture
//!
//! ```text
//! Wide input (one row per HS code and year)        Long output
//! ┌───────────────────────────────────────┐       ┌──────────────────────────────┐
//! │ export,2020,"0101",KG,NO,  ,...36 vals│  →    │ export,2020,1,0101,Quantity1 │
//! └───────────────────────────────────────┘       │ export,2020,2,0101,Quantity1 │
//!                                                 │ ...                          │
//!                                                 │ export,2020,12,0101,Quantity2│
//!                                                 └──────────────────────────────┘
//! ```
//!
//! Order is preserved: input rows as given, then Quantity1, Quantity2,
//! Volume, then months 1 to 12. A category whose unit cell is exactly two
//! spaces has no data and produces nothing.

use csv::StringRecord;

use crate::config::HsFilter;
use crate::error::{ExpandError, ExpandResult};
use crate::models::{
    Category, InputTable, OutputRow, EXP_OR_IMP_COLUMN, HS_COLUMN, MIN_ROW_WIDTH, MONTHS,
    NO_UNIT_SENTINEL, YEAR_COLUMN,
};

/// Counters collected while expanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandStats {
    /// Data rows seen (headers excluded).
    pub data_rows: usize,
    /// Rows dropped by the HS filter.
    pub filtered_rows: usize,
    /// Categories skipped because their unit cell was the no-data sentinel.
    pub skipped_categories: usize,
    /// Long rows produced.
    pub emitted_rows: usize,
}

impl ExpandStats {
    pub(crate) fn merge(&mut self, other: ExpandStats) {
        self.data_rows += other.data_rows;
        self.filtered_rows += other.filtered_rows;
        self.skipped_categories += other.skipped_categories;
        self.emitted_rows += other.emitted_rows;
    }
}

/// Result of expanding one or more tables.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub rows: Vec<OutputRow>,
    pub stats: ExpandStats,
}

/// Remove the single quote character wrapping an HS code.
///
/// The first and last characters are dropped whatever they are.
/// Returns `None` when there are fewer than two characters.
pub fn strip_hs_quotes(raw: &str) -> Option<&str> {
    let mut chars = raw.chars();
    chars.next()?;
    chars.next_back()?;
    Some(chars.as_str())
}

/// Expand several tables in order, concatenating their rows.
pub fn expand_tables(tables: &[InputTable], filter: &HsFilter) -> ExpandResult<Expansion> {
    let mut expansion = Expansion::default();
    for table in tables {
        let stats = expand_table(table, filter, &mut expansion.rows)?;
        expansion.stats.merge(stats);
    }
    Ok(expansion)
}

/// Expand every data row of one table into `out`. The header row is skipped.
pub fn expand_table(
    table: &InputTable,
    filter: &HsFilter,
    out: &mut Vec<OutputRow>,
) -> ExpandResult<ExpandStats> {
    let mut stats = ExpandStats::default();

    for (row, record) in table.data_rows() {
        stats.data_rows += 1;
        let before = out.len();

        match expand_record(record, filter, out) {
            Ok(RecordOutcome::Filtered) => stats.filtered_rows += 1,
            Ok(RecordOutcome::Expanded { skipped_categories }) => {
                stats.skipped_categories += skipped_categories;
            }
            Err(LayoutError::TooShort(found)) => {
                return Err(ExpandError::RowTooShort {
                    input: table.name.clone(),
                    row,
                    expected: MIN_ROW_WIDTH,
                    found,
                });
            }
            Err(LayoutError::BadHsCode(value)) => {
                return Err(ExpandError::HsCodeTooShort {
                    input: table.name.clone(),
                    row,
                    value,
                });
            }
        }

        stats.emitted_rows += out.len() - before;
    }

    Ok(stats)
}

/// What happened to a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Filtered,
    Expanded { skipped_categories: usize },
}

/// Layout problems found in a single record, before file context is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    TooShort(usize),
    BadHsCode(String),
}

/// Expand one wide record, appending its long rows to `out`.
pub fn expand_record(
    record: &StringRecord,
    filter: &HsFilter,
    out: &mut Vec<OutputRow>,
) -> Result<RecordOutcome, LayoutError> {
    if record.len() < MIN_ROW_WIDTH {
        return Err(LayoutError::TooShort(record.len()));
    }

    let exp_or_imp = &record[EXP_OR_IMP_COLUMN];
    let year = &record[YEAR_COLUMN];
    let raw_hs = &record[HS_COLUMN];
    let hs = strip_hs_quotes(raw_hs).ok_or_else(|| LayoutError::BadHsCode(raw_hs.to_string()))?;

    if !filter.allows(hs) {
        return Ok(RecordOutcome::Filtered);
    }

    let mut skipped_categories = 0;
    for category in Category::ALL {
        let raw_unit = &record[category.unit_column()];
        if raw_unit == NO_UNIT_SENTINEL {
            skipped_categories += 1;
            continue;
        }
        let unit = category.output_unit(raw_unit);

        for month in MONTHS {
            out.push(OutputRow {
                exp_or_imp: exp_or_imp.to_string(),
                year: year.to_string(),
                month,
                hs: hs.to_string(),
                category,
                unit: unit.to_string(),
                value: record[category.value_column(month)].to_string(),
            });
        }
    }

    Ok(RecordOutcome::Expanded { skipped_categories })
}
