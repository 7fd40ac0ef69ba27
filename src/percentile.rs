/// Percentile ranking for color-scaled columns.
///
/// Percentiles are computed over whatever row set is handed in; the table
/// passes its filtered rows, so ranks are always relative to the current
/// filter. Ties are not averaged: equal values take consecutive ranks in
/// stable sort order, which slightly spreads tied values apart.
use crate::column::CellValue;
use crate::rows::StatRow;
use std::collections::HashMap;

/// Row position within the ranked set -> percentile in `[0, 100]`.
pub type PercentileMap = HashMap<usize, f64>;

/// Column id -> percentile map.
pub type ColumnPercentiles = HashMap<String, PercentileMap>;

/// Percentile of the only value in a single-element sample.
pub const SINGLE_VALUE_PERCENTILE: f64 = 50.0;

/// Rank every finite numeric value of each column.
///
/// Rows whose value is null, text or non-finite are left out of that
/// column's map. Every requested column gets an entry, possibly empty.
pub fn compute_percentiles<R, S>(rows: &[R], columns: &[S]) -> ColumnPercentiles
where
    R: StatRow,
    S: AsRef<str>,
{
    let mut result = ColumnPercentiles::with_capacity(columns.len());

    for column in columns {
        let column = column.as_ref();
        let mut values: Vec<(usize, f64)> = rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row.cell(column).as_f64().map(|v| (i, v)))
            .collect();

        // Stable, so tied values keep their row order
        values.sort_by(|a, b| a.1.total_cmp(&b.1));

        let n = values.len();
        let map: PercentileMap = values
            .iter()
            .enumerate()
            .map(|(rank, &(index, _))| {
                let pct = if n == 1 {
                    SINGLE_VALUE_PERCENTILE
                } else {
                    rank as f64 / (n - 1) as f64 * 100.0
                };
                (index, pct)
            })
            .collect();

        result.insert(column.to_string(), map);
    }

    result
}

/// Re-key percentile maps from one ordering of a row set to another.
///
/// `source_ids` and `target_ids` list the same rows by identity in the two
/// orderings. Entries whose identity does not appear in `source_ids` are
/// dropped.
pub fn remap_percentiles(
    percentiles: &ColumnPercentiles,
    source_ids: &[usize],
    target_ids: &[usize],
) -> ColumnPercentiles {
    let source_pos: HashMap<usize, usize> = source_ids
        .iter()
        .enumerate()
        .map(|(pos, id)| (*id, pos))
        .collect();

    percentiles
        .iter()
        .map(|(column, map)| {
            let remapped: PercentileMap = target_ids
                .iter()
                .enumerate()
                .filter_map(|(target_pos, id)| {
                    let source = source_pos.get(id)?;
                    map.get(source).map(|pct| (target_pos, *pct))
                })
                .collect();
            (column.clone(), remapped)
        })
        .collect()
}

/// Highlight tier for a ranked cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intensity {
    StrongPositive,
    WeakPositive,
    Neutral,
    WeakNegative,
    StrongNegative,
}

impl Intensity {
    /// CSS background for the tier; `None` for neutral cells.
    pub fn background(&self) -> Option<&'static str> {
        match self {
            Intensity::StrongPositive => Some("color-mix(in srgb, var(--positive) 25%, transparent)"),
            Intensity::WeakPositive => Some("color-mix(in srgb, var(--positive) 12%, transparent)"),
            Intensity::Neutral => None,
            Intensity::WeakNegative => Some("color-mix(in srgb, var(--negative) 12%, transparent)"),
            Intensity::StrongNegative => Some("color-mix(in srgb, var(--negative) 25%, transparent)"),
        }
    }
}

/// Bucket a percentile into one of five tiers.
///
/// `invert` flips the scale for lower-is-better columns.
pub fn percentile_to_intensity(percentile: f64, invert: bool) -> Intensity {
    let p = if invert { 100.0 - percentile } else { percentile };
    if p >= 90.0 {
        Intensity::StrongPositive
    } else if p >= 70.0 {
        Intensity::WeakPositive
    } else if p >= 30.0 {
        Intensity::Neutral
    } else if p >= 10.0 {
        Intensity::WeakNegative
    } else {
        Intensity::StrongNegative
    }
}

/// Percentile-derived intensity for one cell value, if it is ranked.
pub fn cell_intensity(value: CellValue<'_>, percentile: Option<f64>, invert: bool) -> Option<Intensity> {
    value.as_f64()?;
    percentile.map(|p| percentile_to_intensity(p, invert))
}
