/// Windowed rendering of a table.
///
/// Produces the header row and the materialized body rows for one viewport:
/// formatted text, highlight tier, resolved width, sticky offset and stacking
/// layer for every visible cell, plus the spacer heights around the window.
use crate::column::ColumnDef;
use crate::percentile::Intensity;
use crate::rows::StatRow;
use crate::table::Table;
use crate::virtualizer::{resolve_width, Layer, Virtualizer};
use serde::Serialize;

/// Header sort marker for an unsorted column.
pub const SORT_NONE: &str = "\u{2195}";
pub const SORT_ASC: &str = "\u{2191}";
pub const SORT_DESC: &str = "\u{2193}";

/// Scroll position and size of the visible area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
    pub width: f64,
}

impl Viewport {
    pub fn new(scroll_top: f64, height: f64, width: f64) -> Self {
        Viewport {
            scroll_top,
            height,
            width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
}

impl Align {
    fn for_column(column: &ColumnDef) -> Self {
        if column.numeric {
            Align::Right
        } else {
            Align::Left
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub column: &'static str,
    pub label: &'static str,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    pub align: Align,
    pub layer: Layer,
    pub sort_indicator: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyCell {
    pub column: &'static str,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<&'static str>,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    pub align: Align,
    pub layer: Layer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyRow {
    /// Sorted position
    pub index: usize,
    pub start: f64,
    pub height: f64,
    /// Odd rows take the alternate background, sticky cells included
    pub striped: bool,
    pub cells: Vec<BodyCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedWindow {
    pub row_count: usize,
    pub total_height: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub header: Vec<HeaderCell>,
    pub rows: Vec<BodyRow>,
}

struct ResolvedColumn {
    def: &'static ColumnDef,
    width: f64,
    left: Option<f64>,
    align: Align,
}

/// Render the part of `table` that `viewport` can see.
///
/// The virtualizer supplies row heights; its count should match
/// `table.len()`, and rows past the table's end are skipped.
pub fn render_window<R: StatRow>(
    table: &Table<R>,
    virtualizer: &Virtualizer,
    viewport: Viewport,
) -> RenderedWindow {
    let columns: Vec<ResolvedColumn> = table
        .visible_columns()
        .into_iter()
        .map(|def| ResolvedColumn {
            def,
            width: resolve_width(def, viewport.width),
            left: def.sticky_offset.map(f64::from),
            align: Align::for_column(def),
        })
        .collect();

    let sort = &table.state().sort;
    let header = columns
        .iter()
        .map(|col| {
            let sort_indicator = match sort.iter().find(|s| s.id == col.def.id) {
                Some(s) if s.desc => SORT_DESC,
                Some(_) => SORT_ASC,
                None => SORT_NONE,
            };
            HeaderCell {
                column: col.def.id,
                label: col.def.header,
                width: col.width,
                left: col.left,
                align: col.align,
                layer: Layer::for_header(col.def.sticky),
                sort_indicator,
            }
        })
        .collect();

    let window = virtualizer.window(viewport.scroll_top, viewport.height);
    let rows = window
        .items
        .iter()
        .filter(|item| item.index < table.len())
        .map(|item| BodyRow {
            index: item.index,
            start: item.start,
            height: item.size,
            striped: item.index % 2 == 1,
            cells: columns
                .iter()
                .filter_map(|col| {
                    let rendered = table.render_cell(item.index, col.def.id)?;
                    Some(BodyCell {
                        column: rendered.column,
                        background: rendered.intensity.and_then(|i| i.background()),
                        intensity: rendered.intensity,
                        text: rendered.text,
                        width: col.width,
                        left: col.left,
                        align: col.align,
                        layer: Layer::for_body(col.def.sticky),
                    })
                })
                .collect(),
        })
        .collect();

    RenderedWindow {
        row_count: table.len(),
        total_height: window.total_height,
        padding_top: window.padding_top,
        padding_bottom: window.padding_bottom,
        header,
        rows,
    }
}
