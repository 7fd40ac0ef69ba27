/// StatTable Column Schema
///
/// Static, declarative metadata describing every column a stat table can show:
/// how the value is typed and formatted, whether it is ranked with a color
/// scale, whether it sticks to the left edge, and which named group it
/// belongs to. Schemas are built once per row kind (see `registry`) and never
/// mutated at runtime.
use crate::error::TableError;
use std::collections::{BTreeMap, HashSet};

/// A single cell value as read from a stat row.
///
/// Rows are opaque to the table engine; each one is only ever asked for the
/// value behind a column id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Number(f64),
    Text(&'a str),
    Null,
}

impl<'a> CellValue<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the value as a finite number, if it is one.
    ///
    /// NaN and infinities are treated as non-numeric so they never take part
    /// in ranking or range comparisons.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for CellValue<'_> {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i32> for CellValue<'_> {
    fn from(v: i32) -> Self {
        CellValue::Number(f64::from(v))
    }
}

impl From<Option<f64>> for CellValue<'_> {
    fn from(v: Option<f64>) -> Self {
        v.map_or(CellValue::Null, CellValue::Number)
    }
}

impl<'a> From<&'a str> for CellValue<'a> {
    fn from(v: &'a str) -> Self {
        CellValue::Text(v)
    }
}

/// How a cell value is turned into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    /// Raw text
    Text,
    /// Number as-is (`82`, `0.5`)
    Integer,
    /// Explicit `+` for positive values (plus/minus)
    Signed,
    /// Percentage with one decimal (`52.3`)
    Percent,
    /// Three decimals, leading zero stripped (`.921`)
    SavePercentage,
    /// Seconds rendered as `M:SS`
    Time,
    /// Fixed number of decimals
    Decimal(u8),
}

/// Metadata for one column of a stat table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDef {
    pub id: &'static str,
    pub header: &'static str,
    /// Nominal width in pixels
    pub size: u16,
    pub numeric: bool,
    /// Ranked by percentile and highlighted
    pub color_scale: bool,
    /// Lower is better; only meaningful on ranked columns
    pub invert: bool,
    pub sticky: bool,
    pub sticky_offset: Option<u16>,
    /// Whether the user may hide the column
    pub hideable: bool,
    pub format: CellFormat,
}

impl ColumnDef {
    /// A plain text column.
    pub const fn text(id: &'static str, header: &'static str, size: u16) -> Self {
        ColumnDef {
            id,
            header,
            size,
            numeric: false,
            color_scale: false,
            invert: false,
            sticky: false,
            sticky_offset: None,
            hideable: true,
            format: CellFormat::Text,
        }
    }

    /// A numeric column rendered as a plain number.
    pub const fn number(id: &'static str, header: &'static str, size: u16) -> Self {
        ColumnDef {
            numeric: true,
            format: CellFormat::Integer,
            ..ColumnDef::text(id, header, size)
        }
    }

    pub const fn ranked(self) -> Self {
        ColumnDef {
            color_scale: true,
            ..self
        }
    }

    pub const fn inverted(self) -> Self {
        ColumnDef {
            color_scale: true,
            invert: true,
            ..self
        }
    }

    pub const fn sticky_at(self, offset: u16) -> Self {
        ColumnDef {
            sticky: true,
            sticky_offset: Some(offset),
            hideable: false,
            ..self
        }
    }

    pub const fn formatted(self, format: CellFormat) -> Self {
        ColumnDef { format, ..self }
    }
}

/// A named set of columns toggled together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub columns: &'static [&'static str],
    pub default_visible: bool,
}

/// A named visibility template built from column groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnPreset {
    pub id: &'static str,
    pub label: &'static str,
    pub groups: &'static [&'static str],
}

/// Column visibility keyed by column id. Columns missing from the map are visible.
pub type Visibility = BTreeMap<String, bool>;

/// Complete schema for one row kind (skater or goalie).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSchema {
    pub kind: &'static str,
    pub columns: &'static [ColumnDef],
    pub groups: &'static [ColumnGroup],
    pub presets: &'static [ColumnPreset],
    /// Values offered by the position filter; empty when the kind has none
    pub positions: &'static [&'static str],
    pub player_column: &'static str,
    pub team_column: &'static str,
    pub position_column: Option<&'static str>,
    pub games_played_column: &'static str,
}

impl TableSchema {
    pub fn column(&self, id: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&'static ColumnGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn preset(&self, id: &str) -> Option<&'static ColumnPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn is_numeric(&self, id: &str) -> bool {
        self.column(id).map(|c| c.numeric).unwrap_or(false)
    }

    /// Columns eligible for advanced filters, in schema order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &'static ColumnDef> {
        self.columns.iter().filter(|c| c.numeric)
    }

    /// Ids of columns ranked by percentile, in schema order.
    pub fn color_scale_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| c.color_scale)
            .map(|c| c.id)
            .collect()
    }

    /// Default visibility: every grouped column takes its group's `default_visible`.
    pub fn default_visibility(&self) -> Visibility {
        let mut vis = Visibility::new();
        for group in self.groups {
            for col in group.columns {
                vis.insert(col.to_string(), group.default_visible);
            }
        }
        vis
    }

    /// Visibility produced by a preset: listed groups shown, all others hidden.
    pub fn preset_visibility(&self, preset: &ColumnPreset) -> Visibility {
        let mut vis = Visibility::new();
        for group in self.groups {
            let shown = preset.groups.contains(&group.id);
            for col in group.columns {
                vis.insert(col.to_string(), shown);
            }
        }
        vis
    }

    /// Check the structural invariants of the schema.
    ///
    /// Column ids are unique, inversion only appears on ranked columns, groups
    /// partition the columns, and presets only name known groups.
    pub fn validate(&self) -> Result<(), TableError> {
        let invalid = |msg: String| Err(TableError::InvalidSchema(format!("{}: {}", self.kind, msg)));

        let mut ids = HashSet::new();
        for col in self.columns {
            if !ids.insert(col.id) {
                return invalid(format!("duplicate column '{}'", col.id));
            }
            if col.invert && !col.color_scale {
                return invalid(format!("column '{}' is inverted but not ranked", col.id));
            }
            if col.sticky != col.sticky_offset.is_some() {
                return invalid(format!("column '{}' has inconsistent sticky offset", col.id));
            }
        }

        let mut grouped = HashSet::new();
        for group in self.groups {
            for col in group.columns {
                if !ids.contains(col) {
                    return invalid(format!("group '{}' names unknown column '{}'", group.id, col));
                }
                if !grouped.insert(*col) {
                    return invalid(format!("column '{}' belongs to more than one group", col));
                }
            }
        }
        if let Some(orphan) = self.columns.iter().find(|c| !grouped.contains(c.id)) {
            return invalid(format!("column '{}' has no group", orphan.id));
        }

        for preset in self.presets {
            if let Some(missing) = preset.groups.iter().find(|g| self.group(g).is_none()) {
                return invalid(format!("preset '{}' names unknown group '{}'", preset.id, missing));
            }
        }

        for id in [self.player_column, self.team_column, self.games_played_column]
            .into_iter()
            .chain(self.position_column)
        {
            if !ids.contains(id) {
                return invalid(format!("role column '{}' is not defined", id));
            }
        }
        Ok(())
    }
}
