/// Row windowing and column sizing for the render surface.
///
/// Only the rows intersecting the viewport, plus an overscan margin on each
/// side, are materialized. Two spacers stand in for everything above and
/// below the window so the scrollable height always equals the height of the
/// full row set.
use crate::column::ColumnDef;
use serde::Serialize;
use std::collections::HashMap;
use std::ops::Range;

/// Estimated row height in pixels before a row is measured.
pub const DEFAULT_ROW_HEIGHT: f64 = 40.0;

/// Rows materialized beyond each edge of the viewport.
pub const DEFAULT_OVERSCAN: usize = 15;

/// Viewport width at or below which responsive columns sit at their minimum.
pub const NARROW_VIEWPORT: f64 = 640.0;

/// Viewport width at or above which responsive columns reach their nominal size.
pub const WIDE_VIEWPORT: f64 = 1440.0;

/// One materialized row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VirtualItem {
    pub index: usize,
    pub start: f64,
    pub size: f64,
}

impl VirtualItem {
    pub fn end(&self) -> f64 {
        self.start + self.size
    }
}

/// The materialized slice of a row set plus its spacers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualWindow {
    pub items: Vec<VirtualItem>,
    /// Height of every row before the first item
    pub padding_top: f64,
    /// Height of every row after the last item
    pub padding_bottom: f64,
    pub total_height: f64,
}

impl VirtualWindow {
    pub fn range(&self) -> Range<usize> {
        match (self.items.first(), self.items.last()) {
            (Some(first), Some(last)) => first.index..last.index + 1,
            _ => 0..0,
        }
    }
}

/// Vertical windowing over `count` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Virtualizer {
    count: usize,
    estimate: f64,
    overscan: usize,
    measured: HashMap<usize, f64>,
}

impl Virtualizer {
    pub fn new(count: usize) -> Self {
        Virtualizer {
            count,
            estimate: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            measured: HashMap::new(),
        }
    }

    /// Override the estimated row height; non-positive values are ignored.
    pub fn with_estimate(mut self, estimate: f64) -> Self {
        if estimate.is_finite() && estimate > 0.0 {
            self.estimate = estimate;
        }
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Change the row count, forgetting measurements past the new end.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.measured.retain(|&i, _| i < count);
    }

    /// Record a measured row height.
    pub fn measure(&mut self, index: usize, height: f64) {
        if index < self.count && height.is_finite() && height >= 0.0 {
            self.measured.insert(index, height);
        }
    }

    /// Drop all measurements, e.g. after the row order changed.
    pub fn reset_measurements(&mut self) {
        self.measured.clear();
    }

    pub fn row_height(&self, index: usize) -> f64 {
        self.measured.get(&index).copied().unwrap_or(self.estimate)
    }

    /// offsets[i] is the start of row i; offsets[count] is the total height.
    fn offsets(&self) -> Vec<f64> {
        let mut offsets = Vec::with_capacity(self.count + 1);
        let mut acc = 0.0;
        offsets.push(acc);
        for i in 0..self.count {
            acc += self.row_height(i);
            offsets.push(acc);
        }
        offsets
    }

    pub fn total_height(&self) -> f64 {
        if self.measured.is_empty() {
            self.count as f64 * self.estimate
        } else {
            self.offsets()[self.count]
        }
    }

    /// Rows to materialize for a scroll position, overscan included.
    ///
    /// Empty when there are no rows. Scroll offsets outside the scrollable
    /// area are clamped.
    pub fn visible_range(&self, scroll_offset: f64, viewport_height: f64) -> Range<usize> {
        self.range_in(&self.offsets(), scroll_offset, viewport_height)
    }

    fn range_in(&self, offsets: &[f64], scroll_offset: f64, viewport_height: f64) -> Range<usize> {
        if self.count == 0 {
            return 0..0;
        }
        let scroll = if scroll_offset.is_finite() { scroll_offset.max(0.0) } else { 0.0 };
        let viewport = if viewport_height.is_finite() { viewport_height.max(0.0) } else { 0.0 };
        let bottom = scroll + viewport;

        // First row whose end lies below the scroll offset
        let first = offsets[1..]
            .partition_point(|&end| end <= scroll)
            .min(self.count - 1);
        // Last row starting above the viewport's bottom edge
        let last = offsets[..self.count]
            .partition_point(|&start| start < bottom)
            .saturating_sub(1)
            .max(first);

        let start = first.saturating_sub(self.overscan);
        let end = (last + 1 + self.overscan).min(self.count);
        start..end
    }

    /// Materialized rows and spacer heights for a scroll position.
    pub fn window(&self, scroll_offset: f64, viewport_height: f64) -> VirtualWindow {
        let offsets = self.offsets();
        let range = self.range_in(&offsets, scroll_offset, viewport_height);
        let total_height = offsets[self.count];

        let items: Vec<VirtualItem> = range
            .clone()
            .map(|index| VirtualItem {
                index,
                start: offsets[index],
                size: self.row_height(index),
            })
            .collect();

        let (padding_top, padding_bottom) = match (items.first(), items.last()) {
            (Some(first), Some(last)) => (first.start, total_height - last.end()),
            _ => (0.0, 0.0),
        };

        VirtualWindow {
            items,
            padding_top,
            padding_bottom,
            total_height,
        }
    }
}

/// Stacking layer of a rendered cell, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    Body,
    StickyCell,
    Header,
    StickyHeaderCell,
}

impl Layer {
    pub fn z_index(&self) -> u8 {
        match self {
            Layer::Body => 0,
            Layer::StickyCell => 10,
            Layer::Header => 20,
            Layer::StickyHeaderCell => 30,
        }
    }

    pub fn for_header(sticky: bool) -> Self {
        if sticky {
            Layer::StickyHeaderCell
        } else {
            Layer::Header
        }
    }

    pub fn for_body(sticky: bool) -> Self {
        if sticky {
            Layer::StickyCell
        } else {
            Layer::Body
        }
    }
}

/// Smallest width a column shrinks to, tiered by its nominal size.
pub fn min_width(size: u16) -> f64 {
    let floor: f64 = match size {
        0..=50 => 40.0,
        51..=60 => 48.0,
        61..=70 => 56.0,
        71..=100 => 64.0,
        _ => 120.0,
    };
    floor.min(f64::from(size))
}

/// Column width for a viewport width.
///
/// Sticky columns keep their nominal size so the offsets of the columns
/// pinned after them stay valid. Other columns interpolate linearly from
/// `min_width` at `NARROW_VIEWPORT` to the nominal size at `WIDE_VIEWPORT`.
pub fn resolve_width(column: &ColumnDef, viewport_width: f64) -> f64 {
    let nominal = f64::from(column.size);
    if column.sticky {
        return nominal;
    }
    let min = min_width(column.size);
    let t = if viewport_width.is_finite() {
        ((viewport_width - NARROW_VIEWPORT) / (WIDE_VIEWPORT - NARROW_VIEWPORT)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    (min + (nominal - min) * t).round().clamp(min, nominal)
}
