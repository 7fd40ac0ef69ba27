/// HTTP request and response types for the table endpoints
use crate::column::TableSchema;
use crate::render::{RenderedWindow, Viewport};
use crate::rows::StatRow;
use crate::table::{FilterChip, Table};
use crate::url_state::TableState;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1440.0;

pub const CURRENT_SEASON: &str = "20252026";

/// Parameters accepted next to the table-state parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestParams {
    /// Season id such as `20252026`
    pub season: Option<String>,
    /// Scroll offset in pixels
    pub offset: Option<f64>,
    /// Viewport height in pixels
    pub viewport: Option<f64>,
    /// Viewport width in pixels
    pub width: Option<f64>,
}

impl RequestParams {
    /// The requested season, or the current one when it is absent or not
    /// an eight-digit season id.
    pub fn season(&self) -> &str {
        match self.season.as_deref() {
            Some(season) if is_season_id(season) => season,
            _ => CURRENT_SEASON,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.offset.unwrap_or(0.0),
            self.viewport.unwrap_or(DEFAULT_VIEWPORT_HEIGHT),
            self.width.unwrap_or(DEFAULT_VIEWPORT_WIDTH),
        )
    }
}

/// `20252026`-style ids: two four-digit years.
pub fn is_season_id(season: &str) -> bool {
    season.len() == 8 && season.bytes().all(|b| b.is_ascii_digit())
}

/// Column metadata the client needs to build its toolbar
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub id: &'static str,
    pub header: &'static str,
    pub numeric: bool,
    pub color_scale: bool,
    pub visible: bool,
}

/// One rendered table window
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    pub kind: &'static str,
    /// Canonical query string for the decoded state
    pub query: String,
    pub state: TableState,
    pub teams: Vec<String>,
    pub positions: &'static [&'static str],
    pub columns: Vec<ColumnInfo>,
    pub filters: Vec<FilterChip>,
    pub window: RenderedWindow,
}

impl TableResponse {
    pub fn new<R: StatRow>(table: &Table<R>, window: RenderedWindow) -> Self {
        let schema: &TableSchema = table.schema();
        TableResponse {
            kind: schema.kind,
            query: table.query().to_string(),
            state: table.state().clone(),
            teams: table.teams().to_vec(),
            positions: schema.positions,
            columns: schema
                .columns
                .iter()
                .map(|c| ColumnInfo {
                    id: c.id,
                    header: c.header,
                    numeric: c.numeric,
                    color_scale: c.color_scale,
                    visible: table.is_visible(c.id),
                })
                .collect(),
            filters: table.filter_chips(),
            window,
        }
    }
}

/// Error body
#[derive(Debug, Serialize, Clone)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(season: &str) -> RequestParams {
        RequestParams {
            season: Some(season.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_season_defaults_to_current() {
        assert_eq!(RequestParams::default().season(), CURRENT_SEASON);
        assert_eq!(params("20232024").season(), "20232024");
    }

    #[test]
    fn test_season_rejects_paths() {
        for season in ["/tmp/outside", "..", "../../etc", "2023/../..", "2023202", "202320245", "2023-2024", ""] {
            assert_eq!(params(season).season(), CURRENT_SEASON, "season {:?}", season);
        }
    }

    #[test]
    fn test_viewport_defaults() {
        let viewport = RequestParams::default().viewport();
        assert_eq!(viewport, Viewport::new(0.0, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH));
    }
}
