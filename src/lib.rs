/// StatTable - Hockey Stat-Table Engine
///
/// Sortable, filterable stat tables over skater and goalie rows. The whole
/// table state lives in a URL query string, ranked columns carry percentile
/// highlights relative to the current filter, and only the rows scrolled
/// into view are rendered.

pub mod column;
pub mod error;
pub mod filter;
pub mod format;
pub mod mock;
pub mod percentile;
pub mod registry;
pub mod render;
pub mod rows;
pub mod source;
pub mod table;
pub mod url_state;
pub mod view;
pub mod virtualizer;

pub use column::{CellFormat, CellValue, ColumnDef, ColumnGroup, ColumnPreset, TableSchema, Visibility};
pub use error::TableError;
pub use filter::{AdvancedFilter, FilterOperator, FilterPatch, RowFilter};
pub use percentile::{compute_percentiles, percentile_to_intensity, ColumnPercentiles, Intensity};
pub use registry::{GOALIE_SCHEMA, SKATER_SCHEMA, UNKNOWN_TEAM};
pub use render::{render_window, RenderedWindow, Viewport};
pub use rows::{GoalieRow, SkaterRow, StatRow};
pub use source::{cached_fetch, with_fallback, Environment, FetchError, MemoryCache, RowSource, TtlCache};
pub use table::{ChipTarget, FilterChip, RenderedCell, Table};
pub use url_state::{CategoricalKind, SortSpec, TableState};
pub use view::{FilterView, SortKey, SortOrder, SortedView};
pub use virtualizer::{Layer, Virtualizer};

// HTTP server modules - only when server feature is enabled
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod messages;
#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
mod integration_tests {
    use super::*;

    const POSITIONS: [&str; 3] = ["LW", "RW", "D"];

    /// 50 skaters: rows 0..12 are centers, and of those only rows 0..5 have
    /// 30+ goals. Wingers and defensemen score plenty but never pass `pos=C`.
    fn league() -> Vec<SkaterRow> {
        let center_points = [70, 95, 60, 88, 77];
        (0..50)
            .map(|i| {
                let center = i < 12;
                let goals = match i {
                    0..=4 => 30 + 3 * i as i32,
                    5..=11 => 10 + i as i32,
                    _ => 40,
                };
                let points = if i < 5 { center_points[i] } else { 20 + i as i32 };
                SkaterRow {
                    id: i as i32,
                    full_name: format!("Skater {}", i),
                    position: if center { "C".to_string() } else { POSITIONS[i % 3].to_string() },
                    team_abbreviation: ["TOR", "MTL", "BOS", "EDM"][i % 4].to_string(),
                    games_played: 82,
                    goals,
                    points,
                    ..Default::default()
                }
            })
            .collect()
    }

    #[test]
    fn test_end_to_end_filter_rank_sort() {
        let mut table = Table::new(league());
        table.set_categorical_filter(CategoricalKind::Position, Some("C".to_string()));
        assert_eq!(table.len(), 12);

        table.add_advanced_filter("goals", FilterOperator::Gte, 30.0).unwrap();
        table.set_sort(vec![SortSpec::new("points", true)]).unwrap();

        let ids: Vec<i32> = table.rows().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 4, 0, 2]);

        // goals 30, 33, 36, 39, 42 ranked among these five only
        let goal_pcts: Vec<f64> = (0..5).map(|i| table.percentile(i, "goals").unwrap()).collect();
        assert_eq!(goal_pcts, vec![25.0, 75.0, 100.0, 0.0, 50.0]);

        let point_pcts: Vec<f64> = (0..5).map(|i| table.percentile(i, "points").unwrap()).collect();
        assert_eq!(point_pcts, vec![100.0, 75.0, 50.0, 25.0, 0.0]);

        // Every ranked column has entries for exactly the visible rows
        for column in table.color_scale_columns() {
            let map = &table.percentiles()[*column];
            assert!(map.keys().all(|k| *k < 5), "{} has out-of-range keys", column);
        }
    }

    #[test]
    fn test_shared_link_reproduces_view() {
        let mut table = Table::new(league());
        table.set_categorical_filter(CategoricalKind::Position, Some("C".to_string()));
        table.set_min_games_played(Some(20));
        table.add_advanced_filter("goals", FilterOperator::Gte, 30.0).unwrap();
        table.toggle_sort("points", false).unwrap();
        table.apply_preset("advanced").unwrap();

        let shared = Table::from_query(league(), table.query());
        assert_eq!(shared.state(), table.state());
        assert_eq!(shared.query(), table.query());
        let a: Vec<i32> = table.rows().map(|r| r.id).collect();
        let b: Vec<i32> = shared.rows().map(|r| r.id).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_preset_full_replace() {
        let mut table = Table::new(league());
        table.apply_preset("all").unwrap();
        assert!(table.is_visible("war"));
        assert!(table.is_visible("hits"));

        let preset = SKATER_SCHEMA.preset("standard").unwrap();
        assert_eq!(preset.groups, &["bio", "scoring", "shooting"]);
        table.apply_preset("standard").unwrap();

        let advanced = SKATER_SCHEMA.group("advanced").unwrap();
        assert!(advanced.columns.iter().all(|c| !table.is_visible(c)));
        for group in ["bio", "scoring", "shooting"] {
            let group = SKATER_SCHEMA.group(group).unwrap();
            assert!(group.columns.iter().all(|c| table.is_visible(c)));
        }
    }

    #[test]
    fn test_windowed_render_of_filtered_table() {
        let mut table = Table::new(league());
        table.set_categorical_filter(CategoricalKind::Team, Some("TOR".to_string()));
        let virtualizer = Virtualizer::new(table.len()).with_overscan(2);
        let window = render_window(&table, &virtualizer, Viewport::new(120.0, 80.0, 1024.0));

        assert_eq!(window.row_count, 13);
        let indices: Vec<usize> = window.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
        let body: f64 = window.rows.iter().map(|r| r.height).sum();
        assert_eq!(window.padding_top + body + window.padding_bottom, 13.0 * 40.0);
    }

    #[test]
    fn test_empty_row_set() {
        let table: Table<GoalieRow> = Table::from_query(Vec::new(), "team=BOS");
        assert!(table.is_empty());
        assert!(table.teams().is_empty());
        let window = render_window(&table, &Virtualizer::new(0), Viewport::new(0.0, 600.0, 1440.0));
        assert!(window.rows.is_empty());
        assert_eq!(window.padding_top + window.padding_bottom, 0.0);
    }

    #[test]
    fn test_mock_fallback_feeds_table() {
        let rows = with_fallback(
            "getSkaterRows",
            Environment::Development,
            || Err(FetchError::Transport("no database".to_string())),
            mock::mock_skater_rows,
        )
        .unwrap();
        let table = Table::from_query(rows, "team=COL");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_schemas_are_valid() {
        SKATER_SCHEMA.validate().unwrap();
        GOALIE_SCHEMA.validate().unwrap();
    }
}
