/// StatTable Table Implementation
///
/// A `Table` owns a row set, its schema and the current `TableState`, and
/// keeps three derived layers up to date: the filtered rows, the percentile
/// maps over those rows, and the sorted order. Every mutation recomputes the
/// layers wholesale (filter, then percentiles, then sort, then remap) and
/// re-encodes the state to a query string.

use crate::column::{ColumnDef, TableSchema, Visibility};
use crate::error::TableError;
use crate::filter::{AdvancedFilter, FilterOperator, FilterPatch, RowFilter};
use crate::format::format_cell;
use crate::percentile::{cell_intensity, compute_percentiles, remap_percentiles, ColumnPercentiles, Intensity};
use crate::registry::UNKNOWN_TEAM;
use crate::rows::StatRow;
use crate::url_state::{self, CategoricalKind, SortSpec, TableState};
use crate::view::{FilterView, SortKey, SortedView};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Called with the canonical query string after every state mutation.
pub type QueryListener = Box<dyn FnMut(&str)>;

/// A formatted cell plus its optional highlight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCell {
    pub column: &'static str,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
}

/// What clearing a filter chip removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum ChipTarget {
    Position,
    Team,
    MinGamesPlayed,
    Advanced(String),
}

/// One active filter, labelled for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    pub label: String,
    pub target: ChipTarget,
}

/// A stat table over one row kind.
///
/// # Examples
///
/// ```
/// use stattable::rows::SkaterRow;
/// use stattable::table::Table;
/// use stattable::url_state::{CategoricalKind, SortSpec};
///
/// let rows = vec![
///     SkaterRow { full_name: "Alice".into(), team_abbreviation: "TOR".into(), points: 92, ..Default::default() },
///     SkaterRow { full_name: "Bob".into(), team_abbreviation: "MTL".into(), points: 85, ..Default::default() },
///     SkaterRow { full_name: "Charlie".into(), team_abbreviation: "TOR".into(), points: 75, ..Default::default() },
/// ];
///
/// let mut table = Table::new(rows);
/// table.set_categorical_filter(CategoricalKind::Team, Some("TOR".to_string()));
/// table.set_sort(vec![SortSpec::new("points", false)]).unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.row(0).unwrap().full_name, "Charlie");
/// assert!(table.query().contains("team=TOR"));
/// ```
pub struct Table<R: StatRow> {
    schema: &'static TableSchema,
    rows: Vec<R>,
    state: TableState,
    query: String,
    listener: Option<QueryListener>,

    // Derived from rows alone
    teams: Vec<String>,
    color_scale_columns: Vec<&'static str>,

    // Derived from rows + state
    filtered: FilterView,
    sorted: SortedView,
    /// Keyed by sorted position
    percentiles: ColumnPercentiles,
}

impl<R: StatRow> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("kind", &self.schema.kind)
            .field("rows", &self.rows.len())
            .field("visible_rows", &self.sorted.len())
            .field("query", &self.query)
            .finish()
    }
}

impl<R: StatRow> Table<R> {
    /// Create a table in the default state.
    pub fn new(rows: Vec<R>) -> Self {
        Self::with_state(rows, TableState::new(R::schema()))
    }

    /// Create a table from a query string, as on page load.
    pub fn from_query(rows: Vec<R>, query: &str) -> Self {
        Self::with_state(rows, url_state::decode(query, R::schema()))
    }

    /// Create a table in a given state.
    pub fn with_state(rows: Vec<R>, state: TableState) -> Self {
        let schema = R::schema();
        let mut table = Table {
            schema,
            rows: Vec::new(),
            query: url_state::encode(&state, schema),
            state,
            listener: None,
            teams: Vec::new(),
            color_scale_columns: schema.color_scale_columns(),
            filtered: FilterView::default(),
            sorted: SortedView::default(),
            percentiles: ColumnPercentiles::new(),
        };
        table.replace_rows(rows);
        table
    }

    /// Register a listener for query-string changes caused by mutations.
    pub fn on_query_change<F>(&mut self, listener: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Swap in a fresh row set, keeping the current state.
    pub fn replace_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        let teams: BTreeSet<&str> = self
            .rows
            .iter()
            .filter_map(|row| row.cell(self.schema.team_column).as_str())
            .filter(|team| *team != UNKNOWN_TEAM)
            .collect();
        self.teams = teams.into_iter().map(str::to_string).collect();
        self.recompute();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Canonical query string for the current state (no leading `?`).
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Every row, unfiltered and in input order.
    pub fn all_rows(&self) -> &[R] {
        &self.rows
    }

    /// Number of rows after filtering.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Row at a sorted position.
    pub fn row(&self, index: usize) -> Option<&R> {
        self.sorted.get_parent_index(index).map(|i| &self.rows[i])
    }

    /// Filtered rows in sorted order.
    pub fn rows(&self) -> impl Iterator<Item = &R> + '_ {
        self.sorted.parent_indices().iter().map(move |&i| &self.rows[i])
    }

    /// Percentile of the cell at (sorted position, column), if ranked.
    pub fn percentile(&self, index: usize, column: &str) -> Option<f64> {
        self.percentiles.get(column)?.get(&index).copied()
    }

    /// Percentile maps keyed by sorted position.
    pub fn percentiles(&self) -> &ColumnPercentiles {
        &self.percentiles
    }

    /// Distinct team abbreviations, sorted, without the unknown placeholder.
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    /// (id, header) of every column an advanced filter can target.
    pub fn numeric_columns(&self) -> Vec<(&'static str, &'static str)> {
        self.schema.numeric_columns().map(|c| (c.id, c.header)).collect()
    }

    pub fn color_scale_columns(&self) -> &[&'static str] {
        &self.color_scale_columns
    }

    /// Column id -> header.
    pub fn column_headers(&self) -> HashMap<&'static str, &'static str> {
        self.schema.columns.iter().map(|c| (c.id, c.header)).collect()
    }

    /// Columns that cannot be hidden are always visible; others default to visible.
    pub fn is_visible(&self, column: &str) -> bool {
        match self.schema.column(column) {
            Some(def) if !def.hideable => true,
            Some(def) => self.state.column_visibility.get(def.id).copied().unwrap_or(true),
            None => false,
        }
    }

    /// Visible columns in schema order.
    pub fn visible_columns(&self) -> Vec<&'static ColumnDef> {
        self.schema
            .columns
            .iter()
            .filter(|c| self.is_visible(c.id))
            .collect()
    }

    /// Formatted value and highlight for the cell at (sorted position, column).
    pub fn render_cell(&self, index: usize, column: &str) -> Option<RenderedCell> {
        let def = self.schema.column(column)?;
        let row = self.row(index)?;
        let value = row.cell(def.id);
        let intensity = if def.color_scale {
            cell_intensity(value, self.percentile(index, def.id), def.invert)
        } else {
            None
        };
        Some(RenderedCell {
            column: def.id,
            text: format_cell(value, def.format),
            intensity,
        })
    }

    /// Labelled chips for every active filter.
    pub fn filter_chips(&self) -> Vec<FilterChip> {
        let mut chips = Vec::new();
        if let Some(pos) = &self.state.categorical.position {
            chips.push(FilterChip {
                label: format!("Position: {}", pos),
                target: ChipTarget::Position,
            });
        }
        if let Some(team) = &self.state.categorical.team {
            chips.push(FilterChip {
                label: format!("Team: {}", team),
                target: ChipTarget::Team,
            });
        }
        if let Some(min_gp) = self.state.min_games_played {
            chips.push(FilterChip {
                label: format!("Min GP: {}", min_gp),
                target: ChipTarget::MinGamesPlayed,
            });
        }
        for f in &self.state.advanced_filters {
            let header = self
                .schema
                .column(&f.column_id)
                .map(|c| c.header)
                .unwrap_or(f.column_id.as_str());
            chips.push(FilterChip {
                label: format!("{} {} {}", header, f.operator.symbol(), f.value),
                target: ChipTarget::Advanced(f.id.clone()),
            });
        }
        chips
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Replace the sort list.
    pub fn set_sort(&mut self, sort: Vec<SortSpec>) -> Result<(), TableError> {
        if let Some(unknown) = sort.iter().find(|s| self.schema.column(&s.id).is_none()) {
            return Err(TableError::UnknownColumn(unknown.id.clone()));
        }
        self.state.sort = sort;
        self.commit();
        Ok(())
    }

    /// Header-click sort cycle.
    ///
    /// Numeric columns start descending and text columns ascending; a second
    /// activation flips the direction and a third removes the column. Without
    /// `multi` the column replaces the whole sort list.
    pub fn toggle_sort(&mut self, column: &str, multi: bool) -> Result<(), TableError> {
        let def = self
            .schema
            .column(column)
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))?;
        let first_desc = def.numeric;

        let existing = self.state.sort.iter().position(|s| s.id == def.id);
        let next = match existing.map(|i| self.state.sort[i].desc) {
            None => Some(first_desc),
            Some(desc) if desc == first_desc => Some(!desc),
            Some(_) => None,
        };

        if multi {
            match (existing, next) {
                (Some(i), Some(desc)) => self.state.sort[i].desc = desc,
                (Some(i), None) => {
                    self.state.sort.remove(i);
                }
                (None, Some(desc)) => self.state.sort.push(SortSpec::new(def.id, desc)),
                (None, None) => {}
            }
        } else {
            self.state.sort = next
                .map(|desc| vec![SortSpec::new(def.id, desc)])
                .unwrap_or_default();
        }
        self.commit();
        Ok(())
    }

    /// Set or clear a categorical filter. An empty value clears it.
    pub fn set_categorical_filter(&mut self, kind: CategoricalKind, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match kind {
            CategoricalKind::Position => self.state.categorical.position = value,
            CategoricalKind::Team => self.state.categorical.team = value,
        }
        self.commit();
    }

    pub fn set_min_games_played(&mut self, value: Option<i64>) {
        self.state.min_games_played = value;
        self.commit();
    }

    /// Replace the visibility map.
    pub fn set_column_visibility(&mut self, visibility: Visibility) {
        self.state.column_visibility = visibility;
        self.commit();
    }

    /// Hide every column of a group if all are visible, otherwise show them all.
    pub fn toggle_group(&mut self, group_id: &str) -> Result<(), TableError> {
        let group = self
            .schema
            .group(group_id)
            .ok_or_else(|| TableError::UnknownGroup(group_id.to_string()))?;
        let show = !group.columns.iter().all(|c| self.is_visible(c));
        for col in group.columns {
            self.state.column_visibility.insert(col.to_string(), show);
        }
        self.commit();
        Ok(())
    }

    /// Replace visibility with a preset's. Sort and filters are untouched.
    pub fn apply_preset(&mut self, preset_id: &str) -> Result<(), TableError> {
        let preset = self
            .schema
            .preset(preset_id)
            .ok_or_else(|| TableError::UnknownPreset(preset_id.to_string()))?;
        self.state.column_visibility = self.schema.preset_visibility(preset);
        self.commit();
        Ok(())
    }

    /// Add a range filter on a numeric column; returns its id.
    pub fn add_advanced_filter(
        &mut self,
        column: &str,
        operator: FilterOperator,
        value: f64,
    ) -> Result<String, TableError> {
        self.check_filter_column(column)?;
        check_filter_value(value)?;
        let filter = AdvancedFilter::new(column, operator, value);
        let id = filter.id.clone();
        self.state.advanced_filters.push(filter);
        self.commit();
        Ok(id)
    }

    /// Add `{first numeric column >= 0}`; returns its id.
    pub fn add_default_filter(&mut self) -> Option<String> {
        let column = self.schema.numeric_columns().next()?;
        self.add_advanced_filter(column.id, FilterOperator::Gte, 0.0).ok()
    }

    /// Patch an existing filter in place.
    pub fn update_advanced_filter(&mut self, id: &str, patch: FilterPatch) -> Result<(), TableError> {
        if let Some(column) = &patch.column_id {
            self.check_filter_column(column)?;
        }
        if let Some(value) = patch.value {
            check_filter_value(value)?;
        }
        let filter = self
            .state
            .advanced_filters
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| TableError::UnknownFilter(id.to_string()))?;
        filter.apply(&patch);
        self.commit();
        Ok(())
    }

    pub fn remove_advanced_filter(&mut self, id: &str) -> Result<(), TableError> {
        let before = self.state.advanced_filters.len();
        self.state.advanced_filters.retain(|f| f.id != id);
        if self.state.advanced_filters.len() == before {
            return Err(TableError::UnknownFilter(id.to_string()));
        }
        self.commit();
        Ok(())
    }

    /// Remove whatever a filter chip stands for.
    pub fn clear_chip(&mut self, target: &ChipTarget) -> Result<(), TableError> {
        match target {
            ChipTarget::Position => self.set_categorical_filter(CategoricalKind::Position, None),
            ChipTarget::Team => self.set_categorical_filter(CategoricalKind::Team, None),
            ChipTarget::MinGamesPlayed => self.set_min_games_played(None),
            ChipTarget::Advanced(id) => self.remove_advanced_filter(id)?,
        }
        Ok(())
    }

    /// Clear every categorical, minimum-games and advanced filter.
    pub fn clear_filters(&mut self) {
        self.state.categorical = Default::default();
        self.state.min_games_played = None;
        self.state.advanced_filters.clear();
        self.commit();
    }

    /// Adopt a query string from navigation (back/forward, pasted link).
    ///
    /// The listener is not notified, since the query already came from the URL.
    pub fn navigate(&mut self, query: &str) {
        self.state = url_state::decode(query, self.schema);
        self.query = url_state::encode(&self.state, self.schema);
        self.recompute();
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn check_filter_column(&self, column: &str) -> Result<(), TableError> {
        match self.schema.column(column) {
            None => Err(TableError::UnknownColumn(column.to_string())),
            Some(def) if !def.numeric => Err(TableError::NotNumeric(column.to_string())),
            Some(_) => Ok(()),
        }
    }

    fn commit(&mut self) {
        self.recompute();
        self.query = url_state::encode(&self.state, self.schema);
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.query);
        }
    }

    fn recompute(&mut self) {
        let filter = RowFilter::from_state(&self.state, self.schema);
        self.filtered = FilterView::new(&self.rows, &filter);

        // Ranked against the filtered population, keyed by filtered position
        let ranked = compute_percentiles(&self.filtered.rows(&self.rows), &self.color_scale_columns);

        let keys: Vec<SortKey> = self.state.sort.iter().map(SortKey::from).collect();
        self.sorted = SortedView::new(&self.rows, &self.filtered, keys);

        self.percentiles = remap_percentiles(
            &ranked,
            self.filtered.parent_indices(),
            self.sorted.parent_indices(),
        );

        debug!(
            "{} table: {} of {} rows after filtering",
            self.schema.kind,
            self.filtered.len(),
            self.rows.len()
        );
    }
}

// NaN and infinities encode as JSON null and would vanish from a shared link
fn check_filter_value(value: f64) -> Result<(), TableError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TableError::NonFiniteValue(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::percentile::Intensity;
    use crate::rows::{GoalieRow, SkaterRow};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn skater(name: &str, team: &str, position: &str, gp: i32, goals: i32, points: i32) -> SkaterRow {
        SkaterRow {
            full_name: name.to_string(),
            team_abbreviation: team.to_string(),
            position: position.to_string(),
            games_played: gp,
            goals,
            points,
            ..Default::default()
        }
    }

    fn small_table() -> Table<SkaterRow> {
        Table::new(small_rows())
    }

    fn small_rows() -> Vec<SkaterRow> {
        vec![
            skater("Alice", "TOR", "C", 82, 40, 92),
            skater("Bob", "MTL", "LW", 10, 5, 12),
            skater("Charlie", "TOR", "D", 60, 12, 45),
            skater("Dana", UNKNOWN_TEAM, "C", 30, 20, 50),
        ]
    }

    #[test]
    fn test_default_state() {
        let table = small_table();
        assert_eq!(table.len(), 4);
        assert_eq!(table.query(), "");
        assert_eq!(table.teams(), &["MTL".to_string(), "TOR".to_string()]);
        assert_eq!(table.row(0).unwrap().full_name, "Alice");
    }

    #[test]
    fn test_min_games_and_team_compose() {
        let mut table = small_table();
        table.set_categorical_filter(CategoricalKind::Team, Some("TOR".to_string()));
        table.set_min_games_played(Some(70));
        assert_eq!(table.len(), 1);
        assert_eq!(table.row(0).unwrap().full_name, "Alice");

        table.set_categorical_filter(CategoricalKind::Team, Some(String::new()));
        assert!(table.state().categorical.team.is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_percentiles_follow_filter() {
        let mut table = small_table();
        // Whole set: Alice has the most goals
        assert_eq!(table.percentile(0, "goals"), Some(100.0));

        table.set_categorical_filter(CategoricalKind::Position, Some("C".to_string()));
        assert_eq!(table.len(), 2);
        assert_eq!(table.percentile(0, "goals"), Some(100.0));
        assert_eq!(table.percentile(1, "goals"), Some(0.0));
        // Unranked columns have no maps
        assert_eq!(table.percentile(0, "gamesPlayed"), None);
    }

    #[test]
    fn test_percentiles_follow_sort() {
        let mut table = small_table();
        table.set_sort(vec![SortSpec::new("points", false)]).unwrap();
        assert_eq!(table.row(0).unwrap().full_name, "Bob");
        assert_eq!(table.percentile(0, "points"), Some(0.0));
        assert_eq!(table.percentile(3, "points"), Some(100.0));
    }

    #[test]
    fn test_set_sort_rejects_unknown_column() {
        let mut table = small_table();
        assert_eq!(
            table.set_sort(vec![SortSpec::new("nope", true)]),
            Err(TableError::UnknownColumn("nope".to_string()))
        );
        assert!(table.state().sort.is_empty());
    }

    #[test]
    fn test_toggle_sort_cycle() {
        let mut table = small_table();
        table.toggle_sort("points", false).unwrap();
        assert_eq!(table.state().sort, vec![SortSpec::new("points", true)]);
        table.toggle_sort("points", false).unwrap();
        assert_eq!(table.state().sort, vec![SortSpec::new("points", false)]);
        table.toggle_sort("points", false).unwrap();
        assert!(table.state().sort.is_empty());

        // Text columns start ascending
        table.toggle_sort("fullName", false).unwrap();
        assert_eq!(table.state().sort, vec![SortSpec::new("fullName", false)]);
    }

    #[test]
    fn test_toggle_sort_multi() {
        let mut table = small_table();
        table.toggle_sort("teamAbbreviation", false).unwrap();
        table.toggle_sort("points", true).unwrap();
        assert_eq!(
            table.state().sort,
            vec![SortSpec::new("teamAbbreviation", false), SortSpec::new("points", true)]
        );
        let names: Vec<&str> = table.rows().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Alice", "Charlie", "Dana"]);

        // Without multi the clicked column replaces the list
        table.toggle_sort("goals", false).unwrap();
        assert_eq!(table.state().sort, vec![SortSpec::new("goals", true)]);
    }

    #[test]
    fn test_advanced_filter_lifecycle() {
        let mut table = small_table();
        let id = table.add_advanced_filter("goals", FilterOperator::Gte, 12.0).unwrap();
        assert_eq!(table.len(), 3);

        table
            .update_advanced_filter(&id, FilterPatch { value: Some(30.0), ..Default::default() })
            .unwrap();
        assert_eq!(table.len(), 1);

        table.remove_advanced_filter(&id).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.remove_advanced_filter(&id),
            Err(TableError::UnknownFilter(id.clone()))
        );
    }

    #[test]
    fn test_advanced_filter_validation() {
        let mut table = small_table();
        assert_eq!(
            table.add_advanced_filter("teamAbbreviation", FilterOperator::Eq, 1.0),
            Err(TableError::NotNumeric("teamAbbreviation".to_string()))
        );
        assert_eq!(
            table.add_advanced_filter("bogus", FilterOperator::Eq, 1.0),
            Err(TableError::UnknownColumn("bogus".to_string()))
        );
        let id = table.add_default_filter().unwrap();
        assert_eq!(table.state().advanced_filters[0].column_id, "gamesPlayed");
        assert_eq!(
            table.update_advanced_filter(
                &id,
                FilterPatch { column_id: Some("position".to_string()), ..Default::default() }
            ),
            Err(TableError::NotNumeric("position".to_string()))
        );
    }

    #[test]
    fn test_non_finite_filter_values_rejected() {
        let mut table = small_table();
        assert_eq!(
            table.add_advanced_filter("goals", FilterOperator::Gte, f64::INFINITY),
            Err(TableError::NonFiniteValue(f64::INFINITY))
        );
        assert!(matches!(
            table.add_advanced_filter("goals", FilterOperator::Gte, f64::NAN),
            Err(TableError::NonFiniteValue(v)) if v.is_nan()
        ));
        assert!(table.state().advanced_filters.is_empty());
        assert_eq!(table.query(), "");

        let id = table.add_advanced_filter("goals", FilterOperator::Gte, 10.0).unwrap();
        let patch = FilterPatch { value: Some(f64::NEG_INFINITY), ..Default::default() };
        assert_eq!(
            table.update_advanced_filter(&id, patch),
            Err(TableError::NonFiniteValue(f64::NEG_INFINITY))
        );
        assert_eq!(table.state().advanced_filters[0].value, 10.0);
    }

    #[test]
    fn test_shared_link_keeps_exact_filter_values() {
        let mut table = small_table();
        for value in [9.756367975738165, 0.47140704726438803, -1.0e-300, 1.7976931348623157e308] {
            table.add_advanced_filter("goals", FilterOperator::Lte, value).unwrap();
        }
        let shared = Table::from_query(small_rows(), table.query());
        let values: Vec<u64> = shared.state().advanced_filters.iter().map(|f| f.value.to_bits()).collect();
        let expected: Vec<u64> = table.state().advanced_filters.iter().map(|f| f.value.to_bits()).collect();
        assert_eq!(values, expected);
        assert_eq!(shared.state(), table.state());
    }

    #[test]
    fn test_apply_preset_replaces_visibility_only() {
        let mut table = small_table();
        table.toggle_group("advanced").unwrap();
        assert!(table.is_visible("war"));
        table.set_sort(vec![SortSpec::new("goals", true)]).unwrap();
        table.set_min_games_played(Some(20));

        table.apply_preset("standard").unwrap();
        assert!(!table.is_visible("war"));
        assert!(table.is_visible("shots"));
        assert!(table.is_visible("goals"));
        assert_eq!(table.state().sort, vec![SortSpec::new("goals", true)]);
        assert_eq!(table.state().min_games_played, Some(20));

        assert_eq!(
            table.apply_preset("nope"),
            Err(TableError::UnknownPreset("nope".to_string()))
        );
    }

    #[test]
    fn test_toggle_group() {
        let mut table = small_table();
        // scoring is visible by default: toggling hides it
        table.toggle_group("scoring").unwrap();
        assert!(!table.is_visible("goals"));

        // partially visible groups are shown in full
        let mut vis = table.state().column_visibility.clone();
        vis.insert("goals".to_string(), true);
        table.set_column_visibility(vis);
        table.toggle_group("scoring").unwrap();
        assert!(table.is_visible("points"));
        assert!(table.is_visible("goals"));
    }

    #[test]
    fn test_sticky_columns_cannot_hide() {
        let mut table = small_table();
        table.toggle_group("bio").unwrap();
        assert!(table.is_visible("fullName"));
        assert!(table.is_visible("teamAbbreviation"));
        assert!(!table.is_visible("gamesPlayed"));
        assert_eq!(table.visible_columns()[0].id, "fullName");
    }

    #[test]
    fn test_filter_chips() {
        let mut table = small_table();
        table.set_categorical_filter(CategoricalKind::Position, Some("C".to_string()));
        table.set_min_games_played(Some(20));
        let id = table.add_advanced_filter("goals", FilterOperator::Gte, 30.0).unwrap();

        let labels: Vec<String> = table.filter_chips().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Position: C", "Min GP: 20", "G >= 30"]);

        table.clear_chip(&ChipTarget::Advanced(id)).unwrap();
        table.clear_chip(&ChipTarget::Position).unwrap();
        assert_eq!(table.filter_chips().len(), 1);
        table.clear_filters();
        assert!(table.filter_chips().is_empty());
    }

    #[test]
    fn test_render_cell() {
        let mut table = small_table();
        table.set_sort(vec![SortSpec::new("goals", true)]).unwrap();

        let top = table.render_cell(0, "goals").unwrap();
        assert_eq!(top.text, "40");
        assert_eq!(top.intensity, Some(Intensity::StrongPositive));

        let name = table.render_cell(0, "fullName").unwrap();
        assert_eq!(name.text, "Alice");
        assert_eq!(name.intensity, None);

        let war = table.render_cell(0, "war").unwrap();
        assert_eq!(war.text, "-");
        assert_eq!(war.intensity, None);

        assert!(table.render_cell(9, "goals").is_none());
        assert!(table.render_cell(0, "bogus").is_none());
    }

    #[test]
    fn test_inverted_render_for_goalies() {
        let goalie = |name: &str, gaa: f64| GoalieRow {
            full_name: name.to_string(),
            team_abbreviation: "BOS".to_string(),
            goals_against_avg: Some(gaa),
            ..Default::default()
        };
        let mut table = Table::new(vec![goalie("A", 2.10), goalie("B", 3.40)]);
        table.set_sort(vec![SortSpec::new("goalsAgainstAvg", false)]).unwrap();

        let best = table.render_cell(0, "goalsAgainstAvg").unwrap();
        assert_eq!(best.text, "2.10");
        assert_eq!(best.intensity, Some(Intensity::StrongPositive));
        let worst = table.render_cell(1, "goalsAgainstAvg").unwrap();
        assert_eq!(worst.intensity, Some(Intensity::StrongNegative));
    }

    #[test]
    fn test_listener_receives_every_mutation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut table = small_table();
        table.on_query_change(move |q| sink.borrow_mut().push(q.to_string()));
        table.set_min_games_played(Some(20));
        table.set_min_games_played(None);
        table.navigate("team=TOR");

        let seen = seen.borrow();
        assert_eq!(seen.as_slice(), &["minGP=20".to_string(), String::new()]);
        assert_eq!(table.query(), "team=TOR");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_from_query_and_empty_result() {
        let table = Table::from_query(
            vec![skater("Alice", "TOR", "C", 82, 40, 92)],
            "?team=EDM&sort=not-json",
        );
        assert!(table.is_empty());
        assert!(table.percentiles().values().all(|m| m.is_empty()));
        assert_eq!(table.query(), "team=EDM");
    }

    #[test]
    fn test_replace_rows_keeps_state() {
        let mut table = small_table();
        table.set_categorical_filter(CategoricalKind::Team, Some("MTL".to_string()));
        table.replace_rows(vec![
            skater("Eve", "MTL", "RW", 50, 20, 40),
            skater("Finn", "MTL", "C", 51, 21, 41),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.teams(), &["MTL".to_string()]);
    }
}
