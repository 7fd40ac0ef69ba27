/// StatTable View Implementation
///
/// Views are read-only index mappings over a table's rows. A `FilterView`
/// keeps the rows that pass a `RowFilter` in their original order; a
/// `SortedView` orders a filtered view by a list of sort keys. Both refer to
/// rows by their index in the full row set, which is what lets percentiles
/// computed in filtered order be re-keyed to sorted order.
use crate::column::CellValue;
use crate::filter::RowFilter;
use crate::rows::StatRow;
use crate::url_state::SortSpec;
use std::cmp::Ordering;

/// A FilterView keeps the rows accepted by a filter, order-preserving.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterView {
    view_to_parent: Vec<usize>,
}

impl FilterView {
    pub fn new<R: StatRow>(rows: &[R], filter: &RowFilter) -> Self {
        let view_to_parent = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| filter.matches(*row))
            .map(|(i, _)| i)
            .collect();
        FilterView { view_to_parent }
    }

    pub fn len(&self) -> usize {
        self.view_to_parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view_to_parent.is_empty()
    }

    /// Returns the parent row index for a given view position
    pub fn get_parent_index(&self, view_index: usize) -> Option<usize> {
        self.view_to_parent.get(view_index).copied()
    }

    /// Parent row indices in view order
    pub fn parent_indices(&self) -> &[usize] {
        &self.view_to_parent
    }

    /// The filtered rows themselves, in view order.
    pub fn rows<'a, R>(&self, rows: &'a [R]) -> Vec<&'a R> {
        self.view_to_parent.iter().map(|&i| &rows[i]).collect()
    }
}

/// Sort order specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order (smallest first)
    Ascending,
    /// Descending order (largest first)
    Descending,
}

/// A single sort key specifying a column and order
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// Column id to sort by
    pub column: String,
    /// Sort order (ascending or descending)
    pub order: SortOrder,
    /// Whether missing values should be placed first or last
    pub nulls_first: bool,
}

impl SortKey {
    /// Create a new sort key with ascending order (nulls last)
    pub fn ascending(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            order: SortOrder::Ascending,
            nulls_first: false,
        }
    }

    /// Create a new sort key with descending order (nulls last)
    pub fn descending(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            order: SortOrder::Descending,
            nulls_first: false,
        }
    }
}

impl From<&SortSpec> for SortKey {
    fn from(spec: &SortSpec) -> Self {
        if spec.desc {
            SortKey::descending(spec.id.as_str())
        } else {
            SortKey::ascending(spec.id.as_str())
        }
    }
}

/// A SortedView presents the rows of a filtered view in sorted order.
///
/// Sorting is stable: each key contributes primary, secondary, ... ordering
/// in list order, and rows that compare equal on every key keep their
/// filtered order. With no keys the view is the filtered order unchanged.
///
/// # Examples
///
/// ```
/// use stattable::filter::RowFilter;
/// use stattable::rows::SkaterRow;
/// use stattable::view::{FilterView, SortKey, SortedView};
///
/// let rows = vec![
///     SkaterRow { full_name: "Bob".into(), points: 85, ..Default::default() },
///     SkaterRow { full_name: "Alice".into(), points: 92, ..Default::default() },
/// ];
/// let filtered = FilterView::new(&rows, &RowFilter::default());
/// let sorted = SortedView::new(&rows, &filtered, vec![SortKey::descending("points")]);
///
/// assert_eq!(sorted.len(), 2);
/// assert_eq!(sorted.get_parent_index(0), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedView {
    sort_keys: Vec<SortKey>,
    /// Sorted index: sorted_index[view_pos] = parent_row_index
    sorted_index: Vec<usize>,
}

impl SortedView {
    pub fn new<R: StatRow>(rows: &[R], filtered: &FilterView, sort_keys: Vec<SortKey>) -> Self {
        let mut sorted_index = filtered.parent_indices().to_vec();

        if !sort_keys.is_empty() {
            sorted_index.sort_by(|&a, &b| {
                for key in &sort_keys {
                    let val_a = rows[a].cell(&key.column);
                    let val_b = rows[b].cell(&key.column);

                    let cmp = Self::compare_values(&val_a, &val_b, key);
                    if cmp != Ordering::Equal {
                        return cmp;
                    }
                }
                Ordering::Equal
            });
        }

        SortedView {
            sort_keys,
            sorted_index,
        }
    }

    /// Compare two cell values according to a sort key
    fn compare_values(val_a: &CellValue<'_>, val_b: &CellValue<'_>, key: &SortKey) -> Ordering {
        let a_is_null = val_a.is_null() || matches!(val_a, CellValue::Number(v) if v.is_nan());
        let b_is_null = val_b.is_null() || matches!(val_b, CellValue::Number(v) if v.is_nan());

        // Missing values stay at the end (or start) regardless of direction
        match (a_is_null, b_is_null) {
            (true, true) => return Ordering::Equal,
            (true, false) => {
                return if key.nulls_first {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }
            (false, true) => {
                return if key.nulls_first {
                    Ordering::Greater
                } else {
                    Ordering::Less
                };
            }
            (false, false) => {}
        }

        let base_cmp = match (val_a, val_b) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            // Mixed kinds: numbers before text
            (CellValue::Number(_), _) => Ordering::Less,
            (_, CellValue::Number(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        };

        match key.order {
            SortOrder::Ascending => base_cmp,
            SortOrder::Descending => base_cmp.reverse(),
        }
    }

    /// Returns the number of rows in the sorted view
    pub fn len(&self) -> usize {
        self.sorted_index.len()
    }

    /// Returns true if the view is empty
    pub fn is_empty(&self) -> bool {
        self.sorted_index.is_empty()
    }

    /// Returns the parent row index for a given view position
    pub fn get_parent_index(&self, view_index: usize) -> Option<usize> {
        self.sorted_index.get(view_index).copied()
    }

    /// Parent row indices in sorted order
    pub fn parent_indices(&self) -> &[usize] {
        &self.sorted_index
    }

    /// Returns the sort keys
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SKATER_SCHEMA;
    use crate::rows::SkaterRow;
    use crate::url_state::TableState;

    fn player(name: &str, team: &str, points: i32, war: Option<f64>) -> SkaterRow {
        SkaterRow {
            full_name: name.to_string(),
            team_abbreviation: team.to_string(),
            points,
            war,
            ..Default::default()
        }
    }

    fn roster() -> Vec<SkaterRow> {
        vec![
            player("Charlie", "TOR", 75, Some(1.0)),
            player("alice", "MTL", 92, None),
            player("Bob", "TOR", 85, Some(3.0)),
            player("Dana", "MTL", 85, Some(2.0)),
        ]
    }

    #[test]
    fn test_filter_view_preserves_order() {
        let rows = roster();
        let mut state = TableState::new(&SKATER_SCHEMA);
        state.categorical.team = Some("TOR".to_string());
        let view = FilterView::new(&rows, &RowFilter::from_state(&state, &SKATER_SCHEMA));

        assert_eq!(view.len(), 2);
        assert_eq!(view.parent_indices(), &[0, 2]);
        assert_eq!(view.rows(&rows)[1].full_name, "Bob");
    }

    #[test]
    fn test_sorted_view_descending() {
        let rows = roster();
        let filtered = FilterView::new(&rows, &RowFilter::default());
        let sorted = SortedView::new(&rows, &filtered, vec![SortKey::descending("points")]);

        // Bob and Dana tie on 85 and keep their filtered order
        assert_eq!(sorted.parent_indices(), &[1, 2, 3, 0]);
    }

    #[test]
    fn test_sorted_view_multi_column() {
        let rows = roster();
        let filtered = FilterView::new(&rows, &RowFilter::default());
        let sorted = SortedView::new(
            &rows,
            &filtered,
            vec![SortKey::ascending("teamAbbreviation"), SortKey::descending("points")],
        );

        assert_eq!(sorted.parent_indices(), &[1, 3, 2, 0]);
    }

    #[test]
    fn test_sorted_view_text_is_case_insensitive() {
        let rows = roster();
        let filtered = FilterView::new(&rows, &RowFilter::default());
        let sorted = SortedView::new(&rows, &filtered, vec![SortKey::ascending("fullName")]);

        assert_eq!(sorted.parent_indices(), &[1, 2, 0, 3]);
    }

    #[test]
    fn test_nulls_last_in_both_directions() {
        let rows = roster();
        let filtered = FilterView::new(&rows, &RowFilter::default());

        let asc = SortedView::new(&rows, &filtered, vec![SortKey::ascending("war")]);
        assert_eq!(asc.parent_indices(), &[0, 3, 2, 1]);

        let desc = SortedView::new(&rows, &filtered, vec![SortKey::descending("war")]);
        assert_eq!(desc.parent_indices(), &[2, 3, 0, 1]);
    }

    #[test]
    fn test_no_keys_keeps_filtered_order() {
        let rows = roster();
        let filtered = FilterView::new(&rows, &RowFilter::default());
        let sorted = SortedView::new(&rows, &filtered, Vec::new());
        assert_eq!(sorted.parent_indices(), filtered.parent_indices());
        assert!(sorted.sort_keys().is_empty());
    }

    #[test]
    fn test_sort_key_from_spec() {
        let key = SortKey::from(&SortSpec::new("goals", true));
        assert_eq!(key.order, SortOrder::Descending);
        assert!(!key.nulls_first);
    }
}
