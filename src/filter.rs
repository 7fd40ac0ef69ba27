/// Row filtering for stat tables.
///
/// A table state compiles into a `RowFilter`:
/// - categorical filters (`position`, `team`): exact string equality
/// - `minGP`: an implicit `gamesPlayed >= minGP` range condition
/// - advanced filters: numeric range conditions grouped by column
///
/// A row is kept only if it passes every categorical filter and every
/// condition of every column group. Null values never satisfy a range
/// condition.

use crate::column::TableSchema;
use crate::rows::StatRow;
use crate::url_state::TableState;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators for advanced filters.
///
/// Operator strings that are not recognized survive as `Unrecognized` so a
/// state produced by a newer client can still be evaluated; such conditions
/// pass every row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Unrecognized(String),
}

impl FilterOperator {
    /// The five operators accepted from URLs and the filter builder.
    pub const KNOWN: [FilterOperator; 5] = [
        FilterOperator::Gte,
        FilterOperator::Gt,
        FilterOperator::Lte,
        FilterOperator::Lt,
        FilterOperator::Eq,
    ];

    pub fn parse(s: &str) -> Self {
        match s {
            "gt" => FilterOperator::Gt,
            "gte" => FilterOperator::Gte,
            "lt" => FilterOperator::Lt,
            "lte" => FilterOperator::Lte,
            "eq" => FilterOperator::Eq,
            other => FilterOperator::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Eq => "eq",
            FilterOperator::Unrecognized(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FilterOperator::Unrecognized(_))
    }

    /// Symbol used in filter summaries.
    pub fn symbol(&self) -> &str {
        match self {
            FilterOperator::Gt => ">",
            FilterOperator::Gte => ">=",
            FilterOperator::Lt => "<",
            FilterOperator::Lte => "<=",
            FilterOperator::Eq => "=",
            FilterOperator::Unrecognized(s) => s,
        }
    }
}

impl From<String> for FilterOperator {
    fn from(s: String) -> Self {
        FilterOperator::parse(&s)
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-added numeric comparison on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilter {
    pub id: String,
    pub column_id: String,
    pub operator: FilterOperator,
    pub value: f64,
}

impl AdvancedFilter {
    pub fn new(column_id: impl Into<String>, operator: FilterOperator, value: f64) -> Self {
        AdvancedFilter {
            id: uuid::Uuid::new_v4().to_string(),
            column_id: column_id.into(),
            operator,
            value,
        }
    }

    pub fn condition(&self) -> RangeCondition {
        RangeCondition {
            operator: self.operator.clone(),
            value: self.value,
        }
    }

    /// Apply a partial update; unset fields are left as they are.
    pub fn apply(&mut self, patch: &FilterPatch) {
        if let Some(column) = &patch.column_id {
            self.column_id = column.clone();
        }
        if let Some(op) = &patch.operator {
            self.operator = op.clone();
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
    }
}

/// Partial update for an advanced filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPatch {
    pub column_id: Option<String>,
    pub operator: Option<FilterOperator>,
    pub value: Option<f64>,
}

/// One operator/value pair applied to a column.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCondition {
    pub operator: FilterOperator,
    pub value: f64,
}

impl RangeCondition {
    pub fn new(operator: FilterOperator, value: f64) -> Self {
        RangeCondition { operator, value }
    }

    /// Whether a cell value satisfies this condition. Missing values never do.
    pub fn matches(&self, cell: Option<f64>) -> bool {
        let Some(v) = cell else {
            return false;
        };
        match &self.operator {
            FilterOperator::Gt => v > self.value,
            FilterOperator::Gte => v >= self.value,
            FilterOperator::Lt => v < self.value,
            FilterOperator::Lte => v <= self.value,
            FilterOperator::Eq => v == self.value,
            FilterOperator::Unrecognized(_) => true,
        }
    }
}

/// All conditions on one column; a row must satisfy each of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnConditions {
    pub column: String,
    pub conditions: Vec<RangeCondition>,
}

impl ColumnConditions {
    pub fn matches(&self, cell: Option<f64>) -> bool {
        self.conditions.iter().all(|c| c.matches(cell))
    }
}

/// A compiled table filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFilter {
    /// (column, required value) pairs
    categorical: Vec<(&'static str, String)>,
    /// Range groups in the order their columns were first seen
    ranges: Vec<ColumnConditions>,
}

impl RowFilter {
    /// Compile the filter described by a table state.
    ///
    /// Range conditions naming a column that is unknown or not numeric are
    /// dropped. A position filter is ignored for row kinds without a
    /// position column.
    pub fn from_state(state: &TableState, schema: &TableSchema) -> Self {
        let mut filter = RowFilter::default();

        if let Some(pos) = &state.categorical.position {
            match schema.position_column {
                Some(column) => filter.categorical.push((column, pos.clone())),
                None => debug!("{} table has no position column; ignoring pos={}", schema.kind, pos),
            }
        }
        if let Some(team) = &state.categorical.team {
            filter.categorical.push((schema.team_column, team.clone()));
        }

        if let Some(min_gp) = state.min_games_played {
            filter.push_condition(
                schema.games_played_column,
                RangeCondition::new(FilterOperator::Gte, min_gp as f64),
            );
        }

        for f in &state.advanced_filters {
            if !schema.is_numeric(&f.column_id) {
                debug!("dropping filter {} on non-numeric column '{}'", f.id, f.column_id);
                continue;
            }
            if !f.operator.is_known() {
                warn!("filter {} has unrecognized operator '{}'; it passes every row", f.id, f.operator);
            }
            filter.push_condition(&f.column_id, f.condition());
        }

        filter
    }

    fn push_condition(&mut self, column: &str, condition: RangeCondition) {
        match self.ranges.iter_mut().find(|g| g.column == column) {
            Some(group) => group.conditions.push(condition),
            None => self.ranges.push(ColumnConditions {
                column: column.to_string(),
                conditions: vec![condition],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categorical.is_empty() && self.ranges.is_empty()
    }

    /// Range groups keyed by column.
    pub fn ranges(&self) -> &[ColumnConditions] {
        &self.ranges
    }

    /// Whether a row passes every categorical filter and every range group.
    pub fn matches<R: StatRow>(&self, row: &R) -> bool {
        self.categorical
            .iter()
            .all(|(column, expected)| row.cell(column).as_str() == Some(expected.as_str()))
            && self
                .ranges
                .iter()
                .all(|group| group.matches(row.cell(&group.column).as_f64()))
    }
}
