/// URL state codec.
///
/// A table's sort, filters and column visibility live in the query string so
/// views can be shared and navigated with back/forward. Each parameter is
/// decoded on its own and falls back to its default when it is missing or
/// malformed; decoding never fails.
///
/// | Param     | Shape                                   | Default         |
/// |-----------|-----------------------------------------|-----------------|
/// | `sort`    | JSON `[{id, desc}]`                     | `[]`            |
/// | `pos`     | string                                  | absent          |
/// | `team`    | string                                  | absent          |
/// | `minGP`   | integer                                 | absent          |
/// | `cols`    | JSON object of column id -> bool        | schema defaults |
/// | `filters` | JSON `[{id, columnId, operator, value}]`| `[]`            |

use crate::column::{TableSchema, Visibility};
use crate::filter::{AdvancedFilter, FilterOperator};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use url::form_urlencoded;

pub const PARAM_SORT: &str = "sort";
pub const PARAM_POSITION: &str = "pos";
pub const PARAM_TEAM: &str = "team";
pub const PARAM_MIN_GP: &str = "minGP";
pub const PARAM_COLUMNS: &str = "cols";
pub const PARAM_FILTERS: &str = "filters";

/// One entry of the sort list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub id: String,
    pub desc: bool,
}

impl SortSpec {
    pub fn new(id: impl Into<String>, desc: bool) -> Self {
        SortSpec { id: id.into(), desc }
    }
}

/// Exact-match filters on position and team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalFilters {
    pub position: Option<String>,
    pub team: Option<String>,
}

/// Which categorical filter an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalKind {
    Position,
    Team,
}

/// The complete, URL-serializable description of one table view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub sort: Vec<SortSpec>,
    pub categorical: CategoricalFilters,
    pub min_games_played: Option<i64>,
    pub column_visibility: Visibility,
    pub advanced_filters: Vec<AdvancedFilter>,
}

impl TableState {
    /// Default state: no sort, no filters, schema-default visibility.
    pub fn new(schema: &TableSchema) -> Self {
        TableState {
            sort: Vec::new(),
            categorical: CategoricalFilters::default(),
            min_games_played: None,
            column_visibility: schema.default_visibility(),
            advanced_filters: Vec::new(),
        }
    }
}

/// Serialize a table state to a query string (without the leading `?`).
///
/// Parameters holding their default value are omitted, so the default state
/// encodes to an empty string.
pub fn encode(state: &TableState, schema: &TableSchema) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());

    if !state.sort.is_empty() {
        if let Ok(json) = serde_json::to_string(&state.sort) {
            out.append_pair(PARAM_SORT, &json);
        }
    }
    if let Some(pos) = &state.categorical.position {
        out.append_pair(PARAM_POSITION, pos);
    }
    if let Some(team) = &state.categorical.team {
        out.append_pair(PARAM_TEAM, team);
    }
    if let Some(min_gp) = state.min_games_played {
        out.append_pair(PARAM_MIN_GP, &min_gp.to_string());
    }
    if state.column_visibility != schema.default_visibility() {
        if let Ok(json) = serde_json::to_string(&state.column_visibility) {
            out.append_pair(PARAM_COLUMNS, &json);
        }
    }
    if !state.advanced_filters.is_empty() {
        if let Ok(json) = serde_json::to_string(&state.advanced_filters) {
            out.append_pair(PARAM_FILTERS, &json);
        }
    }

    out.finish()
}

/// Decode a query string (with or without a leading `?`) into a table state.
///
/// # Examples
///
/// ```
/// use stattable::registry::SKATER_SCHEMA;
/// use stattable::url_state::{decode, encode, SortSpec, TableState};
///
/// let mut state = TableState::new(&SKATER_SCHEMA);
/// state.sort = vec![SortSpec::new("points", true)];
/// state.min_games_played = Some(20);
///
/// let query = encode(&state, &SKATER_SCHEMA);
/// assert_eq!(decode(&query, &SKATER_SCHEMA), state);
///
/// // Garbage degrades to defaults instead of failing
/// let reset = decode("sort=%7Bnot-json&minGP=lots", &SKATER_SCHEMA);
/// assert_eq!(reset, TableState::new(&SKATER_SCHEMA));
/// ```
pub fn decode(query: &str, schema: &TableSchema) -> TableState {
    let query = query.strip_prefix('?').unwrap_or(query);
    decode_pairs(
        form_urlencoded::parse(query.as_bytes()).map(|(k, v)| (k.into_owned(), v.into_owned())),
        schema,
    )
}

/// Decode already-split query pairs. The first occurrence of a key wins.
pub fn decode_pairs<I>(pairs: I, schema: &TableSchema) -> TableState
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut raw = RawParams::default();
    for (key, value) in pairs {
        let slot = match key.as_str() {
            PARAM_SORT => &mut raw.sort,
            PARAM_POSITION => &mut raw.pos,
            PARAM_TEAM => &mut raw.team,
            PARAM_MIN_GP => &mut raw.min_gp,
            PARAM_COLUMNS => &mut raw.cols,
            PARAM_FILTERS => &mut raw.filters,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    TableState {
        sort: raw.sort.as_deref().map(decode_sort).unwrap_or_default(),
        categorical: CategoricalFilters {
            position: raw.pos.filter(|s| !s.is_empty()),
            team: raw.team.filter(|s| !s.is_empty()),
        },
        min_games_played: raw.min_gp.as_deref().and_then(decode_min_gp),
        column_visibility: raw
            .cols
            .as_deref()
            .and_then(decode_visibility)
            .unwrap_or_else(|| schema.default_visibility()),
        advanced_filters: raw.filters.as_deref().map(decode_filters).unwrap_or_default(),
    }
}

#[derive(Default)]
struct RawParams {
    sort: Option<String>,
    pos: Option<String>,
    team: Option<String>,
    min_gp: Option<String>,
    cols: Option<String>,
    filters: Option<String>,
}

fn parse_json(param: &str, raw: &str) -> Option<JsonValue> {
    match serde_json::from_str(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("resetting '{}' param: {}", param, e);
            None
        }
    }
}

/// Keep only entries shaped exactly like `{id: string, desc: bool}`.
fn decode_sort(raw: &str) -> Vec<SortSpec> {
    let Some(JsonValue::Array(items)) = parse_json(PARAM_SORT, raw) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let id = item.get("id")?.as_str()?;
            let desc = item.get("desc")?.as_bool()?;
            Some(SortSpec::new(id, desc))
        })
        .collect()
}

fn decode_min_gp(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            debug!("ignoring non-integer minGP '{}'", raw);
            None
        }
    }
}

/// `None` unless the payload is a JSON object; non-boolean entries are dropped.
fn decode_visibility(raw: &str) -> Option<Visibility> {
    let JsonValue::Object(map) = parse_json(PARAM_COLUMNS, raw)? else {
        debug!("resetting 'cols' param: not an object");
        return None;
    };
    Some(
        map.into_iter()
            .filter_map(|(k, v)| v.as_bool().map(|b| (k, b)))
            .collect(),
    )
}

/// Keep only entries with string `id`/`columnId`, a known operator and a
/// numeric `value`.
fn decode_filters(raw: &str) -> Vec<AdvancedFilter> {
    let Some(JsonValue::Array(items)) = parse_json(PARAM_FILTERS, raw) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let id = item.get("id")?.as_str()?;
            let column_id = item.get("columnId")?.as_str()?;
            let operator = FilterOperator::parse(item.get("operator")?.as_str()?);
            let value = item.get("value")?.as_f64()?;
            if !operator.is_known() {
                debug!("dropping filter {} with operator '{}'", id, operator);
                return None;
            }
            Some(AdvancedFilter {
                id: id.to_string(),
                column_id: column_id.to_string(),
                operator,
                value,
            })
        })
        .collect()
}
