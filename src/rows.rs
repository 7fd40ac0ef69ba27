/// Stat row kinds.
///
/// The table engine is generic over `StatRow`: a row is only ever asked for
/// the value behind a column id, and each row kind names the schema that
/// describes its columns.
use crate::column::{CellValue, TableSchema};
use crate::registry::{GOALIE_SCHEMA, SKATER_SCHEMA};
use serde::{Deserialize, Serialize};

/// A record the table engine can filter, rank, sort and render.
pub trait StatRow {
    /// Schema shared by every row of this kind.
    fn schema() -> &'static TableSchema
    where
        Self: Sized;

    /// Value for a column id; `CellValue::Null` for unknown ids.
    fn cell(&self, column: &str) -> CellValue<'_>;
}

impl<R: StatRow> StatRow for &R {
    fn schema() -> &'static TableSchema {
        R::schema()
    }

    fn cell(&self, column: &str) -> CellValue<'_> {
        (**self).cell(column)
    }
}

/// One skater's regular-season line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkaterRow {
    pub id: i32,
    pub nhl_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub position: String,
    pub headshot_url: Option<String>,
    pub team_abbreviation: String,
    pub team_logo_url: Option<String>,

    pub games_played: i32,
    pub goals: i32,
    pub assists: i32,
    pub points: i32,
    pub plus_minus: i32,
    pub pim: i32,

    pub pp_goals: i32,
    pub pp_assists: i32,
    pub pp_points: i32,
    pub sh_goals: i32,
    pub sh_assists: i32,
    pub sh_points: i32,

    pub game_winning_goals: i32,
    pub overtime_goals: i32,

    pub shots: i32,
    pub shooting_pct: Option<f64>,

    /// Ice time totals are in seconds
    pub toi: i32,
    pub toi_per_game: Option<f64>,
    pub ev_toi: i32,
    pub pp_toi: i32,
    pub sh_toi: i32,

    pub hits: i32,
    pub blocks: i32,
    pub takeaways: i32,
    pub giveaways: i32,

    pub faceoff_pct: Option<f64>,
    pub faceoffs_won: i32,
    pub faceoffs_lost: i32,

    pub corsi_for_pct: Option<f64>,
    pub corsi_rel_pct: Option<f64>,
    pub fenwick_for_pct: Option<f64>,
    pub x_goals_for_pct: Option<f64>,
    pub x_goals_diff: Option<f64>,
    pub war: Option<f64>,
}

impl StatRow for SkaterRow {
    fn schema() -> &'static TableSchema {
        &SKATER_SCHEMA
    }

    fn cell(&self, column: &str) -> CellValue<'_> {
        match column {
            "fullName" => CellValue::Text(&self.full_name),
            "firstName" => CellValue::Text(&self.first_name),
            "lastName" => CellValue::Text(&self.last_name),
            "position" => CellValue::Text(&self.position),
            "teamAbbreviation" => CellValue::Text(&self.team_abbreviation),
            "headshotUrl" => self.headshot_url.as_deref().map_or(CellValue::Null, CellValue::Text),
            "id" => self.id.into(),
            "nhlId" => self.nhl_id.into(),
            "gamesPlayed" => self.games_played.into(),
            "goals" => self.goals.into(),
            "assists" => self.assists.into(),
            "points" => self.points.into(),
            "plusMinus" => self.plus_minus.into(),
            "pim" => self.pim.into(),
            "ppGoals" => self.pp_goals.into(),
            "ppAssists" => self.pp_assists.into(),
            "ppPoints" => self.pp_points.into(),
            "shGoals" => self.sh_goals.into(),
            "shAssists" => self.sh_assists.into(),
            "shPoints" => self.sh_points.into(),
            "gameWinningGoals" => self.game_winning_goals.into(),
            "overtimeGoals" => self.overtime_goals.into(),
            "shots" => self.shots.into(),
            "shootingPct" => self.shooting_pct.into(),
            "toi" => self.toi.into(),
            "toiPerGame" => self.toi_per_game.into(),
            "evToi" => self.ev_toi.into(),
            "ppToi" => self.pp_toi.into(),
            "shToi" => self.sh_toi.into(),
            "hits" => self.hits.into(),
            "blocks" => self.blocks.into(),
            "takeaways" => self.takeaways.into(),
            "giveaways" => self.giveaways.into(),
            "faceoffPct" => self.faceoff_pct.into(),
            "faceoffsWon" => self.faceoffs_won.into(),
            "faceoffsLost" => self.faceoffs_lost.into(),
            "corsiForPct" => self.corsi_for_pct.into(),
            "corsiRelPct" => self.corsi_rel_pct.into(),
            "fenwickForPct" => self.fenwick_for_pct.into(),
            "xGoalsForPct" => self.x_goals_for_pct.into(),
            "xGoalsDiff" => self.x_goals_diff.into(),
            "war" => self.war.into(),
            _ => CellValue::Null,
        }
    }
}

/// One goalie's regular-season line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalieRow {
    pub id: i32,
    pub nhl_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub headshot_url: Option<String>,
    pub team_abbreviation: String,
    pub team_logo_url: Option<String>,

    pub games_played: i32,
    pub games_started: i32,
    pub wins: i32,
    pub losses: i32,
    pub ot_losses: i32,

    pub save_percentage: Option<f64>,
    pub goals_against_avg: Option<f64>,
    pub shutouts: i32,
    pub saves: i32,
    pub shots_against: i32,
    pub goals_against: i32,
    pub toi: i32,

    pub quality_starts: Option<f64>,
    pub quality_starts_pct: Option<f64>,
    pub goals_saved_above_average: Option<f64>,
    pub goals_prevented: Option<f64>,

    pub ev_save_percentage: Option<f64>,
    pub pp_save_percentage: Option<f64>,
    pub sh_save_percentage: Option<f64>,
}

impl StatRow for GoalieRow {
    fn schema() -> &'static TableSchema {
        &GOALIE_SCHEMA
    }

    fn cell(&self, column: &str) -> CellValue<'_> {
        match column {
            "fullName" => CellValue::Text(&self.full_name),
            "firstName" => CellValue::Text(&self.first_name),
            "lastName" => CellValue::Text(&self.last_name),
            "teamAbbreviation" => CellValue::Text(&self.team_abbreviation),
            "headshotUrl" => self.headshot_url.as_deref().map_or(CellValue::Null, CellValue::Text),
            "id" => self.id.into(),
            "nhlId" => self.nhl_id.into(),
            "gamesPlayed" => self.games_played.into(),
            "gamesStarted" => self.games_started.into(),
            "wins" => self.wins.into(),
            "losses" => self.losses.into(),
            "otLosses" => self.ot_losses.into(),
            "savePercentage" => self.save_percentage.into(),
            "goalsAgainstAvg" => self.goals_against_avg.into(),
            "shutouts" => self.shutouts.into(),
            "saves" => self.saves.into(),
            "shotsAgainst" => self.shots_against.into(),
            "goalsAgainst" => self.goals_against.into(),
            "toi" => self.toi.into(),
            "qualityStarts" => self.quality_starts.into(),
            "qualityStartsPct" => self.quality_starts_pct.into(),
            "goalsSavedAboveAverage" => self.goals_saved_above_average.into(),
            "goalsPrevented" => self.goals_prevented.into(),
            "evSavePercentage" => self.ev_save_percentage.into(),
            "ppSavePercentage" => self.pp_save_percentage.into(),
            "shSavePercentage" => self.sh_save_percentage.into(),
            _ => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_schema_column_is_readable() {
        let skater = SkaterRow {
            full_name: "Auston Matthews".to_string(),
            team_abbreviation: "TOR".to_string(),
            position: "C".to_string(),
            ..Default::default()
        };
        for col in SkaterRow::schema().columns {
            let value = skater.cell(col.id);
            if col.numeric {
                assert!(matches!(value, CellValue::Number(_) | CellValue::Null), "{}", col.id);
            } else {
                assert!(value.as_str().is_some(), "{}", col.id);
            }
        }

        let goalie = GoalieRow::default();
        for col in GoalieRow::schema().columns {
            let value = goalie.cell(col.id);
            if col.numeric {
                assert!(matches!(value, CellValue::Number(_) | CellValue::Null), "{}", col.id);
            } else {
                assert!(value.as_str().is_some(), "{}", col.id);
            }
        }
    }

    #[test]
    fn test_nullable_fields_read_as_null() {
        let goalie = GoalieRow::default();
        assert_eq!(goalie.cell("savePercentage"), CellValue::Null);
        assert_eq!(goalie.cell("wins"), CellValue::Number(0.0));
        assert_eq!(goalie.cell("nope"), CellValue::Null);
    }

    #[test]
    fn test_skater_json_field_names() {
        let json = r#"{
            "id": 1, "nhlId": 8479318, "firstName": "Auston", "lastName": "Matthews",
            "fullName": "Auston Matthews", "position": "C", "headshotUrl": null,
            "teamAbbreviation": "TOR", "teamLogoUrl": null,
            "gamesPlayed": 81, "goals": 69, "assists": 38, "points": 107, "plusMinus": 31, "pim": 20,
            "ppGoals": 12, "ppAssists": 13, "ppPoints": 25, "shGoals": 0, "shAssists": 0, "shPoints": 0,
            "gameWinningGoals": 9, "overtimeGoals": 1, "shots": 368, "shootingPct": 18.75,
            "toi": 1666, "toiPerGame": 1264.2, "evToi": 1000, "ppToi": 200, "shToi": 10,
            "hits": 69, "blocks": 61, "takeaways": 73, "giveaways": 51,
            "faceoffPct": 52.1, "faceoffsWon": 700, "faceoffsLost": 640,
            "corsiForPct": 56.3, "corsiRelPct": 4.2, "fenwickForPct": 55.9,
            "xGoalsForPct": 58.1, "xGoalsDiff": 21.4, "war": 5.2
        }"#;
        let row: SkaterRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.cell("xGoalsForPct"), CellValue::Number(58.1));
        assert_eq!(row.cell("points"), CellValue::Number(107.0));
        assert_eq!(row.cell("teamAbbreviation"), CellValue::Text("TOR"));
    }
}
