/// Built-in sample rows.
///
/// Served in development when the configured row source fails, so the table
/// still has something to show.
use crate::rows::{GoalieRow, SkaterRow};

struct SkaterLine {
    id: i32,
    nhl_id: i32,
    first: &'static str,
    last: &'static str,
    position: &'static str,
    team: &'static str,
    goals: i32,
    assists: i32,
    points: i32,
    shots: i32,
    shooting_pct: f64,
    toi_per_game: f64,
    war: f64,
}

const SKATERS: [SkaterLine; 8] = [
    SkaterLine { id: 101, nhl_id: 8478402, first: "Connor", last: "McDavid", position: "C", team: "EDM", goals: 43, assists: 86, points: 129, shots: 304, shooting_pct: 14.1, toi_per_game: 1310.0, war: 4.9 },
    SkaterLine { id: 102, nhl_id: 8478400, first: "Nathan", last: "MacKinnon", position: "C", team: "COL", goals: 48, assists: 71, points: 119, shots: 396, shooting_pct: 12.1, toi_per_game: 1360.0, war: 4.8 },
    SkaterLine { id: 103, nhl_id: 8477956, first: "Auston", last: "Matthews", position: "C", team: "TOR", goals: 56, assists: 41, points: 97, shots: 356, shooting_pct: 15.7, toi_per_game: 1272.0, war: 4.1 },
    SkaterLine { id: 104, nhl_id: 8477492, first: "Nikita", last: "Kucherov", position: "RW", team: "TBL", goals: 39, assists: 82, points: 121, shots: 267, shooting_pct: 14.6, toi_per_game: 1295.0, war: 4.5 },
    SkaterLine { id: 105, nhl_id: 8480800, first: "Cale", last: "Makar", position: "D", team: "COL", goals: 24, assists: 64, points: 88, shots: 248, shooting_pct: 9.7, toi_per_game: 1530.0, war: 4.2 },
    SkaterLine { id: 106, nhl_id: 8478403, first: "Leon", last: "Draisaitl", position: "C", team: "EDM", goals: 44, assists: 58, points: 102, shots: 244, shooting_pct: 18.0, toi_per_game: 1290.0, war: 3.8 },
    SkaterLine { id: 107, nhl_id: 8479323, first: "Quinn", last: "Hughes", position: "D", team: "VAN", goals: 17, assists: 69, points: 86, shots: 211, shooting_pct: 8.1, toi_per_game: 1510.0, war: 3.9 },
    SkaterLine { id: 108, nhl_id: 8476468, first: "Artemi", last: "Panarin", position: "LW", team: "NYR", goals: 41, assists: 63, points: 104, shots: 252, shooting_pct: 16.3, toi_per_game: 1214.0, war: 3.4 },
];

struct GoalieLine {
    id: i32,
    nhl_id: i32,
    first: &'static str,
    last: &'static str,
    team: &'static str,
    wins: i32,
    save_percentage: f64,
    goals_against_avg: f64,
}

const GOALIES: [GoalieLine; 4] = [
    GoalieLine { id: 201, nhl_id: 8478409, first: "Connor", last: "Hellebuyck", team: "WPG", wins: 39, save_percentage: 0.924, goals_against_avg: 2.15 },
    GoalieLine { id: 202, nhl_id: 8479310, first: "Igor", last: "Shesterkin", team: "NYR", wins: 36, save_percentage: 0.921, goals_against_avg: 2.28 },
    GoalieLine { id: 203, nhl_id: 8479338, first: "Jake", last: "Oettinger", team: "DAL", wins: 35, save_percentage: 0.916, goals_against_avg: 2.37 },
    GoalieLine { id: 204, nhl_id: 8475883, first: "Andrei", last: "Vasilevskiy", team: "TBL", wins: 33, save_percentage: 0.918, goals_against_avg: 2.41 },
];

// Share of per-game ice time spent at even strength, on the power play and shorthanded
fn situational_toi(toi_per_game: f64, share: f64) -> i32 {
    (toi_per_game * share).round() as i32 * 82
}

fn skater(line: &SkaterLine) -> SkaterRow {
    SkaterRow {
        id: line.id,
        nhl_id: line.nhl_id,
        first_name: line.first.to_string(),
        last_name: line.last.to_string(),
        full_name: format!("{} {}", line.first, line.last),
        position: line.position.to_string(),
        headshot_url: None,
        team_abbreviation: line.team.to_string(),
        team_logo_url: None,
        games_played: 82,
        goals: line.goals,
        assists: line.assists,
        points: line.points,
        plus_minus: 12,
        pim: 24,
        pp_goals: 10,
        pp_assists: 18,
        pp_points: 28,
        sh_goals: 1,
        sh_assists: 1,
        sh_points: 2,
        game_winning_goals: 8,
        overtime_goals: 2,
        shots: line.shots,
        shooting_pct: Some(line.shooting_pct),
        toi: (line.toi_per_game * 82.0) as i32,
        toi_per_game: Some(line.toi_per_game),
        ev_toi: situational_toi(line.toi_per_game, 0.7),
        pp_toi: situational_toi(line.toi_per_game, 0.2),
        sh_toi: situational_toi(line.toi_per_game, 0.1),
        hits: 60,
        blocks: 50,
        takeaways: 30,
        giveaways: 33,
        faceoff_pct: Some(51.0),
        faceoffs_won: 700,
        faceoffs_lost: 670,
        corsi_for_pct: Some(53.0),
        corsi_rel_pct: Some(1.2),
        fenwick_for_pct: Some(52.0),
        x_goals_for_pct: Some(54.0),
        x_goals_diff: Some(9.0),
        war: Some(line.war),
    }
}

fn goalie(line: &GoalieLine) -> GoalieRow {
    GoalieRow {
        id: line.id,
        nhl_id: line.nhl_id,
        first_name: line.first.to_string(),
        last_name: line.last.to_string(),
        full_name: format!("{} {}", line.first, line.last),
        headshot_url: None,
        team_abbreviation: line.team.to_string(),
        team_logo_url: None,
        games_played: 54,
        games_started: 52,
        wins: line.wins,
        losses: 17,
        ot_losses: 5,
        save_percentage: Some(line.save_percentage),
        goals_against_avg: Some(line.goals_against_avg),
        shutouts: 4,
        saves: 1420,
        shots_against: 1550,
        goals_against: 130,
        toi: 177000,
        quality_starts: Some(33.0),
        quality_starts_pct: Some(0.63),
        goals_saved_above_average: Some(9.5),
        goals_prevented: Some(6.1),
        ev_save_percentage: Some(0.919),
        pp_save_percentage: Some(0.878),
        sh_save_percentage: Some(0.904),
    }
}

pub fn mock_skater_rows() -> Vec<SkaterRow> {
    SKATERS.iter().map(skater).collect()
}

pub fn mock_goalie_rows() -> Vec<GoalieRow> {
    GOALIES.iter().map(goalie).collect()
}
