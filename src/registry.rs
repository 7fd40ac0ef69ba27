/// Column registries for the two stat table kinds.
///
/// Each registry is a statically built `TableSchema`: column definitions in
/// display order, the groups that partition them, and the presets composed
/// from those groups.
use crate::column::{CellFormat, ColumnDef, ColumnGroup, ColumnPreset, TableSchema};

/// Placeholder team abbreviation for players without a current team.
pub const UNKNOWN_TEAM: &str = "\u{2014}";

const SKATER_COLUMNS: &[ColumnDef] = &[
    // Bio
    ColumnDef::text("fullName", "Player", 180).sticky_at(0),
    ColumnDef::text("teamAbbreviation", "Team", 60).sticky_at(180),
    ColumnDef::text("position", "Pos", 50),
    ColumnDef::number("gamesPlayed", "GP", 50),
    // Scoring
    ColumnDef::number("goals", "G", 50).ranked(),
    ColumnDef::number("assists", "A", 50).ranked(),
    ColumnDef::number("points", "P", 50).ranked(),
    ColumnDef::number("plusMinus", "+/-", 50).ranked().formatted(CellFormat::Signed),
    ColumnDef::number("pim", "PIM", 50),
    ColumnDef::number("gameWinningGoals", "GWG", 55),
    ColumnDef::number("overtimeGoals", "OTG", 55),
    // Power play / shorthanded
    ColumnDef::number("ppGoals", "PPG", 55).ranked(),
    ColumnDef::number("ppAssists", "PPA", 55),
    ColumnDef::number("ppPoints", "PPP", 55).ranked(),
    ColumnDef::number("shGoals", "SHG", 55),
    ColumnDef::number("shAssists", "SHA", 55),
    ColumnDef::number("shPoints", "SHP", 55),
    // Shooting
    ColumnDef::number("shots", "S", 55).ranked(),
    ColumnDef::number("shootingPct", "S%", 55).ranked().formatted(CellFormat::Percent),
    // Ice time
    ColumnDef::number("toiPerGame", "TOI/GP", 70).ranked().formatted(CellFormat::Time),
    ColumnDef::number("evToi", "EV TOI", 70).formatted(CellFormat::Time),
    ColumnDef::number("ppToi", "PP TOI", 70).formatted(CellFormat::Time),
    ColumnDef::number("shToi", "SH TOI", 70).formatted(CellFormat::Time),
    // Physical
    ColumnDef::number("hits", "HIT", 55).ranked(),
    ColumnDef::number("blocks", "BLK", 55).ranked(),
    ColumnDef::number("takeaways", "TK", 55),
    ColumnDef::number("giveaways", "GV", 55),
    // Faceoffs
    ColumnDef::number("faceoffPct", "FO%", 55).ranked().formatted(CellFormat::Percent),
    ColumnDef::number("faceoffsWon", "FOW", 55),
    ColumnDef::number("faceoffsLost", "FOL", 55),
    // Advanced
    ColumnDef::number("corsiForPct", "CF%", 55).ranked().formatted(CellFormat::Percent),
    ColumnDef::number("corsiRelPct", "CF% Rel", 65).ranked().formatted(CellFormat::Decimal(1)),
    ColumnDef::number("fenwickForPct", "FF%", 55).formatted(CellFormat::Percent),
    ColumnDef::number("xGoalsForPct", "xGF%", 60).ranked().formatted(CellFormat::Percent),
    ColumnDef::number("xGoalsDiff", "xG+/-", 60).ranked().formatted(CellFormat::Decimal(1)),
    ColumnDef::number("war", "WAR", 55).ranked().formatted(CellFormat::Decimal(1)),
];

const SKATER_GROUPS: &[ColumnGroup] = &[
    ColumnGroup {
        id: "bio",
        label: "Bio",
        columns: &["fullName", "teamAbbreviation", "position", "gamesPlayed"],
        default_visible: true,
    },
    ColumnGroup {
        id: "scoring",
        label: "Scoring",
        columns: &["goals", "assists", "points", "plusMinus", "pim", "gameWinningGoals", "overtimeGoals"],
        default_visible: true,
    },
    ColumnGroup {
        id: "powerplay",
        label: "Power Play / SH",
        columns: &["ppGoals", "ppAssists", "ppPoints", "shGoals", "shAssists", "shPoints"],
        default_visible: false,
    },
    ColumnGroup {
        id: "shooting",
        label: "Shooting",
        columns: &["shots", "shootingPct"],
        default_visible: true,
    },
    ColumnGroup {
        id: "icetime",
        label: "Ice Time",
        columns: &["toiPerGame", "evToi", "ppToi", "shToi"],
        default_visible: false,
    },
    ColumnGroup {
        id: "physical",
        label: "Physical",
        columns: &["hits", "blocks", "takeaways", "giveaways"],
        default_visible: false,
    },
    ColumnGroup {
        id: "faceoffs",
        label: "Faceoffs",
        columns: &["faceoffPct", "faceoffsWon", "faceoffsLost"],
        default_visible: false,
    },
    ColumnGroup {
        id: "advanced",
        label: "Advanced",
        columns: &["corsiForPct", "corsiRelPct", "fenwickForPct", "xGoalsForPct", "xGoalsDiff", "war"],
        default_visible: false,
    },
];

const SKATER_PRESETS: &[ColumnPreset] = &[
    ColumnPreset { id: "standard", label: "Standard", groups: &["bio", "scoring", "shooting"] },
    ColumnPreset { id: "advanced", label: "Advanced", groups: &["bio", "advanced"] },
    ColumnPreset { id: "physical", label: "Physical", groups: &["bio", "physical", "faceoffs"] },
    ColumnPreset {
        id: "all",
        label: "All",
        groups: &["bio", "scoring", "powerplay", "shooting", "icetime", "physical", "faceoffs", "advanced"],
    },
];

pub static SKATER_SCHEMA: TableSchema = TableSchema {
    kind: "skater",
    columns: SKATER_COLUMNS,
    groups: SKATER_GROUPS,
    presets: SKATER_PRESETS,
    positions: &["C", "LW", "RW", "D"],
    player_column: "fullName",
    team_column: "teamAbbreviation",
    position_column: Some("position"),
    games_played_column: "gamesPlayed",
};

const GOALIE_COLUMNS: &[ColumnDef] = &[
    // Bio
    ColumnDef::text("fullName", "Player", 180).sticky_at(0),
    ColumnDef::text("teamAbbreviation", "Team", 60).sticky_at(180),
    ColumnDef::number("gamesPlayed", "GP", 50),
    ColumnDef::number("gamesStarted", "GS", 50),
    // Record
    ColumnDef::number("wins", "W", 50).ranked(),
    ColumnDef::number("losses", "L", 50),
    ColumnDef::number("otLosses", "OTL", 55),
    // Core
    ColumnDef::number("savePercentage", "SV%", 65).ranked().formatted(CellFormat::SavePercentage),
    ColumnDef::number("goalsAgainstAvg", "GAA", 60).inverted().formatted(CellFormat::Decimal(2)),
    ColumnDef::number("shutouts", "SO", 50).ranked(),
    ColumnDef::number("saves", "SV", 60),
    ColumnDef::number("shotsAgainst", "SA", 60),
    ColumnDef::number("goalsAgainst", "GA", 55),
    // Advanced
    ColumnDef::number("qualityStarts", "QS", 50).ranked(),
    ColumnDef::number("qualityStartsPct", "QS%", 55).ranked().formatted(CellFormat::Percent),
    ColumnDef::number("goalsSavedAboveAverage", "GSAA", 65).ranked().formatted(CellFormat::Decimal(1)),
    ColumnDef::number("goalsPrevented", "GSAx", 65).ranked().formatted(CellFormat::Decimal(1)),
    // Situational
    ColumnDef::number("evSavePercentage", "EV SV%", 70).ranked().formatted(CellFormat::SavePercentage),
    ColumnDef::number("ppSavePercentage", "PP SV%", 70).formatted(CellFormat::SavePercentage),
    ColumnDef::number("shSavePercentage", "SH SV%", 70).formatted(CellFormat::SavePercentage),
];

const GOALIE_GROUPS: &[ColumnGroup] = &[
    ColumnGroup {
        id: "bio",
        label: "Bio",
        columns: &["fullName", "teamAbbreviation", "gamesPlayed", "gamesStarted"],
        default_visible: true,
    },
    ColumnGroup {
        id: "record",
        label: "Record",
        columns: &["wins", "losses", "otLosses"],
        default_visible: true,
    },
    ColumnGroup {
        id: "core",
        label: "Core",
        columns: &["savePercentage", "goalsAgainstAvg", "shutouts", "saves", "shotsAgainst", "goalsAgainst"],
        default_visible: true,
    },
    ColumnGroup {
        id: "advanced",
        label: "Advanced",
        columns: &["qualityStarts", "qualityStartsPct", "goalsSavedAboveAverage", "goalsPrevented"],
        default_visible: false,
    },
    ColumnGroup {
        id: "situational",
        label: "Situational",
        columns: &["evSavePercentage", "ppSavePercentage", "shSavePercentage"],
        default_visible: false,
    },
];

const GOALIE_PRESETS: &[ColumnPreset] = &[
    ColumnPreset { id: "standard", label: "Standard", groups: &["bio", "record", "core"] },
    ColumnPreset { id: "advanced", label: "Advanced", groups: &["bio", "record", "advanced"] },
    ColumnPreset {
        id: "all",
        label: "All",
        groups: &["bio", "record", "core", "advanced", "situational"],
    },
];

pub static GOALIE_SCHEMA: TableSchema = TableSchema {
    kind: "goalie",
    columns: GOALIE_COLUMNS,
    groups: GOALIE_GROUPS,
    presets: GOALIE_PRESETS,
    positions: &[],
    player_column: "fullName",
    team_column: "teamAbbreviation",
    position_column: None,
    games_played_column: "gamesPlayed",
};
