pub const DATE: &str = "Date";
pub const HOME_TEAM: &str = "HomeTeam";
pub const AWAY_TEAM: &str = "AwayTeam";
pub const HOME_GOALS: &str = "FTHG";
pub const AWAY_GOALS: &str = "FTAG";
pub const RESULT_CODE: &str = "FTR";
pub const SEASON: &str = "season";

pub const REQUIRED: [&str; 6] = [DATE, HOME_TEAM, AWAY_TEAM, HOME_GOALS, AWAY_GOALS, RESULT_CODE];
pub const SCORES: [&str; 2] = [HOME_GOALS, AWAY_GOALS];
pub const TEAMS: [&str; 2] = [HOME_TEAM, AWAY_TEAM];
// A row missing any of these after score back-fill cannot be used.
pub const CRITICAL: [&str; 4] = [DATE, HOME_TEAM, AWAY_TEAM, RESULT_CODE];
pub const FIXTURE_KEY: [&str; 3] = [DATE, HOME_TEAM, AWAY_TEAM];

pub const TOTAL_GOALS: &str = "total_goals";
pub const GOAL_DIFFERENCE: &str = "goal_difference";
pub const DAY: &str = "day";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const IS_WEEKEND: &str = "is_weekend";
pub const RESULT: &str = "result";
pub const IS_HOME: &str = "is_home";
pub const IS_AWAY: &str = "is_away";
pub const IS_HIGH_SCORING: &str = "is_high_scoring";
pub const IS_LOW_SCORING: &str = "is_low_scoring";
pub const IS_CLOSE_MATCH: &str = "is_close_match";

pub const DERIVED: [&str; 12] = [
    TOTAL_GOALS,
    GOAL_DIFFERENCE,
    DAY,
    YEAR,
    MONTH,
    IS_WEEKEND,
    RESULT,
    IS_HOME,
    IS_AWAY,
    IS_HIGH_SCORING,
    IS_LOW_SCORING,
    IS_CLOSE_MATCH,
];
