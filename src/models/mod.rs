use serde::{Deserialize, Serialize};

/// A player row joined with their current team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub height_in_inches: Option<i64>,
    pub height_in_centimeters: Option<i64>,
    pub weight_in_pounds: Option<i64>,
    pub weight_in_kilograms: Option<i64>,
    pub birth_date: Option<String>,
    pub birth_country: Option<String>,
    pub shoots_catches: Option<String>,
    pub sweater_number: Option<i64>,
    pub is_active: bool,
    #[serde(rename = "currentTeamID")]
    pub current_team_id: Option<i64>,
    pub current_team_abbrev: Option<String>,
    pub team_logo: Option<String>,
}

impl Player {
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => String::new(),
        }
    }

    pub fn format(&self) -> String {
        format!(
            "#{} {} ({}) - {} - {} lb - {} - {}",
            self.sweater_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "--".to_string()),
            self.full_name(),
            self.current_team_abbrev.as_deref().unwrap_or("no team"),
            self.shoots_catches.as_deref().unwrap_or("?"),
            self.weight_in_pounds
                .map(|w| w.to_string())
                .unwrap_or_else(|| "?".to_string()),
            self.birth_country.as_deref().unwrap_or("?"),
            if self.is_active { "active" } else { "inactive" },
        )
    }
}

/// Single-player view, which also names the current team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    #[serde(flatten)]
    pub player: Player,
    pub current_team_name: Option<String>,
}

/// A game in the listing, with display-formatted season, date, time and type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub season: String,
    #[serde(rename = "gameDate")]
    pub game_date: String,
    #[serde(rename = "easternStartTime")]
    pub eastern_start_time: String,
    #[serde(rename = "gameType")]
    pub game_type: String,
    #[serde(rename = "gameNumber")]
    pub game_number: Option<i64>,
    #[serde(rename = "homeScore")]
    pub home_score: Option<i64>,
    #[serde(rename = "awayScore")]
    pub away_score: Option<i64>,
    pub home_team_id: i64,
    pub home_team_name: Option<String>,
    pub away_team_id: i64,
    pub away_team_name: Option<String>,
}

impl Game {
    pub fn format(&self) -> String {
        format!(
            "[{}] {} {} {} {} - {} {} @ {} {}",
            self.id,
            self.season,
            self.game_type,
            self.game_date,
            self.eastern_start_time,
            self.away_team_name.as_deref().unwrap_or("?"),
            score(self.away_score),
            self.home_team_name.as_deref().unwrap_or("?"),
            score(self.home_score),
        )
    }
}

/// Single-game view with the stored (unformatted) values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetail {
    pub id: i64,
    pub season: Option<String>,
    #[serde(rename = "gameDate")]
    pub game_date: Option<String>,
    #[serde(rename = "easternStartTime")]
    pub eastern_start_time: Option<String>,
    #[serde(rename = "gameType")]
    pub game_type: Option<i64>,
    #[serde(rename = "gameNumber")]
    pub game_number: Option<i64>,
    #[serde(rename = "homeScore")]
    pub home_score: Option<i64>,
    #[serde(rename = "awayScore")]
    pub away_score: Option<i64>,
    pub home_team_id: i64,
    pub home_team_name: Option<String>,
    pub home_team_tricode: Option<String>,
    pub home_team_logo: Option<String>,
    pub away_team_id: i64,
    pub away_team_name: Option<String>,
    pub away_team_tricode: Option<String>,
    pub away_team_logo: Option<String>,
}

impl GameDetail {
    pub fn format(&self) -> String {
        format!(
            "[{}] {} {} {} - {} {} @ {} {}",
            self.id,
            self.season.as_deref().unwrap_or("?"),
            self.game_date.as_deref().unwrap_or("?"),
            self.eastern_start_time.as_deref().unwrap_or("?"),
            self.away_team_tricode.as_deref().unwrap_or("?"),
            score(self.away_score),
            self.home_team_tricode.as_deref().unwrap_or("?"),
            score(self.home_score),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub full_name: Option<String>,
    pub tri_code: Option<String>,
    pub team_logo: Option<String>,
}

impl Team {
    pub fn format(&self) -> String {
        format!(
            "{} {} ({})",
            self.tri_code.as_deref().unwrap_or("---"),
            self.full_name.as_deref().unwrap_or("?"),
            self.id
        )
    }
}

fn score(value: Option<i64>) -> String {
    value.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
}
