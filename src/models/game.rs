//! Scheduled/played game model.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TeamCode;

/// Points at the end of the second quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalftimeScore {
    pub home: u32,
    pub away: u32,
}

/// Made field goals split by half.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfSplit {
    pub h1: u32,
    pub h2: u32,
}

impl HalfSplit {
    pub fn total(&self) -> u32 {
        self.h1 + self.h2
    }
}

/// Made field goals per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGoalsMade {
    pub home: HalfSplit,
    pub away: HalfSplit,
}

/// One scheduled or played contest, as returned by the schedule endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Upstream identifier (e.g. "2024_01_BUF_KC"); absent for some sources
    #[serde(default)]
    pub game_id: Option<String>,

    pub home_team: TeamCode,
    pub away_team: TeamCode,

    /// Game date, "YYYY-MM-DD"
    #[serde(default)]
    pub game_date: Option<String>,

    /// Kickoff as "YYYY-MM-DD HH:MM ET" (or date only), Eastern wall time
    #[serde(default)]
    pub kickoff: Option<String>,

    #[serde(default)]
    pub home_score: Option<u32>,

    #[serde(default)]
    pub away_score: Option<u32>,

    #[serde(default)]
    pub season: Option<i32>,

    #[serde(default)]
    pub week: Option<u32>,

    /// Combined venue text ("Arrowhead Stadium, Kansas City, MO")
    #[serde(default)]
    pub venue: Option<String>,

    #[serde(default)]
    pub venue_city: Option<String>,

    #[serde(default)]
    pub venue_country: Option<String>,

    /// Neutral-site game (international series etc.)
    #[serde(default)]
    pub neutral: Option<bool>,

    #[serde(default)]
    pub halftime: Option<HalftimeScore>,

    #[serde(default)]
    pub field_goals: Option<FieldGoalsMade>,
}

/// Canonical identity of a game used for de-duplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameKey(String);

impl GameKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl GameRecord {
    /// Create an unplayed game between two teams on a date.
    pub fn new(home: impl Into<TeamCode>, away: impl Into<TeamCode>, date: &str) -> Self {
        Self {
            game_id: None,
            home_team: home.into(),
            away_team: away.into(),
            game_date: Some(date.to_string()),
            kickoff: None,
            home_score: None,
            away_score: None,
            season: None,
            week: None,
            venue: None,
            venue_city: None,
            venue_country: None,
            neutral: None,
            halftime: None,
            field_goals: None,
        }
    }

    /// Builder method to set the final score.
    pub fn with_score(mut self, home: u32, away: u32) -> Self {
        self.home_score = Some(home);
        self.away_score = Some(away);
        self
    }

    /// Builder method to set the upstream game id.
    pub fn with_game_id(mut self, id: impl Into<String>) -> Self {
        self.game_id = Some(id.into());
        self
    }

    /// Builder method to set the kickoff string.
    pub fn with_kickoff(mut self, kickoff: impl Into<String>) -> Self {
        self.kickoff = Some(kickoff.into());
        self
    }

    /// Builder method to set the halftime score.
    pub fn with_halftime(mut self, home: u32, away: u32) -> Self {
        self.halftime = Some(HalftimeScore { home, away });
        self
    }

    /// Builder method to set made field goals.
    pub fn with_field_goals(mut self, home: HalfSplit, away: HalfSplit) -> Self {
        self.field_goals = Some(FieldGoalsMade { home, away });
        self
    }

    /// A game is finished once both final scores are known.
    pub fn is_finished(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    /// Calendar date of the game: `game_date`, else the date token of `kickoff`.
    pub fn date_str(&self) -> Option<&str> {
        self.game_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .or_else(|| {
                self.kickoff
                    .as_deref()
                    .and_then(|k| k.split_whitespace().next())
            })
    }

    /// Calendar date parsed from [`GameRecord::date_str`].
    pub fn game_day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date_str()?, "%Y-%m-%d").ok()
    }

    /// Whether the game falls inside `season`'s window (see [`season_dates`]).
    pub fn in_season(&self, season: i32) -> bool {
        match (self.game_day(), season_dates(season)) {
            (Some(day), Some((start, end))) => start <= day && day <= end,
            _ => false,
        }
    }

    /// Key derived from date and teams, ignoring `game_id`.
    pub fn synthetic_key(&self) -> GameKey {
        GameKey(format!(
            "{}-{}-{}",
            self.date_str().unwrap_or(""),
            self.home_team,
            self.away_team
        ))
    }

    /// Canonical key: `game_id` when present, otherwise the synthetic key.
    pub fn key(&self) -> GameKey {
        match self.game_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => GameKey(id.to_string()),
            _ => self.synthetic_key(),
        }
    }

    /// Kickoff instant. The source publishes Eastern wall time.
    pub fn kickoff_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.kickoff.as_deref().or(self.game_date.as_deref())?;
        parse_eastern_kickoff(raw)
    }

    pub fn involves(&self, team: &TeamCode) -> bool {
        self.home_team == *team || self.away_team == *team
    }

    pub fn is_home(&self, team: &TeamCode) -> bool {
        self.home_team == *team
    }

    /// The other team, if `team` played in this game.
    pub fn opponent(&self, team: &TeamCode) -> Option<&TeamCode> {
        if self.home_team == *team {
            Some(&self.away_team)
        } else if self.away_team == *team {
            Some(&self.home_team)
        } else {
            None
        }
    }

    /// Final (team points, opponent points) from `team`'s perspective.
    pub fn score_for(&self, team: &TeamCode) -> Option<(u32, u32)> {
        let (home, away) = (self.home_score?, self.away_score?);
        if self.is_home(team) {
            Some((home, away))
        } else if self.away_team == *team {
            Some((away, home))
        } else {
            None
        }
    }

    /// Per-half (team points, opponent points). Second half is final minus halftime.
    pub fn half_scores_for(&self, team: &TeamCode) -> Option<[(u32, u32); 2]> {
        let ht = self.halftime?;
        let (home, away) = (self.home_score?, self.away_score?);
        let home_h2 = home.checked_sub(ht.home)?;
        let away_h2 = away.checked_sub(ht.away)?;
        if self.is_home(team) {
            Some([(ht.home, ht.away), (home_h2, away_h2)])
        } else if self.away_team == *team {
            Some([(ht.away, ht.home), (away_h2, home_h2)])
        } else {
            None
        }
    }

    /// Made field goals for `team`.
    pub fn field_goals_for(&self, team: &TeamCode) -> Option<HalfSplit> {
        let fg = self.field_goals?;
        if self.is_home(team) {
            Some(fg.home)
        } else if self.away_team == *team {
            Some(fg.away)
        } else {
            None
        }
    }
}

/// First and last calendar day of a season: regular season plus playoffs,
/// August 1 to February 15 of the following year.
pub fn season_dates(season: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(season, 8, 1)?,
        NaiveDate::from_ymd_opt(season + 1, 2, 15)?,
    ))
}

/// Parse "YYYY-MM-DD HH:MM ET" (or a bare date) as America/New_York wall time.
pub fn parse_eastern_kickoff(raw: &str) -> Option<DateTime<Utc>> {
    let cleaned = raw.replace("ET", "");
    let mut parts = cleaned.split_whitespace();
    let date = NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    let time = match parts.next() {
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
            .ok()?,
        None => NaiveTime::MIN,
    };
    let local = NaiveDateTime::new(date, time);
    New_York
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
