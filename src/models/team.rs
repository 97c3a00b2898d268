//! Team codes and league membership (conference/division).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A short uppercase team identifier (e.g. "KC").
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TeamCode(String);

impl TeamCode {
    /// Create a team code, trimming whitespace and uppercasing.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map a historical alias to the current franchise code.
    pub fn resolve_alias(&self) -> TeamCode {
        match resolve_alias(&self.0) {
            Some(current) => TeamCode(current.to_string()),
            None => self.clone(),
        }
    }

    /// Division of this team, after alias resolution.
    pub fn division(&self) -> Option<Division> {
        division_of(self)
    }

    /// Conference of this team, after alias resolution.
    pub fn conference(&self) -> Option<Conference> {
        self.division().map(|d| d.conference)
    }
}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TeamCode({})", self.0)
    }
}

impl From<String> for TeamCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for TeamCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<TeamCode> for String {
    fn from(code: TeamCode) -> Self {
        code.0
    }
}

/// League conference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Conference {
    #[serde(rename = "AFC")]
    Afc,
    #[serde(rename = "NFC")]
    Nfc,
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conference::Afc => write!(f, "AFC"),
            Conference::Nfc => write!(f, "NFC"),
        }
    }
}

impl FromStr for Conference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AFC" => Ok(Conference::Afc),
            "NFC" => Ok(Conference::Nfc),
            other => Err(format!("unknown conference: {}", other)),
        }
    }
}

/// Geographic region inside a conference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    East,
    North,
    South,
    West,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::East => write!(f, "East"),
            Region::North => write!(f, "North"),
            Region::South => write!(f, "South"),
            Region::West => write!(f, "West"),
        }
    }
}

/// A division such as "AFC East".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Division {
    pub conference: Conference,
    pub region: Region,
}

impl Division {
    pub const fn new(conference: Conference, region: Region) -> Self {
        Self { conference, region }
    }

    /// All eight divisions in display order.
    pub fn all() -> [Division; 8] {
        use Conference::*;
        use Region::*;
        [
            Division::new(Afc, East),
            Division::new(Afc, North),
            Division::new(Afc, South),
            Division::new(Afc, West),
            Division::new(Nfc, East),
            Division::new(Nfc, North),
            Division::new(Nfc, South),
            Division::new(Nfc, West),
        ]
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.conference, self.region)
    }
}

impl FromStr for Division {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(conf), Some(region), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("unknown division: {}", s));
        };
        let conference: Conference = conf.parse()?;
        let region = match region.to_ascii_lowercase().as_str() {
            "east" => Region::East,
            "north" => Region::North,
            "south" => Region::South,
            "west" => Region::West,
            _ => return Err(format!("unknown division: {}", s)),
        };
        Ok(Division::new(conference, region))
    }
}

impl TryFrom<String> for Division {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Division> for String {
    fn from(d: Division) -> Self {
        d.to_string()
    }
}

/// Current franchise codes, grouped by division.
pub const LEAGUE_TEAMS: [&str; 32] = [
    "BUF", "MIA", "NE", "NYJ", // AFC East
    "BAL", "CIN", "CLE", "PIT", // AFC North
    "HOU", "IND", "JAX", "TEN", // AFC South
    "DEN", "KC", "LV", "LAC", // AFC West
    "DAL", "NYG", "PHI", "WAS", // NFC East
    "CHI", "DET", "GB", "MIN", // NFC North
    "ATL", "CAR", "NO", "TB", // NFC South
    "ARI", "LA", "SEA", "SF", // NFC West
];

/// All current league teams as codes.
pub fn league_teams() -> Vec<TeamCode> {
    LEAGUE_TEAMS.iter().map(|t| TeamCode::new(t)).collect()
}

/// Historical codes still seen in older schedule data.
pub fn resolve_alias(code: &str) -> Option<&'static str> {
    match code {
        "LAR" | "STL" => Some("LA"),
        "OAK" => Some("LV"),
        "SD" => Some("LAC"),
        "WSH" => Some("WAS"),
        "JAC" => Some("JAX"),
        _ => None,
    }
}

/// Look up the division of a team.
pub fn division_of(team: &TeamCode) -> Option<Division> {
    let canonical = team.resolve_alias();
    let idx = LEAGUE_TEAMS.iter().position(|t| *t == canonical.as_str())?;
    Division::all().get(idx / 4).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_code_normalizes() {
        assert_eq!(TeamCode::new(" kc ").as_str(), "KC");
        assert_eq!(TeamCode::from("buf"), TeamCode::new("BUF"));
    }

    #[test]
    fn test_team_code_deserializes_normalized() {
        let code: TeamCode = serde_json::from_str("\"sf\"").unwrap();
        assert_eq!(code.as_str(), "SF");
    }

    #[test]
    fn test_division_lookup() {
        assert_eq!(
            TeamCode::new("KC").division(),
            Some(Division::new(Conference::Afc, Region::West))
        );
        assert_eq!(
            TeamCode::new("GB").division().map(|d| d.to_string()),
            Some("NFC North".to_string())
        );
        assert_eq!(TeamCode::new("XYZ").division(), None);
    }

    #[test]
    fn test_alias_resolution() {
        assert_eq!(TeamCode::new("LAR").resolve_alias().as_str(), "LA");
        assert_eq!(TeamCode::new("OAK").conference(), Some(Conference::Afc));
        assert_eq!(TeamCode::new("KC").resolve_alias().as_str(), "KC");
    }

    #[test]
    fn test_division_parse_round_trip() {
        for division in Division::all() {
            let parsed: Division = division.to_string().parse().unwrap();
            assert_eq!(parsed, division);
        }
        assert_eq!(
            "nfc south".parse::<Division>(),
            Ok(Division::new(Conference::Nfc, Region::South))
        );
        assert!("AFC Central".parse::<Division>().is_err());
        assert!("AFC".parse::<Division>().is_err());
    }

    #[test]
    fn test_conference_parse() {
        assert_eq!("afc".parse::<Conference>(), Ok(Conference::Afc));
        assert!("XFL".parse::<Conference>().is_err());
    }

    #[test]
    fn test_every_team_has_a_division() {
        let teams = league_teams();
        assert_eq!(teams.len(), 32);
        for team in &teams {
            assert!(team.division().is_some(), "{} has no division", team);
        }
        for division in Division::all() {
            let members = teams.iter().filter(|t| t.division() == Some(division)).count();
            assert_eq!(members, 4);
        }
    }
}
