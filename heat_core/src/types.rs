//! Core domain types for heat sheet generation.
//!
//! This module defines the fundamental types used throughout the system:
//! - Participant identities
//! - Genders and relay kinds
//! - Swimmers, relay teams and the participant union over both

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// Identity
// ============================================================================

/// Opaque participant identity, unique within a meet
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Event classification
// ============================================================================

/// Gender division of an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Girls,
    Boys,
}

impl Gender {
    /// Parse a gender letter from an entry file (`f`, `g`, `w`, `m`, `b`)
    pub fn from_letter(value: &str) -> Option<Self> {
        match value.trim().chars().next()?.to_ascii_lowercase() {
            'f' | 'g' | 'w' => Some(Gender::Girls),
            'm' | 'b' => Some(Gender::Boys),
            _ => None,
        }
    }

    /// Capitalized name for titles ("Girls", "Boys")
    pub fn title(&self) -> &'static str {
        match self {
            Gender::Girls => "Girls",
            Gender::Boys => "Boys",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Girls => f.write_str("girls"),
            Gender::Boys => f.write_str("boys"),
        }
    }
}

/// The two relay formats swum at a meet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayKind {
    Medley,
    Free,
}

impl RelayKind {
    /// Stroke code used for relay events ("medley relay", "free relay")
    pub fn code(&self) -> &'static str {
        match self {
            RelayKind::Medley => "medley relay",
            RelayKind::Free => "free relay",
        }
    }

    /// Display name used in event titles
    pub fn name(&self) -> &'static str {
        match self {
            RelayKind::Medley => "Medley Relay",
            RelayKind::Free => "Free Relay",
        }
    }
}

// ============================================================================
// Participants
// ============================================================================

/// An individual swimmer registered from one entry row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Swimmer {
    pub id: ParticipantId,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: Gender,
    /// Lower-cased team code
    pub team: String,
    /// Lower-cased, trimmed event codes (up to three)
    pub events: Vec<String>,
    pub medley_relay: bool,
    pub free_relay: bool,
}

impl Swimmer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the swimmer entered a stroke, matched by code or display name
    pub fn is_entered_in(&self, code: &str, name: &str) -> bool {
        let code = code.trim().to_lowercase();
        let name = name.trim().to_lowercase();
        self.events.iter().any(|e| *e == code || *e == name)
    }

    /// Whether the swimmer is flagged for a relay format
    pub fn swims_relay(&self, kind: RelayKind) -> bool {
        match kind {
            RelayKind::Medley => self.medley_relay,
            RelayKind::Free => self.free_relay,
        }
    }
}

/// A relay squad entered as a single lane
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayTeam {
    /// Squad name shown in the name column (e.g. "Effingham")
    pub name: String,
    /// Lower-cased team code; doubles as the relay's identity
    #[serde(deserialize_with = "team_code")]
    pub code: String,
}

impl RelayTeam {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: normalize_code(&code.into()),
        }
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

fn team_code<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let code = String::deserialize(deserializer)?;
    Ok(normalize_code(&code))
}

/// Anything that can occupy a lane: an individual swimmer or a relay squad
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Participant {
    Individual(Swimmer),
    Relay(RelayTeam),
}

impl Participant {
    pub fn id(&self) -> ParticipantId {
        match self {
            Participant::Individual(swimmer) => swimmer.id.clone(),
            Participant::Relay(team) => ParticipantId::new(team.code.clone()),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Participant::Individual(swimmer) => swimmer.full_name(),
            Participant::Relay(team) => team.name.clone(),
        }
    }

    /// Team code as printed on the heat sheet
    pub fn team(&self) -> String {
        match self {
            Participant::Individual(swimmer) => swimmer.team.to_uppercase(),
            Participant::Relay(team) => team.code.to_uppercase(),
        }
    }

    /// Age column text; relay squads have none
    pub fn age_display(&self) -> String {
        match self {
            Participant::Individual(swimmer) => swimmer.age.to_string(),
            Participant::Relay(_) => String::new(),
        }
    }
}

impl From<Swimmer> for Participant {
    fn from(swimmer: Swimmer) -> Self {
        Participant::Individual(swimmer)
    }
}

impl From<RelayTeam> for Participant {
    fn from(team: RelayTeam) -> Self {
        Participant::Relay(team)
    }
}
