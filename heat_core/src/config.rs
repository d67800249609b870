//! Configuration file support for heatsheet.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/heatsheet/config.toml`.
//! The `[schedule]` section describes the meet format: stroke order, age
//! groups and relay squads. The defaults reproduce a summer league meet of
//! 66 events.

use crate::{Error, RelayTeam, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub meet: MeetConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Per-meet settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeetConfig {
    #[serde(default = "default_meet_name")]
    pub name: String,

    #[serde(default = "default_lanes")]
    pub lanes: usize,

    /// Print unoccupied lanes around each heat
    #[serde(default)]
    pub empty_lanes: bool,

    /// Odd event numbers are girls' events
    #[serde(default = "default_true")]
    pub girls_start: bool,

    /// Fixes heat draws and identity suffixes when set
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MeetConfig {
    fn default() -> Self {
        Self {
            name: default_meet_name(),
            lanes: default_lanes(),
            empty_lanes: false,
            girls_start: true,
            seed: None,
        }
    }
}

/// A stroke swum as individual events
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeConfig {
    /// Short code used in entry files ("free")
    pub code: String,
    /// Display name, also accepted in entry files ("freestyle")
    pub name: String,
}

/// An age group: a title label and the lower bound used for bucketing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroup {
    pub label: String,
    pub age: u32,
}

/// Event schedule template
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_true")]
    pub medley_relay: bool,

    #[serde(default = "default_true")]
    pub free_relay: bool,

    #[serde(default = "default_strokes")]
    pub strokes: Vec<StrokeConfig>,

    #[serde(default = "default_age_groups")]
    pub age_groups: Vec<AgeGroup>,

    #[serde(default = "default_relay_age_groups")]
    pub relay_age_groups: Vec<AgeGroup>,

    /// Relay squads in draw order; empty derives them from swimmers' teams
    #[serde(default)]
    pub relay_squads: Vec<RelayTeam>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            medley_relay: true,
            free_relay: true,
            strokes: default_strokes(),
            age_groups: default_age_groups(),
            relay_age_groups: default_relay_age_groups(),
            relay_squads: Vec::new(),
        }
    }
}

/// Output locations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

// Default value functions
fn default_meet_name() -> String {
    "Swim Meet".into()
}

fn default_lanes() -> usize {
    6
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("heat-sheets")
}

fn default_strokes() -> Vec<StrokeConfig> {
    [
        ("free", "freestyle"),
        ("breast", "breaststroke"),
        ("im", "individual medley"),
        ("back", "backstroke"),
        ("fly", "butterfly"),
    ]
    .into_iter()
    .map(|(code, name)| StrokeConfig {
        code: code.into(),
        name: name.into(),
    })
    .collect()
}

fn age_groups(groups: &[(&str, u32)]) -> Vec<AgeGroup> {
    groups
        .iter()
        .map(|(label, age)| AgeGroup {
            label: (*label).into(),
            age: *age,
        })
        .collect()
}

fn default_age_groups() -> Vec<AgeGroup> {
    age_groups(&[
        ("6 & under", 6),
        ("7 & 8", 7),
        ("9 & 10", 9),
        ("11 & 12", 11),
        ("13 & up", 13),
    ])
}

fn default_relay_age_groups() -> Vec<AgeGroup> {
    age_groups(&[("8 & under", 8), ("9 & 10", 9), ("11 & 12", 11), ("13 & up", 13)])
}

impl ScheduleConfig {
    /// Total number of events this template generates
    pub fn event_count(&self) -> usize {
        let relay_formats = usize::from(self.medley_relay) + usize::from(self.free_relay);
        2 * (relay_formats * self.relay_age_groups.len()
            + self.strokes.len() * self.age_groups.len())
    }
}

/// Map an age onto the lower bound of its age group.
///
/// Ages below the first group fall into the first group; otherwise the
/// largest lower bound not above `age` wins.
pub fn effective_age(age: u32, groups: &[AgeGroup]) -> Option<u32> {
    let first = groups.first()?.age;
    Some(
        groups
            .iter()
            .map(|g| g.age)
            .filter(|bound| *bound <= age)
            .max()
            .unwrap_or(first),
    )
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    ///
    /// The file is not validated here; command-line overrides are applied
    /// first and the meet validates the result.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(".config"))
                .unwrap_or_else(|| PathBuf::from(".config"))
        });
        base.join("heatsheet").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check the settings the heat organizer and schedule builder rely on
    pub fn validate(&self) -> Result<()> {
        if self.meet.lanes == 0 {
            return Err(Error::Config("lanes must be at least 1".into()));
        }
        if self.meet.name.trim().is_empty() {
            return Err(Error::Config("meet name must not be empty".into()));
        }
        if self.schedule.strokes.is_empty() {
            return Err(Error::Config("schedule needs at least one stroke".into()));
        }
        check_age_groups("age_groups", &self.schedule.age_groups)?;
        if self.schedule.medley_relay || self.schedule.free_relay {
            check_age_groups("relay_age_groups", &self.schedule.relay_age_groups)?;
        }
        Ok(())
    }
}

fn check_age_groups(key: &str, groups: &[AgeGroup]) -> Result<()> {
    if groups.is_empty() {
        return Err(Error::Config(format!("{} must not be empty", key)));
    }
    if groups.windows(2).any(|pair| pair[0].age >= pair[1].age) {
        return Err(Error::Config(format!(
            "{} must be listed in strictly increasing age order",
            key
        )));
    }
    Ok(())
}
