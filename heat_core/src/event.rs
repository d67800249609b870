//! Event model.
//!
//! An event holds the entries for one race on the program, derives its
//! gender and distance from the event number and age group, and renders its
//! heats as fixed-width text.

use crate::config::{AgeGroup, MeetConfig, StrokeConfig};
use crate::heats::organize;
use crate::import::title_case;
use crate::{Gender, Participant, ParticipantId, RelayKind, Result};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Width of the rule lines in the text layout
const CELL_WIDTH: usize = 49;

/// Width of the name column
const NAME_WIDTH: usize = 20;

/// Seed time printed for every entry; no times are tracked yet
const NO_TIME: &str = "NT";

/// Open/bold markers understood by the PDF renderer
pub const BOLD_OPEN: &str = "<b>";
pub const BOLD_CLOSE: &str = "</b>";

/// Gender and distance derived for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventAttributes {
    pub gender: Gender,
    /// Distance in yards
    pub distance: u32,
}

/// Derive gender and distance for an event.
///
/// Odd event numbers are girls' events when `girls_start` is set, even ones
/// otherwise. Individual distances: individual medley 100, ages 9 and up 50,
/// younger 25. Relays: under 9 swim 100, everyone else 200.
pub fn derive_attributes(
    event_number: u32,
    age: u32,
    stroke: &str,
    is_relay: bool,
    girls_start: bool,
) -> EventAttributes {
    let odd = event_number % 2 == 1;
    let gender = if odd == girls_start {
        Gender::Girls
    } else {
        Gender::Boys
    };

    let distance = if is_relay {
        if age < 9 {
            100
        } else {
            200
        }
    } else {
        let stroke = stroke.trim().to_lowercase();
        if stroke == "im" || stroke == "individual medley" {
            100
        } else if age >= 9 {
            50
        } else {
            25
        }
    };

    EventAttributes { gender, distance }
}

/// First lane of a heat of `heat_size` centered in a pool of `lane_count` lanes
///
/// Never below lane 1, even for a heat wider than the pool.
pub fn start_lane(heat_size: usize, lane_count: usize) -> usize {
    let middle_lane = (lane_count + 1) / 2;
    middle_lane.saturating_sub(heat_size.saturating_sub(1) / 2).max(1)
}

/// Lane settings shared by every event of a meet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventOptions {
    pub lanes: usize,
    pub empty_lanes: bool,
    pub girls_start: bool,
}

impl From<&MeetConfig> for EventOptions {
    fn from(meet: &MeetConfig) -> Self {
        Self {
            lanes: meet.lanes,
            empty_lanes: meet.empty_lanes,
            girls_start: meet.girls_start,
        }
    }
}

/// One event on the program
#[derive(Clone, Debug)]
pub struct Event {
    pub number: u32,
    /// Lower bound of the age group
    pub age: u32,
    pub age_group: String,
    pub stroke_code: String,
    pub stroke_name: String,
    pub relay: Option<RelayKind>,
    pub gender: Gender,
    pub distance: u32,
    lanes: usize,
    empty_lanes: bool,
    participants: HashMap<ParticipantId, Participant>,
    order: Vec<ParticipantId>,
}

/// Serializable one-line view of an event
#[derive(Clone, Debug, Serialize)]
pub struct EventSummary {
    pub number: u32,
    pub title: String,
    pub gender: Gender,
    pub age_group: String,
    pub distance: u32,
    pub stroke: String,
    pub relay: bool,
    pub entries: usize,
}

impl Event {
    /// Create an individual event for a stroke and age group
    pub fn individual(number: u32, group: &AgeGroup, stroke: &StrokeConfig, options: EventOptions) -> Self {
        Self::build(
            number,
            group,
            stroke.code.trim().to_lowercase(),
            stroke.name.trim().to_lowercase(),
            None,
            options,
        )
    }

    /// Create a relay event for an age group
    pub fn relay(number: u32, group: &AgeGroup, kind: RelayKind, options: EventOptions) -> Self {
        Self::build(
            number,
            group,
            kind.code().into(),
            kind.name().to_lowercase(),
            Some(kind),
            options,
        )
    }

    fn build(
        number: u32,
        group: &AgeGroup,
        stroke_code: String,
        stroke_name: String,
        relay: Option<RelayKind>,
        options: EventOptions,
    ) -> Self {
        let attributes =
            derive_attributes(number, group.age, &stroke_code, relay.is_some(), options.girls_start);
        Self {
            number,
            age: group.age,
            age_group: group.label.clone(),
            stroke_code,
            stroke_name,
            relay,
            gender: attributes.gender,
            distance: attributes.distance,
            lanes: options.lanes,
            empty_lanes: options.empty_lanes,
            participants: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn is_relay(&self) -> bool {
        self.relay.is_some()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.participants.contains_key(id)
    }

    /// Add an entry. Returns `false` without changing the event when the
    /// identity is already entered.
    pub fn add_participant(&mut self, participant: Participant) -> bool {
        let id = participant.id();
        if self.contains(&id) {
            tracing::debug!("{} already entered in event {}", id, self.number);
            return false;
        }
        self.order.push(id.clone());
        self.participants.insert(id, participant);
        true
    }

    /// Entries in registration order
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.order.iter().filter_map(|id| self.participants.get(id))
    }

    /// Stroke as shown in titles ("Freestyle", "Medley Relay")
    pub fn stroke_title(&self) -> String {
        match self.relay {
            Some(kind) => kind.name().to_string(),
            None => title_case(&self.stroke_name),
        }
    }

    /// Title line without markup
    pub fn title(&self) -> String {
        format!(
            "Event {} - {} {} {} Yard {}",
            self.number,
            self.gender.title(),
            title_case(&self.age_group),
            self.distance,
            self.stroke_title()
        )
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary {
            number: self.number,
            title: self.title(),
            gender: self.gender,
            age_group: self.age_group.clone(),
            distance: self.distance,
            stroke: self.stroke_title(),
            relay: self.is_relay(),
            entries: self.len(),
        }
    }

    /// Draw heats for this event. Every call draws afresh.
    pub fn heats<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Vec<&Participant>>> {
        organize(self.participants().collect(), self.lanes, self.is_relay(), rng)
    }

    /// Draw heats and lay them out as heat sheet text
    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        let heats = self.heats(rng)?;
        let rule = "-".repeat(CELL_WIDTH);

        let mut lines = vec![
            bold(&self.title()),
            rule.clone(),
            bold(&format!(
                "{:4} {:w$} {:3} {:8} {:9}",
                "Lane",
                "Name",
                "Age",
                "Team",
                "Seed Time",
                w = NAME_WIDTH
            )),
            rule,
        ];

        let heat_count = heats.len();
        for (index, heat) in heats.iter().enumerate() {
            lines.push(bold(&format!("Heat {} of {}", index + 1, heat_count)));
            lines.extend(self.heat_lines(heat));
        }

        tracing::debug!("Rendered event {} with {} heats", self.number, heat_count);
        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }

    fn heat_lines(&self, heat: &[&Participant]) -> Vec<String> {
        let first = start_lane(heat.len(), self.lanes);
        let mut lines = Vec::new();

        if self.empty_lanes {
            lines.extend((1..first).map(|lane| format!("{:4}", lane)));
        }

        for (offset, participant) in heat.iter().enumerate() {
            let line = format!(
                "{:4} {:w$} {:3} {:8} {:9}",
                first + offset,
                display_name(&participant.name()),
                participant.age_display(),
                participant.team(),
                NO_TIME,
                w = NAME_WIDTH
            );
            lines.push(line.trim_end().to_string());
        }

        if self.empty_lanes {
            let after = first + heat.len();
            lines.extend((after..=self.lanes).map(|lane| format!("{:4}", lane)));
        }
        lines
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event {}, {} {} {}, has {} entries registered.",
            self.number,
            self.gender.title(),
            self.distance,
            self.stroke_title(),
            self.len()
        )
    }
}

fn bold(text: &str) -> String {
    format!("{}{}{}", BOLD_OPEN, text, BOLD_CLOSE)
}

/// Names longer than the column are cut to 19 characters plus a hyphen
fn display_name(name: &str) -> String {
    if name.chars().count() > NAME_WIDTH {
        let mut cut: String = name.chars().take(NAME_WIDTH - 1).collect();
        cut.push('-');
        cut
    } else {
        name.to_string()
    }
}
