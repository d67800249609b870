//! Meet model.
//!
//! A meet owns every swimmer and every event. The event program is built
//! from the schedule template in [`ScheduleConfig`]: medley relays, then each
//! stroke by age group, then free relays, with girls and boys events paired
//! per age group.

use crate::config::{effective_age, ScheduleConfig};
use crate::event::EventOptions;
use crate::import::{read_entries, Entry, TEMPLATE_FILE_NAME};
use crate::report::{discover_event_files, event_file_name};
use crate::{Config, Error, Event, Participant, ParticipantId, RelayKind, RelayTeam, Result, Swimmer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Letters used for identity suffixes
const ID_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of the random part of a swimmer identity
const ID_SUFFIX_LEN: usize = 10;

/// Text of one rendered event
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedEvent {
    pub number: u32,
    pub text: String,
}

/// A swim meet: its swimmers, its event program and the heat draw source
pub struct Meet {
    name: String,
    options: EventOptions,
    schedule: ScheduleConfig,
    swimmers: HashMap<ParticipantId, Swimmer>,
    order: Vec<ParticipantId>,
    events: BTreeMap<u32, Event>,
    rng: StdRng,
}

impl Meet {
    /// Create a meet with the default schedule template
    pub fn new(name: impl Into<String>, lanes: usize, empty_lanes: bool) -> Result<Self> {
        let mut config = Config::default();
        config.meet.name = name.into();
        config.meet.lanes = lanes;
        config.meet.empty_lanes = empty_lanes;
        Self::from_config(&config)
    }

    /// Create a meet from validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let rng = match config.meet.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            name: config.meet.name.clone(),
            options: EventOptions::from(&config.meet),
            schedule: config.schedule.clone(),
            swimmers: HashMap::new(),
            order: Vec::new(),
            events: BTreeMap::new(),
            rng,
        })
    }

    /// Replace the random source with a seeded one
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lanes(&self) -> usize {
        self.options.lanes
    }

    pub fn swimmer_count(&self) -> usize {
        self.swimmers.len()
    }

    pub fn swimmer(&self, id: &ParticipantId) -> Option<&Swimmer> {
        self.swimmers.get(id)
    }

    /// Swimmers in import order
    pub fn swimmers(&self) -> impl Iterator<Item = &Swimmer> {
        self.order.iter().filter_map(|id| self.swimmers.get(id))
    }

    /// Events in event-number order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn event(&self, number: u32) -> Option<&Event> {
        self.events.get(&number)
    }

    /// Register one swimmer per entry, each under a fresh identity
    pub fn import_participants(&mut self, entries: Vec<Entry>) -> usize {
        let count = entries.len();
        for entry in entries {
            let id = self.fresh_id(&entry.team);
            let swimmer = Swimmer {
                id: id.clone(),
                first_name: entry.first_name,
                last_name: entry.last_name,
                age: entry.age,
                gender: entry.gender,
                team: entry.team,
                events: entry.events,
                medley_relay: entry.medley_relay,
                free_relay: entry.free_relay,
            };
            self.order.push(id.clone());
            self.swimmers.insert(id, swimmer);
        }
        tracing::info!("Imported {} swimmers ({} total)", count, self.swimmers.len());
        count
    }

    /// Import one entry file
    pub fn import_file(&mut self, path: &Path) -> Result<usize> {
        let entries = read_entries(path)?;
        Ok(self.import_participants(entries))
    }

    /// Import every `.csv` file in a directory, in file-name order, skipping
    /// the blank entry template
    pub fn import_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if !is_csv {
                continue;
            }
            if path.file_name().map(|n| n == TEMPLATE_FILE_NAME).unwrap_or(false) {
                tracing::debug!("Skipping entry template {:?}", path);
                continue;
            }
            files.push(path);
        }
        files.sort();

        if files.is_empty() {
            tracing::warn!("No entry files found in {:?}", dir);
        }

        let mut total = 0;
        for path in files {
            total += self.import_file(&path)?;
        }
        Ok(total)
    }

    fn fresh_id(&mut self, team: &str) -> ParticipantId {
        loop {
            let suffix: String = (0..ID_SUFFIX_LEN)
                .map(|_| ID_LETTERS[self.rng.gen_range(0..ID_LETTERS.len())] as char)
                .collect();
            let id = ParticipantId::new(format!("{}{}", team, suffix));
            if !self.swimmers.contains_key(&id) {
                return id;
            }
            tracing::warn!("Identity {} already taken, drawing another", id);
        }
    }

    /// Build the event program from the schedule template.
    ///
    /// Any previous events and their entries are discarded.
    pub fn generate_schedule(&mut self) {
        self.events.clear();
        let mut number = 1;

        if self.schedule.medley_relay {
            number = self.push_relays(number, RelayKind::Medley);
        }

        for stroke in &self.schedule.strokes {
            for group in &self.schedule.age_groups {
                for _ in 0..2 {
                    let event = Event::individual(number, group, stroke, self.options);
                    self.events.insert(number, event);
                    number += 1;
                }
            }
        }

        if self.schedule.free_relay {
            self.push_relays(number, RelayKind::Free);
        }

        tracing::info!("Generated {} events", self.events.len());
    }

    fn push_relays(&mut self, start: u32, kind: RelayKind) -> u32 {
        let mut number = start;
        for group in &self.schedule.relay_age_groups {
            for _ in 0..2 {
                self.events
                    .insert(number, Event::relay(number, group, kind, self.options));
                number += 1;
            }
        }
        number
    }

    /// Relay squads in draw order: configured squads, or one per team code
    /// in the order teams first appear among the swimmers
    pub fn relay_squads(&self) -> Vec<RelayTeam> {
        if !self.schedule.relay_squads.is_empty() {
            return self
                .schedule
                .relay_squads
                .iter()
                .map(|squad| RelayTeam::new(squad.name.clone(), squad.code.clone()))
                .collect();
        }

        let mut squads: Vec<RelayTeam> = Vec::new();
        for swimmer in self.swimmers() {
            if !squads.iter().any(|squad| squad.code == swimmer.team) {
                squads.push(RelayTeam::new(swimmer.team.to_uppercase(), swimmer.team.clone()));
            }
        }
        squads
    }

    /// Enter swimmers into matching events.
    ///
    /// Individual events take every swimmer whose gender and age bucket match
    /// and who entered the stroke. Relay events take each squad with at least
    /// one matching swimmer flagged for that relay.
    pub fn assign_participants(&mut self) {
        let squads = self.relay_squads();
        let mut entered = 0usize;

        for event in self.events.values_mut() {
            match event.relay {
                None => {
                    for id in &self.order {
                        let Some(swimmer) = self.swimmers.get(id) else {
                            continue;
                        };
                        let bucket = effective_age(swimmer.age, &self.schedule.age_groups);
                        if swimmer.gender == event.gender
                            && bucket == Some(event.age)
                            && swimmer.is_entered_in(&event.stroke_code, &event.stroke_name)
                            && event.add_participant(Participant::Individual(swimmer.clone()))
                        {
                            entered += 1;
                        }
                    }
                }
                Some(kind) => {
                    for squad in &squads {
                        let eligible = self.swimmers.values().any(|swimmer| {
                            swimmer.team == squad.code
                                && swimmer.gender == event.gender
                                && effective_age(swimmer.age, &self.schedule.relay_age_groups)
                                    == Some(event.age)
                                && swimmer.swims_relay(kind)
                        });
                        if eligible && event.add_participant(Participant::Relay(squad.clone())) {
                            entered += 1;
                        }
                    }
                }
            }
            tracing::debug!("{}", event);
        }

        tracing::info!("Made {} entries across {} events", entered, self.events.len());
    }

    /// Draw heats and render every event, in event-number order
    pub fn export_all(&mut self) -> Result<Vec<RenderedEvent>> {
        let mut rendered = Vec::with_capacity(self.events.len());
        for event in self.events.values() {
            rendered.push(RenderedEvent {
                number: event.number,
                text: event.render(&mut self.rng)?,
            });
        }
        Ok(rendered)
    }

    /// Render every event into `dir` as `{meet} - Event #{n}.txt`.
    ///
    /// Event files left over from an earlier run of the same meet are
    /// removed first.
    pub fn write_event_files(&mut self, dir: &Path) -> Result<Vec<PathBuf>> {
        if self.events.is_empty() {
            return Err(Error::Other(
                "no events to write; generate the schedule first".into(),
            ));
        }
        std::fs::create_dir_all(dir)?;

        for (_, stale) in discover_event_files(dir, &self.name)? {
            std::fs::remove_file(&stale)?;
            tracing::debug!("Removed stale event file {:?}", stale);
        }

        let mut paths = Vec::new();
        for event in self.export_all()? {
            let path = dir.join(event_file_name(&self.name, event.number));
            std::fs::write(&path, event.text)?;
            tracing::debug!("Event #{} has been exported", event.number);
            paths.push(path);
        }

        tracing::info!("Wrote {} event files to {:?}", paths.len(), dir);
        Ok(paths)
    }
}
