#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cue sheets and the playback system that feeds scripted input to a run.
//!
//! A cue sheet names moments on the simulation clock at which the player or
//! the rival performs an action. The [`Script`] system learns the two entity
//! ids from spawn events, tracks elapsed time, and emits the input commands
//! whose cues have come due.

use std::time::Duration;

use grotto_core::{Command, Direction, EntityId, EntityKind, Event};

const SUPPORTED_SHEET_VERSION: u32 = 1;

/// Errors produced while parsing a cue sheet.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The sheet is not valid TOML.
    #[error("cue sheet is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// The sheet declares a version this loader does not understand.
    #[error("unsupported cue sheet version {found}, expected {SUPPORTED_SHEET_VERSION}")]
    UnsupportedVersion {
        /// Version the sheet declared.
        found: u32,
    },
    /// A cue names a slot other than `player` or `rival`.
    #[error("unknown slot {slot:?} in cue {cue}")]
    UnknownSlot {
        /// Slot label as written in the sheet.
        slot: String,
        /// Zero-based index of the offending cue.
        cue: usize,
    },
    /// A cue names an action outside the playback alphabet.
    #[error("unknown action {action:?} in cue {cue}")]
    UnknownAction {
        /// Action label as written in the sheet.
        action: String,
        /// Zero-based index of the offending cue.
        cue: usize,
    },
    /// A cue carries a time that is negative or not a number.
    #[error("cue {cue} has unusable time {at}")]
    InvalidTime {
        /// Time value as written in the sheet.
        at: f64,
        /// Zero-based index of the offending cue.
        cue: usize,
    },
}

#[derive(Debug, serde::Deserialize)]
struct SheetFile {
    version: u32,
    #[serde(default)]
    cues: Vec<CueEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct CueEntry {
    at: f64,
    slot: String,
    action: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Slot {
    Player,
    Rival,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CueAction {
    StartMove(Direction),
    EndMove(Direction),
    StartJump,
    EndJump,
    StartDuck,
    EndDuck,
}

#[derive(Clone, Copy, Debug)]
struct Cue {
    at: Duration,
    slot: Slot,
    action: CueAction,
}

/// A parsed cue sheet, ordered by cue time.
#[derive(Debug)]
pub struct CueSheet {
    cues: Vec<Cue>,
}

impl CueSheet {
    /// Parses a cue sheet from its TOML source.
    ///
    /// Cues may appear in any order in the file; playback order is by time,
    /// with ties resolved by file order.
    pub fn from_toml(source: &str) -> Result<Self, ScriptError> {
        let file: SheetFile = toml::from_str(source)?;
        if file.version != SUPPORTED_SHEET_VERSION {
            return Err(ScriptError::UnsupportedVersion {
                found: file.version,
            });
        }

        let mut cues = Vec::with_capacity(file.cues.len());
        for (index, entry) in file.cues.iter().enumerate() {
            if !entry.at.is_finite() || entry.at < 0.0 {
                return Err(ScriptError::InvalidTime {
                    at: entry.at,
                    cue: index,
                });
            }
            let slot = parse_slot(&entry.slot).ok_or_else(|| ScriptError::UnknownSlot {
                slot: entry.slot.clone(),
                cue: index,
            })?;
            let action = parse_action(&entry.action).ok_or_else(|| ScriptError::UnknownAction {
                action: entry.action.clone(),
                cue: index,
            })?;
            cues.push(Cue {
                at: Duration::from_secs_f64(entry.at),
                slot,
                action,
            });
        }
        cues.sort_by_key(|cue| cue.at);

        Ok(Self { cues })
    }

    /// Number of cues on the sheet.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether the sheet holds no cues at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

fn parse_slot(slot: &str) -> Option<Slot> {
    match slot {
        "player" => Some(Slot::Player),
        "rival" => Some(Slot::Rival),
        _ => None,
    }
}

fn parse_action(action: &str) -> Option<CueAction> {
    match action {
        "start-move-left" => Some(CueAction::StartMove(Direction::Left)),
        "start-move-right" => Some(CueAction::StartMove(Direction::Right)),
        "end-move-left" => Some(CueAction::EndMove(Direction::Left)),
        "end-move-right" => Some(CueAction::EndMove(Direction::Right)),
        "start-jump" => Some(CueAction::StartJump),
        "end-jump" => Some(CueAction::EndJump),
        "start-duck" => Some(CueAction::StartDuck),
        "end-duck" => Some(CueAction::EndDuck),
        _ => None,
    }
}

/// Pure system that replays a cue sheet against the simulation clock.
///
/// Cues addressing a slot whose creature never spawned are dropped when they
/// come due, so a sheet written for two runners still plays on a solo level.
#[derive(Debug)]
pub struct Script {
    cues: Vec<Cue>,
    next_cue: usize,
    clock: Duration,
    player: Option<EntityId>,
    rival: Option<EntityId>,
}

impl Script {
    /// Creates a playback system over the supplied sheet.
    #[must_use]
    pub fn new(sheet: CueSheet) -> Self {
        Self {
            cues: sheet.cues,
            next_cue: 0,
            clock: Duration::ZERO,
            player: None,
            rival: None,
        }
    }

    /// Whether every cue on the sheet has been played or dropped.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.next_cue == self.cues.len()
    }

    /// Consumes events to advance the clock and emits the commands for every
    /// cue that has come due.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::CreatureSpawned { entity, kind, .. } => match kind {
                    EntityKind::Player => self.player = Some(*entity),
                    EntityKind::Rival => self.rival = Some(*entity),
                    _ => {}
                },
                Event::TimeAdvanced { dt } => {
                    self.clock = self.clock.saturating_add(*dt);
                }
                _ => {}
            }
        }

        while let Some(cue) = self.cues.get(self.next_cue).copied() {
            if cue.at > self.clock {
                break;
            }
            self.next_cue += 1;
            if let Some(command) = self.command_for(cue) {
                out.push(command);
            }
        }
    }

    fn command_for(&self, cue: Cue) -> Option<Command> {
        let entity = match cue.slot {
            Slot::Player => self.player,
            Slot::Rival => self.rival,
        }?;
        Some(match cue.action {
            CueAction::StartMove(direction) => Command::StartMove { entity, direction },
            CueAction::EndMove(direction) => Command::EndMove { entity, direction },
            CueAction::StartJump => Command::StartJump { entity },
            CueAction::EndJump => Command::EndJump { entity },
            CueAction::StartDuck => Command::StartDuck { entity },
            CueAction::EndDuck => Command::EndDuck { entity },
        })
    }
}
