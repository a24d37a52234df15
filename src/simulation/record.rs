//! The persisted match record: header, experiment hash and event log.
//!
//! The record is the boundary between the kernel and its out-of-scope
//! collaborators (renderers, statistics extractors). Header positions and
//! angles are registration-time values, while score and health are values
//! at record time, so score extractors can read final standings straight
//! from the header.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;

use ndarray::Array1;

use super::creature::Creature;
use super::events::EventLog;
use super::game::{Arena, Game};

/// Failure to persist or reload a match record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Filesystem failure.
    #[error("record io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization failure.
    #[error("record serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-creature entry in the match header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureSummary {
    /// Entity id.
    pub id: u32,
    /// Position at registration.
    pub position: Array1<f32>,
    /// Nominal speed per tick.
    pub speed: f32,
    /// Display name.
    pub name: String,
    /// Heading at registration, in degrees.
    pub angle: f32,
    /// Health at record time.
    pub health: f32,
    /// Damage per hit.
    pub damage: f32,
    /// Projectile speed per tick.
    pub bullet_speed: f32,
    /// Projectile range.
    pub bullet_range: f32,
    /// Score at record time.
    pub score: i32,
    /// Braking speed multiplier.
    pub brake_power: f32,
    /// Brake cooldown in ticks.
    pub brake_cooldown: u32,
    /// Maximum turn per tick in degrees.
    pub max_turn_rate: f32,
    /// Shot cooldown in ticks.
    pub shoot_cooldown: u32,
    /// Collider footprint `(width, height)`.
    pub size: (f32, f32),
    /// Sprite for out-of-process renderers.
    pub sprite_filename: String,
}

impl CreatureSummary {
    fn from_creature(creature: &Creature) -> Self {
        Self {
            id: creature.body.id,
            position: creature.initial_position.clone(),
            speed: creature.nominal_speed,
            name: creature.name.clone(),
            angle: creature.initial_angle,
            health: creature.health,
            damage: creature.damage,
            bullet_speed: creature.bullet_speed,
            bullet_range: creature.bullet_range,
            score: creature.score,
            brake_power: creature.brake_power,
            brake_cooldown: creature.brake_cooldown,
            max_turn_rate: creature.max_turn_rate,
            shoot_cooldown: creature.shoot_cooldown,
            size: creature.body.collider.size(),
            sprite_filename: creature.sprite_filename.clone(),
        }
    }
}

/// Match metadata consumed before the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchHeader {
    /// Arena bounds.
    pub arena: Arena,
    /// Winner name, `"Draw"`, or `None` for an undecided match.
    pub winner: Option<String>,
    /// Winning score, when a winner was decided on points.
    pub winner_score: Option<i32>,
    /// Every creature that entered the match.
    pub creatures: Vec<CreatureSummary>,
}

/// The complete persisted record of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Match metadata.
    pub header: MatchHeader,
    /// Hash identifying the experiment configuration this match belongs to.
    pub experiment_hash: Option<String>,
    /// The full per-tick event log.
    pub events: EventLog,
}

impl MatchRecord {
    /// Captures a game into a record. The caller supplies the winner
    /// verdict, since termination policy lives outside the kernel.
    pub fn from_game(
        game: &Game,
        winner: Option<String>,
        winner_score: Option<i32>,
        experiment_hash: Option<String>,
    ) -> Self {
        Self {
            header: MatchHeader {
                arena: *game.arena(),
                winner,
                winner_score,
                creatures: game.all_creatures().map(CreatureSummary::from_creature).collect(),
            },
            experiment_hash,
            events: game.events().clone(),
        }
    }

    /// Writes the record as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reads a record back from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Short hash identifying an experiment run: six hex digits of the config
/// hash joined with five hex digits of a timestamp hash, so records from
/// the same configuration share a prefix while runs stay distinguishable.
pub fn experiment_hash<T: Serialize>(config: &T) -> Result<String, RecordError> {
    let config_json = serde_json::to_string(config)?;
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%f").to_string();
    let timestamp_hash = format!("{:x}", Sha256::digest(timestamp.as_bytes()));

    Ok(format!("{}.{}", &config_hash[..6], &timestamp_hash[..5]))
}
