//! Event model and the append-only per-tick log.
//!
//! Every tracked mutation of an entity is captured as an [`Event`] in the
//! owning game's current-tick bucket. A log captured this way is sufficient
//! to reconstruct the final state of a match without re-running physics or
//! AI; see [`crate::simulation::replay`].

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Pose and shape details carried by a spawn event, enough for a replay
/// consumer to instantiate a passive shadow entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnDetails {
    /// Spawn position.
    pub position: Array1<f32>,
    /// Spawn heading in degrees.
    pub angle: f32,
    /// Travel speed per tick.
    pub speed: f32,
    /// Collider footprint `(width, height)`.
    pub size: (f32, f32),
}

/// A single recorded state change.
///
/// Serialized with a `type` tag (`field_change` / `spawn` / `destroy`) so
/// out-of-process consumers can dispatch on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A tracked field of an entity changed; `value` is the new absolute
    /// value of the named attribute.
    FieldChange {
        /// Id of the mutated entity.
        id: u32,
        /// Name of the mutated attribute.
        attribute: String,
        /// New value of the attribute.
        value: Value,
    },
    /// An entity joined the simulation mid-match.
    Spawn {
        /// Id assigned to the new entity.
        id: u32,
        /// Kind of the new entity, e.g. `"Projectile"`.
        object_type: String,
        /// Id of the entity that caused the spawn (a projectile's shooter;
        /// the entity's own id otherwise).
        origin_id: u32,
        /// Initial pose and shape.
        details: SpawnDetails,
    },
    /// An entity left the simulation.
    Destroy {
        /// Id of the destroyed entity.
        id: u32,
        /// Position at the moment of destruction.
        final_position: Array1<f32>,
    },
}

impl Event {
    /// Id of the entity the event concerns.
    pub fn entity_id(&self) -> u32 {
        match self {
            Self::FieldChange { id, .. } | Self::Spawn { id, .. } | Self::Destroy { id, .. } => *id,
        }
    }
}

/// Append-only mapping of tick to the ordered events recorded during it.
///
/// Tick keys are contiguous from 0; a tick in which nothing happened still
/// gets an empty bucket so consumers can use the bucket count as the match
/// length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    buckets: BTreeMap<u32, Vec<Event>>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the bucket for `tick`, preserving within-tick
    /// causal order.
    pub fn record(&mut self, tick: u32, event: Event) {
        self.buckets.entry(tick).or_default().push(event);
    }

    /// Makes sure a (possibly empty) bucket exists for `tick`.
    pub fn open_bucket(&mut self, tick: u32) {
        self.buckets.entry(tick).or_default();
    }

    /// Events recorded during `tick`, in causal order.
    pub fn events_at(&self, tick: u32) -> &[Event] {
        self.buckets.get(&tick).map_or(&[], Vec::as_slice)
    }

    /// Number of tick buckets, equal to the number of simulated turns.
    pub fn num_ticks(&self) -> usize {
        self.buckets.len()
    }

    /// Iterates buckets in ascending tick order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Event])> {
        self.buckets.iter().map(|(t, evs)| (*t, evs.as_slice()))
    }

    /// Total number of recorded events.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// True when nothing has been recorded and no bucket has been opened.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
