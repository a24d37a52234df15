//! Replay of a match record into passive shadow entities.
//!
//! A replay consumer applies events tick-by-tick in list order: a spawn
//! instantiates a shadow entity with the recorded pose, field changes
//! overwrite the named attribute directly (no physics recomputation), and a
//! destroy retires the entity while keeping it available for inspection.
//! Because every tracked mutation was captured, the reconstruction matches
//! the live simulation's final state exactly.

use ndarray::Array1;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use super::events::Event;
use super::record::MatchRecord;

/// A malformed or internally inconsistent match record.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// An event referenced an id never introduced by the header or a spawn.
    #[error("tick {tick}: event references unknown entity {id}")]
    UnknownEntity {
        /// Tick of the offending event.
        tick: u32,
        /// The unresolved id.
        id: u32,
    },
    /// A field-change value did not decode as the attribute's type.
    #[error("tick {tick}: bad value for attribute {attribute:?}")]
    BadValue {
        /// Tick of the offending event.
        tick: u32,
        /// The attribute whose value failed to decode.
        attribute: String,
    },
}

/// Reconstructed state of one entity at the end of a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowEntity {
    /// Entity id.
    pub id: u32,
    /// Kind name, e.g. `"Creature"`.
    pub object_type: String,
    /// Last known position.
    pub position: Array1<f32>,
    /// Last known heading in degrees.
    pub angle: f32,
    /// Last known health.
    pub health: f32,
    /// Last known score.
    pub score: i32,
    /// Last known braking flag.
    pub is_braking: bool,
    /// Last known aim point.
    pub target: Option<Array1<f32>>,
    /// False once a destroy event retired the entity.
    pub alive: bool,
}

impl ShadowEntity {
    fn apply(&mut self, tick: u32, attribute: &str, value: &Value) -> Result<(), ReplayError> {
        let bad = || ReplayError::BadValue {
            tick,
            attribute: attribute.to_string(),
        };
        match attribute {
            "position" => self.position = decode_vec2(value).ok_or_else(bad)?,
            "angle" => self.angle = value.as_f64().ok_or_else(bad)? as f32,
            "health" => self.health = value.as_f64().ok_or_else(bad)? as f32,
            "score" => self.score = value.as_i64().ok_or_else(bad)? as i32,
            "is_braking" => self.is_braking = value.as_bool().ok_or_else(bad)?,
            "target" => {
                self.target = if value.is_null() {
                    None
                } else {
                    Some(decode_vec2(value).ok_or_else(bad)?)
                };
            }
            // Attributes this consumer does not model are skipped, so the
            // log format can grow without breaking old replays.
            _ => {}
        }
        Ok(())
    }
}

fn decode_vec2(value: &Value) -> Option<Array1<f32>> {
    let arr = value.as_array()?;
    if arr.len() != 2 {
        return None;
    }
    let x = arr[0].as_f64()? as f32;
    let y = arr[1].as_f64()? as f32;
    Some(Array1::from_vec(vec![x, y]))
}

/// The result of replaying a match record.
#[derive(Debug, Clone)]
pub struct Replay {
    entities: BTreeMap<u32, ShadowEntity>,
}

impl Replay {
    /// Applies every event of `record` in tick order and returns the final
    /// reconstructed state.
    pub fn from_record(record: &MatchRecord) -> Result<Self, ReplayError> {
        let mut entities: BTreeMap<u32, ShadowEntity> = record
            .header
            .creatures
            .iter()
            .map(|c| {
                (
                    c.id,
                    ShadowEntity {
                        id: c.id,
                        object_type: "Creature".to_string(),
                        position: c.position.clone(),
                        angle: c.angle,
                        health: c.health,
                        score: c.score,
                        is_braking: false,
                        target: None,
                        alive: true,
                    },
                )
            })
            .collect();

        for (tick, events) in record.events.iter() {
            for event in events {
                match event {
                    Event::FieldChange {
                        id,
                        attribute,
                        value,
                    } => {
                        let entity = entities
                            .get_mut(id)
                            .ok_or(ReplayError::UnknownEntity { tick, id: *id })?;
                        entity.apply(tick, attribute, value)?;
                    }
                    Event::Spawn {
                        id,
                        object_type,
                        details,
                        ..
                    } => {
                        entities.insert(
                            *id,
                            ShadowEntity {
                                id: *id,
                                object_type: object_type.clone(),
                                position: details.position.clone(),
                                angle: details.angle,
                                health: 0.0,
                                score: 0,
                                is_braking: false,
                                target: None,
                                alive: true,
                            },
                        );
                    }
                    Event::Destroy { id, final_position } => {
                        let entity = entities
                            .get_mut(id)
                            .ok_or(ReplayError::UnknownEntity { tick, id: *id })?;
                        entity.alive = false;
                        entity.position = final_position.clone();
                    }
                }
            }
        }

        Ok(Self { entities })
    }

    /// Final state of one entity, retired or not.
    pub fn entity(&self, id: u32) -> Option<&ShadowEntity> {
        self.entities.get(&id)
    }

    /// All reconstructed entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = &ShadowEntity> {
        self.entities.values()
    }
}
