//! Turn-loop orchestrator: id allocation, live-object registry, cemetery,
//! per-tick event bucketing, and termination-agnostic stepping.
//!
//! The game owns the only shared mutable state in a match: the registry and
//! the event log. Entities are temporarily removed from the registry while
//! they take their turn, so their `think`/`act` methods receive the game
//! (minus themselves) by `&mut` reference instead of holding a back-pointer.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::creature::Creature;
use super::entity::GameObject;
use super::events::{Event, EventLog};
use super::geometry::distance;
use super::projectile::Projectile;

/// Immutable arena bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Arena width.
    pub width: f32,
    /// Arena height.
    pub height: f32,
}

impl Arena {
    /// Creates an arena with the given bounds.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The arena's center point, the fallback aim point for creatures with
    /// no living enemy.
    pub fn center(&self) -> Array1<f32> {
        Array1::from_vec(vec![self.width / 2.0, self.height / 2.0])
    }

    /// Whether a position lies strictly inside the bounds.
    pub fn contains(&self, position: &Array1<f32>) -> bool {
        position[0] > 0.0
            && position[0] < self.width
            && position[1] > 0.0
            && position[1] < self.height
    }
}

/// Score adjustments applied during combat resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreValues {
    /// Added to the victim on every hit.
    pub hit_taken: i32,
    /// Added to the attacker on every hit.
    pub hit_given: i32,
    /// Added to the victim on death.
    pub death_penalty: i32,
    /// Added to the attacker on a kill.
    pub kill_bonus: i32,
}

impl Default for ScoreValues {
    fn default() -> Self {
        Self {
            hit_taken: -2,
            hit_given: 5,
            death_penalty: -20,
            kill_bonus: 30,
        }
    }
}

/// A single match: arena, tick counter, live registry, cemetery and event
/// log. Termination is caller-driven; the game only exposes the per-tick
/// step and lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    arena: Arena,
    /// Current tick; -1 until the first `simulate_turn` call.
    tick: i64,
    next_id: u32,
    objects: std::collections::BTreeMap<u32, GameObject>,
    cemetery: Vec<GameObject>,
    log: EventLog,
    score_values: ScoreValues,
}

impl Game {
    /// Creates an uninitialized game (tick -1) with default score values.
    pub fn new(arena: Arena) -> Self {
        Self::with_score_values(arena, ScoreValues::default())
    }

    /// Creates an uninitialized game with explicit score values.
    pub fn with_score_values(arena: Arena, score_values: ScoreValues) -> Self {
        Self {
            arena,
            tick: -1,
            next_id: 0,
            objects: std::collections::BTreeMap::new(),
            cemetery: Vec::new(),
            log: EventLog::new(),
            score_values,
        }
    }

    /// The arena bounds.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The current tick; -1 before the first turn.
    pub fn tick(&self) -> i64 {
        self.tick
    }

    /// Combat score adjustments for this match.
    pub fn score_values(&self) -> &ScoreValues {
        &self.score_values
    }

    /// The append-only event log.
    pub fn events(&self) -> &EventLog {
        &self.log
    }

    /// Destroyed entities, retained for end-of-match reporting.
    pub fn cemetery(&self) -> &[GameObject] {
        &self.cemetery
    }

    /// Live entities in ascending id order.
    pub fn live_objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.values()
    }

    /// Live creatures in ascending id order.
    pub fn living_creatures(&self) -> impl Iterator<Item = &Creature> {
        self.objects.values().filter_map(|obj| match obj {
            GameObject::Creature(c) => Some(c),
            _ => None,
        })
    }

    /// Every creature that ever entered the match, live first, then the
    /// cemetery in destruction order.
    pub fn all_creatures(&self) -> impl Iterator<Item = &Creature> {
        self.living_creatures()
            .chain(self.cemetery.iter().filter_map(|obj| match obj {
                GameObject::Creature(c) => Some(c),
                _ => None,
            }))
    }

    /// Registers an entity, assigning it the next id. A spawn event is
    /// recorded when the game is running; registration before the first
    /// turn is silent (those entities appear in the match header instead).
    pub fn add_game_object(&mut self, mut object: GameObject) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        debug_assert!(
            !self.objects.contains_key(&id),
            "id {id} already registered"
        );
        object.body_mut().id = id;
        log::debug!("registered {} {} at tick {}", object.object_type(), id, self.tick);

        if self.tick >= 0 {
            let event = Event::Spawn {
                id,
                object_type: object.object_type().to_string(),
                origin_id: object.origin_id(),
                details: object.spawn_details(),
            };
            self.record_event(event);
        }
        self.objects.insert(id, object);
        id
    }

    /// Moves an entity from the live registry to the cemetery without
    /// recording anything. Returns false if the id was not live.
    pub fn remove_game_object(&mut self, id: u32) -> bool {
        match self.objects.remove(&id) {
            Some(obj) => {
                self.cemetery.push(obj);
                true
            }
            None => false,
        }
    }

    /// Looks up a live entity by id. Destroyed entities are not found.
    pub fn get_game_object_by_id(&self, id: u32) -> Option<&GameObject> {
        self.objects.get(&id)
    }

    /// Records an entity's destruction and retires it to the cemetery.
    /// Used for entities destroyed during someone else's turn.
    pub fn destroy_object(&mut self, id: u32) {
        let Some(mut obj) = self.objects.remove(&id) else {
            return;
        };
        self.record_destroy(id, obj.body().pose.position.clone());
        match &mut obj {
            GameObject::Projectile(p) => p.destroyed = true,
            GameObject::Creature(c) => c.health = 0.0,
            GameObject::Obstacle(_) => {}
        }
        self.cemetery.push(obj);
    }

    /// Applies projectile damage to a live creature on the attacker's
    /// behalf. A victim id that no longer resolves is a no-op.
    pub fn damage_creature(&mut self, victim_id: u32, amount: f32, attacker_id: u32) {
        let Some(mut obj) = self.objects.remove(&victim_id) else {
            return;
        };
        if let GameObject::Creature(c) = &mut obj {
            c.take_damage(self, amount, attacker_id);
        }
        if obj.is_alive() {
            self.objects.insert(victim_id, obj);
        } else {
            self.cemetery.push(obj);
        }
    }

    /// Adds `delta` to a live creature's score, recording the change.
    /// Returns false when the id does not resolve to a live creature.
    pub fn award_score(&mut self, id: u32, delta: i32) -> bool {
        let Some(GameObject::Creature(c)) = self.objects.get_mut(&id) else {
            return false;
        };
        c.score += delta;
        let score = c.score;
        self.record_field_change(id, "score", serde_json::json!(score));
        true
    }

    /// Registers a projectile fired by `shooter`, inheriting its pose and
    /// ballistic stats. The spawn event carries enough detail for replay.
    pub fn spawn_projectile(&mut self, shooter: &Creature) -> u32 {
        log::debug!(
            "creature {} ({}) fires at tick {}",
            shooter.body.id,
            shooter.name,
            self.tick
        );
        self.add_game_object(GameObject::Projectile(Projectile::from_shooter(shooter)))
    }

    /// Nearest living creature to `from`: `(id, position, distance)`.
    /// Ties resolve to the lowest id.
    pub fn nearest_creature(&self, from: &Array1<f32>) -> Option<(u32, Array1<f32>, f32)> {
        let mut best: Option<(u32, Array1<f32>, f32)> = None;
        for c in self.living_creatures() {
            let dist = distance(from, &c.body.pose.position);
            if best.as_ref().is_none_or(|(_, _, d)| dist < *d) {
                best = Some((c.body.id, c.body.pose.position.clone(), dist));
            }
        }
        best
    }

    /// Advances the match by exactly one tick.
    ///
    /// Processes a snapshot of the entities live at tick start, each getting
    /// `think()` then `act()`. Entities spawned mid-tick join the registry
    /// but take their first turn next tick; entities destroyed mid-tick stop
    /// being processed immediately.
    pub fn simulate_turn(&mut self) {
        self.tick += 1;
        let tick = self.tick as u32;
        // Keep tick keys contiguous even when nothing happens.
        self.log.open_bucket(tick);

        let snapshot: Vec<u32> = self.objects.keys().copied().collect();
        for id in snapshot {
            let Some(mut obj) = self.objects.remove(&id) else {
                // Destroyed earlier this tick.
                continue;
            };
            obj.think(self);
            obj.act(self);
            if obj.is_alive() {
                self.objects.insert(id, obj);
            } else {
                self.cemetery.push(obj);
            }
        }
    }

    /// Winner under the standard policy: highest score among living
    /// creatures (ties to the lowest id), or `"Draw"` when none survive.
    pub fn winner_by_score(&self) -> (String, Option<i32>) {
        let mut best: Option<&Creature> = None;
        for c in self.living_creatures() {
            if best.is_none_or(|b| c.score > b.score) {
                best = Some(c);
            }
        }
        match best {
            Some(c) => (c.name.clone(), Some(c.score)),
            None => ("Draw".to_string(), None),
        }
    }

    /// Appends an event to the current tick's bucket. Silent while the game
    /// is uninitialized (tick -1).
    pub fn record_event(&mut self, event: Event) {
        if self.tick >= 0 {
            self.log.record(self.tick as u32, event);
        }
    }

    /// Records a field-change event for `id`.
    pub fn record_field_change(&mut self, id: u32, attribute: &str, value: Value) {
        self.record_event(Event::FieldChange {
            id,
            attribute: attribute.to_string(),
            value,
        });
    }

    /// Records a destruction event for `id` at `final_position`.
    pub fn record_destroy(&mut self, id: u32, final_position: Array1<f32>) {
        self.record_event(Event::Destroy { id, final_position });
    }
}
