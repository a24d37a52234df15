//! # Autochess - Deterministic Auto-Battler Simulation Kernel
//!
//! A discrete-time battle simulator for autonomous creatures in a bounded 2D
//! arena. Each tick every creature senses its surroundings, decides an action
//! plan, and attempts movement and combat; every resulting state change is
//! appended to an event log that is sufficient to replay the match exactly,
//! without re-running any physics or AI.
//!
//! ## Features
//!
//! - Oriented-bounding-box collision detection (separating axis theorem)
//! - Think/move creature state machine with targeting, braking and shooting
//! - Straight-line projectile ballistics with range cutoff
//! - Append-only per-tick event log with a serialized match record
//! - Deterministic replay from a recorded match
//! - Creature construction from stat-range configuration
//!
//! ## Core Modules
//!
//! - [`simulation::creature`] - Creature decision/movement/combat machine
//! - [`simulation::projectile`] - Attack projectiles
//! - [`simulation::collider`] - OBB and circle collision shapes
//! - [`simulation::game`] - Turn-loop orchestrator and entity registry
//! - [`simulation::events`] - Event model and per-tick log
//! - [`simulation::replay`] - Passive reconstruction of a recorded match

/// Core simulation logic and data structures.
pub mod simulation {
    /// Oriented rectangle and circle collision shapes.
    pub mod collider;
    /// Creature construction from stat-range configuration.
    pub mod config;
    /// Creature behavior, state, and lifecycle.
    pub mod creature;
    /// Base entity identity shared by every simulated object.
    pub mod entity;
    /// Event model and the append-only per-tick log.
    pub mod events;
    /// Turn-loop orchestrator, live registry and cemetery.
    pub mod game;
    /// Pose and angle-difference math.
    pub mod geometry;
    /// Static obstacles.
    pub mod obstacle;
    /// Ballistic projectiles fired by creatures.
    pub mod projectile;
    /// Serialized match record and experiment hashing.
    pub mod record;
    /// Replay of a match record into passive shadow entities.
    pub mod replay;
}
