#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use autochess::simulation::creature::{Action, Creature, CreatureStats};
use autochess::simulation::entity::GameObject;
use autochess::simulation::events::Event;
use autochess::simulation::game::{Arena, Game};
use autochess::simulation::obstacle::Obstacle;
use ndarray::Array1;

fn test_stats(name: &str) -> CreatureStats {
    CreatureStats {
        name: name.to_string(),
        sprite_filename: "tank.png".to_string(),
        health: 100.0,
        speed: 10.0,
        max_turn_rate: 30.0,
        shoot_cooldown: 5,
        bounding_box_size: (50.0, 100.0),
        damage: 10.0,
        bullet_speed: 20.0,
        bullet_range: 200.0,
        brake_power: 0.5,
        brake_cooldown: 10,
    }
}

fn make_creature(name: &str, x: f32, y: f32, angle: f32) -> Creature {
    Creature::new(Array1::from_vec(vec![x, y]), angle, test_stats(name))
}

fn position_events_at(game: &Game, tick: u32) -> usize {
    game.events()
        .events_at(tick)
        .iter()
        .filter(|e| matches!(e, Event::FieldChange { attribute, .. } if attribute == "position"))
        .count()
}

#[test]
fn test_ids_are_unique_and_monotonic() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    let mut ids = Vec::new();
    for i in 0..5 {
        let x = 200.0 + i as f32 * 300.0;
        ids.push(game.add_game_object(GameObject::Creature(make_creature("c", x, 200.0, 0.0))));
    }
    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1], "ids must increase monotonically");
    }
    let mut deduped = ids.clone();
    deduped.dedup();
    assert_eq!(deduped, ids);
}

#[test]
fn test_lookup_miss_returns_none() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    assert!(game.get_game_object_by_id(0).is_none());

    let id = game.add_game_object(GameObject::Creature(make_creature("c", 500.0, 500.0, 0.0)));
    assert!(game.get_game_object_by_id(id).is_some());

    game.destroy_object(id);
    assert!(
        game.get_game_object_by_id(id).is_none(),
        "cemetery entities are not found by live lookup"
    );
    assert_eq!(game.cemetery().len(), 1);
}

#[test]
fn test_tick_starts_uninitialized_and_advances_by_one() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    assert_eq!(game.tick(), -1);

    game.simulate_turn();
    assert_eq!(game.tick(), 0);
    game.simulate_turn();
    assert_eq!(game.tick(), 1);

    // Tick buckets are contiguous from 0, even with nothing registered, and
    // empty buckets contribute no events.
    assert_eq!(game.events().num_ticks(), 2);
    assert_eq!(game.events().len(), 0);
}

#[test]
fn test_construction_time_mutations_are_silent() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    game.add_game_object(GameObject::Creature(make_creature("c", 500.0, 500.0, 90.0)));
    assert!(
        game.events().is_empty(),
        "registration before the first turn records nothing"
    );
}

#[test]
fn test_overlapping_stationary_creatures_are_blocked() {
    // Two stationary creatures 5 units apart with overlapping 50x100 boxes:
    // the first turn blocks both and commits no position change.
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    let mut a = make_creature("a", 1000.0, 1000.0, 0.0);
    a.nominal_speed = 0.0;
    a.speed = 0.0;
    let mut b = make_creature("b", 1005.0, 1000.0, 0.0);
    b.nominal_speed = 0.0;
    b.speed = 0.0;
    let id_a = game.add_game_object(GameObject::Creature(a));
    let id_b = game.add_game_object(GameObject::Creature(b));

    game.simulate_turn();

    assert_eq!(position_events_at(&game, 0), 0, "no position change on tick 0");
    for id in [id_a, id_b] {
        let GameObject::Creature(c) = game.get_game_object_by_id(id).unwrap() else {
            panic!("expected creature");
        };
        assert_eq!(c.body.pose.position[1], 1000.0);
        assert!(
            c.action_queue.iter().any(|a| matches!(a, Action::Blocked)),
            "blocked marker left for next tick"
        );
    }
}

#[test]
fn test_lone_creature_targets_center_and_never_brakes() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    let id = game.add_game_object(GameObject::Creature(make_creature("loner", 300.0, 300.0, 0.0)));

    for _ in 0..10 {
        game.simulate_turn();
    }

    let GameObject::Creature(c) = game.get_game_object_by_id(id).unwrap() else {
        panic!("expected creature");
    };
    let target = c.target.clone().expect("target set");
    assert_eq!(target[0], 1000.0);
    assert_eq!(target[1], 1000.0);
    assert!(!c.is_braking);

    let braking_events = game
        .events()
        .iter()
        .flat_map(|(_, evs)| evs)
        .filter(|e| matches!(e, Event::FieldChange { attribute, .. } if attribute == "is_braking"))
        .count();
    assert_eq!(braking_events, 0, "no enemy ever justifies braking");
}

#[test]
fn test_shooting_spawns_a_projectile_with_the_shooter_as_origin() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    let id_a = game.add_game_object(GameObject::Creature(make_creature("a", 900.0, 1000.0, 0.0)));
    let id_b = game.add_game_object(GameObject::Creature(make_creature("b", 1100.0, 1000.0, 180.0)));

    game.simulate_turn();

    let spawns: Vec<_> = game
        .events()
        .events_at(0)
        .iter()
        .filter_map(|e| match e {
            Event::Spawn {
                id,
                object_type,
                origin_id,
                ..
            } if object_type == "Projectile" => Some((*id, *origin_id)),
            _ => None,
        })
        .collect();
    assert_eq!(spawns.len(), 2, "both creatures are in range and fire");
    assert!(spawns.iter().any(|(_, origin)| *origin == id_a));
    assert!(spawns.iter().any(|(_, origin)| *origin == id_b));

    // Spawned mid-tick: no movement events for them this tick.
    for (pid, _) in &spawns {
        let moved = game
            .events()
            .events_at(0)
            .iter()
            .any(|e| matches!(e, Event::FieldChange { id, attribute, .. }
                if id == pid && attribute == "position"));
        assert!(!moved, "projectiles take their first turn next tick");
    }
}

#[test]
fn test_projectile_expires_on_the_first_tick_past_its_range() {
    let mut game = Game::new(Arena::new(1000.0, 1000.0));
    let mut shooter = make_creature("gunner", 100.0, 500.0, 0.0);
    shooter.bullet_speed = 10.0;
    shooter.bullet_range = 25.0;
    let shooter_id = game.add_game_object(GameObject::Creature(shooter));

    // Grab a copy of the registered shooter to spawn from.
    let GameObject::Creature(registered) = game.get_game_object_by_id(shooter_id).unwrap() else {
        panic!("expected creature");
    };
    let registered = registered.clone();
    let pid = game.spawn_projectile(&registered);

    // Remove the shooter so only the projectile is stepped.
    assert!(game.remove_game_object(shooter_id));

    // Displacements: 10, 20 (both within range 25), then 30 on tick 3.
    game.simulate_turn();
    game.simulate_turn();
    assert!(game.get_game_object_by_id(pid).is_some(), "still in flight at 20");

    game.simulate_turn();
    assert!(game.get_game_object_by_id(pid).is_none(), "expired at 30 > 25");

    let destroyed = game.events().events_at(2).iter().any(
        |e| matches!(e, Event::Destroy { id, .. } if *id == pid),
    );
    assert!(destroyed, "destruction recorded on the expiry tick");
}

#[test]
fn test_projectile_in_flight_damages_the_creature_once_and_expires() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    // Stationary victim facing the incoming shot; short bullet range keeps
    // it from firing at the arena center.
    let mut victim = make_creature("victim", 1100.0, 1000.0, 180.0);
    victim.nominal_speed = 0.0;
    victim.speed = 0.0;
    victim.bullet_range = 50.0;
    let victim_id = game.add_game_object(GameObject::Creature(victim));

    let mut shooter = make_creature("gunner", 1000.0, 1000.0, 0.0);
    shooter.bullet_speed = 20.0;
    let shooter_id = game.add_game_object(GameObject::Creature(shooter));
    let GameObject::Creature(registered) = game.get_game_object_by_id(shooter_id).unwrap() else {
        panic!("expected creature");
    };
    let registered = registered.clone();
    let pid = game.spawn_projectile(&registered);
    game.remove_game_object(shooter_id);

    // 20/tick towards the victim's box edge at x = 1075: contact on tick 3.
    for _ in 0..4 {
        game.simulate_turn();
    }

    let GameObject::Creature(v) = game.get_game_object_by_id(victim_id).unwrap() else {
        panic!("expected creature");
    };
    assert_eq!(v.health, 90.0);
    assert_eq!(v.score, game.score_values().hit_taken);
    assert!(game.get_game_object_by_id(pid).is_none(), "projectile spent on impact");

    let health_changes = game
        .events()
        .iter()
        .flat_map(|(_, evs)| evs)
        .filter(|e| {
            e.entity_id() == victim_id
                && matches!(e, Event::FieldChange { attribute, .. } if attribute == "health")
        })
        .count();
    assert_eq!(health_changes, 1, "the hit lands exactly once");

    let destroyed = game.events().events_at(3).iter().any(
        |e| matches!(e, Event::Destroy { id, .. } if *id == pid),
    );
    assert!(destroyed, "projectile retired on the impact tick");
}

#[test]
fn test_walking_into_an_enemy_projectile_blocks_and_damages() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    // Long shot timer so the walker never fires during the approach.
    let mut walker = make_creature("walker", 900.0, 1000.0, 0.0);
    walker.shoot_timer = 50;
    let walker_id = game.add_game_object(GameObject::Creature(walker));

    // A zero-speed projectile parked on the walker's path.
    let mut shooter = make_creature("gunner", 1000.0, 1000.0, 0.0);
    shooter.bullet_speed = 0.0;
    shooter.damage = 15.0;
    let shooter_id = game.add_game_object(GameObject::Creature(shooter));
    let GameObject::Creature(registered) = game.get_game_object_by_id(shooter_id).unwrap() else {
        panic!("expected creature");
    };
    let registered = registered.clone();
    let pid = game.spawn_projectile(&registered);
    game.remove_game_object(shooter_id);

    // 10/tick from x = 900: commits through 970, then the candidate at 980
    // overlaps the projectile's box at x = 1000.
    for _ in 0..8 {
        game.simulate_turn();
    }

    let GameObject::Creature(w) = game.get_game_object_by_id(walker_id).unwrap() else {
        panic!("expected creature");
    };
    assert_eq!(w.body.pose.position[0], 970.0, "blocked move never commits");
    assert_eq!(w.health, 85.0);
    assert_eq!(w.score, game.score_values().hit_taken);
    assert!(
        w.action_queue.iter().any(|a| matches!(a, Action::Blocked)),
        "blocked marker left for next tick"
    );
    assert!(game.get_game_object_by_id(pid).is_none(), "projectile spent on impact");

    let moved_on_hit_tick = game.events().events_at(7).iter().any(
        |e| matches!(e, Event::FieldChange { id, attribute, .. }
            if *id == walker_id && attribute == "position"),
    );
    assert!(!moved_on_hit_tick, "no position change on the hit tick");
    let destroyed = game.events().events_at(7).iter().any(
        |e| matches!(e, Event::Destroy { id, .. } if *id == pid),
    );
    assert!(destroyed);
}

#[test]
fn test_projectiles_pass_through_their_own_shooter() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    let mut shooter = make_creature("gunner", 1000.0, 1000.0, 0.0);
    shooter.nominal_speed = 0.0;
    shooter.speed = 0.0;
    shooter.bullet_speed = 1.0;
    let shooter_id = game.add_game_object(GameObject::Creature(shooter));

    let GameObject::Creature(registered) = game.get_game_object_by_id(shooter_id).unwrap() else {
        panic!("expected creature");
    };
    let registered = registered.clone();
    let pid = game.spawn_projectile(&registered);

    // The slow projectile stays inside the shooter's box for several ticks
    // without hurting it.
    for _ in 0..3 {
        game.simulate_turn();
    }
    assert!(game.get_game_object_by_id(pid).is_some());
    let GameObject::Creature(c) = game.get_game_object_by_id(shooter_id).unwrap() else {
        panic!("expected creature");
    };
    assert_eq!(c.health, 100.0);
}

#[test]
fn test_obstacles_block_movement() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    let wall = Obstacle::new(Array1::from_vec(vec![1060.0, 1000.0]), 0.0, (50.0, 400.0));
    game.add_game_object(GameObject::Obstacle(wall));

    // Heading straight at the wall, 10 units per tick.
    let runner = make_creature("runner", 1000.0, 1000.0, 0.0);
    let id = game.add_game_object(GameObject::Creature(runner));

    for _ in 0..20 {
        game.simulate_turn();
    }

    let GameObject::Creature(c) = game.get_game_object_by_id(id).unwrap() else {
        panic!("expected creature");
    };
    assert!(
        c.body.pose.position[0] < 1060.0,
        "the wall is never crossed: x = {}",
        c.body.pose.position[0]
    );
}

#[test]
fn test_determinism_twice_simulated_logs_are_byte_identical() {
    let build = || {
        let mut game = Game::new(Arena::new(1000.0, 1000.0));
        game.add_game_object(GameObject::Creature(make_creature("a", 200.0, 200.0, 0.0)));
        game.add_game_object(GameObject::Creature(make_creature("b", 800.0, 800.0, 180.0)));
        game.add_game_object(GameObject::Creature(make_creature("c", 200.0, 800.0, 270.0)));
        game
    };

    let mut first = build();
    let mut second = build();
    for _ in 0..50 {
        first.simulate_turn();
        second.simulate_turn();
    }

    assert_eq!(first.events(), second.events());
    let json_first = serde_json::to_string(first.events()).expect("serialize");
    let json_second = serde_json::to_string(second.events()).expect("serialize");
    assert_eq!(json_first, json_second);
}

#[test]
fn test_draw_when_no_creature_survives_the_time_limit() {
    let mut game = Game::new(Arena::new(1000.0, 1000.0));
    let a = game.add_game_object(GameObject::Creature(make_creature("a", 200.0, 200.0, 0.0)));
    let b = game.add_game_object(GameObject::Creature(make_creature("b", 800.0, 800.0, 0.0)));

    // Kill both before stepping to the limit.
    game.damage_creature(a, 1000.0, b);
    game.damage_creature(b, 1000.0, a);

    let time_limit = 10;
    while game.tick() < time_limit {
        game.simulate_turn();
    }

    let (winner, score) = game.winner_by_score();
    assert_eq!(winner, "Draw");
    assert!(score.is_none());
}

#[test]
fn test_winner_is_the_highest_scoring_survivor() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    let a = game.add_game_object(GameObject::Creature(make_creature("alpha", 200.0, 200.0, 0.0)));
    let b = game.add_game_object(GameObject::Creature(make_creature("beta", 1800.0, 1800.0, 0.0)));

    // Give alpha a scoring edge via a hit on beta.
    game.damage_creature(b, 10.0, a);

    let (winner, score) = game.winner_by_score();
    assert_eq!(winner, "alpha");
    assert_eq!(score, Some(game.score_values().hit_given));
}

#[test]
fn test_cross_origin_projectiles_destroy_each_other() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    let mut a = make_creature("a", 900.0, 1000.0, 0.0);
    a.nominal_speed = 0.0;
    a.speed = 0.0;
    a.bullet_speed = 25.0;
    let mut b = make_creature("b", 1100.0, 1000.0, 180.0);
    b.nominal_speed = 0.0;
    b.speed = 0.0;
    b.bullet_speed = 25.0;
    let id_a = game.add_game_object(GameObject::Creature(a));
    let id_b = game.add_game_object(GameObject::Creature(b));

    let GameObject::Creature(ra) = game.get_game_object_by_id(id_a).unwrap() else {
        panic!("expected creature");
    };
    let ra = ra.clone();
    let GameObject::Creature(rb) = game.get_game_object_by_id(id_b).unwrap() else {
        panic!("expected creature");
    };
    let rb = rb.clone();

    let pa = game.spawn_projectile(&ra);
    let pb = game.spawn_projectile(&rb);
    game.remove_game_object(id_a);
    game.remove_game_object(id_b);

    // Head-on at 25/tick from 200 apart: both land on the midpoint on the
    // fourth tick and destroy each other.
    for _ in 0..5 {
        game.simulate_turn();
    }
    assert!(game.get_game_object_by_id(pa).is_none());
    assert!(game.get_game_object_by_id(pb).is_none());
}
