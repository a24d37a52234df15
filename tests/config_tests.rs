#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use autochess::simulation::config::{ConfigError, CreatureSpec, is_valid_position, place_creature};
use autochess::simulation::entity::GameObject;
use autochess::simulation::game::{Arena, Game};
use autochess::simulation::geometry::distance;
use autochess::simulation::obstacle::Obstacle;
use ndarray::Array1;

fn test_spec() -> CreatureSpec {
    CreatureSpec {
        name: "Tank".to_string(),
        sprite_filename: "tank.png".to_string(),
        health: 100.0,
        speed_range: (5, 10),
        max_turn_rate_range: (10, 30),
        shoot_cooldown_range: (3, 8),
        bounding_box_size: (50.0, 100.0),
        damage_range: (5, 15),
        bullet_speed_range: (15, 25),
        bullet_range_range: (150, 300),
        brake_power_range: (0.3, 0.7),
        brake_cooldown_range: (5, 15),
    }
}

#[test]
fn test_rolled_stats_stay_within_their_ranges() {
    let spec = test_spec();
    let mut rng = rand::rng();

    for index in 0..50 {
        let creature = spec
            .roll(index, Array1::from_vec(vec![500.0, 500.0]), &mut rng)
            .expect("valid spec");

        assert_eq!(creature.name, format!("Tank {index}"));
        assert_eq!(creature.health, 100.0);
        assert!((5.0..=10.0).contains(&creature.nominal_speed));
        assert!((10.0..=30.0).contains(&creature.max_turn_rate));
        assert!((3..=8).contains(&creature.shoot_cooldown));
        assert!((5.0..=15.0).contains(&creature.damage));
        assert!((15.0..=25.0).contains(&creature.bullet_speed));
        assert!((150.0..=300.0).contains(&creature.bullet_range));
        assert!((0.3..=0.7).contains(&creature.brake_power));
        assert!((5..=15).contains(&creature.brake_cooldown));
        assert!((0.0..360.0).contains(&creature.body.pose.angle));
        assert_eq!(creature.body.collider.size(), (50.0, 100.0));
    }
}

#[test]
fn test_empty_range_fails_only_that_roll() {
    let mut spec = test_spec();
    spec.speed_range = (10, 5);
    let mut rng = rand::rng();

    match spec.roll(0, Array1::from_vec(vec![500.0, 500.0]), &mut rng) {
        Err(ConfigError::EmptyRange { field: "speed" }) => {}
        other => panic!("expected empty speed range, got {other:?}"),
    }

    // Fixing the range makes the same spec usable again.
    spec.speed_range = (5, 10);
    assert!(spec.roll(0, Array1::from_vec(vec![500.0, 500.0]), &mut rng).is_ok());
}

#[test]
fn test_placement_respects_minimum_distance_and_assigns_unique_ids() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    let spec = test_spec();
    let mut rng = rand::rng();
    let min_distance = 150.0;

    let mut ids = Vec::new();
    for index in 0..6 {
        ids.push(
            place_creature(&mut game, &spec, index, min_distance, &mut rng).expect("roomy arena"),
        );
    }

    let mut deduped = ids.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len());

    let positions: Vec<Array1<f32>> = game
        .living_creatures()
        .map(|c| c.body.pose.position.clone())
        .collect();
    assert_eq!(positions.len(), 6);
    for (i, a) in positions.iter().enumerate() {
        assert!(game.arena().contains(a));
        for b in positions.iter().skip(i + 1) {
            assert!(
                distance(a, b) >= min_distance,
                "placed creatures {a:?} and {b:?} too close"
            );
        }
    }
}

#[test]
fn test_valid_position_rejects_obstacle_clearance_violations() {
    let mut game = Game::new(Arena::new(2000.0, 2000.0));
    game.add_game_object(GameObject::Obstacle(Obstacle::new(
        Array1::from_vec(vec![1000.0, 1000.0]),
        0.0,
        (100.0, 400.0),
    )));

    // Half-width 50 plus min distance 100: anything within 150 is rejected.
    let too_close = Array1::from_vec(vec![1100.0, 1000.0]);
    assert!(!is_valid_position(&game, &too_close, 100.0));

    let clear = Array1::from_vec(vec![1200.0, 1000.0]);
    assert!(is_valid_position(&game, &clear, 100.0));
}

#[test]
fn test_valid_position_uses_half_open_arena_bounds() {
    let game = Game::new(Arena::new(1000.0, 1000.0));
    // The zero edge is a valid placement; the far edge is not.
    assert!(is_valid_position(&game, &Array1::from_vec(vec![0.0, 500.0]), 10.0));
    assert!(is_valid_position(&game, &Array1::from_vec(vec![500.0, 0.0]), 10.0));
    assert!(!is_valid_position(&game, &Array1::from_vec(vec![1000.0, 500.0]), 10.0));
    assert!(!is_valid_position(&game, &Array1::from_vec(vec![500.0, 1000.0]), 10.0));
    assert!(!is_valid_position(&game, &Array1::from_vec(vec![-1.0, 500.0]), 10.0));
    assert!(is_valid_position(&game, &Array1::from_vec(vec![500.0, 500.0]), 10.0));
}
