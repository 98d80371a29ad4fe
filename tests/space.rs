mod common;

use cgmath::{InnerSpace, Vector2, Zero, vec2};
use common::{RecordingSink, approx_eq, approx_vec};
use gravity_sandbox::{
    body::{Body, BodyParams},
    color::Rgb,
    drawing::TrailSettings,
    space::{CollisionPolicy, GravityOutcome, PhysicsConfig, SpaceSystem},
};

const DT: f64 = 1.0 / 60.0;

fn body(pos: Vector2<f64>, vel: Vector2<f64>, radius: f64, density: f64) -> Body {
    Body::new(BodyParams {
        color: Some(Rgb::WHITE),
        radius: Some(radius),
        density: Some(density),
        pos,
        vel,
        ..Default::default()
    })
    .unwrap()
}

fn recoil_system() -> SpaceSystem {
    SpaceSystem::new(PhysicsConfig {
        collision: CollisionPolicy::Recoil,
        ..Default::default()
    })
}

#[test]
fn empty_tick_is_a_no_op() {
    let mut space = SpaceSystem::default();
    space.tick(DT);
    space.tick(0.0);
    assert!(space.is_empty());

    let mut sink = RecordingSink::new(800.0, 600.0);
    space.draw(&mut sink);
    assert!(sink.circles.is_empty());
}

#[test]
fn lone_body_drifts() {
    let mut space = SpaceSystem::default();
    let id = space.add(body(vec2(10.0, 10.0), vec2(1.0, 0.5), 5.0, 1.0));
    space.tick(DT);
    let moved = space.get(id).unwrap();
    assert!(approx_vec(moved.pos, vec2(11.0, 10.5), 1e-12));
    assert_eq!(moved.vel, vec2(1.0, 0.5));
}

#[test]
fn equal_bodies_accelerate_symmetrically() {
    let mut space = SpaceSystem::default();
    let a = space.add(body(vec2(-100.0, 0.0), vec2(0.0, 1.0), 10.0, 1.0));
    let b = space.add(body(vec2(100.0, 0.0), vec2(0.0, -1.0), 10.0, 1.0));

    space.tick(DT);

    let dv_a = space.get(a).unwrap().vel - vec2(0.0, 1.0);
    let dv_b = space.get(b).unwrap().vel - vec2(0.0, -1.0);
    assert!(dv_a.x > 0.0, "a is pulled towards b");
    assert!(approx_eq(dv_a.magnitude(), dv_b.magnitude(), 1e-12));
    assert!(approx_vec(dv_a + dv_b, Vector2::zero(), 1e-12));
    assert!(approx_vec(space.total_momentum(), Vector2::zero(), 1e-9));
}

#[test]
fn momentum_is_conserved_without_collisions() {
    let mut space = SpaceSystem::default();
    space.add(body(vec2(100.0, 100.0), vec2(0.5, 0.0), 20.0, 1.0));
    space.add(body(vec2(500.0, 500.0), vec2(-0.2, 0.3), 10.0, 2.0));
    space.add(body(vec2(300.0, 50.0), vec2(0.0, 0.0), 5.0, 4.0));

    let before = space.total_momentum();
    for _ in 0..10 {
        space.tick(DT);
    }
    assert_eq!(space.len(), 3);
    let scale = space.total_mass();
    assert!((space.total_momentum() - before).magnitude() <= 1e-9 * scale);
}

#[test]
fn overlapping_bodies_merge_into_one() {
    let mut space = SpaceSystem::default();
    let a = space.add(body(vec2(0.0, 0.0), Vector2::zero(), 10.0, 1.0));
    let b = space.add(body(vec2(12.0, 0.0), Vector2::zero(), 6.0, 3.0));
    let total = space.total_mass();

    space.tick(DT);

    assert_eq!(space.len(), 1);
    assert!(space.get(a).is_none());
    assert!(space.get(b).is_none());
    let (_, merged) = space.iter().next().unwrap();
    assert!(approx_eq(merged.mass(), total, 1e-12));
}

#[test]
fn merges_are_visible_to_later_bodies_in_the_same_tick() {
    let mut space = SpaceSystem::default();
    space.add(body(vec2(0.0, 0.0), Vector2::zero(), 10.0, 1.0));
    space.add(body(vec2(1.0, 0.0), Vector2::zero(), 10.0, 1.0));
    space.add(body(vec2(0.0, 1.0), Vector2::zero(), 10.0, 1.0));
    let total = space.total_mass();

    space.tick(DT);

    assert_eq!(space.len(), 1);
    assert!(approx_eq(space.total_mass(), total, 1e-12));
}

#[test]
fn merged_body_blends_by_mass() {
    let mut red = body(vec2(0.0, 0.0), vec2(1.0, 0.0), 10.0, 1.0);
    red.color = Rgb::RED;
    let mut blue = body(vec2(8.0, 0.0), vec2(-1.0, 0.0), 10.0, 3.0);
    blue.color = Rgb::BLUE;

    let interaction = red.interaction(&blue, 0.1, DT);
    let merged = red.merged_with(&blue, &interaction, false);

    // red carries a quarter of the mass
    assert!(approx_eq(merged.mass(), red.mass() + blue.mass(), 1e-12));
    assert!(approx_eq(merged.density(), 2.5, 1e-12));
    assert_eq!(merged.color, Rgb::new(63, 0, 191));
    assert!(approx_vec(merged.pos, vec2(3.0, 0.0), 1e-12));
    assert_eq!(merged.vel, Vector2::zero());

    let merged = red.merged_with(&blue, &interaction, true);
    assert!(approx_vec(merged.momentum(), red.momentum() + blue.momentum(), 1e-9));
}

#[test]
fn momentum_conserving_merges() {
    let mut space = SpaceSystem::new(PhysicsConfig {
        merge_conserves_momentum: true,
        ..Default::default()
    });
    space.add(body(vec2(0.0, 0.0), vec2(2.0, 0.0), 10.0, 1.0));
    space.add(body(vec2(5.0, 0.0), vec2(0.0, 1.0), 10.0, 1.0));

    space.tick(DT);

    assert_eq!(space.len(), 1);
    let (_, merged) = space.iter().next().unwrap();
    assert!(approx_vec(merged.vel, vec2(1.0, 0.5), 1e-9));
}

#[test]
fn recoil_pushes_bodies_apart() {
    let mut space = recoil_system();
    let a = space.add(body(vec2(0.0, 0.0), Vector2::zero(), 10.0, 1.0));
    let b = space.add(body(vec2(15.0, 0.0), Vector2::zero(), 10.0, 1.0));

    space.tick(DT);

    assert_eq!(space.len(), 2);
    let (a, b) = (space.get(a).unwrap(), space.get(b).unwrap());
    assert!(a.vel.x < 0.0 && b.vel.x > 0.0);
    assert!((b.pos - a.pos).magnitude() >= 20.0);
    assert_eq!(a.recoil(), Vector2::zero());
    assert_eq!(b.recoil(), Vector2::zero());
}

#[test]
fn recoil_separates_coincident_bodies() {
    let mut space = recoil_system();
    let a = space.add(body(vec2(100.0, 100.0), Vector2::zero(), 10.0, 1.0));
    let b = space.add(body(vec2(100.0, 100.0), Vector2::zero(), 10.0, 1.0));

    space.tick(DT);

    let (pa, pb) = (space.get(a).unwrap().pos, space.get(b).unwrap().pos);
    assert!(approx_eq((pb - pa).magnitude(), 20.0, 1e-12));
    assert!(approx_vec((pa + pb) / 2.0, vec2(100.0, 100.0), 1e-12));

    for _ in 0..100 {
        space.tick(DT);
    }
    let (pa, pb) = (space.get(a).unwrap().pos, space.get(b).unwrap().pos);
    assert!(approx_vec((pa + pb) / 2.0, vec2(100.0, 100.0), 1e-9));
}

#[test]
fn recoil_moves_the_lighter_body_more() {
    let mut space = recoil_system();
    let heavy = space.add(body(vec2(0.0, 0.0), Vector2::zero(), 10.0, 9.0));
    let light = space.add(body(vec2(18.0, 0.0), Vector2::zero(), 10.0, 1.0));

    let dt = 1e-9;
    space.tick(dt);

    let heavy_shift = space.get(heavy).unwrap().pos.x.abs();
    let light_shift = space.get(light).unwrap().pos.x - 18.0;
    assert!(approx_eq(heavy_shift, 0.2, 1e-6));
    assert!(approx_eq(light_shift, 1.8, 1e-6));
}

#[test]
fn massless_and_missing_bodies_are_skipped() {
    let mut space = SpaceSystem::default();
    let mut ghost = body(vec2(0.0, 0.0), Vector2::zero(), 10.0, 1.0);
    ghost.set_mass_holding_density(0.0);
    let ghost = space.add(ghost);
    let other = space.add(body(vec2(100.0, 0.0), Vector2::zero(), 10.0, 1.0));

    assert_eq!(space.apply_gravity_acceleration(ghost, DT), GravityOutcome::Skipped);
    assert_eq!(space.get(ghost).unwrap().vel, Vector2::zero());
    assert_eq!(space.apply_gravity_acceleration(other, DT), GravityOutcome::Applied);

    space.remove(other);
    assert_eq!(space.apply_gravity_acceleration(other, DT), GravityOutcome::Skipped);
}

#[test]
fn add_and_remove_are_idempotent() {
    let mut space = SpaceSystem::default();
    let ids = space.extend([
        body(vec2(0.0, 0.0), Vector2::zero(), 1.0, 1.0),
        body(vec2(50.0, 0.0), Vector2::zero(), 1.0, 1.0),
    ]);
    assert_eq!(space.len(), 2);

    assert!(space.remove(ids[0]).is_some());
    assert!(space.remove(ids[0]).is_none());
    space.remove_all(ids.clone());
    space.remove_all(ids);
    assert!(space.is_empty());
}

#[test]
fn ring_spawns_tangential_bodies() {
    let mut space = SpaceSystem::default();
    let ids = space.spawn_bodies_on_circle(4, Vector2::zero(), 100.0, 1.0);
    assert_eq!(ids.len(), 4);

    let expected_pos = [
        vec2(100.0, 0.0),
        vec2(0.0, 100.0),
        vec2(-100.0, 0.0),
        vec2(0.0, -100.0),
    ];
    let expected_color = [
        Rgb::RED,
        Rgb::new(127, 255, 0),
        Rgb::new(0, 255, 255),
        Rgb::new(127, 0, 255),
    ];
    for ((id, pos), color) in ids.iter().zip(expected_pos).zip(expected_color) {
        let body = space.get(*id).unwrap();
        assert!(approx_vec(body.pos, pos, 1e-12), "{:?} != {:?}", body.pos, pos);
        assert!(approx_eq(body.vel.magnitude(), 1.0, 1e-12));
        assert!(body.vel.dot(body.pos).abs() < 1e-9);
        // counter-clockwise: offset x velocity is positive
        assert!(body.pos.x * body.vel.y - body.pos.y * body.vel.x > 0.0);
        assert_eq!(body.color, color);
    }
}

#[test]
fn ring_of_nothing() {
    let mut space = SpaceSystem::default();
    assert!(space.spawn_bodies_on_circle(0, Vector2::zero(), 100.0, 1.0).is_empty());
    assert!(space.is_empty());
}

#[test]
fn ring_is_offset_by_center() {
    let mut space = SpaceSystem::default();
    let ids = space.spawn_bodies_on_circle(3, vec2(400.0, 300.0), 50.0, 2.0);
    for id in ids {
        let body = space.get(id).unwrap();
        assert!(approx_eq((body.pos - vec2(400.0, 300.0)).magnitude(), 50.0, 1e-12));
        assert!(approx_eq(body.vel.magnitude(), 2.0, 1e-12));
    }
}

#[test]
fn draw_culls_and_trails_fade() {
    let mut space = SpaceSystem::default().with_trails(TrailSettings {
        enabled: true,
        fade: 0.25,
    });
    space.add(body(vec2(100.0, 100.0), Vector2::zero(), 10.0, 1.0));
    space.add(body(vec2(-500.0, 100.0), Vector2::zero(), 10.0, 1.0));

    let mut first = RecordingSink::new(800.0, 600.0);
    space.draw(&mut first);
    assert_eq!(first.circles.len(), 1);
    assert!(first.faded.is_empty());

    let mut second = RecordingSink::new(800.0, 600.0);
    space.draw(&mut second);
    assert_eq!(second.circles.len(), 1);
    assert_eq!(second.faded.len(), 1);
    assert_eq!(second.faded[0].3, 0.75);
}

#[test]
fn disabling_trails_drops_the_buffer() {
    let mut space = SpaceSystem::default().with_trails(TrailSettings::default());
    assert!(space.trails.is_some());
    space.set_trails(TrailSettings {
        enabled: false,
        ..Default::default()
    });
    assert!(space.trails.is_none());
}
