use crate::{
    body::{Body, BodyId, BodyList},
    color::hsv_to_rgb,
    drawing::{RenderSink, TrailSettings, Trails},
};
use cgmath::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRAVITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionPolicy {
    #[default]
    Merge,
    Recoil,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub collision: CollisionPolicy,
    pub merge_conserves_momentum: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            collision: CollisionPolicy::Merge,
            merge_conserves_momentum: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityOutcome {
    Skipped,
    Applied,
    Merged { other: BodyId, into: BodyId },
}

#[derive(Debug, Clone)]
pub struct SpaceSystem {
    pub bodies: BodyList,
    pub physics: PhysicsConfig,
    pub trails: Option<Trails>,
}

impl SpaceSystem {
    pub fn new(physics: PhysicsConfig) -> Self {
        Self {
            bodies: BodyList::new(),
            physics,
            trails: None,
        }
    }

    pub fn with_trails(mut self, settings: TrailSettings) -> Self {
        self.set_trails(settings);
        self
    }

    pub fn set_trails(&mut self, settings: TrailSettings) {
        match (&mut self.trails, settings.enabled) {
            (Some(trails), true) => trails.fade = settings.fade,
            (None, true) => self.trails = Some(Trails::new(settings.fade)),
            (_, false) => self.trails = None,
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter()
    }

    pub fn add(&mut self, body: Body) -> BodyId {
        self.bodies.push(body)
    }

    pub fn extend(&mut self, bodies: impl IntoIterator<Item = Body>) -> Vec<BodyId> {
        bodies.into_iter().map(|body| self.add(body)).collect()
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        self.bodies.remove(id)
    }

    pub fn remove_all(&mut self, ids: impl IntoIterator<Item = BodyId>) {
        ids.into_iter().for_each(|id| {
            self.bodies.remove(id);
        });
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        if let Some(trails) = &mut self.trails {
            trails.clear();
        }
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|(_, body)| body.mass()).sum()
    }

    pub fn total_momentum(&self) -> Vector2<f64> {
        self.bodies
            .iter()
            .fold(Vector2::zero(), |sum, (_, body)| sum + body.momentum())
    }

    /// Advances the system by `dt` seconds.
    ///
    /// Gravity is applied body by body against the live set, so a merge made
    /// while handling one body is already visible to the bodies handled after
    /// it. Once every body has been handled, all survivors move, including
    /// bodies produced by merges during this tick.
    pub fn tick(&mut self, dt: f64) {
        if self.bodies.is_empty() {
            return;
        }
        let snapshot: Vec<BodyId> = self.bodies.ids().collect();
        for id in snapshot {
            if let GravityOutcome::Merged { other, into } = self.apply_gravity_acceleration(id, dt) {
                tracing::debug!(?id, ?other, ?into, "bodies merged");
            }
        }
        self.bodies.iter_mut().for_each(|(_, body)| body.move_by(dt));
    }

    pub fn apply_gravity_acceleration(&mut self, id: BodyId, dt: f64) -> GravityOutcome {
        let Some(body) = self.bodies.get(id) else {
            return GravityOutcome::Skipped;
        };
        if body.mass() == 0.0 {
            return GravityOutcome::Skipped;
        }
        let mut body = body.clone();
        let own_mass = body.mass();

        let others: Vec<BodyId> = self.bodies.ids().filter(|&other| other != id).collect();
        for other_id in others {
            let Some(other) = self.bodies.get(other_id) else {
                continue;
            };
            let interaction = body.interaction(other, self.physics.gravity, dt);
            if !interaction.colliding() {
                body.vel += interaction.acceleration;
                continue;
            }

            match self.physics.collision {
                CollisionPolicy::Merge => {
                    let merged =
                        body.merged_with(other, &interaction, self.physics.merge_conserves_momentum);
                    self.bodies.remove(id);
                    self.bodies.remove(other_id);
                    let into = self.bodies.push(merged);
                    return GravityOutcome::Merged {
                        other: other_id,
                        into,
                    };
                }
                CollisionPolicy::Recoil => {
                    // Coincident centres share the +x fallback, so the pair
                    // must push along opposite signs of it.
                    let direction = if interaction.distance <= f64::EPSILON && id > other_id {
                        -interaction.direction
                    } else {
                        interaction.direction
                    };
                    let other_share = 1.0 - own_mass / (own_mass + other.mass());
                    body.add_recoil(direction * interaction.overlap * other_share);
                    body.vel -= interaction.acceleration * other_share;
                }
            }
        }

        if let Some(slot) = self.bodies.get_mut(id) {
            *slot = body;
        }
        GravityOutcome::Applied
    }

    pub fn spawn_bodies_on_circle(
        &mut self,
        count: usize,
        center: Vector2<f64>,
        radius: f64,
        speed: f64,
    ) -> Vec<BodyId> {
        if count == 0 {
            return vec![];
        }
        let step = 360.0 / count as f64;
        let ids = (0..count)
            .map(|i| {
                let degrees = i as f64 * step;
                let (sin, cos) = Deg(degrees).sin_cos();
                let mut body = Body::at(center + Vector2::new(cos, sin) * radius);
                body.vel = Vector2::new(-sin, cos) * speed;
                body.color = hsv_to_rgb(degrees, 1.0, 1.0);
                self.add(body)
            })
            .collect();
        tracing::debug!(count, radius, speed, "spawned ring");
        ids
    }

    pub fn draw(&mut self, d: &mut dyn RenderSink) {
        if let Some(trails) = &mut self.trails {
            trails.fade();
            trails.replay(d);
            self.bodies
                .iter()
                .for_each(|(_, body)| trails.record(body.pos, body.radius(), body.color));
        }
        self.bodies.iter().for_each(|(_, body)| body.draw(d));
    }
}

impl Default for SpaceSystem {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
