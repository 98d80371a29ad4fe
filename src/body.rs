use crate::{
    camera::is_rectangle_on_screen,
    color::Rgb,
    drawing::RenderSink,
};
use cgmath::*;
use slotmap::{SlotMap, new_key_type};
use std::f64::consts::PI;
use thiserror::Error;

pub const DEFAULT_RADIUS: f64 = 10.0;
pub const DEFAULT_DENSITY: f64 = 1.0;

/// Motion is normalised to 60 steps per second so the configured frame rate
/// does not change the trajectories.
pub const STEPS_PER_SECOND: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BodyError {
    #[error("radius, density and mass were all given; at most two may be set")]
    InvalidParameters,
    #[error("{quantity} must be positive and finite, got {value}")]
    NonPositive { quantity: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParams {
    pub color: Option<Rgb>,
    pub radius: Option<f64>,
    pub density: Option<f64>,
    pub mass: Option<f64>,
    pub vel: Vector2<f64>,
    pub pos: Vector2<f64>,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            color: None,
            radius: None,
            density: None,
            mass: None,
            vel: Vector2::zero(),
            pos: Vector2::zero(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub color: Rgb,
    radius: f64,
    density: f64,
    recoil: Vector2<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    pub distance: f64,
    /// Unit vector from the first body towards the other. Falls back to +x
    /// when both centres coincide; callers resolving the pair must flip it for
    /// one of the two bodies.
    pub direction: Vector2<f64>,
    pub acceleration: Vector2<f64>,
    pub overlap: f64,
}

impl Interaction {
    pub fn colliding(&self) -> bool {
        self.overlap > 0.0
    }
}

fn positive(quantity: &'static str, value: f64) -> Result<f64, BodyError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(BodyError::NonPositive { quantity, value })
    }
}

pub fn sphere_mass(radius: f64, density: f64) -> f64 {
    density * (4.0 / 3.0) * PI * radius.powi(3)
}

pub fn sphere_radius(mass: f64, density: f64) -> f64 {
    (mass * 3.0 / (density * 4.0 * PI)).cbrt()
}

impl Body {
    pub fn new(params: BodyParams) -> Result<Self, BodyError> {
        let BodyParams {
            color,
            radius,
            density,
            mass,
            vel,
            pos,
        } = params;

        let (radius, density) = match (radius, density, mass) {
            (Some(_), Some(_), Some(_)) => return Err(BodyError::InvalidParameters),
            (None, density, Some(mass)) => {
                let density = positive("density", density.unwrap_or(DEFAULT_DENSITY))?;
                let mass = positive("mass", mass)?;
                (sphere_radius(mass, density), density)
            }
            (Some(radius), None, Some(mass)) => {
                let radius = positive("radius", radius)?;
                let mass = positive("mass", mass)?;
                (radius, mass / sphere_mass(radius, 1.0))
            }
            (radius, density, None) => (
                positive("radius", radius.unwrap_or(DEFAULT_RADIUS))?,
                positive("density", density.unwrap_or(DEFAULT_DENSITY))?,
            ),
        };

        Ok(Self {
            pos,
            vel,
            color: color.unwrap_or_else(|| Rgb::random(&mut rand::thread_rng())),
            radius,
            density,
            recoil: Vector2::zero(),
        })
    }

    pub fn at(pos: Vector2<f64>) -> Self {
        Self {
            pos,
            vel: Vector2::zero(),
            color: Rgb::random(&mut rand::thread_rng()),
            radius: DEFAULT_RADIUS,
            density: DEFAULT_DENSITY,
            recoil: Vector2::zero(),
        }
    }

    pub(crate) fn from_mass(
        pos: Vector2<f64>,
        vel: Vector2<f64>,
        color: Rgb,
        mass: f64,
        density: f64,
    ) -> Self {
        Self {
            pos,
            vel,
            color,
            radius: sphere_radius(mass.max(0.0), density),
            density,
            recoil: Vector2::zero(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn mass(&self) -> f64 {
        sphere_mass(self.radius, self.density)
    }

    pub fn recoil(&self) -> Vector2<f64> {
        self.recoil
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.vel * self.mass()
    }

    pub fn set_radius_and_density(&mut self, radius: f64, density: f64) -> Result<(), BodyError> {
        self.radius = positive("radius", radius)?;
        self.density = positive("density", density)?;
        Ok(())
    }

    pub fn set_mass_holding_density(&mut self, mass: f64) {
        self.radius = sphere_radius(mass.max(0.0), self.density);
    }

    pub fn move_by(&mut self, dt: f64) {
        self.pos += self.vel * dt * STEPS_PER_SECOND;
        self.pos -= self.recoil;
        self.recoil = Vector2::zero();
    }

    pub(crate) fn add_recoil(&mut self, recoil: Vector2<f64>) {
        self.recoil += recoil;
    }

    pub fn interaction(&self, other: &Body, gravity: f64, dt: f64) -> Interaction {
        let offset = other.pos - self.pos;
        let distance = offset.magnitude();
        let overlap = self.radius + other.radius - distance;

        let mass = self.mass();
        if distance <= f64::EPSILON || mass == 0.0 {
            return Interaction {
                distance,
                direction: Vector2::unit_x(),
                acceleration: Vector2::zero(),
                overlap,
            };
        }

        let direction = offset / distance;
        let force = gravity * mass * other.mass() / (distance * distance);
        Interaction {
            distance,
            direction,
            acceleration: direction * force / mass * dt * STEPS_PER_SECOND,
            overlap,
        }
    }

    pub fn merged_with(&self, other: &Body, interaction: &Interaction, keep_momentum: bool) -> Body {
        let total_mass = self.mass() + other.mass();
        let proportion = if total_mass > 0.0 {
            self.mass() / total_mass
        } else {
            0.5
        };
        let density = proportion * self.density + (1.0 - proportion) * other.density;
        let pos = self.pos + interaction.direction * interaction.distance / 2.0 * (1.0 - proportion);
        let vel = if keep_momentum && total_mass > 0.0 {
            (self.momentum() + other.momentum()) / total_mass
        } else {
            Vector2::zero()
        };
        Body::from_mass(
            pos,
            vel,
            self.color.blend(other.color, proportion),
            total_mass,
            density,
        )
    }

    pub fn bounds(&self) -> (Vector2<f64>, Vector2<f64>) {
        let half = Vector2::new(self.radius, self.radius);
        (self.pos - half, self.pos + half)
    }

    pub fn draw(&self, d: &mut dyn RenderSink) {
        let (min, max) = self.bounds();
        if is_rectangle_on_screen(min, max, d.viewport()) {
            d.circle(self.pos, self.radius, self.color);
        }
    }
}

new_key_type! {
    pub struct BodyId;
}

#[derive(Debug, Clone, Default)]
pub struct BodyList {
    bodies: SlotMap<BodyId, Body>,
}

impl BodyList {
    pub fn new() -> Self {
        Self {
            bodies: SlotMap::with_key(),
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, body: Body) -> BodyId {
        self.bodies.insert(body)
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        self.bodies.remove(id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(id)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyId, &mut Body)> {
        self.bodies.iter_mut()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }
}
