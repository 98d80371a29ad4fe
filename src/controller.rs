//! The drag-to-launch interaction.
//!
//! Pressing the primary button creates a pending body under the cursor. While
//! the button is held, the wheel grows or shrinks it, and releasing the button
//! launches it away from the cursor like a slingshot.

use crate::{
    body::{Body, BodyError, BodyId},
    space::SpaceSystem,
};
use cgmath::Vector2;

pub const DEFAULT_LAUNCH_SCALE: f64 = 0.1;

pub const MIN_ADJUSTABLE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEvent {
    PrimaryDown(Vector2<f64>),
    PrimaryUp(Vector2<f64>),
    Wheel { delta: f64, adjust_density: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Idle,
    Aiming,
}

#[derive(Debug, Clone)]
pub struct LaunchController {
    pub launch_scale: f64,
    pending: Option<Body>,
}

impl LaunchController {
    pub fn new(launch_scale: f64) -> Self {
        Self {
            launch_scale,
            pending: None,
        }
    }

    pub fn state(&self) -> LaunchState {
        match self.pending {
            Some(_) => LaunchState::Aiming,
            None => LaunchState::Idle,
        }
    }

    pub fn pending(&self) -> Option<&Body> {
        self.pending.as_ref()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Feeds one input event. Returns the id of the body launched into `space`
    /// by this event, if any. Events that do not apply to the current state
    /// are ignored.
    pub fn handle(
        &mut self,
        event: ControllerEvent,
        space: &mut SpaceSystem,
    ) -> Result<Option<BodyId>, BodyError> {
        match event {
            ControllerEvent::PrimaryDown(cursor) => {
                if self.pending.is_none() {
                    self.pending = Some(Body::at(cursor));
                }
                Ok(None)
            }
            ControllerEvent::Wheel {
                delta,
                adjust_density,
            } => {
                let Some(body) = self.pending.as_mut() else {
                    return Ok(None);
                };
                let (radius, density) = if adjust_density {
                    (body.radius(), (body.density() + delta).max(MIN_ADJUSTABLE))
                } else {
                    ((body.radius() + delta).max(MIN_ADJUSTABLE), body.density())
                };
                body.set_radius_and_density(radius, density)?;
                Ok(None)
            }
            ControllerEvent::PrimaryUp(cursor) => {
                let Some(mut body) = self.pending.take() else {
                    return Ok(None);
                };
                body.vel = (body.pos - cursor) * self.launch_scale;
                tracing::debug!(
                    radius = body.radius(),
                    density = body.density(),
                    vx = body.vel.x,
                    vy = body.vel.y,
                    "launched body"
                );
                Ok(Some(space.add(body)))
            }
        }
    }
}

impl Default for LaunchController {
    fn default() -> Self {
        Self::new(DEFAULT_LAUNCH_SCALE)
    }
}
