use crate::{
    body::{Body, BodyParams},
    color::Rgb,
    controller::DEFAULT_LAUNCH_SCALE,
    drawing::TrailSettings,
    space::{PhysicsConfig, SpaceSystem},
};
use cgmath::{Vector2, vec2};
use serde::{Deserialize, Serialize};

pub const WINDOW_SIZE: [f32; 2] = [800.0, 600.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Scenario {
    Empty,
    Pair,
    Ring {
        count: usize,
        center: Vector2<f64>,
        radius: f64,
        speed: f64,
    },
}

impl Scenario {
    pub const DEFAULT_RING: Scenario = Scenario::Ring {
        count: 12,
        center: Vector2 { x: 400.0, y: 300.0 },
        radius: 200.0,
        speed: 1.0,
    };

    pub fn populate(&self, space: &mut SpaceSystem) -> anyhow::Result<()> {
        match *self {
            Scenario::Empty => {}
            Scenario::Pair => {
                space.add(Body::new(BodyParams {
                    color: Some(Rgb::RED),
                    pos: vec2(100.0, 100.0),
                    radius: Some(20.0),
                    ..Default::default()
                })?);
                space.add(Body::new(BodyParams {
                    color: Some(Rgb::BLUE),
                    pos: vec2(500.0, 500.0),
                    ..Default::default()
                })?);
            }
            Scenario::Ring {
                count,
                center,
                radius,
                speed,
            } => {
                space.spawn_bodies_on_circle(count, center, radius, speed);
            }
        }
        tracing::info!(scenario = ?self, bodies = space.len(), "scenario loaded");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub target_fps: Option<u32>,
    pub speed: f64,
    /// Seconds per tick. `None` uses wall-clock frame time.
    pub fixed_step: Option<f64>,
    pub physics: PhysicsConfig,
    pub trails: TrailSettings,
    pub launch_scale: f64,
    pub scroll_points_per_step: f32,
    pub scenario: Scenario,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_fps: Some(60),
            speed: 1.0,
            fixed_step: None,
            physics: PhysicsConfig::default(),
            trails: TrailSettings::default(),
            launch_scale: DEFAULT_LAUNCH_SCALE,
            scroll_points_per_step: 40.0,
            scenario: Scenario::Pair,
        }
    }
}

impl Settings {
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let loaded = storage.and_then(|storage| eframe::get_value::<Settings>(storage, eframe::APP_KEY));
        match loaded {
            Some(settings) => {
                tracing::info!("loaded settings from storage");
                settings.sanitized()
            }
            None => {
                tracing::info!("using default settings");
                Settings::default()
            }
        }
    }

    pub fn store(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
        tracing::debug!("settings saved");
    }

    pub fn sanitized(mut self) -> Self {
        self.speed = self.speed.max(0.0);
        self.fixed_step = self.fixed_step.filter(|step| *step > 0.0);
        self.launch_scale = self.launch_scale.max(0.0);
        if self.scroll_points_per_step <= 0.0 {
            self.scroll_points_per_step = Settings::default().scroll_points_per_step;
        }
        self.trails.fade = self.trails.fade.clamp(0.0, 1.0);
        self
    }

    pub fn step(&self, frame_dt: f64) -> f64 {
        self.fixed_step.unwrap_or(frame_dt) * self.speed
    }
}
