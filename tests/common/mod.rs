#![allow(dead_code)]

use cgmath::{InnerSpace, Vector2};
use gravity_sandbox::{color::Rgb, drawing::RenderSink};

pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * (1.0 + a.abs().max(b.abs()))
}

pub fn approx_vec(a: Vector2<f64>, b: Vector2<f64>, tol: f64) -> bool {
    (a - b).magnitude() <= tol * (1.0 + a.magnitude().max(b.magnitude()))
}

/// Render sink that only records what it was asked to draw.
pub struct RecordingSink {
    pub size: Vector2<f64>,
    pub circles: Vec<(Vector2<f64>, f64, Rgb)>,
    pub faded: Vec<(Vector2<f64>, f64, Rgb, f32)>,
}

impl RecordingSink {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Vector2::new(width, height),
            circles: vec![],
            faded: vec![],
        }
    }
}

impl RenderSink for RecordingSink {
    fn circle(&mut self, center: Vector2<f64>, radius: f64, color: Rgb) {
        self.circles.push((center, radius, color));
    }

    fn faded_circle(&mut self, center: Vector2<f64>, radius: f64, color: Rgb, alpha: f32) {
        self.faded.push((center, radius, color, alpha));
    }

    fn viewport(&self) -> Vector2<f64> {
        self.size
    }
}
