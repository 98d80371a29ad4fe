use crate::{
    camera::is_rectangle_on_screen,
    color::Rgb,
    rendering::{GpuCircle, GpuQuad},
};
use cgmath::{Vector2, Vector3, Vector4, Zero, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub trait RenderSink {
    fn circle(&mut self, center: Vector2<f64>, radius: f64, color: Rgb);

    /// Translucent circle used by the trail buffer. Sinks without blending
    /// can ignore it.
    fn faded_circle(&mut self, _center: Vector2<f64>, _radius: f64, _color: Rgb, _alpha: f32) {}

    fn viewport(&self) -> Vector2<f64>;
}

/// Collects GPU instances for one frame. Instances are painted in push order.
pub struct DrawHandler {
    pub viewport: Vector2<f64>,
    pub quads: Vec<GpuQuad>,
    pub circles: Vec<GpuCircle>,
}

impl DrawHandler {
    pub fn new(viewport: Vector2<f64>) -> DrawHandler {
        DrawHandler {
            viewport,
            quads: vec![],
            circles: vec![],
        }
    }

    fn push_circle(&mut self, pos: Vector2<f64>, radius: f64, color: Vector4<f32>) {
        self.circles.push(GpuCircle {
            position: pos.cast().unwrap_or(Vector2::zero()),
            radius: radius as f32,
            color,
        });
    }

    pub fn line(&mut self, start_pos: Vector2<f64>, end_pos: Vector2<f64>, thickness: f32, color: Rgb) {
        let start_to_end = end_pos - start_pos;
        let middle = start_pos + start_to_end * 0.5;
        let length = start_to_end.magnitude();
        if length <= f64::EPSILON {
            return;
        }
        self.quads.push(GpuQuad {
            position: middle.cast().unwrap_or(Vector2::zero()),
            rotation: start_to_end.y.atan2(start_to_end.x) as f32,
            size: Vector2 {
                x: length as f32,
                y: thickness,
            },
            color: Vector3 {
                x: color.r as f32 / 255.0,
                y: color.g as f32 / 255.0,
                z: color.b as f32 / 255.0,
            },
        });
    }
}

impl RenderSink for DrawHandler {
    fn circle(&mut self, center: Vector2<f64>, radius: f64, color: Rgb) {
        self.push_circle(center, radius, color.to_gpu(1.0));
    }

    fn faded_circle(&mut self, center: Vector2<f64>, radius: f64, color: Rgb, alpha: f32) {
        self.push_circle(center, radius, color.to_gpu(alpha));
    }

    fn viewport(&self) -> Vector2<f64> {
        self.viewport
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    pub enabled: bool,
    /// Fraction of opacity lost every frame.
    pub fade: f32,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            fade: 0.08,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TrailMark {
    center: Vector2<f64>,
    radius: f64,
    color: Rgb,
    alpha: f32,
}

/// Persistent trail buffer: every frame the older marks lose some opacity
/// before the new frame is drawn over them.
#[derive(Debug, Clone)]
pub struct Trails {
    pub fade: f32,
    marks: VecDeque<TrailMark>,
}

impl Trails {
    const MIN_ALPHA: f32 = 0.02;
    const MAX_MARKS: usize = 1 << 16;

    pub fn new(fade: f32) -> Self {
        Self {
            fade: fade.clamp(0.0, 1.0),
            marks: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn fade(&mut self) {
        let keep = 1.0 - self.fade.clamp(0.0, 1.0);
        self.marks.iter_mut().for_each(|mark| mark.alpha *= keep);
        self.marks.retain(|mark| mark.alpha >= Self::MIN_ALPHA);
    }

    pub fn record(&mut self, center: Vector2<f64>, radius: f64, color: Rgb) {
        if self.marks.len() >= Self::MAX_MARKS {
            self.marks.pop_front();
        }
        self.marks.push_back(TrailMark {
            center,
            radius,
            color,
            alpha: 1.0,
        });
    }

    /// Oldest marks first so newer ones blend on top.
    pub fn replay(&self, d: &mut dyn RenderSink) {
        let viewport = d.viewport();
        for mark in &self.marks {
            let half = Vector2::new(mark.radius, mark.radius);
            if is_rectangle_on_screen(mark.center - half, mark.center + half, viewport) {
                d.faded_circle(mark.center, mark.radius, mark.color, mark.alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec2;

    #[test]
    fn marks_fade_out() {
        let mut trails = Trails::new(0.5);
        trails.record(vec2(10.0, 10.0), 5.0, Rgb::WHITE);
        trails.fade();
        assert_eq!(trails.len(), 1);
        for _ in 0..10 {
            trails.fade();
        }
        assert!(trails.is_empty());
    }

    #[test]
    fn replay_uses_faded_alpha_and_culls() {
        let mut trails = Trails::new(0.5);
        trails.record(vec2(10.0, 10.0), 5.0, Rgb::WHITE);
        trails.record(vec2(-100.0, 10.0), 5.0, Rgb::WHITE);
        trails.fade();

        let mut d = DrawHandler::new(vec2(100.0, 100.0));
        trails.replay(&mut d);
        assert_eq!(d.circles.len(), 1);
        assert_eq!(d.circles[0].color.w, 0.5);
    }

    #[test]
    fn degenerate_lines_are_skipped() {
        let mut d = DrawHandler::new(vec2(100.0, 100.0));
        d.line(vec2(5.0, 5.0), vec2(5.0, 5.0), 1.0, Rgb::WHITE);
        assert!(d.quads.is_empty());
        d.line(vec2(0.0, 0.0), vec2(0.0, 10.0), 1.0, Rgb::WHITE);
        assert_eq!(d.quads.len(), 1);
        assert_eq!(d.quads[0].size.x, 10.0);
    }
}
