use crate::rendering::GpuCamera;
use cgmath::*;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub width: f64,
    pub height: f64,
}

impl Camera {
    pub fn new(width: f64, height: f64) -> Camera {
        Self { width, height }
    }

    pub fn size(&self) -> Vector2<f64> {
        Vector2 {
            x: self.width,
            y: self.height,
        }
    }

    pub fn center(&self) -> Vector2<f64> {
        self.size() * 0.5
    }

    pub fn gpu(&self) -> GpuCamera {
        GpuCamera {
            position: self.center().cast().unwrap_or(Vector2::zero()),
            vertical_height: self.height as f32,
            aspect: if self.height > 0.0 {
                (self.width / self.height) as f32
            } else {
                1.0
            },
        }
    }
}

/// Whether the axis-aligned rectangle spanned by `min`/`max` can touch a
/// `size.x` by `size.y` viewport. Only a rectangle that lies entirely past one
/// edge is rejected.
pub fn is_rectangle_on_screen(min: Vector2<f64>, max: Vector2<f64>, size: Vector2<f64>) -> bool {
    if min.x > size.x && max.x > size.x {
        return false;
    }
    if min.x < 0.0 && max.x < 0.0 {
        return false;
    }
    if min.y > size.y && max.y > size.y {
        return false;
    }
    if min.y < 0.0 && max.y < 0.0 {
        return false;
    }
    true
}
