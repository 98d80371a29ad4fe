use cgmath::Vector4;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        let hue = rng.gen_range(0..=360) as f64;
        let saturation = rng.gen_range(0.5..=1.0);
        let value = rng.gen_range(0.7..=1.0);
        hsv_to_rgb(hue, saturation, value)
    }

    /// `weight * self + (1 - weight) * other`, channels truncated.
    pub fn blend(self, other: Rgb, weight: f64) -> Rgb {
        let weight = weight.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (weight * a as f64 + (1.0 - weight) * b as f64) as u8;
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    pub fn to_gpu(self, alpha: f32) -> Vector4<f32> {
        Vector4 {
            x: self.r as f32 / 255.0,
            y: self.g as f32 / 255.0,
            z: self.b as f32 / 255.0,
            w: alpha,
        }
    }
}

/// Six-sector HSV conversion. `hue` is in degrees and wraps at 360,
/// `saturation` and `value` are in `0..=1`.
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0) as u8;
    let v = value;
    if saturation == 0.0 {
        return Rgb::new(channel(v), channel(v), channel(v));
    }

    let h = hue.rem_euclid(360.0) / 60.0;
    let sector = h as u8;
    let f = h - sector as f64;
    let p = v * (1.0 - saturation);
    let q = v * (1.0 - saturation * f);
    let t = v * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn zero_saturation_is_grey() {
        for hue in [0.0, 45.0, 120.0, 200.0, 359.0] {
            assert_eq!(hsv_to_rgb(hue, 0.0, 0.5), Rgb::new(127, 127, 127));
            assert_eq!(hsv_to_rgb(hue, 0.0, 1.0), Rgb::WHITE);
        }
    }

    #[test]
    fn primary_hues() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb::RED);
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), Rgb::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), Rgb::BLUE);
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), Rgb::RED);
    }

    #[test]
    fn blend_weights_towards_first() {
        let c = Rgb::new(200, 0, 100).blend(Rgb::new(0, 200, 100), 0.75);
        assert_eq!(c, Rgb::new(150, 50, 100));
    }

    #[test]
    fn random_colors_are_bright() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let c = Rgb::random(&mut rng);
            // value >= 0.7 means the brightest channel is at least 0.7 * 255
            assert!(c.r.max(c.g).max(c.b) >= 178);
        }
    }
}
