use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FrameClock {
    pub target_fps: Option<u32>,
    last_time: Option<Instant>,
    last_dt: f64,
}

impl FrameClock {
    pub fn new(target_fps: Option<u32>) -> Self {
        Self {
            target_fps,
            last_time: None,
            last_dt: 0.0,
        }
    }

    pub fn frame_budget(&self) -> Option<Duration> {
        self.target_fps
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
    }

    /// Seconds since the previous call, sleeping first when the previous
    /// frame finished early. The first call returns 0.
    pub fn tick(&mut self) -> f64 {
        if let (Some(last), Some(budget)) = (self.last_time, self.frame_budget()) {
            let elapsed = last.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }

        let time = Instant::now();
        let dt = time - self.last_time.unwrap_or(time);
        self.last_time = Some(time);
        self.last_dt = dt.as_secs_f64();
        self.last_dt
    }

    pub fn last_dt(&self) -> f64 {
        self.last_dt
    }

    pub fn fps(&self) -> f64 {
        if self.last_dt > 0.0 {
            1.0 / self.last_dt
        } else {
            0.0
        }
    }
}
