//! A dummy tracked object that paces back and forth along the x axis.

use glam::Vec3;

pub struct Walker {
    origin: Vec3,
    position: Vec3,
    speed: f32,
    limit: f32,
    /// +1 or -1.
    direction: f32,
}

impl Walker {
    /// Starts at `origin` heading toward -x and turns around `limit` units
    /// from the origin.
    pub fn new(origin: Vec3, speed: f32, limit: f32) -> Self {
        Self {
            origin,
            position: origin,
            speed: speed.abs(),
            limit: limit.max(0.0),
            direction: -1.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn update(&mut self, dt: f32) {
        self.position.x += dt * self.speed * self.direction;

        let offset = self.position.x - self.origin.x;
        if offset.abs() >= self.limit {
            self.position.x = self.origin.x + offset.clamp(-self.limit, self.limit);
            self.direction = -self.direction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_toward_negative_x() {
        let mut walker = Walker::new(Vec3::new(0.0, 1.0, 0.0), 2.0, 10.0);
        walker.update(1.0);
        assert!((walker.position() - Vec3::new(-2.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_turns_around_at_limit() {
        let mut walker = Walker::new(Vec3::ZERO, 4.0, 5.0);
        walker.update(1.0);
        walker.update(1.0);
        assert!((walker.position().x + 5.0).abs() < 1e-6);
        walker.update(1.0);
        assert!((walker.position().x + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stays_within_limit() {
        let mut walker = Walker::new(Vec3::new(3.0, 0.0, 0.0), 7.0, 2.5);
        for _ in 0..200 {
            walker.update(0.1);
            assert!((walker.position().x - 3.0).abs() <= 2.5 + 1e-5);
        }
    }

    #[test]
    fn test_zero_limit_stays_put() {
        let mut walker = Walker::new(Vec3::ONE, 3.0, 0.0);
        walker.update(0.5);
        assert_eq!(walker.position(), Vec3::ONE);
    }
}
