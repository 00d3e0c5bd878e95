use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Tolerance used when comparing accumulated activity against thresholds.
pub const ACTIVITY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    /// Rescales to `len`. A zero vector has no direction and is returned as is.
    pub fn with_length(self, len: f64) -> Point {
        let mag = self.length();
        if mag > 0.0 {
            self * (len / mag)
        } else {
            self
        }
    }

    /// Rescales to `max_len` only if currently longer.
    pub fn clamp_length(self, max_len: f64) -> Point {
        if self.length() > max_len {
            self.with_length(max_len)
        } else {
            self
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Uniform sample in `[-spread / 2, spread / 2)`.
pub fn centered_jitter<R: Rng>(rng: &mut R, spread: f64) -> f64 {
    (rng.gen::<f64>() - 0.5) * spread
}

pub fn jitter_point<R: Rng>(rng: &mut R, spread: f64) -> Point {
    let x = centered_jitter(rng, spread);
    let y = centered_jitter(rng, spread);
    Point::new(x, y)
}

pub fn clamp_unit(value: f64) -> f64 {
    value.max(0.0).min(1.0)
}


#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn distance() {
        assert_approx_eq!(f64, Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
        assert_approx_eq!(f64, Point::new(1.0, 1.0).distance(Point::new(1.0, 1.0)), 0.0);
    }

    #[test]
    fn with_length() {
        let v = Point::new(3.0, 4.0).with_length(0.5);
        test_util::assert_approx_eq_point(v, Point::new(0.3, 0.4));
    }

    #[test]
    fn zero_vector_is_not_normalized() {
        let v = Point::default().with_length(0.5);
        assert_eq!(v, Point::default());
        assert!(!v.x.is_nan());
        assert!(!v.y.is_nan());
    }

    #[test]
    fn clamp_length() {
        let short = Point::new(0.1, 0.1).clamp_length(0.2);
        test_util::assert_approx_eq_point(short, Point::new(0.1, 0.1));

        let long = Point::new(0.0, 2.0).clamp_length(0.2);
        test_util::assert_approx_eq_point(long, Point::new(0.0, 0.2));
    }

    #[test]
    fn jitter_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..1000 {
            let value = centered_jitter(&mut rng, 0.8);
            assert!((-0.4..0.4).contains(&value));
        }
    }

    #[test]
    fn unit_clamp() {
        assert_approx_eq!(f64, clamp_unit(1.3), 1.0);
        assert_approx_eq!(f64, clamp_unit(-0.2), 0.0);
        assert_approx_eq!(f64, clamp_unit(0.4), 0.4);
    }
}
