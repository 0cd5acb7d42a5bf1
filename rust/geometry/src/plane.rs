// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planes and ray/plane intersection.

use nalgebra::{Point3, Vector3};

/// Rays closer than this to parallel with a plane do not intersect it
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// Plane definition for face tests
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Normal vector (must be normalized)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Horizontal plane at elevation `z`
    pub fn horizontal(z: f64) -> Self {
        Self {
            point: Point3::new(0.0, 0.0, z),
            normal: Vector3::z(),
        }
    }

    /// Calculate signed distance from point to plane
    /// Positive = in front, Negative = behind
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }

    /// Ray parameter `t` at which `origin + t * direction` meets the plane.
    ///
    /// `None` when the ray is parallel to the plane. Negative values mean the
    /// plane is behind the origin.
    pub fn intersect_ray(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Option<f64> {
        let denom = self.normal.dot(direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        Some((self.point - origin).dot(&self.normal) / denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_signed_distance() {
        let plane = Plane::new(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(plane.signed_distance(&Point3::new(5.0, 5.0, 3.0)), 2.0);
        assert_relative_eq!(plane.signed_distance(&Point3::new(5.0, 5.0, 0.0)), -1.0);
    }

    #[test]
    fn test_intersect_ray() {
        let plane = Plane::horizontal(3.0);
        let t = plane
            .intersect_ray(&Point3::new(1.0, 1.0, 0.0), &Vector3::new(0.0, 0.0, 1.0))
            .unwrap();
        assert_relative_eq!(t, 3.0);

        let behind = plane
            .intersect_ray(&Point3::new(1.0, 1.0, 5.0), &Vector3::new(0.0, 0.0, 1.0))
            .unwrap();
        assert!(behind < 0.0);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let plane = Plane::horizontal(0.0);
        assert!(plane
            .intersect_ray(&Point3::new(0.0, 0.0, 1.0), &Vector3::new(1.0, 0.0, 0.0))
            .is_none());
    }
}
