// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Barrier solids and ray crossings.
//!
//! Walls and floors are modeled as vertical prisms: a planar XY profile
//! extruded upward from a base elevation. A ray reports every face it
//! crosses, so passing through a barrier yields an entry and an exit
//! crossing for the same element.

use crate::contour::{compute_signed_area, ensure_ccw, is_valid_contour, point_in_contour};
use crate::error::{Error, Result};
use crate::plane::Plane;
use holeplan_core::Aabb;
use nalgebra::{Point2, Point3, Vector2, Vector3};
use smallvec::SmallVec;

/// Slack for face bound checks, so crossings exactly on an edge count
const EDGE_TOLERANCE: f64 = 1e-9;

/// Crossings closer than this are the same crossing (ray through an edge)
const MERGE_EPSILON: f64 = 1e-9;

/// Face crossings of one solid, ascending
pub type Crossings = SmallVec<[f64; 4]>;

/// Vertical prism
#[derive(Debug, Clone)]
pub struct BarrierSolid {
    /// Counter-clockwise profile in the XY plane
    profile: Vec<Point2<f64>>,
    base: f64,
    depth: f64,
    bounds: Aabb,
}

impl BarrierSolid {
    /// Extrude `profile` upward from `base` by `depth`.
    pub fn extruded(profile: Vec<Point2<f64>>, base: f64, depth: f64) -> Result<Self> {
        if !is_valid_contour(&profile) {
            return Err(Error::InvalidProfile(format!(
                "profile with {} points and area {} is degenerate",
                profile.len(),
                compute_signed_area(&profile).abs()
            )));
        }
        if profile.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Error::InvalidProfile("non-finite coordinate".to_string()));
        }
        if !base.is_finite() || !depth.is_finite() || depth <= 0.0 {
            return Err(Error::InvalidSolid(format!(
                "base {} / depth {} must be finite with positive depth",
                base, depth
            )));
        }

        let profile = ensure_ccw(&profile);
        let corners: Vec<Point3<f64>> = profile
            .iter()
            .flat_map(|p| [Point3::new(p.x, p.y, base), Point3::new(p.x, p.y, base + depth)])
            .collect();
        let bounds = Aabb::from_points(corners.iter())
            .ok_or_else(|| Error::InvalidProfile("empty profile".to_string()))?;

        Ok(Self {
            profile,
            base,
            depth,
            bounds,
        })
    }

    /// Wall along the baseline `start`-`end`, centered on it, `thickness`
    /// wide and `height` tall from `base`.
    pub fn wall(
        start: Point2<f64>,
        end: Point2<f64>,
        thickness: f64,
        base: f64,
        height: f64,
    ) -> Result<Self> {
        let along = end - start;
        let length = along.norm();
        if !length.is_finite() || length <= EDGE_TOLERANCE {
            return Err(Error::InvalidSolid("wall baseline has zero length".to_string()));
        }
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(Error::InvalidSolid(format!(
                "wall thickness {} must be positive",
                thickness
            )));
        }

        let offset = Vector2::new(-along.y, along.x) / length * (thickness * 0.5);
        let profile = vec![
            start - offset,
            end - offset,
            end + offset,
            start + offset,
        ];
        Self::extruded(profile, base, height)
    }

    /// Slab with the given boundary, top face at `top`, `thickness` deep.
    pub fn slab(boundary: Vec<Point2<f64>>, top: f64, thickness: f64) -> Result<Self> {
        Self::extruded(boundary, top - thickness, thickness)
    }

    pub fn profile(&self) -> &[Point2<f64>] {
        &self.profile
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn top(&self) -> f64 {
        self.base + self.depth
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Ray parameters (`t >= 0`) of every face crossing, ascending.
    ///
    /// `direction` is expected to be normalized so that parameters are
    /// distances. Faces parallel to the ray are not crossed.
    pub fn ray_crossings(&self, origin: &Point3<f64>, direction: &Vector3<f64>) -> Crossings {
        let mut hits = Crossings::new();
        let top = self.top();

        // Bottom and top caps
        for z in [self.base, top] {
            if let Some(t) = Plane::horizontal(z).intersect_ray(origin, direction) {
                if t >= 0.0 {
                    let p = origin + direction * t;
                    if point_in_contour(&Point2::new(p.x, p.y), &self.profile) {
                        hits.push(t);
                    }
                }
            }
        }

        // Side faces
        let n = self.profile.len();
        for i in 0..n {
            let a = self.profile[i];
            let b = self.profile[(i + 1) % n];
            let edge = b - a;
            let len_sq = edge.norm_squared();
            if len_sq <= EDGE_TOLERANCE * EDGE_TOLERANCE {
                continue;
            }

            // Outward normal for a counter-clockwise profile
            let plane = Plane::new(
                Point3::new(a.x, a.y, self.base),
                Vector3::new(edge.y, -edge.x, 0.0),
            );
            let Some(t) = plane.intersect_ray(origin, direction) else {
                continue;
            };
            if t < 0.0 {
                continue;
            }

            let p = origin + direction * t;
            if p.z < self.base - EDGE_TOLERANCE || p.z > top + EDGE_TOLERANCE {
                continue;
            }
            let s = ((p.x - a.x) * edge.x + (p.y - a.y) * edge.y) / len_sq;
            if (-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&s) {
                hits.push(t);
            }
        }

        hits.sort_by(|a, b| a.total_cmp(b));
        hits.dedup_by(|a, b| (*a - *b).abs() < MERGE_EPSILON);
        hits
    }
}
