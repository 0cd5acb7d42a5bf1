// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service runs (ducts and pipes) and their centerline geometry.
//!
//! A companion document hands out [`ServiceElement`]s whose path may be any
//! curve. Only straight paths are processed: [`ServicePath::to_line`] is the
//! checked conversion and [`ServiceRun::from_element`] builds the immutable
//! snapshot the planner casts rays from.

use crate::error::GeometryResolutionError;
use crate::ids::ElementId;
use nalgebra::{Point3, Vector3};
use std::fmt;

/// Paths shorter than this are treated as points.
const MIN_LINE_LENGTH: f64 = 1e-9;

/// Kind of linear mechanical service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServiceKind {
    Duct,
    Pipe,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Duct => "Duct",
            ServiceKind::Pipe => "Pipe",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape discriminant of a [`ServicePath`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathShape {
    Line,
    Arc,
    Polyline,
}

impl fmt::Display for PathShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PathShape::Line => "line",
            PathShape::Arc => "arc",
            PathShape::Polyline => "polyline",
        })
    }
}

/// Why a path could not be turned into a straight line
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnsupportedGeometry {
    #[error("{0} path is not a straight line")]
    NotStraight(PathShape),

    #[error("path has zero length")]
    Degenerate,
}

/// Centerline of a service as stored in its source document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServicePath {
    Line {
        start: Point3<f64>,
        end: Point3<f64>,
    },
    /// Three-point arc (start, a point on the arc, end)
    Arc {
        start: Point3<f64>,
        mid: Point3<f64>,
        end: Point3<f64>,
    },
    Polyline(Vec<Point3<f64>>),
}

impl ServicePath {
    pub fn shape(&self) -> PathShape {
        match self {
            ServicePath::Line { .. } => PathShape::Line,
            ServicePath::Arc { .. } => PathShape::Arc,
            ServicePath::Polyline(_) => PathShape::Polyline,
        }
    }

    /// Checked path-to-line conversion.
    ///
    /// A polyline with exactly two points is a line. Arcs and polylines with
    /// more vertices are rejected even when they happen to be collinear.
    pub fn to_line(&self) -> Result<Line, UnsupportedGeometry> {
        match self {
            ServicePath::Line { start, end } => Line::between(*start, *end),
            ServicePath::Polyline(points) if points.len() == 2 => {
                Line::between(points[0], points[1])
            }
            other => Err(UnsupportedGeometry::NotStraight(other.shape())),
        }
    }
}

/// Bounded straight line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    origin: Point3<f64>,
    direction: Vector3<f64>,
    length: f64,
}

impl Line {
    /// Line from `start` to `end`.
    pub fn between(start: Point3<f64>, end: Point3<f64>) -> Result<Self, UnsupportedGeometry> {
        let delta = end - start;
        let length = delta.norm();
        if !length.is_finite() || length <= MIN_LINE_LENGTH {
            return Err(UnsupportedGeometry::Degenerate);
        }
        Ok(Self {
            origin: start,
            direction: delta / length,
            length,
        })
    }

    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[inline]
    pub fn end(&self) -> Point3<f64> {
        self.point_at(self.length)
    }

    /// Point at `distance` from the origin along the direction
    #[inline]
    pub fn point_at(&self, distance: f64) -> Point3<f64> {
        self.origin + self.direction * distance
    }
}

/// Raw service record handed out by a companion document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceElement {
    pub id: ElementId,
    pub kind: ServiceKind,
    pub path: ServicePath,
    pub diameter: f64,
}

/// Immutable straight service run considered for penetration testing
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceRun {
    pub id: ElementId,
    pub kind: ServiceKind,
    pub line: Line,
    pub diameter: f64,
}

impl ServiceRun {
    /// Build a run from a catalog record.
    ///
    /// Fails when the path is not a straight line or the diameter is not a
    /// positive finite number.
    pub fn from_element(element: &ServiceElement) -> Result<Self, GeometryResolutionError> {
        let line = element
            .path
            .to_line()
            .map_err(|reason| GeometryResolutionError::UnsupportedGeometry {
                run: element.id,
                reason,
            })?;

        if !element.diameter.is_finite() || element.diameter <= 0.0 {
            return Err(GeometryResolutionError::InvalidDiameter {
                run: element.id,
                value: element.diameter,
            });
        }

        Ok(Self {
            id: element.id,
            kind: element.kind,
            line,
            diameter: element.diameter,
        })
    }

    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.line.origin()
    }

    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.line.direction()
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.line.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pipe(path: ServicePath, diameter: f64) -> ServiceElement {
        ServiceElement {
            id: ElementId(1),
            kind: ServiceKind::Pipe,
            path,
            diameter,
        }
    }

    #[test]
    fn line_has_unit_direction_and_length() {
        let line = Line::between(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 10.0, 0.0)).unwrap();
        assert_relative_eq!(line.length(), 10.0);
        assert_relative_eq!(line.direction().norm(), 1.0);
        assert_relative_eq!(line.point_at(5.0), Point3::new(0.0, 5.0, 0.0));
        assert_relative_eq!(line.end(), Point3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn zero_length_line_is_degenerate() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Line::between(p, p), Err(UnsupportedGeometry::Degenerate));
    }

    #[test]
    fn arc_is_not_a_line() {
        let path = ServicePath::Arc {
            start: Point3::new(0.0, 0.0, 0.0),
            mid: Point3::new(1.0, 1.0, 0.0),
            end: Point3::new(2.0, 0.0, 0.0),
        };
        assert_eq!(
            path.to_line(),
            Err(UnsupportedGeometry::NotStraight(PathShape::Arc))
        );
    }

    #[test]
    fn two_point_polyline_is_a_line() {
        let path = ServicePath::Polyline(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
        ]);
        let line = path.to_line().unwrap();
        assert_relative_eq!(line.length(), 5.0);
    }

    #[test]
    fn multi_segment_polyline_is_rejected() {
        let path = ServicePath::Polyline(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        assert_eq!(
            path.to_line(),
            Err(UnsupportedGeometry::NotStraight(PathShape::Polyline))
        );
    }

    #[test]
    fn run_rejects_non_positive_diameter() {
        let element = pipe(
            ServicePath::Line {
                start: Point3::origin(),
                end: Point3::new(1.0, 0.0, 0.0),
            },
            0.0,
        );
        assert!(matches!(
            ServiceRun::from_element(&element),
            Err(GeometryResolutionError::InvalidDiameter { .. })
        ));
    }

    #[test]
    fn run_reports_unsupported_path() {
        let element = pipe(
            ServicePath::Arc {
                start: Point3::origin(),
                mid: Point3::new(1.0, 1.0, 0.0),
                end: Point3::new(2.0, 0.0, 0.0),
            },
            0.1,
        );
        match ServiceRun::from_element(&element) {
            Err(GeometryResolutionError::UnsupportedGeometry { run, reason }) => {
                assert_eq!(run, ElementId(1));
                assert_eq!(reason, UnsupportedGeometry::NotStraight(PathShape::Arc));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
