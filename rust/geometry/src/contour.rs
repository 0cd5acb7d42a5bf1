// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D contour helpers for barrier profiles.

use nalgebra::Point2;

/// Profiles with less area than this are degenerate
const MIN_AREA: f64 = 1e-10;

/// Consecutive vertex pairs, closing back to the first vertex
fn edges(contour: &[Point2<f64>]) -> impl Iterator<Item = (&Point2<f64>, &Point2<f64>)> {
    contour.iter().zip(contour.iter().cycle().skip(1))
}

/// At least three vertices enclosing a non-zero area
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    contour.len() >= 3 && compute_signed_area(contour).abs() > MIN_AREA
}

/// Shoelace area, positive for counter-clockwise contours
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }
    edges(contour)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum::<f64>()
        * 0.5
}

/// Counter-clockwise copy of `contour`
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut ccw = contour.to_vec();
    if compute_signed_area(contour) < 0.0 {
        ccw.reverse();
    }
    ccw
}

/// Even-odd containment test
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }
    edges(contour)
        .filter(|(a, b)| {
            (a.y > point.y) != (b.y > point.y)
                && point.x < a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y)
        })
        .count()
        % 2
        == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = square();
        assert!((compute_signed_area(&ccw) - 100.0).abs() < 1e-9);

        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert!((compute_signed_area(&cw) + 100.0).abs() < 1e-9);
        assert!(compute_signed_area(&ensure_ccw(&cw)) > 0.0);
    }

    #[test]
    fn test_point_in_contour() {
        let contour = square();
        assert!(point_in_contour(&Point2::new(5.0, 5.0), &contour));
        assert!(!point_in_contour(&Point2::new(15.0, 5.0), &contour));
        assert!(!point_in_contour(&Point2::new(-1.0, 5.0), &contour));
    }

    #[test]
    fn test_is_valid_contour() {
        assert!(is_valid_contour(&square()));
        assert!(!is_valid_contour(&square()[..2]));
        let collinear = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert!(!is_valid_contour(&collinear));
    }
}
