// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry kernel: coordinate planes, lines and line–plane intersection.
//!
//! Points and vectors are plain nalgebra types. Everything that can divide by
//! a length goes through [`normalized`] so zero-length input surfaces as
//! [`Error::GeometryDegenerate`] instead of producing NaN coordinates.

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// Tolerance for lengths and dot products in model units (mm)
pub const EPSILON: f64 = 1e-9;

/// Normalize a vector, failing on zero length.
#[inline]
pub fn normalized(v: &Vector3<f64>, what: &str) -> Result<Vector3<f64>> {
    v.try_normalize(EPSILON)
        .ok_or_else(|| Error::degenerate(format!("{} has zero length", what)))
}

/// Coordinate plane with an origin and two orthonormal in-plane axes.
///
/// Used both as the element's local frame (X along the element length) and
/// as the supporting plane of a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    origin: Point3<f64>,
    x_axis: Vector3<f64>,
    y_axis: Vector3<f64>,
}

impl Plane {
    /// Create a plane; `y_axis` is re-orthogonalized against `x_axis`.
    pub fn new(origin: Point3<f64>, x_axis: Vector3<f64>, y_axis: Vector3<f64>) -> Result<Self> {
        let x_axis = normalized(&x_axis, "plane x axis")?;
        let y_orthogonal = y_axis - x_axis * y_axis.dot(&x_axis);
        let y_axis = y_orthogonal
            .try_normalize(EPSILON)
            .ok_or_else(|| Error::degenerate("plane axes are parallel"))?;

        Ok(Self {
            origin,
            x_axis,
            y_axis,
        })
    }

    /// Global XY plane at the origin
    pub fn world() -> Self {
        Self {
            origin: Point3::origin(),
            x_axis: Vector3::x(),
            y_axis: Vector3::y(),
        }
    }

    /// Create a plane from a point and a normal, choosing an arbitrary in-plane X axis.
    pub fn from_normal(origin: Point3<f64>, normal: Vector3<f64>) -> Result<Self> {
        let normal = normalized(&normal, "plane normal")?;
        // Pick a reference axis that is not parallel to the normal
        let reference = if normal.z.abs() < 0.9 {
            Vector3::z()
        } else {
            Vector3::x()
        };
        let x_axis = reference.cross(&normal);
        let y_axis = normal.cross(&x_axis);
        Self::new(origin, x_axis, y_axis)
    }

    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    #[inline]
    pub fn x_axis(&self) -> Vector3<f64> {
        self.x_axis
    }

    #[inline]
    pub fn y_axis(&self) -> Vector3<f64> {
        self.y_axis
    }

    /// Unit normal (x × y)
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.x_axis.cross(&self.y_axis)
    }

    /// Map a point given in this plane's coordinates into world coordinates.
    ///
    /// Local X runs along `x_axis`, local Y along `y_axis` and local Z along
    /// the normal.
    #[inline]
    pub fn to_world(&self, local: &Point3<f64>) -> Point3<f64> {
        self.origin + self.x_axis * local.x + self.y_axis * local.y + self.normal() * local.z
    }

    /// Inverse of [`Plane::to_world`]
    #[inline]
    pub fn to_local(&self, world: &Point3<f64>) -> Point3<f64> {
        let d = world - self.origin;
        Point3::new(d.dot(&self.x_axis), d.dot(&self.y_axis), d.dot(&self.normal()))
    }

    /// Signed distance from point to plane, positive on the normal side
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.origin).dot(&self.normal())
    }

    /// Orthogonal projection of a point onto the plane
    #[inline]
    pub fn project_point(&self, point: &Point3<f64>) -> Point3<f64> {
        point - self.normal() * self.signed_distance(point)
    }

    /// Component of `v` lying in the plane
    #[inline]
    pub fn project_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let n = self.normal();
        v - n * v.dot(&n)
    }
}

/// Straight segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: Point3<f64>,
    pub b: Point3<f64>,
}

impl Line {
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    /// Unit direction from `a` to `b`
    pub fn direction(&self) -> Result<Vector3<f64>> {
        normalized(&(self.b - self.a), "line direction")
    }

    /// Point at `distance` from `a` towards `b` (may lie outside the segment)
    pub fn point_at(&self, distance: f64) -> Result<Point3<f64>> {
        Ok(self.a + self.direction()? * distance)
    }

    /// Midpoint of the segment
    #[inline]
    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.a, &self.b)
    }

    /// Same segment traversed from `b` to `a`
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.b, self.a)
    }

    /// Intersect the infinite line through `a` and `b` with a plane.
    ///
    /// Fails when the line has zero length or runs parallel to the plane.
    pub fn intersect_plane(&self, plane: &Plane) -> Result<Point3<f64>> {
        let dir = self.direction()?;
        let normal = plane.normal();
        let denom = dir.dot(&normal);
        if denom.abs() < EPSILON {
            return Err(Error::degenerate("line is parallel to plane"));
        }
        let t = (plane.origin() - self.a).dot(&normal) / denom;
        Ok(self.a + dir * t)
    }

    /// Intersect the segment (not the infinite line) with a plane.
    ///
    /// Returns `None` when both end points are strictly on one side or the
    /// segment lies in the plane.
    pub fn intersect_plane_segment(&self, plane: &Plane) -> Option<Point3<f64>> {
        let da = plane.signed_distance(&self.a);
        let db = plane.signed_distance(&self.b);
        if (da > EPSILON && db > EPSILON) || (da < -EPSILON && db < -EPSILON) {
            return None;
        }
        let span = da - db;
        if span.abs() < EPSILON {
            return None;
        }
        let t = da / span;
        Some(self.a + (self.b - self.a) * t)
    }
}

/// Length of an open polyline
pub fn polyline_length(points: &[Point3<f64>]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_orthogonalizes_y_axis() {
        let plane = Plane::new(
            Point3::origin(),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(plane.x_axis().dot(&plane.y_axis()), 0.0);
        assert_relative_eq!(plane.y_axis(), Vector3::y());
        assert_relative_eq!(plane.normal(), Vector3::z());
    }

    #[test]
    fn plane_rejects_parallel_axes() {
        let err = Plane::new(Point3::origin(), Vector3::x(), Vector3::new(3.0, 0.0, 0.0));
        assert!(matches!(err, Err(Error::GeometryDegenerate(_))));
        assert!(Plane::new(Point3::origin(), Vector3::zeros(), Vector3::y()).is_err());
    }

    #[test]
    fn local_world_round_trip() {
        let plane = Plane::new(
            Point3::new(100.0, 50.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
        )
        .unwrap();
        let local = Point3::new(10.0, 20.0, 30.0);
        let world = plane.to_world(&local);
        assert_relative_eq!(world, Point3::new(80.0, 60.0, 30.0));
        assert_relative_eq!(plane.to_local(&world), local, epsilon = 1e-9);
    }

    #[test]
    fn line_plane_intersection() {
        let plane = Plane::from_normal(Point3::new(0.0, 0.0, 5.0), Vector3::z()).unwrap();
        let line = Line::new(Point3::new(1.0, 1.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let hit = line.intersect_plane(&plane).unwrap();
        assert_relative_eq!(hit, Point3::new(1.0, 1.0, 5.0));
    }

    #[test]
    fn parallel_line_is_degenerate() {
        let plane = Plane::world();
        let line = Line::new(Point3::new(0.0, 0.0, 1.0), Point3::new(5.0, 0.0, 1.0));
        assert!(matches!(
            line.intersect_plane(&plane),
            Err(Error::GeometryDegenerate(_))
        ));

        let point = Line::new(Point3::origin(), Point3::origin());
        assert!(point.direction().is_err());
    }

    #[test]
    fn segment_intersection_respects_bounds() {
        let plane = Plane::from_normal(Point3::new(5.0, 0.0, 0.0), Vector3::x()).unwrap();
        let crossing = Line::new(Point3::origin(), Point3::new(10.0, 2.0, 0.0));
        let hit = crossing.intersect_plane_segment(&plane).unwrap();
        assert_relative_eq!(hit, Point3::new(5.0, 1.0, 0.0));

        let short = Line::new(Point3::origin(), Point3::new(4.0, 0.0, 0.0));
        assert!(short.intersect_plane_segment(&plane).is_none());
    }

    #[test]
    fn polyline_length_sums_segments() {
        let pts = [
            Point3::origin(),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
        ];
        assert_relative_eq!(polyline_length(&pts), 7.0);
    }
}
