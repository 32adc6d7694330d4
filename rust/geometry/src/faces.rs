// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face derivation - indexed bounding surfaces of a profile
//!
//! Face indices are the only handle reinforcement patterns use to refer to
//! surfaces, so the numbering is fixed:
//!
//! - `0`: start cap (first station contour)
//! - `1 + gap * n + edge`: lateral face on contour edge `edge -> edge + 1`
//!   between stations `gap` and `gap + 1`
//! - last: end cap (last station contour, point order preserved)

use crate::error::{Error, Result};
use crate::kernel::{Line, Plane, EPSILON};
use crate::profile::Profile;
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

/// What part of the profile boundary a face covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    StartCap,
    Lateral { gap: usize, edge: usize },
    EndCap,
}

/// Planar polygon bounding the element
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    index: usize,
    kind: FaceKind,
    contour: SmallVec<[Point3<f64>; 6]>,
}

impl Face {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn kind(&self) -> FaceKind {
        self.kind
    }

    /// Closed polygon; the closing edge from last to first point is implicit
    #[inline]
    pub fn contour(&self) -> &[Point3<f64>] {
        &self.contour
    }

    /// Boundary edges including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.contour.len();
        (0..n).map(move |i| Line::new(self.contour[i], self.contour[(i + 1) % n]))
    }

    pub fn centroid(&self) -> Point3<f64> {
        let sum = self
            .contour
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.contour.len() as f64)
    }

    /// Polygon normal by Newell's method, following the winding order
    pub fn normal(&self) -> Result<Vector3<f64>> {
        let mut normal = Vector3::zeros();
        let n = self.contour.len();
        for i in 0..n {
            let curr = self.contour[i];
            let next = self.contour[(i + 1) % n];
            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }
        normal
            .try_normalize(EPSILON)
            .ok_or_else(|| Error::degenerate(format!("face {} has collapsed", self.index)))
    }

    /// Supporting plane: origin at the first corner, X along the first
    /// non-degenerate edge
    pub fn plane(&self) -> Result<Plane> {
        let normal = self.normal()?;
        let x_axis = self
            .edges()
            .map(|e| e.b - e.a)
            .find(|d| d.norm() > EPSILON)
            .ok_or_else(|| Error::degenerate(format!("face {} has no edges", self.index)))?;
        Plane::new(self.contour[0], x_axis, normal.cross(&x_axis))
    }

    /// Segment where a cutting plane crosses this face.
    ///
    /// Returns `None` when the plane misses the face or only touches a corner.
    /// For non-convex faces the two farthest crossing points are used.
    pub fn section(&self, plane: &Plane) -> Option<Line> {
        let mut hits: SmallVec<[Point3<f64>; 4]> = SmallVec::new();
        for edge in self.edges() {
            if let Some(p) = edge.intersect_plane_segment(plane) {
                if hits.iter().all(|h| (h - p).norm() > 1e-6) {
                    hits.push(p);
                }
            }
        }
        if hits.len() < 2 {
            return None;
        }

        let mut best = (0, 1, 0.0);
        for i in 0..hits.len() {
            for j in (i + 1)..hits.len() {
                let d = (hits[j] - hits[i]).norm_squared();
                if d > best.2 {
                    best = (i, j, d);
                }
            }
        }
        Some(Line::new(hits[best.0], hits[best.1]))
    }
}

/// All faces of one profile, in index order
#[derive(Debug, Clone, PartialEq)]
pub struct Faces {
    faces: Vec<Face>,
    point_count: usize,
    station_count: usize,
}

impl Faces {
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    /// Face by index, failing when it is out of range
    pub fn face(&self, index: usize) -> Result<&Face> {
        self.faces.get(index).ok_or_else(|| {
            Error::InvalidProfile(format!(
                "face index {} out of range (profile has {} faces)",
                index,
                self.faces.len()
            ))
        })
    }

    #[inline]
    pub fn start_cap(&self) -> &Face {
        &self.faces[0]
    }

    #[inline]
    pub fn end_cap(&self) -> &Face {
        &self.faces[self.faces.len() - 1]
    }

    /// Lateral face on contour edge `edge` between stations `gap` and `gap + 1`
    pub fn lateral(&self, gap: usize, edge: usize) -> Option<&Face> {
        if gap + 1 >= self.station_count || edge >= self.point_count {
            return None;
        }
        self.faces.get(1 + gap * self.point_count + edge)
    }

    /// Number of lateral faces, `(stations - 1) * points`
    #[inline]
    pub fn lateral_count(&self) -> usize {
        self.faces.len() - 2
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    #[inline]
    pub fn station_count(&self) -> usize {
        self.station_count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Face> {
        self.faces.iter()
    }
}

/// Derive the indexed faces of a profile
pub fn derive_faces(profile: &Profile) -> Faces {
    let sections = profile.sections();
    let n = profile.point_count();
    let mut faces = Vec::with_capacity((sections.len() - 1) * n + 2);

    faces.push(Face {
        index: 0,
        kind: FaceKind::StartCap,
        contour: sections[0].points().iter().copied().collect(),
    });

    for (gap, pair) in sections.windows(2).enumerate() {
        let (near, far) = (pair[0].points(), pair[1].points());
        for edge in 0..n {
            let next = (edge + 1) % n;
            faces.push(Face {
                index: faces.len(),
                kind: FaceKind::Lateral { gap, edge },
                contour: SmallVec::from_slice(&[near[edge], near[next], far[next], far[edge]]),
            });
        }
    }

    faces.push(Face {
        index: faces.len(),
        kind: FaceKind::EndCap,
        contour: profile.last().points().iter().copied().collect(),
    });

    Faces {
        faces,
        point_count: n,
        station_count: sections.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{Dimensions, ProfileFamily};
    use crate::profile::build_profile;
    use approx::assert_relative_eq;

    fn footing(stations: usize) -> Profile {
        let dims = Dimensions::from_pairs([("height", 500.0), ("width", 2000.0)]);
        build_profile(ProfileFamily::Footing, &dims, 4000.0, stations, &Plane::world()).unwrap()
    }

    #[test]
    fn face_count_and_indices() {
        let faces = derive_faces(&footing(2));
        assert_eq!(faces.len(), 4 + 2);
        assert_eq!(faces.lateral_count(), 4);
        for (i, face) in faces.iter().enumerate() {
            assert_eq!(face.index(), i);
        }
        assert_eq!(faces.start_cap().kind(), FaceKind::StartCap);
        assert_eq!(faces.end_cap().kind(), FaceKind::EndCap);

        let faces = derive_faces(&footing(3));
        assert_eq!(faces.len(), 2 * 4 + 2);
        assert_eq!(faces.lateral(1, 3).unwrap().index(), 8);
        assert!(faces.lateral(2, 0).is_none());
    }

    #[test]
    fn lateral_face_joins_consecutive_points() {
        let profile = footing(2);
        let faces = derive_faces(&profile);
        // bottom face: edge 0 between corners 0 and 1
        let bottom = faces.lateral(0, 0).unwrap();
        assert_eq!(bottom.index(), 1);
        let s0 = profile.first().points();
        let s1 = profile.last().points();
        assert_eq!(bottom.contour(), &[s0[0], s0[1], s1[1], s1[0]]);
        // closing edge wraps from the last corner back to corner 0
        let closing = faces.lateral(0, 3).unwrap();
        assert_eq!(closing.contour()[1], s0[0]);
    }

    #[test]
    fn end_cap_keeps_point_order() {
        let profile = footing(2);
        let faces = derive_faces(&profile);
        assert_eq!(faces.end_cap().contour(), profile.last().points());
    }

    #[test]
    fn face_plane_and_section() {
        let faces = derive_faces(&footing(2));
        // top face (edge 2: corner 2 -> corner 3) lies at z = 500
        let top = faces.lateral(0, 2).unwrap();
        let plane = top.plane().unwrap();
        assert_relative_eq!(plane.normal().z.abs(), 1.0, epsilon = 1e-12);

        let cut = Plane::from_normal(Point3::new(1500.0, 0.0, 0.0), Vector3::x()).unwrap();
        let segment = top.section(&cut).unwrap();
        assert_relative_eq!(segment.length(), 2000.0, epsilon = 1e-9);
        assert_relative_eq!(segment.a.x, 1500.0, epsilon = 1e-9);
        assert_relative_eq!(segment.a.z, 500.0, epsilon = 1e-9);

        let outside = Plane::from_normal(Point3::new(5000.0, 0.0, 0.0), Vector3::x()).unwrap();
        assert!(top.section(&outside).is_none());
    }

    #[test]
    fn collapsed_face_has_no_normal() {
        let face = Face {
            index: 7,
            kind: FaceKind::Lateral { gap: 0, edge: 0 },
            contour: SmallVec::from_slice(&[Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]),
        };
        assert!(matches!(face.plane(), Err(Error::GeometryDegenerate(_))));
    }
}
