// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Station cross-sections and the profile builder

use crate::error::{Error, Result};
use crate::kernel::{Line, Plane};
use crate::profiles::{parse_descriptor, Dimensions, ProfileFamily, StationRole};
use nalgebra::Point3;
use smallvec::SmallVec;

/// Closed contour of an element at one station along its axis
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    station: f64,
    points: Vec<Point3<f64>>,
}

impl CrossSection {
    /// Distance along the element axis
    #[inline]
    pub fn station(&self) -> f64 {
        self.station
    }

    /// Corner points in world coordinates; index `i` is the same physical
    /// corner at every station of a profile
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    #[inline]
    pub fn point(&self, index: usize) -> Option<Point3<f64>> {
        self.points.get(index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 3D boundary of an element as 2 or 3 station cross-sections
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    family: ProfileFamily,
    dimensions: Dimensions,
    length: f64,
    frame: Plane,
    sections: SmallVec<[CrossSection; 3]>,
}

impl Profile {
    /// Parse a descriptor and build its profile with the family's default station count
    pub fn from_descriptor(descriptor: &str, length: f64, frame: &Plane) -> Result<Self> {
        let (family, dims) = parse_descriptor(descriptor)?;
        build_profile(family, &dims, length, family.default_station_count(), frame)
    }

    #[inline]
    pub fn family(&self) -> ProfileFamily {
        self.family
    }

    #[inline]
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Frame the profile was built in
    #[inline]
    pub fn frame(&self) -> &Plane {
        &self.frame
    }

    #[inline]
    pub fn sections(&self) -> &[CrossSection] {
        &self.sections
    }

    #[inline]
    pub fn section(&self, index: usize) -> Option<&CrossSection> {
        self.sections.get(index)
    }

    #[inline]
    pub fn first(&self) -> &CrossSection {
        &self.sections[0]
    }

    #[inline]
    pub fn last(&self) -> &CrossSection {
        &self.sections[self.sections.len() - 1]
    }

    #[inline]
    pub fn station_count(&self) -> usize {
        self.sections.len()
    }

    /// Corner count shared by every station
    #[inline]
    pub fn point_count(&self) -> usize {
        self.sections[0].len()
    }

    /// Element axis from the frame origin to the end station
    pub fn axis(&self) -> Line {
        let origin = self.frame.origin();
        Line::new(origin, origin + self.frame.x_axis() * self.length)
    }
}

/// Build the station cross-sections of an element.
///
/// Contours are evaluated in the local frame (X along the element, origin at
/// its start) and mapped into world coordinates through `frame`.
pub fn build_profile(
    family: ProfileFamily,
    dimensions: &Dimensions,
    length: f64,
    station_count: usize,
    frame: &Plane,
) -> Result<Profile> {
    if !length.is_finite() || length <= 0.0 {
        return Err(Error::InvalidProfile(format!(
            "element length must be positive, got {}",
            length
        )));
    }
    if !family.supports_stations(station_count) {
        return Err(Error::InvalidProfile(format!(
            "{} does not support {} stations",
            family, station_count
        )));
    }

    let stations: SmallVec<[(f64, StationRole); 3]> = if station_count == 3 {
        let knee = family.knee_position(dimensions, length)?;
        SmallVec::from_buf([
            (0.0, StationRole::Start),
            (knee, StationRole::Middle),
            (length, StationRole::End),
        ])
    } else {
        let mut two = SmallVec::new();
        two.push((0.0, StationRole::Start));
        two.push((length, StationRole::End));
        two
    };

    let mut sections: SmallVec<[CrossSection; 3]> = SmallVec::new();
    for (station, role) in stations {
        let station_dims = family.station_dimensions(dimensions, role)?;
        let shift = family.lateral_shift(dimensions, role);
        let points: Vec<Point3<f64>> = family
            .contour(&station_dims)?
            .iter()
            .map(|p| frame.to_world(&Point3::new(station, p.x + shift, p.y)))
            .collect();
        sections.push(CrossSection { station, points });
    }

    let count = sections[0].len();
    if count < 3 || sections.iter().any(|s| s.len() != count) {
        return Err(Error::InvalidProfile(format!(
            "{} produced inconsistent station contours",
            family
        )));
    }

    tracing::debug!(
        family = %family,
        length,
        stations = sections.len(),
        points = count,
        "Built profile"
    );

    Ok(Profile {
        family,
        dimensions: dimensions.clone(),
        length,
        frame: *frame,
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn ledge() -> Dimensions {
        Dimensions::from_pairs([
            ("width", 400.0),
            ("firstHeight", 300.0),
            ("secondHeight", 200.0),
        ])
    }

    #[test]
    fn uniform_profile_translates_start_contour() {
        let profile = build_profile(ProfileFamily::Ledge, &ledge(), 6000.0, 2, &Plane::world()).unwrap();
        assert_eq!(profile.station_count(), 2);
        let start = profile.first().points();
        let end = profile.last().points();
        assert_eq!(start.len(), end.len());
        for (a, b) in start.iter().zip(end) {
            assert_relative_eq!(a + Vector3::new(6000.0, 0.0, 0.0), *b);
        }
        assert_eq!(start[3], Point3::new(0.0, 0.0, 300.0));
        assert_eq!(start[2], Point3::new(0.0, 400.0, 200.0));
    }

    #[test]
    fn three_station_uniform_profile_places_middle_at_half_length() {
        let profile = build_profile(ProfileFamily::Ledge, &ledge(), 6000.0, 3, &Plane::world()).unwrap();
        let stations: Vec<f64> = profile.sections().iter().map(|s| s.station()).collect();
        assert_eq!(stations, vec![0.0, 3000.0, 6000.0]);
    }

    #[test]
    fn horizontal_offset_skews_end_contours() {
        let profile = Profile::from_descriptor("RW2000*800*400*300*200*0*100", 5000.0, &Plane::world()).unwrap();
        assert_relative_eq!(profile.first().points()[0].y, -50.0);
        assert_relative_eq!(profile.last().points()[0].y, 50.0);
        assert_eq!(profile.point_count(), 6);
    }

    #[test]
    fn wing_wall_uses_knee_station() {
        let profile = Profile::from_descriptor("WW2000*400*1500*800*3000", 5000.0, &Plane::world()).unwrap();
        assert_eq!(profile.station_count(), 3);
        let knee = profile.section(1).unwrap();
        assert_eq!(knee.station(), 3000.0);
        assert_relative_eq!(knee.points()[2].z, 1500.0);
        assert_relative_eq!(profile.last().points()[2].z, 800.0);
    }

    #[test]
    fn frame_moves_profile_into_world() {
        let frame = Plane::new(
            Point3::new(1000.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
        )
        .unwrap();
        let profile = build_profile(ProfileFamily::Ledge, &ledge(), 6000.0, 2, &frame).unwrap();
        // local Y maps to world -X, local X to world Y
        assert_relative_eq!(profile.last().points()[1], Point3::new(600.0, 6000.0, 0.0));
        assert_relative_eq!(profile.axis().b, Point3::new(1000.0, 6000.0, 0.0));
    }

    #[test]
    fn rejects_bad_length_and_station_count() {
        assert!(build_profile(ProfileFamily::Ledge, &ledge(), 0.0, 2, &Plane::world()).is_err());
        assert!(build_profile(ProfileFamily::Ledge, &ledge(), 100.0, 4, &Plane::world()).is_err());
    }
}
