// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element families - descriptor parsing and closed-form cross-section formulas
//!
//! Every family maps a short ordered list of scalar dimensions to the corner
//! points of one station's contour. Contours are expressed in the element's
//! local Y/Z plane (Y lateral, Z up); the profile builder places them along X.

use crate::error::{Error, Result};
use nalgebra::Point2;
use smallvec::SmallVec;
use std::fmt;

/// Named dimension values parsed from a profile descriptor.
///
/// Order is preserved so that the dimensions print in descriptor order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dimensions {
    values: SmallVec<[(&'static str, f64); 8]>,
}

impl Dimensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, value)` pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, f64)>,
    {
        let mut dims = Self::new();
        for (name, value) in pairs {
            dims.set(name, value);
        }
        dims
    }

    /// Insert or replace a value
    pub fn set(&mut self, name: &'static str, value: f64) {
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    /// Copy with one value substituted
    pub fn with(&self, name: &'static str, value: f64) -> Self {
        let mut dims = self.clone();
        dims.set(name, value);
        dims
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    /// Value that must be present
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name)
            .ok_or_else(|| Error::InvalidProfile(format!("missing dimension '{}'", name)))
    }

    fn positive(&self, name: &str) -> Result<f64> {
        let value = self.require(name)?;
        if value <= 0.0 {
            return Err(Error::InvalidProfile(format!(
                "dimension '{}' must be positive, got {}",
                name, value
            )));
        }
        Ok(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Where along the element a cross-section sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationRole {
    Start,
    /// Only present in three-station profiles
    Middle,
    End,
}

/// Closed set of supported element families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileFamily {
    /// Rectangular footing: height*width
    Footing,
    /// Ledge with a sloped top: width*firstHeight*secondHeight
    Ledge,
    /// Rectangular column: width*depth
    Column,
    /// Trapezoidal wall web with a front cornice:
    /// height*bottomWidth*topWidth*corniceHeight*corniceWidth*drop[*horizontalOffset]
    RetainingWall,
    /// Wall whose height changes linearly: startHeight*width*endHeight
    TaperedWall,
    /// Wing wall with a knee: height*width*kneeHeight*endHeight*kneePosition
    WingWall,
}

impl ProfileFamily {
    pub const ALL: [ProfileFamily; 6] = [
        ProfileFamily::Footing,
        ProfileFamily::Ledge,
        ProfileFamily::Column,
        ProfileFamily::RetainingWall,
        ProfileFamily::TaperedWall,
        ProfileFamily::WingWall,
    ];

    /// Descriptor prefix
    pub fn tag(&self) -> &'static str {
        match self {
            ProfileFamily::Footing => "FTG",
            ProfileFamily::Ledge => "LDG",
            ProfileFamily::Column => "COL",
            ProfileFamily::RetainingWall => "RW",
            ProfileFamily::TaperedWall => "TW",
            ProfileFamily::WingWall => "WW",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|family| family.tag().eq_ignore_ascii_case(tag))
    }

    /// Dimension names in descriptor order
    pub fn token_names(&self) -> &'static [&'static str] {
        match self {
            ProfileFamily::Footing => &["height", "width"],
            ProfileFamily::Ledge => &["width", "firstHeight", "secondHeight"],
            ProfileFamily::Column => &["width", "depth"],
            ProfileFamily::RetainingWall => &[
                "height",
                "bottomWidth",
                "topWidth",
                "corniceHeight",
                "corniceWidth",
                "drop",
                "horizontalOffset",
            ],
            ProfileFamily::TaperedWall => &["startHeight", "width", "endHeight"],
            ProfileFamily::WingWall => &["height", "width", "kneeHeight", "endHeight", "kneePosition"],
        }
    }

    /// Number of trailing tokens that may be omitted
    fn optional_tokens(&self) -> usize {
        match self {
            ProfileFamily::RetainingWall => 1,
            _ => 0,
        }
    }

    /// Corner count of one station's contour
    pub fn point_count(&self) -> usize {
        match self {
            ProfileFamily::RetainingWall => 6,
            _ => 4,
        }
    }

    pub fn supports_stations(&self, count: usize) -> bool {
        match self {
            ProfileFamily::WingWall => count == 3,
            _ => count == 2 || count == 3,
        }
    }

    /// Station count used when the caller does not ask for one
    pub fn default_station_count(&self) -> usize {
        match self {
            ProfileFamily::WingWall => 3,
            _ => 2,
        }
    }

    /// Turn descriptor tokens into named dimensions.
    ///
    /// `descriptor` is only used for error messages.
    pub fn parse(&self, descriptor: &str, tokens: &[&str]) -> Result<Dimensions> {
        let names = self.token_names();
        let min = names.len() - self.optional_tokens();
        if tokens.len() < min || tokens.len() > names.len() {
            let expected = if min == names.len() {
                min.to_string()
            } else {
                format!("{} to {}", min, names.len())
            };
            return Err(Error::malformed(
                descriptor,
                format!(
                    "{} expects {} dimensions, got {}",
                    self,
                    expected,
                    tokens.len()
                ),
            ));
        }

        let mut dims = Dimensions::new();
        for (position, (name, token)) in names.iter().zip(tokens).enumerate() {
            let value = token
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    Error::malformed(
                        descriptor,
                        format!("token {} ('{}') is not numeric", position + 1, token),
                    )
                })?;
            dims.set(name, value);
        }
        Ok(dims)
    }

    /// Position of the middle station of a three-station profile
    pub fn knee_position(&self, dims: &Dimensions, length: f64) -> Result<f64> {
        match self {
            ProfileFamily::WingWall => {
                let knee = dims.require("kneePosition")?;
                if knee <= 0.0 || knee >= length {
                    return Err(Error::InvalidProfile(format!(
                        "knee position {} must lie inside element length {}",
                        knee, length
                    )));
                }
                Ok(knee)
            }
            _ => Ok(length / 2.0),
        }
    }

    /// Dimensions with station-specific substitutions applied.
    ///
    /// Uniform families return the input unchanged.
    pub fn station_dimensions(&self, dims: &Dimensions, role: StationRole) -> Result<Dimensions> {
        match self {
            ProfileFamily::TaperedWall => {
                let start = dims.require("startHeight")?;
                let end = dims.require("endHeight")?;
                let height = match role {
                    StationRole::Start => start,
                    StationRole::Middle => (start + end) / 2.0,
                    StationRole::End => end,
                };
                Ok(dims.with("height", height))
            }
            ProfileFamily::WingWall => {
                let height = match role {
                    StationRole::Start => dims.require("height")?,
                    StationRole::Middle => dims.require("kneeHeight")?,
                    StationRole::End => dims.require("endHeight")?,
                };
                Ok(dims.with("height", height))
            }
            _ => Ok(dims.clone()),
        }
    }

    /// Lateral (Y) shift applied to a station's contour
    pub fn lateral_shift(&self, dims: &Dimensions, role: StationRole) -> f64 {
        let offset = dims.get("horizontalOffset").unwrap_or(0.0);
        match role {
            StationRole::Start => -offset / 2.0,
            StationRole::Middle => 0.0,
            StationRole::End => offset / 2.0,
        }
    }

    /// Corner points of one station in the local (Y, Z) plane.
    ///
    /// `dims` must already carry the station substitutions.
    pub fn contour(&self, dims: &Dimensions) -> Result<Vec<Point2<f64>>> {
        let points = match self {
            ProfileFamily::Footing => {
                let h = dims.positive("height")?;
                let w = dims.positive("width")?;
                rectangle(w, h)
            }
            ProfileFamily::Column => {
                let w = dims.positive("width")?;
                let d = dims.positive("depth")?;
                rectangle(w, d)
            }
            ProfileFamily::Ledge => {
                let w = dims.positive("width")?;
                let h1 = dims.positive("firstHeight")?;
                let h2 = dims.positive("secondHeight")?;
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(w, 0.0),
                    Point2::new(w, h2),
                    Point2::new(0.0, h1),
                ]
            }
            ProfileFamily::RetainingWall => {
                let h = dims.positive("height")?;
                let bw = dims.positive("bottomWidth")?;
                let tw = dims.positive("topWidth")?;
                let ch = dims.positive("corniceHeight")?;
                let cw = dims.positive("corniceWidth")?;
                let drop = dims.require("drop")?;
                if ch >= h {
                    return Err(Error::InvalidProfile(format!(
                        "cornice height {} must be below wall height {}",
                        ch, h
                    )));
                }
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(bw, 0.0),
                    Point2::new(tw, h),
                    Point2::new(-cw, h),
                    // drop skews the cornice underside towards the web
                    Point2::new(-cw + cw * drop / 100.0, h - ch),
                    Point2::new(0.0, h - ch),
                ]
            }
            ProfileFamily::TaperedWall | ProfileFamily::WingWall => {
                let h = dims.positive("height")?;
                let w = dims.positive("width")?;
                rectangle(w, h)
            }
        };
        debug_assert_eq!(points.len(), self.point_count());
        Ok(points)
    }
}

impl fmt::Display for ProfileFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileFamily::Footing => "Footing",
            ProfileFamily::Ledge => "Ledge",
            ProfileFamily::Column => "Column",
            ProfileFamily::RetainingWall => "RetainingWall",
            ProfileFamily::TaperedWall => "TaperedWall",
            ProfileFamily::WingWall => "WingWall",
        };
        f.write_str(name)
    }
}

#[inline]
fn rectangle(width: f64, height: f64) -> Vec<Point2<f64>> {
    vec![
        Point2::new(0.0, 0.0),
        Point2::new(width, 0.0),
        Point2::new(width, height),
        Point2::new(0.0, height),
    ]
}

/// Parse a `<FAMILY><TOKEN>*<TOKEN>*...` descriptor
pub fn parse_descriptor(descriptor: &str) -> Result<(ProfileFamily, Dimensions)> {
    let trimmed = descriptor.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
        .unwrap_or(trimmed.len());
    let (tag, rest) = trimmed.split_at(split);

    if tag.is_empty() {
        return Err(Error::malformed(descriptor, "missing family tag"));
    }
    let family = ProfileFamily::from_tag(tag.trim_end_matches('_'))
        .ok_or_else(|| Error::malformed(descriptor, format!("unknown family '{}'", tag)))?;

    let tokens: Vec<&str> = if rest.trim().is_empty() {
        Vec::new()
    } else {
        rest.split('*').collect()
    };
    let dims = family.parse(descriptor, &tokens)?;
    Ok((family, dims))
}
