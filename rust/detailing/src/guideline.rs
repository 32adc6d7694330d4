// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Guidelines and the bar placement engine
//!
//! A guideline is a path plus an ordered list of spacing zones. Placement
//! walks the zones from `start_offset` and returns the distances along the
//! path where a bar is repeated. Secondary guidelines reuse their primary's
//! result so distinct legs of one pattern stay aligned bar for bar.

use nalgebra::{Point3, Vector3};
use rebar_lite_geometry::{polyline_length, EPSILON};

use crate::error::{Error, Result};

/// Tolerance applied when comparing offsets against zone and path bounds
const OFFSET_TOLERANCE: f64 = 1e-9;

/// How bars are distributed inside a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingKind {
    /// Fixed pitch equal to the zone spacing
    Exact,
}

/// How a zone's length is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthKind {
    Absolute,
    /// Whatever remains of the path after earlier zones and the end offset
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingZone {
    pub spacing: f64,
    pub kind: SpacingKind,
    pub length: f64,
    pub length_kind: LengthKind,
}

impl SpacingZone {
    /// Zone covering exactly `length` of path
    pub fn absolute(spacing: f64, length: f64) -> Self {
        Self {
            spacing,
            kind: SpacingKind::Exact,
            length,
            length_kind: LengthKind::Absolute,
        }
    }

    /// Zone covering the rest of the path
    pub fn relative(spacing: f64) -> Self {
        Self {
            spacing,
            kind: SpacingKind::Exact,
            length: 0.0,
            length_kind: LengthKind::Relative,
        }
    }
}

/// Path and spacing rule controlling bar repetition
#[derive(Debug, Clone, PartialEq)]
pub struct Guideline {
    pub path: Vec<Point3<f64>>,
    pub zones: Vec<SpacingZone>,
    pub start_offset: f64,
    pub end_offset: f64,
    /// Index of the primary guideline within the owning group
    pub inherits_from: Option<usize>,
}

impl Guideline {
    pub fn new(path: Vec<Point3<f64>>, zones: Vec<SpacingZone>) -> Self {
        Self {
            path,
            zones,
            start_offset: 0.0,
            end_offset: 0.0,
            inherits_from: None,
        }
    }

    /// Secondary guideline that follows the primary at `primary` in its group
    pub fn secondary(path: Vec<Point3<f64>>, primary: usize) -> Self {
        Self {
            path,
            zones: Vec::new(),
            start_offset: 0.0,
            end_offset: 0.0,
            inherits_from: Some(primary),
        }
    }

    pub fn with_offsets(mut self, start: f64, end: f64) -> Self {
        self.start_offset = start;
        self.end_offset = end;
        self
    }

    #[inline]
    pub fn is_secondary(&self) -> bool {
        self.inherits_from.is_some()
    }

    /// Total path length
    #[inline]
    pub fn length(&self) -> f64 {
        polyline_length(&self.path)
    }

    fn check_path(&self) -> Result<f64> {
        if self.path.len() < 2 {
            return Err(Error::InvalidGuideline(format!(
                "path needs at least 2 points, got {}",
                self.path.len()
            )));
        }
        let length = self.length();
        if length < EPSILON {
            return Err(Error::InvalidGuideline("path has zero length".to_string()));
        }
        Ok(length)
    }

    /// Segment containing `offset` (clamped to the path) and the distance into it
    fn locate(&self, offset: f64) -> Result<(Point3<f64>, Vector3<f64>, f64)> {
        let total = self.check_path()?;
        let offset = offset.clamp(0.0, total);

        let mut walked = 0.0;
        let mut last = None;
        for pair in self.path.windows(2) {
            let seg = pair[1] - pair[0];
            let len = seg.norm();
            if len < EPSILON {
                continue;
            }
            let dir = seg / len;
            if offset <= walked + len + OFFSET_TOLERANCE {
                return Ok((pair[0], dir, offset - walked));
            }
            walked += len;
            last = Some((pair[0], dir, len));
        }
        // only reachable through rounding at the very end of the path
        last.ok_or_else(|| Error::InvalidGuideline("path has zero length".to_string()))
    }

    /// Point at `offset` along the path, clamped to its ends
    pub fn point_at(&self, offset: f64) -> Result<Point3<f64>> {
        let (a, dir, along) = self.locate(offset)?;
        Ok(a + dir * along)
    }

    /// Unit direction of the path at `offset`
    pub fn tangent_at(&self, offset: f64) -> Result<Vector3<f64>> {
        let (_, dir, _) = self.locate(offset)?;
        Ok(dir)
    }

    /// Offset of the path point closest to `point`
    pub fn project(&self, point: &Point3<f64>) -> f64 {
        let mut walked = 0.0;
        let mut best = (f64::INFINITY, 0.0);
        for pair in self.path.windows(2) {
            let seg = pair[1] - pair[0];
            let len_sq = seg.norm_squared();
            let t = if len_sq < EPSILON {
                0.0
            } else {
                ((point - pair[0]).dot(&seg) / len_sq).clamp(0.0, 1.0)
            };
            let closest = pair[0] + seg * t;
            let dist = (point - closest).norm_squared();
            let len = len_sq.sqrt();
            if dist < best.0 {
                best = (dist, walked + t * len);
            }
            walked += len;
        }
        best.1
    }
}

/// Compute bar offsets for a primary guideline.
///
/// The first bar sits at `start_offset`. Within each zone bars follow at the
/// zone's pitch, continuing from the last placed bar, and no bar lies beyond
/// `length - end_offset`. Counts are integer steps so long paths do not
/// accumulate rounding.
pub fn place_bars(guideline: &Guideline) -> Result<Vec<f64>> {
    let total = guideline.check_path()?;
    if guideline.zones.is_empty() {
        return Err(Error::InvalidGuideline("no spacing zones".to_string()));
    }
    for zone in &guideline.zones {
        if !zone.spacing.is_finite() || zone.spacing <= 0.0 {
            return Err(Error::InvalidGuideline(format!(
                "zone spacing must be positive, got {}",
                zone.spacing
            )));
        }
        if zone.length_kind == LengthKind::Absolute && !(zone.length.is_finite() && zone.length >= 0.0) {
            return Err(Error::InvalidGuideline(format!(
                "absolute zone length must be non-negative, got {}",
                zone.length
            )));
        }
    }
    let (start, end) = (guideline.start_offset, guideline.end_offset);
    if !(start.is_finite() && end.is_finite()) || start < 0.0 || end < 0.0 {
        return Err(Error::InvalidGuideline(format!(
            "offsets must be non-negative, got {} / {}",
            start, end
        )));
    }

    let usable_end = total - end;
    if start > usable_end + OFFSET_TOLERANCE {
        // Offsets overlap: at most the start bar, if it is still on the path
        return Ok(if start <= total + OFFSET_TOLERANCE {
            vec![start]
        } else {
            Vec::new()
        });
    }

    let mut offsets = vec![start];
    let mut last = start;
    let mut zone_start = start;
    for zone in &guideline.zones {
        let zone_end = match zone.length_kind {
            LengthKind::Absolute => (zone_start + zone.length).min(usable_end),
            LengthKind::Relative => usable_end,
        };
        let steps = ((zone_end - last) / zone.spacing + OFFSET_TOLERANCE).floor();
        if steps >= 1.0 {
            let steps = steps as usize;
            offsets.extend((1..=steps).map(|k| (last + k as f64 * zone.spacing).min(usable_end)));
            last += steps as f64 * zone.spacing;
        }
        zone_start = zone_end;
        if zone_start >= usable_end - OFFSET_TOLERANCE {
            break;
        }
    }

    Ok(offsets)
}

/// Compute offsets for every guideline of a group, resolving inheritance.
///
/// A secondary guideline reuses its primary's offsets scaled by the ratio of
/// the two path lengths, so count and relative spacing always match.
pub fn place_group(guidelines: &[Guideline]) -> Result<Vec<Vec<f64>>> {
    let mut placed: Vec<Option<Vec<f64>>> = Vec::with_capacity(guidelines.len());
    for guideline in guidelines {
        placed.push(match guideline.inherits_from {
            None => Some(place_bars(guideline)?),
            Some(_) => None,
        });
    }

    let mut result = Vec::with_capacity(guidelines.len());
    for (index, guideline) in guidelines.iter().enumerate() {
        let offsets = match guideline.inherits_from {
            None => placed[index].clone().unwrap_or_default(),
            Some(primary_index) => {
                let (primary, primary_offsets) = guidelines
                    .get(primary_index)
                    .zip(placed.get(primary_index).and_then(Option::as_ref))
                    .ok_or_else(|| {
                        Error::InvalidGuideline(format!(
                            "guideline {} inherits from {}, which is not a primary guideline",
                            index, primary_index
                        ))
                    })?;
                let scale = guideline.check_path()? / primary.check_path()?;
                primary_offsets.iter().map(|o| o * scale).collect()
            }
        };
        result.push(offsets);
    }
    Ok(result)
}
