// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Modifiers attached to reinforcement groups
//!
//! End details, property overrides and splitters each act on the bars whose
//! guideline position falls inside a sub-range. Splice staggering and the
//! minimum bar length are code-driven constants applied as given.

use nalgebra::{Point3, Vector3};
use rebar_lite_geometry::{kernel::normalized, Face, Line};

use crate::error::{Error, Result};
use crate::guideline::Guideline;
use crate::size::{BarSize, DEVELOPMENT_FACTOR};

/// Splices of interleaved bar sets must be this many lap lengths apart
pub const STAGGER_FACTOR: f64 = 1.3;

/// Default minimum bar length as a multiple of the diameter
pub const DEFAULT_MIN_LENGTH_FACTOR: f64 = 20.0;

const RANGE_TOLERANCE: f64 = 1e-6;

/// Part of a group a modifier acts on
#[derive(Debug, Clone, PartialEq)]
pub enum SubRange {
    All,
    /// Curve whose end points, projected onto the primary guideline, bound
    /// the affected positions
    Curve(Vec<Point3<f64>>),
}

impl SubRange {
    pub fn between(a: Point3<f64>, b: Point3<f64>) -> Self {
        SubRange::Curve(vec![a, b])
    }

    /// Offset interval on `guideline` covered by this range
    pub fn interval(&self, guideline: &Guideline) -> (f64, f64) {
        match self {
            SubRange::All => (f64::NEG_INFINITY, f64::INFINITY),
            SubRange::Curve(points) => match (points.first(), points.last()) {
                (Some(first), Some(last)) => {
                    let a = guideline.project(first);
                    let b = guideline.project(last);
                    (a.min(b), a.max(b))
                }
                _ => (f64::INFINITY, f64::NEG_INFINITY),
            },
        }
    }

    /// Whether a bar at `offset` on `guideline` is affected
    pub fn contains(&self, guideline: &Guideline, offset: f64) -> bool {
        let (lo, hi) = self.interval(guideline);
        offset >= lo - RANGE_TOLERANCE && offset <= hi + RANGE_TOLERANCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarEnd {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookShape {
    Deg90,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndTreatment {
    /// Hook with rotation around the bar axis in degrees
    Hook { shape: HookShape, rotation: f64 },
    /// Extend (positive) or trim (negative) the terminal leg
    LegAdjustment { length: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndDetail {
    pub end: BarEnd,
    pub treatment: EndTreatment,
    pub range: SubRange,
}

impl EndDetail {
    pub fn hook(end: BarEnd, rotation: f64, range: SubRange) -> Self {
        Self {
            end,
            treatment: EndTreatment::Hook {
                shape: HookShape::Deg90,
                rotation,
            },
            range,
        }
    }

    pub fn adjust(end: BarEnd, length: f64, range: SubRange) -> Self {
        Self {
            end,
            treatment: EndTreatment::LegAdjustment { length },
            range,
        }
    }

    /// Extend by the standard anchorage, 10×d
    pub fn anchorage(end: BarEnd, size: &BarSize, range: SubRange) -> Self {
        Self::adjust(end, size.anchorage_length(), range)
    }

    /// Extend by the full development length, 40×d
    pub fn full_development(end: BarEnd, size: &BarSize, range: SubRange) -> Self {
        Self::adjust(end, size.development_length(), range)
    }
}

/// Different diameter for bars inside a range
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyOverride {
    pub diameter: f64,
    pub range: SubRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapSide {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapPlacement {
    OnLeg,
    Transverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarsAffected {
    All,
    EverySecond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstAffectedBar {
    First,
    Second,
}

/// Lap splice across the bars of a group
#[derive(Debug, Clone, PartialEq)]
pub struct Splitter {
    pub lap_side: LapSide,
    pub lap_placement: LapPlacement,
    pub lap_length: f64,
    pub bars_affected: BarsAffected,
    pub first_affected_bar: FirstAffectedBar,
    /// Transverse cut line
    pub cut: Line,
}

impl Splitter {
    /// Whether the bar with 1-based position `number` is split
    pub fn affects(&self, number: usize) -> bool {
        match (self.bars_affected, self.first_affected_bar) {
            (BarsAffected::All, _) => true,
            (BarsAffected::EverySecond, FirstAffectedBar::First) => number % 2 == 1,
            (BarsAffected::EverySecond, FirstAffectedBar::Second) => number % 2 == 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    EndDetail(EndDetail),
    PropertyOverride(PropertyOverride),
    Splitter(Splitter),
}

impl Modifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Modifier::EndDetail(_) => "EndDetail",
            Modifier::PropertyOverride(_) => "PropertyOverride",
            Modifier::Splitter(_) => "Splitter",
        }
    }
}

impl From<EndDetail> for Modifier {
    fn from(detail: EndDetail) -> Self {
        Modifier::EndDetail(detail)
    }
}

impl From<PropertyOverride> for Modifier {
    fn from(property: PropertyOverride) -> Self {
        Modifier::PropertyOverride(property)
    }
}

impl From<Splitter> for Modifier {
    fn from(splitter: Splitter) -> Self {
        Modifier::Splitter(splitter)
    }
}

/// Minimum buildable bar length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimumLength {
    pub coefficient: f64,
}

impl MinimumLength {
    #[inline]
    pub fn length_for(&self, diameter: f64) -> f64 {
        self.coefficient * diameter
    }
}

impl Default for MinimumLength {
    fn default() -> Self {
        Self {
            coefficient: DEFAULT_MIN_LENGTH_FACTOR,
        }
    }
}

/// Smallest allowed distance between staggered splices, 1.3 × 40 × d
#[inline]
pub fn min_stagger(diameter: f64) -> f64 {
    min_stagger_with(DEVELOPMENT_FACTOR, diameter)
}

/// Same as [`min_stagger`] with a configured lap factor
#[inline]
pub fn min_stagger_with(lap_factor: f64, diameter: f64) -> f64 {
    STAGGER_FACTOR * lap_factor * diameter
}

/// Position of the second splitter given the first
#[inline]
pub fn staggered_offset(first: f64, diameter: f64) -> f64 {
    staggered_offset_with(DEVELOPMENT_FACTOR, first, diameter)
}

#[inline]
pub fn staggered_offset_with(lap_factor: f64, first: f64, diameter: f64) -> f64 {
    first + min_stagger_with(lap_factor, diameter)
}

pub fn validate_stagger(first: f64, second: f64, diameter: f64) -> Result<()> {
    validate_stagger_with(DEVELOPMENT_FACTOR, first, second, diameter)
}

/// Check two splice positions against the stagger for a configured lap factor
pub fn validate_stagger_with(
    lap_factor: f64,
    first: f64,
    second: f64,
    diameter: f64,
) -> Result<()> {
    let required = min_stagger_with(lap_factor, diameter);
    let actual = (second - first).abs();
    if actual + RANGE_TOLERANCE < required {
        return Err(Error::SpliceStagger { actual, required });
    }
    Ok(())
}

/// Distance between two cut lines measured along a bar axis
pub fn stagger_along(axis: &Line, first: &Line, second: &Line) -> Result<f64> {
    let dir = axis.direction()?;
    Ok((second.midpoint() - first.midpoint()).dot(&dir).abs())
}

/// Transverse cut line `distance` along a bar axis, lying in a bounding face.
///
/// The axis point is dropped onto the face plane with a line–plane
/// intersection along the face normal, and the cut runs along `transverse`
/// projected into that plane. Works for bar axes in any direction.
pub fn splice_cut(
    face: &Face,
    axis: &Line,
    distance: f64,
    transverse: &Vector3<f64>,
    width: f64,
) -> Result<Line> {
    let along = axis.point_at(distance)?;
    let plane = face.plane()?;
    let foot = Line::new(along, along + plane.normal()).intersect_plane(&plane)?;
    let across = normalized(&plane.project_vector(transverse), "splice transverse direction")?;
    let half = across * (width / 2.0);
    Ok(Line::new(foot - half, foot + half))
}
