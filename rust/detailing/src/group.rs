// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reinforcement groups
//!
//! A [`GroupDefinition`] names the leg faces, guidelines, size and modifiers
//! of one pattern. [`GroupDefinition::build`] places the bars, shapes them
//! and applies the modifiers. A re-run builds a new group; groups are never
//! edited in part.

use rebar_lite_geometry::{Face, Plane};

use crate::bar::{chain_legs, section_legs, Bar};
use crate::error::{Error, Result};
use crate::guideline::{place_group, Guideline};
use crate::modifiers::{MinimumLength, Modifier};
use crate::patterns::PatternId;
use crate::size::BarSize;

/// Face a bar leg lies on
#[derive(Debug, Clone, PartialEq)]
pub struct LegFace {
    pub face: Face,
    /// Guideline that positions this leg
    pub guideline: usize,
    pub layer: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupDefinition {
    pub pattern: PatternId,
    pub leg_faces: Vec<LegFace>,
    /// Guideline 0 is the group's primary
    pub guidelines: Vec<Guideline>,
    pub size: BarSize,
    pub modifiers: Vec<Modifier>,
    pub minimum_length: MinimumLength,
}

impl GroupDefinition {
    /// Target `(face index, layer)` per distinct leg face
    pub fn layers(&self) -> Vec<(usize, i32)> {
        let mut layers: Vec<(usize, i32)> = Vec::with_capacity(self.leg_faces.len());
        for leg in &self.leg_faces {
            if !layers.iter().any(|(face, _)| *face == leg.face.index()) {
                layers.push((leg.face.index(), leg.layer));
            }
        }
        layers
    }

    pub fn build(&self) -> Result<RebarGroup> {
        let offsets = place_group(&self.guidelines)?;
        let Some(primary_offsets) = offsets.first() else {
            return Err(Error::InvalidGuideline(format!("{} has no guideline", self.pattern)));
        };
        let primary = &self.guidelines[0];
        let count = primary_offsets.len();

        for leg in &self.leg_faces {
            let placed = offsets.get(leg.guideline).ok_or_else(|| {
                Error::InvalidGuideline(format!(
                    "leg face {} refers to missing guideline {}",
                    leg.face.index(),
                    leg.guideline
                ))
            })?;
            if placed.len() != count {
                return Err(Error::InvalidGuideline(format!(
                    "guideline {} places {} bars, primary places {}",
                    leg.guideline,
                    placed.len(),
                    count
                )));
            }
        }

        let mut bars = Vec::with_capacity(count);
        for (i, &offset) in primary_offsets.iter().enumerate() {
            let mut cuts: Vec<(&Face, Plane)> = Vec::with_capacity(self.leg_faces.len());
            for leg in &self.leg_faces {
                let guideline = &self.guidelines[leg.guideline];
                let at = offsets[leg.guideline][i];
                let plane = Plane::from_normal(guideline.point_at(at)?, guideline.tangent_at(at)?)?;
                cuts.push((&leg.face, plane));
            }
            let legs = section_legs(cuts);
            if legs.is_empty() {
                tracing::trace!(pattern = %self.pattern, offset, "No leg face at offset");
                continue;
            }
            bars.push(Bar::new(i + 1, offset, self.size, chain_legs(&legs)));
        }
        let shaped = bars.len();

        for modifier in &self.modifiers {
            match modifier {
                Modifier::PropertyOverride(property) => {
                    let size = BarSize::from_diameter(property.diameter)?;
                    for bar in bars.iter_mut() {
                        if property.range.contains(primary, bar.offset) {
                            bar.size = size;
                        }
                    }
                }
                Modifier::EndDetail(detail) => {
                    for bar in bars.iter_mut() {
                        if detail.range.contains(primary, bar.offset) {
                            bar.apply_end(detail.end, detail.treatment);
                        }
                    }
                }
                Modifier::Splitter(splitter) => {
                    for bar in bars.iter_mut().filter(|b| splitter.affects(b.number)) {
                        bar.split(splitter);
                    }
                }
            }
        }

        let minimum = self.minimum_length;
        bars.retain(|bar| bar.length() >= minimum.length_for(bar.size.diameter()));

        tracing::debug!(
            pattern = %self.pattern,
            placed = count,
            shaped,
            kept = bars.len(),
            "Built rebar group"
        );

        Ok(RebarGroup {
            definition: self.clone(),
            bars,
        })
    }
}

/// Built group ready to hand to the host
#[derive(Debug, Clone, PartialEq)]
pub struct RebarGroup {
    pub definition: GroupDefinition,
    pub bars: Vec<Bar>,
}

impl RebarGroup {
    #[inline]
    pub fn pattern(&self) -> PatternId {
        self.definition.pattern
    }

    pub fn total_length(&self) -> f64 {
        self.bars.iter().map(Bar::length).sum()
    }

    pub fn spliced_bars(&self) -> usize {
        self.bars.iter().filter(|b| !b.splices.is_empty()).count()
    }
}
