// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reinforcement pattern catalogue
//!
//! Every family has a closed set of patterns. A pattern picks its leg faces
//! by stable face index, builds guidelines from profile corners and reads
//! its tunables from the configuration under the prefix `<Family>_<Pattern>`:
//!
//! | Key suffix | Meaning | Default |
//! |---|---|---|
//! | `_Diameter` | bar diameter | required |
//! | `_Spacing` | main spacing | 200 |
//! | `_StartSpacing` | spacing inside the start zone | main spacing |
//! | `_StartZone` | length of the start zone | 0 (no start zone) |
//! | `_StarterDiameter` | diameter of bars in the start zone | none |
//! | `_Layer` | layer of every leg face | per pattern |

use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;
use rebar_lite_geometry::{Faces, Line, Profile, ProfileFamily};

use crate::config::{self, DetailingConfig};
use crate::error::{Error, Result};
use crate::group::{GroupDefinition, LegFace};
use crate::guideline::{Guideline, SpacingZone};
use crate::modifiers::{
    min_stagger_with, splice_cut, staggered_offset_with, validate_stagger_with, BarEnd,
    BarsAffected, EndDetail, FirstAffectedBar, LapPlacement, LapSide, MinimumLength, Modifier,
    PropertyOverride, Splitter, SubRange,
};
use crate::size::{BarSize, DEVELOPMENT_FACTOR};

pub const DIAMETER: &str = "Diameter";
pub const SPACING: &str = "Spacing";
pub const START_SPACING: &str = "StartSpacing";
pub const START_ZONE: &str = "StartZone";
pub const STARTER_DIAMETER: &str = "StarterDiameter";
pub const LAYER: &str = "Layer";

const DEFAULT_SPACING: f64 = 200.0;
const DEFAULT_START_OFFSET: f64 = 50.0;
const DEFAULT_END_OFFSET: f64 = 50.0;
/// Stock bar length before horizontal bars need a lap splice (mm)
const DEFAULT_MAX_BAR_LENGTH: f64 = 12000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootingPattern {
    BottomLongitudinal,
    BottomTransverse,
    TopLongitudinal,
    TopTransverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgePattern {
    Stirrups,
    Longitudinal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnPattern {
    NearFace,
    FarFace,
    Ties,
}

/// Patterns shared by retaining, tapered and wing walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallPattern {
    FrontVertical,
    BackVertical,
    FrontHorizontal,
    BackHorizontal,
    /// Retaining walls only
    Cornice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternId {
    Footing(FootingPattern),
    Ledge(LedgePattern),
    Column(ColumnPattern),
    Wall(WallPattern),
}

const FOOTING_PATTERNS: &[PatternId] = &[
    PatternId::Footing(FootingPattern::BottomLongitudinal),
    PatternId::Footing(FootingPattern::BottomTransverse),
    PatternId::Footing(FootingPattern::TopLongitudinal),
    PatternId::Footing(FootingPattern::TopTransverse),
];

const LEDGE_PATTERNS: &[PatternId] = &[
    PatternId::Ledge(LedgePattern::Stirrups),
    PatternId::Ledge(LedgePattern::Longitudinal),
];

const COLUMN_PATTERNS: &[PatternId] = &[
    PatternId::Column(ColumnPattern::NearFace),
    PatternId::Column(ColumnPattern::FarFace),
    PatternId::Column(ColumnPattern::Ties),
];

const WALL_PATTERNS: &[PatternId] = &[
    PatternId::Wall(WallPattern::FrontVertical),
    PatternId::Wall(WallPattern::BackVertical),
    PatternId::Wall(WallPattern::FrontHorizontal),
    PatternId::Wall(WallPattern::BackHorizontal),
];

const RETAINING_WALL_PATTERNS: &[PatternId] = &[
    PatternId::Wall(WallPattern::FrontVertical),
    PatternId::Wall(WallPattern::BackVertical),
    PatternId::Wall(WallPattern::FrontHorizontal),
    PatternId::Wall(WallPattern::BackHorizontal),
    PatternId::Wall(WallPattern::Cornice),
];

/// Patterns detailed for a family, in run order
pub fn patterns_for(family: ProfileFamily) -> &'static [PatternId] {
    match family {
        ProfileFamily::Footing => FOOTING_PATTERNS,
        ProfileFamily::Ledge => LEDGE_PATTERNS,
        ProfileFamily::Column => COLUMN_PATTERNS,
        ProfileFamily::RetainingWall => RETAINING_WALL_PATTERNS,
        ProfileFamily::TaperedWall | ProfileFamily::WingWall => WALL_PATTERNS,
    }
}

impl PatternId {
    pub fn family_name(&self) -> &'static str {
        match self {
            PatternId::Footing(_) => "Footing",
            PatternId::Ledge(_) => "Ledge",
            PatternId::Column(_) => "Column",
            PatternId::Wall(_) => "Wall",
        }
    }

    pub fn pattern_name(&self) -> &'static str {
        match self {
            PatternId::Footing(FootingPattern::BottomLongitudinal) => "BottomLongitudinal",
            PatternId::Footing(FootingPattern::BottomTransverse) => "BottomTransverse",
            PatternId::Footing(FootingPattern::TopLongitudinal) => "TopLongitudinal",
            PatternId::Footing(FootingPattern::TopTransverse) => "TopTransverse",
            PatternId::Ledge(LedgePattern::Stirrups) => "Stirrups",
            PatternId::Ledge(LedgePattern::Longitudinal) => "Longitudinal",
            PatternId::Column(ColumnPattern::NearFace) => "NearFace",
            PatternId::Column(ColumnPattern::FarFace) => "FarFace",
            PatternId::Column(ColumnPattern::Ties) => "Ties",
            PatternId::Wall(WallPattern::FrontVertical) => "FrontVertical",
            PatternId::Wall(WallPattern::BackVertical) => "BackVertical",
            PatternId::Wall(WallPattern::FrontHorizontal) => "FrontHorizontal",
            PatternId::Wall(WallPattern::BackHorizontal) => "BackHorizontal",
            PatternId::Wall(WallPattern::Cornice) => "Cornice",
        }
    }

    pub fn applies_to(&self, family: ProfileFamily) -> bool {
        patterns_for(family).contains(self)
    }

    /// Configuration key `<Family>_<Pattern>_<suffix>`
    pub fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self, suffix)
    }

    fn default_layer(&self) -> i32 {
        match self {
            PatternId::Footing(FootingPattern::BottomLongitudinal) => 1,
            PatternId::Footing(FootingPattern::BottomTransverse) => 2,
            PatternId::Footing(FootingPattern::TopLongitudinal) => 4,
            PatternId::Footing(FootingPattern::TopTransverse) => 3,
            PatternId::Ledge(LedgePattern::Stirrups) => 1,
            PatternId::Ledge(LedgePattern::Longitudinal) => 2,
            PatternId::Column(ColumnPattern::Ties) => 1,
            PatternId::Column(_) => 2,
            PatternId::Wall(WallPattern::FrontVertical | WallPattern::BackVertical) => 1,
            PatternId::Wall(WallPattern::FrontHorizontal | WallPattern::BackHorizontal) => 2,
            PatternId::Wall(WallPattern::Cornice) => 3,
        }
    }

    /// Build the group definition of this pattern for one element
    pub fn build(
        &self,
        profile: &Profile,
        faces: &Faces,
        config: &DetailingConfig,
    ) -> Result<GroupDefinition> {
        let family = profile.family();
        if !self.applies_to(family) {
            return Err(Error::NotApplicable {
                pattern: self.to_string(),
                family: family.to_string(),
            });
        }
        let ctx = Context {
            pattern: *self,
            profile,
            faces,
            settings: Settings::read(*self, config)?,
        };
        match *self {
            PatternId::Footing(p) => ctx.footing(p),
            PatternId::Ledge(p) => ctx.ledge(p),
            PatternId::Column(p) => ctx.column(p),
            PatternId::Wall(p) => ctx.wall(p),
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.family_name(), self.pattern_name())
    }
}

impl FromStr for PatternId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id = match s {
            "Footing_BottomLongitudinal" => PatternId::Footing(FootingPattern::BottomLongitudinal),
            "Footing_BottomTransverse" => PatternId::Footing(FootingPattern::BottomTransverse),
            "Footing_TopLongitudinal" => PatternId::Footing(FootingPattern::TopLongitudinal),
            "Footing_TopTransverse" => PatternId::Footing(FootingPattern::TopTransverse),
            "Ledge_Stirrups" => PatternId::Ledge(LedgePattern::Stirrups),
            "Ledge_Longitudinal" => PatternId::Ledge(LedgePattern::Longitudinal),
            "Column_NearFace" => PatternId::Column(ColumnPattern::NearFace),
            "Column_FarFace" => PatternId::Column(ColumnPattern::FarFace),
            "Column_Ties" => PatternId::Column(ColumnPattern::Ties),
            "Wall_FrontVertical" => PatternId::Wall(WallPattern::FrontVertical),
            "Wall_BackVertical" => PatternId::Wall(WallPattern::BackVertical),
            "Wall_FrontHorizontal" => PatternId::Wall(WallPattern::FrontHorizontal),
            "Wall_BackHorizontal" => PatternId::Wall(WallPattern::BackHorizontal),
            "Wall_Cornice" => PatternId::Wall(WallPattern::Cornice),
            _ => return Err(Error::UnknownPattern(s.to_string())),
        };
        Ok(id)
    }
}

/// Tunables of one pattern, read at build time
#[derive(Debug, Clone)]
struct Settings {
    size: BarSize,
    zones: Vec<SpacingZone>,
    start_zone: f64,
    starter: Option<f64>,
    start_offset: f64,
    end_offset: f64,
    layer: i32,
    minimum_length: MinimumLength,
    lap_factor: f64,
    max_bar_length: f64,
    hook_rotation: f64,
}

impl Settings {
    fn read(pattern: PatternId, config: &DetailingConfig) -> Result<Self> {
        let size = BarSize::from_diameter(config.number(&pattern.key(DIAMETER))?)?;
        let spacing = config.number_or(&pattern.key(SPACING), DEFAULT_SPACING)?;
        let start_spacing = config.number_or(&pattern.key(START_SPACING), spacing)?;
        let start_zone = config.number_or(&pattern.key(START_ZONE), 0.0)?;

        let zones = if start_zone > 0.0 {
            vec![
                SpacingZone::absolute(start_spacing, start_zone),
                SpacingZone::relative(spacing),
            ]
        } else {
            vec![SpacingZone::relative(spacing)]
        };
        let starter = match config.get(&pattern.key(STARTER_DIAMETER)) {
            Some(_) => Some(config.number(&pattern.key(STARTER_DIAMETER))?),
            None => None,
        };

        Ok(Self {
            size,
            zones,
            start_zone,
            starter,
            start_offset: config.number_or(config::START_OFFSET, DEFAULT_START_OFFSET)?,
            end_offset: config.number_or(config::END_OFFSET, DEFAULT_END_OFFSET)?,
            layer: config.integer_or(&pattern.key(LAYER), pattern.default_layer())?,
            minimum_length: MinimumLength {
                coefficient: config.number_or(
                    config::MIN_LENGTH_FACTOR,
                    MinimumLength::default().coefficient,
                )?,
            },
            lap_factor: config.number_or(config::LAP_FACTOR, DEVELOPMENT_FACTOR)?,
            max_bar_length: config.number_or(config::MAX_BAR_LENGTH, DEFAULT_MAX_BAR_LENGTH)?,
            hook_rotation: config.number_or(config::HOOK_ROTATION, 0.0)?,
        })
    }
}

/// Contour edges of a wall section
#[derive(Debug, Clone, Copy)]
struct WallEdges {
    back: usize,
    top: usize,
    front: usize,
}

impl WallEdges {
    fn of(family: ProfileFamily) -> Self {
        match family {
            // web front sits below the cornice, edges 3 and 4 wrap the cornice
            ProfileFamily::RetainingWall => Self {
                back: 1,
                top: 2,
                front: 5,
            },
            _ => Self {
                back: 1,
                top: 2,
                front: 3,
            },
        }
    }
}

struct Context<'a> {
    pattern: PatternId,
    profile: &'a Profile,
    faces: &'a Faces,
    settings: Settings,
}

impl Context<'_> {
    /// Lateral faces of contour edge `edge` over every station gap
    fn legs(&self, edge: usize, guideline: usize) -> Vec<LegFace> {
        (0..self.faces.station_count().saturating_sub(1))
            .filter_map(|gap| self.faces.lateral(gap, edge))
            .map(|face| LegFace {
                face: face.clone(),
                guideline,
                layer: self.settings.layer,
            })
            .collect()
    }

    /// Path along the element through contour point `point` of every station
    fn along(&self, point: usize) -> Vec<Point3<f64>> {
        self.profile
            .sections()
            .iter()
            .filter_map(|s| s.point(point))
            .collect()
    }

    /// Path across the start cap between two contour points
    fn across(&self, from: usize, to: usize) -> Vec<Point3<f64>> {
        let first = self.profile.first();
        [from, to].iter().filter_map(|&i| first.point(i)).collect()
    }

    fn primary(&self, path: Vec<Point3<f64>>) -> Guideline {
        Guideline::new(path, self.settings.zones.clone())
            .with_offsets(self.settings.start_offset, self.settings.end_offset)
    }

    /// Override for the bars of the start zone, when a starter size is set
    fn starter_override(&self, primary: &Guideline) -> Result<Option<Modifier>> {
        let Some(diameter) = self.settings.starter else {
            return Ok(None);
        };
        let zone_end = self.settings.start_offset + self.settings.start_zone;
        let range = SubRange::between(primary.point_at(0.0)?, primary.point_at(zone_end)?);
        Ok(Some(PropertyOverride { diameter, range }.into()))
    }

    fn hooks_both_ends(&self) -> Vec<Modifier> {
        let rotation = self.settings.hook_rotation;
        vec![
            EndDetail::hook(BarEnd::Start, rotation, SubRange::All).into(),
            EndDetail::hook(BarEnd::End, rotation, SubRange::All).into(),
        ]
    }

    /// Two staggered splitters when bars along the element exceed stock length.
    ///
    /// Cuts span the whole face and sit around mid-length; the second one is
    /// one minimum stagger further along and splits the other half of the bars.
    fn lap_splitters(&self, edge: usize) -> Result<Vec<Modifier>> {
        let length = self.profile.length();
        let diameter = self.settings.size.diameter();
        if length <= self.settings.max_bar_length {
            return Ok(Vec::new());
        }
        let stagger = min_stagger_with(self.settings.lap_factor, diameter);
        if stagger >= length {
            tracing::warn!(
                pattern = %self.pattern,
                length,
                stagger,
                "Element too short to stagger splices"
            );
            return Ok(Vec::new());
        }
        let Some(face) = self.faces.lateral(0, edge) else {
            return Ok(Vec::new());
        };

        let first = (length - stagger) / 2.0;
        let second = staggered_offset_with(self.settings.lap_factor, first, diameter);
        validate_stagger_with(self.settings.lap_factor, first, second, diameter)?;

        // cut across the whole face, centred on its edge in the start cap
        let Some(across) = face.edges().next() else {
            return Ok(Vec::new());
        };
        let centre = across.midpoint();
        let axis = Line::new(centre, centre + self.profile.frame().x_axis() * length);
        let transverse = across.b - across.a;
        let width = across.length();
        let lap_length = self.settings.lap_factor * diameter;

        let mut splitters = Vec::with_capacity(2);
        for (distance, first_affected) in [
            (first, FirstAffectedBar::First),
            (second, FirstAffectedBar::Second),
        ] {
            let cut = splice_cut(face, &axis, distance, &transverse, width)?;
            splitters.push(Modifier::Splitter(Splitter {
                lap_side: LapSide::Middle,
                lap_placement: LapPlacement::OnLeg,
                lap_length,
                bars_affected: BarsAffected::EverySecond,
                first_affected_bar: first_affected,
                cut,
            }));
        }
        Ok(splitters)
    }

    fn definition(
        &self,
        leg_faces: Vec<LegFace>,
        guidelines: Vec<Guideline>,
        modifiers: Vec<Modifier>,
    ) -> GroupDefinition {
        GroupDefinition {
            pattern: self.pattern,
            leg_faces,
            guidelines,
            size: self.settings.size,
            modifiers,
            minimum_length: self.settings.minimum_length,
        }
    }

    fn footing(&self, pattern: FootingPattern) -> Result<GroupDefinition> {
        // rectangle: 0 bottom, 2 top; points 0/1 bottom corners, 3/2 top corners
        let (edge, guideline, longitudinal) = match pattern {
            FootingPattern::BottomLongitudinal => (0, self.primary(self.across(0, 1)), true),
            FootingPattern::BottomTransverse => (0, self.primary(self.along(0)), false),
            FootingPattern::TopLongitudinal => (2, self.primary(self.across(3, 2)), true),
            FootingPattern::TopTransverse => (2, self.primary(self.along(3)), false),
        };
        let mut modifiers = self.hooks_both_ends();
        if longitudinal {
            modifiers.extend(self.lap_splitters(edge)?);
        }
        Ok(self.definition(self.legs(edge, 0), vec![guideline], modifiers))
    }

    fn ledge(&self, pattern: LedgePattern) -> Result<GroupDefinition> {
        match pattern {
            LedgePattern::Stirrups => {
                // U over front (3), bottom (0) and back (1); the back leg follows
                // its own corner so both vertical legs stay aligned bar for bar
                let primary = self.primary(self.along(0));
                let back = Guideline::secondary(self.along(1), 0);

                let mut legs = self.legs(3, 0);
                legs.extend(self.legs(0, 0));
                legs.extend(self.legs(1, 1));

                let size = &self.settings.size;
                let mut modifiers: Vec<Modifier> = vec![
                    EndDetail::anchorage(BarEnd::Start, size, SubRange::All).into(),
                    EndDetail::anchorage(BarEnd::End, size, SubRange::All).into(),
                ];
                modifiers.extend(self.starter_override(&primary)?);
                Ok(self.definition(legs, vec![primary, back], modifiers))
            }
            LedgePattern::Longitudinal => {
                let guideline = self.primary(self.across(0, 1));
                let modifiers = self.lap_splitters(0)?;
                Ok(self.definition(self.legs(0, 0), vec![guideline], modifiers))
            }
        }
    }

    fn column(&self, pattern: ColumnPattern) -> Result<GroupDefinition> {
        // the element runs up the column; starters develop into the footing
        let size = &self.settings.size;
        match pattern {
            ColumnPattern::NearFace | ColumnPattern::FarFace => {
                let (edge, path) = if pattern == ColumnPattern::NearFace {
                    (0, self.across(0, 1))
                } else {
                    (2, self.across(3, 2))
                };
                let guideline = self.primary(path);
                let modifiers = vec![
                    EndDetail::full_development(BarEnd::Start, size, SubRange::All).into(),
                ];
                Ok(self.definition(self.legs(edge, 0), vec![guideline], modifiers))
            }
            ColumnPattern::Ties => {
                let guideline = self.primary(self.along(0));
                let mut legs = Vec::new();
                for edge in 0..self.profile.point_count() {
                    legs.extend(self.legs(edge, 0));
                }
                let mut modifiers = self.hooks_both_ends();
                modifiers.extend(self.starter_override(&guideline)?);
                Ok(self.definition(legs, vec![guideline], modifiers))
            }
        }
    }

    fn wall(&self, pattern: WallPattern) -> Result<GroupDefinition> {
        let edges = WallEdges::of(self.profile.family());
        let size = &self.settings.size;
        let rotation = self.settings.hook_rotation;
        match pattern {
            WallPattern::FrontVertical => {
                // front legs run bottom to top
                let guideline = self.primary(self.along(0));
                let mut modifiers: Vec<Modifier> = vec![
                    EndDetail::full_development(BarEnd::Start, size, SubRange::All).into(),
                    EndDetail::hook(BarEnd::End, rotation, SubRange::All).into(),
                ];
                modifiers.extend(self.starter_override(&guideline)?);
                Ok(self.definition(self.legs(edges.front, 0), vec![guideline], modifiers))
            }
            WallPattern::BackVertical => {
                // back legs run top to bottom
                let guideline = self.primary(self.along(edges.back));
                let mut modifiers: Vec<Modifier> = vec![
                    EndDetail::full_development(BarEnd::End, size, SubRange::All).into(),
                    EndDetail::hook(BarEnd::Start, rotation, SubRange::All).into(),
                ];
                modifiers.extend(self.starter_override(&guideline)?);
                Ok(self.definition(self.legs(edges.back, 0), vec![guideline], modifiers))
            }
            WallPattern::FrontHorizontal => {
                // the front edge ends at corner 0, so this runs up the front
                let guideline = self.primary(self.across(0, edges.front));
                let modifiers = self.lap_splitters(edges.front)?;
                Ok(self.definition(self.legs(edges.front, 0), vec![guideline], modifiers))
            }
            WallPattern::BackHorizontal => {
                let guideline = self.primary(self.across(edges.back, edges.top));
                let modifiers = self.lap_splitters(edges.back)?;
                Ok(self.definition(self.legs(edges.back, 0), vec![guideline], modifiers))
            }
            WallPattern::Cornice => {
                // U around the cornice nose: top (2), nose (3) and underside (4)
                let guideline = self.primary(self.along(3));
                let mut legs = self.legs(edges.top, 0);
                legs.extend(self.legs(3, 0));
                legs.extend(self.legs(4, 0));
                let modifiers = vec![
                    EndDetail::anchorage(BarEnd::Start, size, SubRange::All).into(),
                    EndDetail::anchorage(BarEnd::End, size, SubRange::All).into(),
                ];
                Ok(self.definition(legs, vec![guideline], modifiers))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebar_lite_geometry::{derive_faces, Plane};

    #[test]
    fn identifiers_parse_back_from_display() {
        for family in ProfileFamily::ALL {
            for pattern in patterns_for(family) {
                let text = pattern.to_string();
                assert_eq!(text.parse::<PatternId>().unwrap(), *pattern);
            }
        }
        assert!(matches!(
            "Wall_Parapet".parse::<PatternId>(),
            Err(Error::UnknownPattern(_))
        ));
        assert_eq!(
            PatternId::Ledge(LedgePattern::Stirrups).key(DIAMETER),
            "Ledge_Stirrups_Diameter"
        );
    }

    #[test]
    fn cornice_only_on_retaining_walls() {
        let cornice = PatternId::Wall(WallPattern::Cornice);
        assert!(cornice.applies_to(ProfileFamily::RetainingWall));
        assert!(!cornice.applies_to(ProfileFamily::TaperedWall));
        assert_eq!(patterns_for(ProfileFamily::WingWall).len(), 4);
        assert_eq!(patterns_for(ProfileFamily::RetainingWall).len(), 5);
    }

    #[test]
    fn wrong_family_and_missing_diameter() {
        let profile = Profile::from_descriptor("FTG500*2000", 4000.0, &Plane::world()).unwrap();
        let faces = derive_faces(&profile);
        let config = DetailingConfig::new();

        let ties = PatternId::Column(ColumnPattern::Ties);
        assert!(matches!(
            ties.build(&profile, &faces, &config),
            Err(Error::NotApplicable { .. })
        ));

        let bottom = PatternId::Footing(FootingPattern::BottomTransverse);
        assert!(matches!(
            bottom.build(&profile, &faces, &config),
            Err(Error::ConfigMissing(key)) if key == "Footing_BottomTransverse_Diameter"
        ));
    }

    #[test]
    fn stirrups_use_three_leg_faces_and_a_secondary_guideline() {
        let profile = Profile::from_descriptor("LDG400*300*200", 6000.0, &Plane::world()).unwrap();
        let faces = derive_faces(&profile);
        let config: DetailingConfig = [("Ledge_Stirrups_Diameter", "12")].into_iter().collect();

        let definition = PatternId::Ledge(LedgePattern::Stirrups)
            .build(&profile, &faces, &config)
            .unwrap();
        let indices: Vec<usize> = definition.leg_faces.iter().map(|l| l.face.index()).collect();
        assert_eq!(indices, vec![4, 1, 2]);
        assert_eq!(definition.guidelines.len(), 2);
        assert_eq!(definition.guidelines[1].inherits_from, Some(0));
        assert_eq!(definition.layers(), vec![(4, 1), (1, 1), (2, 1)]);
    }
}
