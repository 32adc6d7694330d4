// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bar shapes
//!
//! A bar is shaped by cutting each leg face with a plane normal to its
//! guideline and chaining the resulting segments into one polyline.

use nalgebra::Point3;
use rebar_lite_geometry::{polyline_length, Face, Line, Plane, EPSILON};
use smallvec::SmallVec;

use crate::modifiers::{BarEnd, EndTreatment, HookShape, LapPlacement, LapSide, Splitter};
use crate::size::BarSize;

/// Points closer than this are treated as the same corner (mm)
const JOIN_TOLERANCE: f64 = 1e-6;

/// Shortest leg left after a trimming adjustment (mm)
const MIN_LEG_LENGTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hook {
    pub end: BarEnd,
    pub shape: HookShape,
    pub rotation: f64,
}

/// Lap splice where a splitter's cut crosses a bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splice {
    /// Distance along the bar polyline
    pub at: f64,
    pub lap_length: f64,
    pub lap_side: LapSide,
    pub lap_placement: LapPlacement,
}

/// One bar of a group
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// 1-based position in placement order
    pub number: usize,
    /// Offset along the group's primary guideline
    pub offset: f64,
    pub size: BarSize,
    pub points: Vec<Point3<f64>>,
    pub hooks: SmallVec<[Hook; 2]>,
    pub splices: SmallVec<[Splice; 2]>,
}

impl Bar {
    pub fn new(number: usize, offset: f64, size: BarSize, points: Vec<Point3<f64>>) -> Self {
        Self {
            number,
            offset,
            size,
            points,
            hooks: SmallVec::new(),
            splices: SmallVec::new(),
        }
    }

    /// Length of the bar centre line
    #[inline]
    pub fn length(&self) -> f64 {
        polyline_length(&self.points)
    }

    #[inline]
    pub fn leg_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Apply an end treatment.
    ///
    /// Leg adjustments move the end point along its leg; a trim never shortens
    /// the leg below [`MIN_LEG_LENGTH`].
    pub fn apply_end(&mut self, end: BarEnd, treatment: EndTreatment) {
        match treatment {
            EndTreatment::Hook { shape, rotation } => self.hooks.push(Hook {
                end,
                shape,
                rotation,
            }),
            EndTreatment::LegAdjustment { length } => self.adjust_leg(end, length),
        }
    }

    fn adjust_leg(&mut self, end: BarEnd, length: f64) {
        let n = self.points.len();
        if n < 2 {
            return;
        }
        let (tip, inner) = match end {
            BarEnd::Start => (0, 1),
            BarEnd::End => (n - 1, n - 2),
        };
        let leg = self.points[tip] - self.points[inner];
        let leg_len = leg.norm();
        if leg_len < EPSILON {
            return;
        }
        let length = if length < 0.0 {
            length.max((MIN_LEG_LENGTH - leg_len).min(0.0))
        } else {
            length
        };
        self.points[tip] += leg / leg_len * length;
    }

    /// Record a splice where the splitter's cut crosses this bar.
    ///
    /// The finite cut segment has to pass within half a diameter of the bar
    /// centre line, away from both bar ends. Returns whether a splice was
    /// added.
    pub fn split(&mut self, splitter: &Splitter) -> bool {
        let reach = self.size.diameter() / 2.0;
        let cut = &splitter.cut;

        let mut walked = 0.0;
        let mut best: Option<(f64, f64)> = None;
        for pair in self.points.windows(2) {
            let len = (pair[1] - pair[0]).norm();
            if len < EPSILON {
                continue;
            }
            let (dist, s) = segment_approach(&pair[0], &pair[1], &cut.a, &cut.b);
            if dist <= reach && best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, walked + s * len));
            }
            walked += len;
        }

        let Some((_, at)) = best else {
            return false;
        };
        if at <= JOIN_TOLERANCE || at >= walked - JOIN_TOLERANCE {
            return false;
        }
        self.splices.push(Splice {
            at,
            lap_length: splitter.lap_length,
            lap_side: splitter.lap_side,
            lap_placement: splitter.lap_placement,
        });
        true
    }
}

/// Closest approach of segments `p0 p1` and `q0 q1`: the distance and the
/// parameter of the closest point on the first segment
fn segment_approach(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    q0: &Point3<f64>,
    q1: &Point3<f64>,
) -> (f64, f64) {
    let d1 = p1 - p0;
    let d2 = q1 - q0;
    let r = p0 - q0;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t) = if a <= EPSILON && e <= EPSILON {
        (0.0, 0.0)
    } else if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            // parallel segments: any point of the first will do
            let s = if denom > EPSILON * a * e {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };
    ((p0 + d1 * s - (q0 + d2 * t)).norm(), s)
}

fn same_point(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    (a - b).norm() <= JOIN_TOLERANCE
}

fn same_leg(a: &Line, b: &Line) -> bool {
    (same_point(&a.a, &b.a) && same_point(&a.b, &b.b))
        || (same_point(&a.a, &b.b) && same_point(&a.b, &b.a))
}

/// Cut each leg face with its plane, in leg order.
///
/// Faces the plane misses are skipped. A leg shared by two faces (a cut
/// exactly at a station) is kept once.
pub fn section_legs<'a>(cuts: impl IntoIterator<Item = (&'a Face, Plane)>) -> Vec<Line> {
    let mut legs: Vec<Line> = Vec::new();
    for (face, plane) in cuts {
        let Some(leg) = face.section(&plane) else {
            continue;
        };
        if leg.length() <= JOIN_TOLERANCE || legs.iter().any(|l| same_leg(l, &leg)) {
            continue;
        }
        legs.push(leg);
    }
    legs
}

/// Chain legs end to nearest start into one polyline.
///
/// The first leg seeds the chain; every further leg is attached at whichever
/// chain end it is closest to. The result starts at the free end of the
/// first leg when that end is still a chain end.
pub fn chain_legs(legs: &[Line]) -> Vec<Point3<f64>> {
    let Some(first) = legs.first() else {
        return Vec::new();
    };
    let mut chain = vec![first.a, first.b];
    let mut rest: Vec<Line> = legs[1..].to_vec();

    while !rest.is_empty() {
        let head = chain[0];
        let tail = chain[chain.len() - 1];

        // (index, attach at tail, reversed, distance)
        let mut best = (0, true, false, f64::INFINITY);
        for (i, leg) in rest.iter().enumerate() {
            let options = [
                (true, false, (leg.a - tail).norm()),
                (true, true, (leg.b - tail).norm()),
                (false, false, (leg.b - head).norm()),
                (false, true, (leg.a - head).norm()),
            ];
            for (at_tail, reversed, dist) in options {
                if dist < best.3 {
                    best = (i, at_tail, reversed, dist);
                }
            }
        }

        let (index, at_tail, reversed, _) = best;
        let leg = rest.remove(index);
        let leg = if reversed { leg.reversed() } else { leg };
        if at_tail {
            if !same_point(&tail, &leg.a) {
                chain.push(leg.a);
            }
            chain.push(leg.b);
        } else {
            if !same_point(&head, &leg.b) {
                chain.insert(0, leg.b);
            }
            chain.insert(0, leg.a);
        }
    }

    let starts_on_first = same_point(&chain[0], &first.a) || same_point(&chain[0], &first.b);
    let last = chain[chain.len() - 1];
    let ends_on_first = same_point(&last, &first.a) || same_point(&last, &first.b);
    if !starts_on_first && ends_on_first {
        chain.reverse();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{BarsAffected, FirstAffectedBar};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    fn size() -> BarSize {
        BarSize::from_diameter(12.0).unwrap()
    }

    #[test]
    fn chains_u_shape_in_leg_order() {
        // front, bottom, back legs given in arbitrary orientation
        let legs = [
            Line::new(p(0.0, 0.0, 0.0), p(0.0, 0.0, 300.0)),
            Line::new(p(0.0, 400.0, 0.0), p(0.0, 0.0, 0.0)),
            Line::new(p(0.0, 400.0, 200.0), p(0.0, 400.0, 0.0)),
        ];
        let chain = chain_legs(&legs);
        assert_eq!(
            chain,
            vec![
                p(0.0, 0.0, 300.0),
                p(0.0, 0.0, 0.0),
                p(0.0, 400.0, 0.0),
                p(0.0, 400.0, 200.0)
            ]
        );
    }

    #[test]
    fn chains_collinear_station_legs() {
        let legs = [
            Line::new(p(0.0, 0.0, 0.0), p(2000.0, 0.0, 0.0)),
            Line::new(p(2000.0, 0.0, 0.0), p(5000.0, 0.0, 0.0)),
        ];
        assert_eq!(
            chain_legs(&legs),
            vec![p(0.0, 0.0, 0.0), p(2000.0, 0.0, 0.0), p(5000.0, 0.0, 0.0)]
        );
        assert!(chain_legs(&[]).is_empty());
    }

    #[test]
    fn leg_adjustments_extend_and_clamp() {
        let mut bar = Bar::new(1, 0.0, size(), vec![p(0.0, 0.0, 0.0), p(1000.0, 0.0, 0.0)]);
        bar.apply_end(BarEnd::End, EndTreatment::LegAdjustment { length: 120.0 });
        assert_relative_eq!(bar.points[1].x, 1120.0);

        bar.apply_end(BarEnd::Start, EndTreatment::LegAdjustment { length: -100.0 });
        assert_relative_eq!(bar.points[0].x, 100.0);

        // trimming more than the leg leaves a minimal leg
        bar.apply_end(BarEnd::Start, EndTreatment::LegAdjustment { length: -5000.0 });
        assert_relative_eq!(bar.length(), MIN_LEG_LENGTH, epsilon = 1e-9);
    }

    #[test]
    fn hooks_are_recorded() {
        let mut bar = Bar::new(1, 0.0, size(), vec![p(0.0, 0.0, 0.0), p(0.0, 0.0, 900.0)]);
        bar.apply_end(
            BarEnd::End,
            EndTreatment::Hook {
                shape: HookShape::Deg90,
                rotation: 90.0,
            },
        );
        assert_eq!(bar.hooks.len(), 1);
        assert_eq!(bar.hooks[0].end, BarEnd::End);
        assert_relative_eq!(bar.length(), 900.0);
    }

    #[test]
    fn splice_only_where_cut_crosses() {
        let splitter = |x: f64| Splitter {
            lap_side: LapSide::Middle,
            lap_placement: LapPlacement::OnLeg,
            lap_length: 800.0,
            bars_affected: BarsAffected::All,
            first_affected_bar: FirstAffectedBar::First,
            cut: Line::new(p(x, -500.0, 0.0), p(x, 500.0, 0.0)),
        };
        let mut bar = Bar::new(1, 0.0, size(), vec![p(0.0, 0.0, 0.0), p(6000.0, 0.0, 0.0)]);
        assert!(bar.split(&splitter(2500.0)));
        assert!(!bar.split(&splitter(7000.0)));
        assert_eq!(bar.splices.len(), 1);
        assert_relative_eq!(bar.splices[0].at, 2500.0);

        // a cut that stops short of the bar leaves it whole
        let mut short = splitter(3000.0);
        short.cut = Line::new(p(3000.0, 100.0, 0.0), p(3000.0, 500.0, 0.0));
        assert!(!bar.split(&short));
        assert_eq!(bar.splices.len(), 1);
    }

    #[test]
    fn splice_on_a_bent_bar_counts_earlier_legs() {
        let cut = Line::new(p(-100.0, 250.0, 0.0), p(100.0, 250.0, 0.0));
        let mut bar = Bar::new(
            1,
            0.0,
            size(),
            vec![p(0.0, 0.0, 300.0), p(0.0, 0.0, 0.0), p(0.0, 400.0, 0.0)],
        );
        let splitter = Splitter {
            lap_side: LapSide::Left,
            lap_placement: LapPlacement::Transverse,
            lap_length: 480.0,
            bars_affected: BarsAffected::All,
            first_affected_bar: FirstAffectedBar::First,
            cut,
        };
        assert!(bar.split(&splitter));
        assert_relative_eq!(bar.splices[0].at, 550.0, epsilon = 1e-9);
    }
}
