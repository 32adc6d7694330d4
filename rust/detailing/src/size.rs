// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bar sizes and the properties derived from a diameter.

use serde::Serialize;

use crate::error::{Error, Result};

/// Standard bar diameters in mm; the host's class number is the position in
/// this series plus one.
pub const STANDARD_DIAMETERS: [f64; 10] = [6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 20.0, 25.0, 32.0, 40.0];

/// Steel grade for every standard bar.
pub const GRADE: &str = "B500B";

/// Anchorage length as a multiple of the diameter.
pub const ANCHORAGE_FACTOR: f64 = 10.0;
/// Full development (and default lap) length as a multiple of the diameter.
pub const DEVELOPMENT_FACTOR: f64 = 40.0;

/// Diameter plus its derived grade, class and bending radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarSize {
    diameter: f64,
    grade: &'static str,
    class: u8,
    bending_radius: f64,
}

impl BarSize {
    pub fn from_diameter(diameter: f64) -> Result<Self> {
        let position = STANDARD_DIAMETERS
            .iter()
            .position(|d| (d - diameter).abs() < 1e-6)
            .ok_or_else(|| {
                Error::InvalidBarSize(format!("{} mm is not a standard diameter", diameter))
            })?;

        // mandrel radius: 2d up to 16 mm, 3.5d above
        let bending_radius = if diameter <= 16.0 {
            2.0 * diameter
        } else {
            3.5 * diameter
        };

        Ok(Self {
            diameter,
            grade: GRADE,
            class: position as u8 + 1,
            bending_radius,
        })
    }

    #[inline]
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    #[inline]
    pub fn grade(&self) -> &'static str {
        self.grade
    }

    #[inline]
    pub fn class(&self) -> u8 {
        self.class
    }

    #[inline]
    pub fn bending_radius(&self) -> f64 {
        self.bending_radius
    }

    /// Standard anchorage, 10×d
    #[inline]
    pub fn anchorage_length(&self) -> f64 {
        ANCHORAGE_FACTOR * self.diameter
    }

    /// Full development, 40×d
    #[inline]
    pub fn development_length(&self) -> f64 {
        DEVELOPMENT_FACTOR * self.diameter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_class_and_radius() {
        let small = BarSize::from_diameter(12.0).unwrap();
        assert_eq!(small.class(), 4);
        assert_eq!(small.bending_radius(), 24.0);
        assert_eq!(small.grade(), "B500B");

        let large = BarSize::from_diameter(20.0).unwrap();
        assert_eq!(large.class(), 7);
        assert_eq!(large.bending_radius(), 70.0);
        assert_eq!(large.anchorage_length(), 200.0);
        assert_eq!(large.development_length(), 800.0);
    }

    #[test]
    fn rejects_non_standard_diameter() {
        assert!(matches!(
            BarSize::from_diameter(18.0),
            Err(Error::InvalidBarSize(_))
        ));
        assert!(BarSize::from_diameter(0.0).is_err());
    }
}
