// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rebar-Lite Geometry
//!
//! Rebuilds the 3D boundary of precast and cast-in-place concrete elements
//! from a short profile descriptor and derives the indexed faces that
//! reinforcement patterns use as bounding surfaces. Uses nalgebra for all
//! vector math.

pub mod error;
pub mod faces;
pub mod kernel;
pub mod profile;
pub mod profiles;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use error::{Error, Result};
pub use faces::{derive_faces, Face, FaceKind, Faces};
pub use kernel::{polyline_length, Line, Plane, EPSILON};
pub use profile::{build_profile, CrossSection, Profile};
pub use profiles::{parse_descriptor, Dimensions, ProfileFamily, StationRole};
