// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Rebar-Lite Detailing
//!
//! Reinforcement detailing for concrete elements built by
//! `rebar-lite-geometry`.
//!
//! Each pattern of an element family picks leg faces by index, places bars
//! along a guideline, shapes them by cutting the leg faces and applies end
//! details, property overrides, splitters and the minimum bar length. The
//! finished group is handed to a [`Host`]; the layer every leg face should
//! carry is reconciled after the run.
//!
//! ```no_run
//! use rebar_lite_detailing::{DetailingConfig, DetailingRun, PartInfo, RecordingHost};
//! use rebar_lite_geometry::Plane;
//!
//! let mut host = RecordingHost::new();
//! let part = host.add_part(PartInfo::new("LDG400*300*200", 6000.0, Plane::world()));
//! let config: DetailingConfig = [("Ledge_Stirrups_Diameter", "12")].into_iter().collect();
//!
//! let report = DetailingRun::new(&mut host, &config).detail_part(part)?;
//! println!("{} groups", report.created.len());
//! # Ok::<(), rebar_lite_detailing::Error>(())
//! ```

pub mod bar;
pub mod config;
pub mod error;
pub mod group;
pub mod guideline;
pub mod host;
pub mod keys;
pub mod layers;
pub mod modifiers;
pub mod patterns;
pub mod run;
pub mod size;

pub use bar::{Bar, Hook, Splice};
pub use config::DetailingConfig;
pub use error::{Error, Result};
pub use group::{GroupDefinition, LegFace, RebarGroup};
pub use guideline::{place_bars, place_group, Guideline, LengthKind, SpacingKind, SpacingZone};
pub use host::{Host, HostError, PartInfo, PartPicker, PickOutcome, RecordingHost};
pub use keys::{GroupId, PartId};
pub use layers::{LayerAssignments, ReconcileReport};
pub use modifiers::{
    min_stagger, min_stagger_with, splice_cut, staggered_offset, staggered_offset_with,
    validate_stagger, validate_stagger_with, BarEnd, BarsAffected, EndDetail, EndTreatment,
    FirstAffectedBar, HookShape, LapPlacement, LapSide, MinimumLength, Modifier, PropertyOverride,
    Splitter, SubRange,
};
pub use patterns::{
    patterns_for, ColumnPattern, FootingPattern, LedgePattern, PatternId, WallPattern,
};
pub use run::{CreatedGroup, DetailingRun, FailedPattern, RunOutcome, RunReport};
pub use size::BarSize;
