// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detailing runs
//!
//! A run details one part at a time: profile and faces first, then every
//! pattern of the family in order, then the deferred layer passes. Pattern
//! failures are recorded and the run moves on; profile errors and
//! cancellation stop it. Groups committed before a stop stay in the host.

use std::fmt;

use rebar_lite_geometry::{build_profile, derive_faces, parse_descriptor, Faces, Profile};
use serde::{Serialize, Serializer};

use crate::config::DetailingConfig;
use crate::error::{Error, Result};
use crate::host::{Host, PartInfo, PartPicker, PickOutcome};
use crate::keys::{GroupId, PartId};
use crate::layers::{LayerAssignments, ReconcileReport};
use crate::patterns::{patterns_for, PatternId};
use crate::size::BarSize;

/// Serialize through `Display`
fn display<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedGroup {
    #[serde(skip)]
    pub group: GroupId,
    #[serde(serialize_with = "display")]
    pub pattern: PatternId,
    /// Bar size of the pattern before property overrides
    pub size: BarSize,
    pub bars: usize,
    pub spliced: usize,
    pub total_length: f64,
}

#[derive(Debug, Serialize)]
pub struct FailedPattern {
    #[serde(serialize_with = "display")]
    pub pattern: PatternId,
    #[serde(serialize_with = "display")]
    pub error: Error,
}

#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub created: Vec<CreatedGroup>,
    pub failed: Vec<FailedPattern>,
    pub layer_updates: ReconcileReport,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunReport),
    Cancelled,
}

impl RunOutcome {
    /// Report of a completed run; cancellation becomes [`Error::UserCancelled`]
    pub fn into_report(self) -> Result<RunReport> {
        match self {
            RunOutcome::Completed(report) => Ok(report),
            RunOutcome::Cancelled => Err(Error::UserCancelled),
        }
    }
}

/// Profile and faces of the part being detailed
fn prepare(info: &PartInfo) -> Result<(Profile, Faces)> {
    let (family, dimensions) = parse_descriptor(&info.descriptor)?;
    let stations = info
        .stations
        .unwrap_or_else(|| family.default_station_count());
    let profile = build_profile(family, &dimensions, info.length, stations, &info.frame)?;
    let faces = derive_faces(&profile);
    tracing::info!(
        descriptor = %info.descriptor,
        family = %family,
        length = info.length,
        stations,
        faces = faces.len(),
        "Prepared part geometry"
    );
    Ok((profile, faces))
}

pub struct DetailingRun<'h, H: Host> {
    host: &'h mut H,
    config: &'h DetailingConfig,
    layers: LayerAssignments,
}

impl<'h, H: Host> DetailingRun<'h, H> {
    pub fn new(host: &'h mut H, config: &'h DetailingConfig) -> Self {
        Self {
            host,
            config,
            layers: LayerAssignments::new(),
        }
    }

    /// Detail every pattern of the part's family
    pub fn detail_part(&mut self, part: PartId) -> Result<RunReport> {
        let info = self.host.part_info(part).map_err(Error::PartQuery)?;
        let (profile, faces) = prepare(&info)?;
        let mut report = RunReport::default();

        let mut outcome = Ok(());
        for &pattern in patterns_for(profile.family()) {
            if let Err(e) = self.run_pattern(part, pattern, &profile, &faces, &mut report) {
                outcome = Err(e);
                break;
            }
        }

        report.layer_updates = self.layers.finish(self.host);
        tracing::info!(
            created = report.created.len(),
            failed = report.failed.len(),
            faces_relayered = report.layer_updates.faces_updated,
            "Detailing run finished"
        );
        outcome.map(|()| report)
    }

    /// Recreate one pattern of a part, replacing its previous group
    pub fn detail_pattern(&mut self, part: PartId, pattern: PatternId) -> Result<RunReport> {
        let info = self.host.part_info(part).map_err(Error::PartQuery)?;
        let (profile, faces) = prepare(&info)?;
        if !pattern.applies_to(profile.family()) {
            return Err(Error::NotApplicable {
                pattern: pattern.to_string(),
                family: profile.family().to_string(),
            });
        }

        let mut report = RunReport::default();
        let outcome = self.run_pattern(part, pattern, &profile, &faces, &mut report);
        report.layer_updates = self.layers.finish(self.host);
        outcome.map(|()| report)
    }

    /// Ask the picker for a part and detail it
    pub fn detail_picked<P: PartPicker + ?Sized>(&mut self, picker: &mut P) -> Result<RunOutcome> {
        match picker.pick() {
            PickOutcome::Cancelled => {
                tracing::info!("Part selection cancelled");
                Ok(RunOutcome::Cancelled)
            }
            PickOutcome::Selected(part) => self.detail_part(part).map(RunOutcome::Completed),
        }
    }

    /// Create one group; only run-fatal errors are returned
    fn run_pattern(
        &mut self,
        part: PartId,
        pattern: PatternId,
        profile: &Profile,
        faces: &Faces,
        report: &mut RunReport,
    ) -> Result<()> {
        match self.create_group(part, pattern, profile, faces) {
            Ok(created) => {
                tracing::debug!(
                    pattern = %pattern,
                    bars = created.bars,
                    spliced = created.spliced,
                    "Created group"
                );
                report.created.push(created);
                Ok(())
            }
            Err(error) if error.is_run_fatal() => Err(error),
            Err(error) => {
                tracing::warn!(pattern = %pattern, error = %error, "Pattern failed");
                report.failed.push(FailedPattern { pattern, error });
                Ok(())
            }
        }
    }

    fn create_group(
        &mut self,
        part: PartId,
        pattern: PatternId,
        profile: &Profile,
        faces: &Faces,
    ) -> Result<CreatedGroup> {
        let group = pattern.build(profile, faces, self.config)?.build()?;

        let id = self.host.create_reinforcement_group(part, &group)?;
        for modifier in &group.definition.modifiers {
            self.host.attach_modifier(id, modifier)?;
        }
        self.host.commit()?;
        self.layers.record(id, group.definition.layers());

        Ok(CreatedGroup {
            group: id,
            pattern,
            size: group.definition.size,
            bars: group.bars.len(),
            spliced: group.spliced_bars(),
            total_length: group.total_length(),
        })
    }
}
