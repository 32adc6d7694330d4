// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host model seam
//!
//! The detailing engine never owns the model it writes into. A [`Host`]
//! describes parts and accepts finished groups; [`RecordingHost`] is an
//! in-memory implementation for tests and the command-line tool.

use rebar_lite_geometry::Plane;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::group::RebarGroup;
use crate::keys::{GroupId, PartId};
use crate::modifiers::Modifier;
use crate::patterns::PatternId;

/// Failures reported by the host model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("rejected: {0}")]
    Rejected(String),

    #[error("unknown part {0:?}")]
    UnknownPart(PartId),

    #[error("unknown group {0:?}")]
    UnknownGroup(GroupId),
}

/// What the host knows about a concrete part
#[derive(Debug, Clone, PartialEq)]
pub struct PartInfo {
    /// Profile descriptor, e.g. `LDG400*300*200`
    pub descriptor: String,
    pub length: f64,
    /// Coordinate frame: origin at the element start, X along the element
    pub frame: Plane,
    /// Station count when the part requests one; the family default otherwise
    pub stations: Option<usize>,
}

impl PartInfo {
    pub fn new(descriptor: impl Into<String>, length: f64, frame: Plane) -> Self {
        Self {
            descriptor: descriptor.into(),
            length,
            frame,
            stations: None,
        }
    }

    pub fn with_stations(mut self, stations: usize) -> Self {
        self.stations = Some(stations);
        self
    }
}

/// Narrow creation interface into the host model.
///
/// Creating a group for a part and pattern that already has one replaces it.
/// Layers are addressed by face index; the host is free to overwrite them
/// with its own defaults after creation, which is why they are reconciled
/// after the run.
pub trait Host {
    fn part_info(&self, part: PartId) -> Result<PartInfo, HostError>;

    fn create_reinforcement_group(
        &mut self,
        part: PartId,
        group: &RebarGroup,
    ) -> Result<GroupId, HostError>;

    fn attach_modifier(&mut self, group: GroupId, modifier: &Modifier) -> Result<(), HostError>;

    /// Current `(face index, layer)` pairs, or `None` for an unknown group
    fn face_layers(&self, group: GroupId) -> Option<Vec<(usize, i32)>>;

    /// Write several face layers in one call
    fn set_layers(&mut self, group: GroupId, layers: &[(usize, i32)]) -> Result<(), HostError>;

    fn commit(&mut self) -> Result<(), HostError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Selected(PartId),
    Cancelled,
}

/// Blocking interactive part selection
pub trait PartPicker {
    fn pick(&mut self) -> PickOutcome;
}

/// Group as stored by [`RecordingHost`]
#[derive(Debug, Clone)]
pub struct GroupRecord {
    pub part: PartId,
    pub pattern: PatternId,
    pub bar_count: usize,
    pub total_length: f64,
    pub modifiers: Vec<Modifier>,
    pub layers: Vec<(usize, i32)>,
    defaults_pending: bool,
}

/// In-memory host
#[derive(Debug, Default)]
pub struct RecordingHost {
    parts: SlotMap<PartId, PartInfo>,
    groups: SlotMap<GroupId, GroupRecord>,
    default_layer: i32,
    rejected: FxHashSet<PatternId>,
    rejects_layers: bool,
    late_defaults: bool,
    commits: usize,
    layer_writes: usize,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer every leg face receives on creation
    pub fn with_default_layer(mut self, layer: i32) -> Self {
        self.default_layer = layer;
        self
    }

    /// Reject every group of `pattern`
    pub fn rejecting(mut self, pattern: PatternId) -> Self {
        self.rejected.insert(pattern);
        self
    }

    /// Refuse every layer write
    pub fn rejecting_layers(mut self) -> Self {
        self.rejects_layers = true;
        self
    }

    /// Re-apply default layers once over the first layer write of each group,
    /// the way hosts that finalize groups lazily behave
    pub fn with_late_defaults(mut self) -> Self {
        self.late_defaults = true;
        self
    }

    pub fn add_part(&mut self, info: PartInfo) -> PartId {
        self.parts.insert(info)
    }

    pub fn group(&self, id: GroupId) -> Option<&GroupRecord> {
        self.groups.get(id)
    }

    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &GroupRecord)> {
        self.groups.iter()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn remove_group(&mut self, id: GroupId) -> Option<GroupRecord> {
        self.groups.remove(id)
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Number of `set_layers` calls received
    pub fn layer_writes(&self) -> usize {
        self.layer_writes
    }
}

impl Host for RecordingHost {
    fn part_info(&self, part: PartId) -> Result<PartInfo, HostError> {
        self.parts.get(part).cloned().ok_or(HostError::UnknownPart(part))
    }

    fn create_reinforcement_group(
        &mut self,
        part: PartId,
        group: &RebarGroup,
    ) -> Result<GroupId, HostError> {
        if !self.parts.contains_key(part) {
            return Err(HostError::UnknownPart(part));
        }
        let pattern = group.definition.pattern;
        if self.rejected.contains(&pattern) {
            return Err(HostError::Rejected(format!("{} is not accepted", pattern)));
        }

        let replaced: Vec<GroupId> = self
            .groups
            .iter()
            .filter(|(_, g)| g.part == part && g.pattern == pattern)
            .map(|(id, _)| id)
            .collect();
        for id in replaced {
            self.groups.remove(id);
        }

        let default_layer = self.default_layer;
        let layers = group
            .definition
            .layers()
            .into_iter()
            .map(|(face, _)| (face, default_layer))
            .collect();

        Ok(self.groups.insert(GroupRecord {
            part,
            pattern,
            bar_count: group.bars.len(),
            total_length: group.total_length(),
            modifiers: Vec::new(),
            layers,
            defaults_pending: self.late_defaults,
        }))
    }

    fn attach_modifier(&mut self, group: GroupId, modifier: &Modifier) -> Result<(), HostError> {
        let record = self
            .groups
            .get_mut(group)
            .ok_or(HostError::UnknownGroup(group))?;
        record.modifiers.push(modifier.clone());
        Ok(())
    }

    fn face_layers(&self, group: GroupId) -> Option<Vec<(usize, i32)>> {
        self.groups.get(group).map(|g| g.layers.clone())
    }

    fn set_layers(&mut self, group: GroupId, layers: &[(usize, i32)]) -> Result<(), HostError> {
        self.layer_writes += 1;
        let record = self
            .groups
            .get_mut(group)
            .ok_or(HostError::UnknownGroup(group))?;
        if self.rejects_layers {
            return Err(HostError::Rejected("face layers are locked".to_string()));
        }
        if record.defaults_pending {
            record.defaults_pending = false;
            return Ok(());
        }
        for &(face, layer) in layers {
            match record.layers.iter_mut().find(|(f, _)| *f == face) {
                Some(entry) => entry.1 = layer,
                None => record.layers.push((face, layer)),
            }
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), HostError> {
        self.commits += 1;
        Ok(())
    }
}
