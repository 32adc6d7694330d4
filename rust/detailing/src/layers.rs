// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deferred layer reconciliation
//!
//! Hosts may re-apply default layers to a group after it was created, so
//! the layers each leg face should carry are kept per run and written back
//! at the end. A single pass can be undone by the host finalizing the group;
//! [`LayerAssignments::finish`] therefore runs two.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::host::{Host, HostError};
use crate::keys::GroupId;

/// Outcome of one or more reconcile passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub groups_updated: usize,
    pub faces_updated: usize,
    /// Groups the host no longer knows
    pub missing: usize,
    /// Groups whose layer write the host refused
    pub rejected: usize,
}

impl std::ops::AddAssign for ReconcileReport {
    fn add_assign(&mut self, other: Self) {
        self.groups_updated += other.groups_updated;
        self.faces_updated += other.faces_updated;
        self.missing += other.missing;
        self.rejected += other.rejected;
    }
}

/// Target `(face index, layer)` pairs per created group, owned by one run
#[derive(Debug, Clone, Default)]
pub struct LayerAssignments {
    entries: FxHashMap<GroupId, Vec<(usize, i32)>>,
}

impl LayerAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the target layers of a group
    pub fn record(&mut self, group: GroupId, layers: Vec<(usize, i32)>) {
        self.entries.insert(group, layers);
    }

    pub fn get(&self, group: GroupId) -> Option<&[(usize, i32)]> {
        self.entries.get(&group).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One pass: write the faces whose current layer differs from the target,
    /// one batched call per group.
    pub fn reconcile<H: Host + ?Sized>(&self, host: &mut H) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        for (&group, target) in &self.entries {
            let Some(current) = host.face_layers(group) else {
                tracing::warn!(group = ?group, "Group no longer exists, skipping layers");
                report.missing += 1;
                continue;
            };

            let changes: Vec<(usize, i32)> = target
                .iter()
                .filter(|(face, layer)| {
                    current
                        .iter()
                        .find(|(f, _)| f == face)
                        .map_or(true, |(_, l)| l != layer)
                })
                .copied()
                .collect();
            if changes.is_empty() {
                continue;
            }

            match host.set_layers(group, &changes) {
                Ok(()) => {}
                Err(HostError::UnknownGroup(_)) => {
                    tracing::warn!(group = ?group, "Group vanished before its layers were written");
                    report.missing += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!(group = ?group, error = %e, "Layer update rejected");
                    report.rejected += 1;
                    continue;
                }
            }
            report.groups_updated += 1;
            report.faces_updated += changes.len();
        }
        tracing::debug!(
            groups = report.groups_updated,
            faces = report.faces_updated,
            missing = report.missing,
            rejected = report.rejected,
            "Reconciled layers"
        );
        report
    }

    /// Run exactly two passes and clear the table
    pub fn finish<H: Host + ?Sized>(&mut self, host: &mut H) -> ReconcileReport {
        let mut report = self.reconcile(host);
        report += self.reconcile(host);
        self.entries.clear();
        report
    }
}
