// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-side identity keys.
//!
//! Keys are created by `slotmap::SlotMap` in the host and stay valid after
//! other entries are removed, so a group recorded early in a run can still
//! be looked up during layer reconciliation.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a reinforcement group created in the host model.
    pub struct GroupId;

    /// Key for a concrete part the host knows about.
    pub struct PartId;
}
