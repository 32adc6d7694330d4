// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rebuilding element geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Descriptor could not be turned into a dimension list for its family.
    #[error("Malformed profile '{descriptor}': {reason}")]
    MalformedProfile { descriptor: String, reason: String },

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Zero-length or parallel input to a vector or intersection computation.
    #[error("Degenerate geometry: {0}")]
    GeometryDegenerate(String),
}

impl Error {
    pub(crate) fn malformed(descriptor: &str, reason: impl Into<String>) -> Self {
        Error::MalformedProfile {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Error::GeometryDegenerate(reason.into())
    }
}
