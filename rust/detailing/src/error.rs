// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for detailing runs.

use crate::host::HostError;

/// Result type alias for detailing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while detailing an element.
///
/// Failures are scoped to the smallest unit that can fail: most variants
/// only abort the reinforcement pattern being built. [`Error::is_run_fatal`]
/// tells which ones stop the whole run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Profile, face or vector computation failed.
    #[error(transparent)]
    Geometry(#[from] rebar_lite_geometry::Error),

    /// Guideline path, zones or inheritance are unusable.
    #[error("invalid guideline: {0}")]
    InvalidGuideline(String),

    /// Diameter outside the standard bar series.
    #[error("invalid bar size: {0}")]
    InvalidBarSize(String),

    /// Two splitters are closer than the lap-derived minimum.
    #[error("splice stagger {actual:.1} is below the required {required:.1}")]
    SpliceStagger { actual: f64, required: f64 },

    #[error("missing configuration value '{0}'")]
    ConfigMissing(String),

    #[error("invalid configuration value '{key}' = '{value}'")]
    ConfigInvalid { key: String, value: String },

    /// Configuration document could not be read.
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Pattern belongs to another element family.
    #[error("pattern {pattern} does not apply to {family}")]
    NotApplicable { pattern: String, family: String },

    /// Unknown pattern identifier.
    #[error("unknown reinforcement pattern '{0}'")]
    UnknownPattern(String),

    /// Host could not describe the part being detailed.
    #[error("part query failed: {0}")]
    PartQuery(HostError),

    /// Host rejected a group, modifier or commit.
    #[error("host creation failed: {0}")]
    HostCreation(#[from] HostError),

    /// Interactive pick was aborted.
    #[error("cancelled by user")]
    UserCancelled,
}

impl Error {
    /// Whether the error stops every remaining pattern of the run.
    pub fn is_run_fatal(&self) -> bool {
        match self {
            Error::Geometry(rebar_lite_geometry::Error::MalformedProfile { .. })
            | Error::Geometry(rebar_lite_geometry::Error::InvalidProfile(_))
            | Error::PartQuery(_)
            | Error::UserCancelled => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_profile_and_cancel_errors_are_fatal() {
        let malformed = Error::from(rebar_lite_geometry::Error::MalformedProfile {
            descriptor: "X".into(),
            reason: "bad".into(),
        });
        assert!(malformed.is_run_fatal());
        assert!(Error::UserCancelled.is_run_fatal());

        let degenerate = Error::from(rebar_lite_geometry::Error::GeometryDegenerate("zero".into()));
        assert!(!degenerate.is_run_fatal());
        assert!(!Error::HostCreation(HostError::Rejected("self-intersecting".into())).is_run_fatal());
        assert!(!Error::InvalidGuideline("no zones".into()).is_run_fatal());
    }
}
