// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat detailing configuration.
//!
//! Every tunable (bar diameters, spacings, offsets, splice rules) is a string
//! entry keyed by parameter name, e.g. `"Wall_FrontVertical_Diameter"`. Values are
//! read at call time and never cached, so the same map can drive many runs.

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::{Error, Result};

/// Distance from the start of a guideline path to the first bar.
pub const START_OFFSET: &str = "StartOffset";
/// Distance kept free at the end of a guideline path.
pub const END_OFFSET: &str = "EndOffset";
/// Minimum buildable bar length as a multiple of the diameter.
pub const MIN_LENGTH_FACTOR: &str = "MinLengthFactor";
/// Lap length as a multiple of the diameter.
pub const LAP_FACTOR: &str = "LapFactor";
/// Longest bar the supplier delivers; longer runs get staggered splices.
pub const MAX_BAR_LENGTH: &str = "MaxBarLength";
/// Rotation of 90° hooks around the bar axis, in degrees.
pub const HOOK_ROTATION: &str = "HookRotation";

/// Key-value configuration map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailingConfig {
    values: FxHashMap<String, String>,
}

impl DetailingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a flat JSON object; string, number and boolean values are accepted.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: FxHashMap<String, Value> = serde_json::from_str(json)?;
        let mut config = Self::new();
        for (key, value) in document {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(Error::ConfigInvalid {
                        key,
                        value: other.to_string(),
                    })
                }
            };
            config.values.insert(key, text);
        }
        Ok(config)
    }

    /// Insert or replace an entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Entry that must be present.
    pub fn text(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::ConfigMissing(key.to_string()))
    }

    /// Numeric entry that must be present.
    pub fn number(&self, key: &str) -> Result<f64> {
        let raw = self.text(key)?;
        parse_number(key, raw)
    }

    /// Numeric entry with a fallback; a present but unparsable value is an error.
    pub fn number_or(&self, key: &str, default: f64) -> Result<f64> {
        match self.get(key) {
            Some(raw) => parse_number(key, raw),
            None => Ok(default),
        }
    }

    /// Integer entry with a fallback.
    pub fn integer_or(&self, key: &str, default: i32) -> Result<i32> {
        match self.get(key) {
            Some(raw) => raw.trim().parse().map_err(|_| Error::ConfigInvalid {
                key: key.to_string(),
                value: raw.to_string(),
            }),
            None => Ok(default),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DetailingConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (key, value) in iter {
            config.set(key, value);
        }
        config
    }
}

fn parse_number(key: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::ConfigInvalid {
            key: key.to_string(),
            value: raw.to_string(),
        })
}
