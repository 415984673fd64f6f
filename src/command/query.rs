// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property query command.

use serde_json::Value;

use crate::command::Command;

/// Properties requested by the full-state query, in reply order.
///
/// The device answers with a positional array in this same order; the
/// parser relies on it (see `protocol::SNAPSHOT_LAYOUT`).
pub const FULL_STATE_PROPERTIES: [&str; 7] =
    ["power", "bright", "color_mode", "ct", "rgb", "hue", "sat"];

/// Command to read the current state of the light.
///
/// # Examples
///
/// ```
/// use yeelight_lib::command::{Command, PropertyQuery};
///
/// let query = PropertyQuery::full_state();
/// assert_eq!(query.method(), "get_prop");
/// assert_eq!(query.params().len(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyQuery {
    properties: &'static [&'static str],
}

impl PropertyQuery {
    /// Queries every property the state mapping understands.
    #[must_use]
    pub const fn full_state() -> Self {
        Self {
            properties: &FULL_STATE_PROPERTIES,
        }
    }

    /// Returns the requested property names.
    #[must_use]
    pub const fn properties(&self) -> &'static [&'static str] {
        self.properties
    }
}

impl Command for PropertyQuery {
    fn method(&self) -> &'static str {
        "get_prop"
    }

    fn params(&self) -> Vec<Value> {
        self.properties.iter().map(|p| Value::from(*p)).collect()
    }
}
