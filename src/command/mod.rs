// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound command definitions.
//!
//! Each command is one JSON-RPC style frame:
//!
//! ```text
//! {"id":1,"method":"set_bright","params":[50,"smooth",500]}\r\n
//! ```
//!
//! The id is always `1`: replies are not correlated with requests, any
//! inbound traffic counts as the acknowledgment.
//!
//! # Available Commands
//!
//! | Command Type | Method | Params |
//! |-------------|--------|--------|
//! | [`PowerCommand`] | `set_power` | `["on"\|"off", "smooth", ms]` |
//! | [`BrightnessCommand`] | `set_bright` | `[1-100, "smooth", ms]` |
//! | [`HsvCommand`] | `set_hsv` / `bg_set_hsv` | `[0-359, 0-100, "smooth", 500]` |
//! | [`ColorTemperatureCommand`] | `set_ct_abx` | `[kelvin, "smooth", 500]` |
//! | [`PropertyQuery`] | `get_prop` | property names |
//!
//! # Examples
//!
//! ```
//! use yeelight_lib::command::{BrightnessCommand, Command};
//!
//! let cmd = BrightnessCommand::from_normalized(0.5, None);
//! assert_eq!(cmd.method(), "set_bright");
//! assert_eq!(
//!     cmd.to_frame(),
//!     r#"{"id":1,"method":"set_bright","params":[50,"smooth",500]}"#
//! );
//! ```

mod light;
mod query;

pub use light::{BrightnessCommand, ColorTemperatureCommand, HsvCommand, PowerCommand};
pub use query::PropertyQuery;

use serde::Serialize;
use serde_json::Value;

/// Line delimiter used in both directions.
pub const FRAME_DELIMITER: &str = "\r\n";

/// Request id carried by every outbound frame.
pub const REQUEST_ID: u32 = 1;

/// A command that can be sent to a device.
pub trait Command {
    /// Returns the JSON-RPC method name.
    fn method(&self) -> &'static str;

    /// Returns the positional parameters.
    fn params(&self) -> Vec<Value>;

    /// Serializes the command into a single-line frame, without delimiter.
    fn to_frame(&self) -> String {
        let frame = Frame {
            id: REQUEST_ID,
            method: self.method(),
            params: self.params(),
        };
        // Serializing plain strings and numbers cannot fail.
        serde_json::to_string(&frame).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
struct Frame {
    id: u32,
    method: &'static str,
    params: Vec<Value>,
}

/// Transition effect appended to every setter.
///
/// Only the `smooth` effect is used; the duration is in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    duration_ms: u32,
}

impl Transition {
    /// Effect name sent on the wire.
    pub const EFFECT: &'static str = "smooth";

    /// Duration used when the caller does not supply one.
    pub const DEFAULT_DURATION_MS: u32 = 500;

    /// Creates a smooth transition of the given duration.
    #[must_use]
    pub const fn smooth(duration_ms: u32) -> Self {
        Self { duration_ms }
    }

    /// Creates a transition from an optional duration, defaulting to 500 ms.
    #[must_use]
    pub fn from_duration(duration_ms: Option<u32>) -> Self {
        Self::smooth(duration_ms.unwrap_or(Self::DEFAULT_DURATION_MS))
    }

    /// Returns the duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    fn push_params(self, params: &mut Vec<Value>) {
        params.push(Value::from(Self::EFFECT));
        params.push(Value::from(self.duration_ms));
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::smooth(Self::DEFAULT_DURATION_MS)
    }
}
