// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Application requests to change a light.

/// A capability change requested by the application.
///
/// Values are normalized to `[0, 1]`; the connection converts them for the
/// device model. Durations are in milliseconds and default to 500.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightRequest {
    /// Switch on or off.
    Power {
        /// Target power state.
        on: bool,
        /// Transition duration.
        duration_ms: Option<u32>,
    },
    /// Set brightness.
    Brightness {
        /// Target brightness.
        value: f64,
        /// Transition duration.
        duration_ms: Option<u32>,
    },
    /// Set hue; merged with a nearby saturation change.
    Hue(f64),
    /// Set saturation; merged with a nearby hue change.
    Saturation(f64),
    /// Set hue and saturation together.
    HueSaturation {
        /// Target hue.
        hue: f64,
        /// Target saturation.
        saturation: f64,
    },
    /// Set color temperature.
    ColorTemperature(f64),
    /// Query the full state again.
    Refresh,
}
