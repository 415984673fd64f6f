// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] is one normalized property value reported by a device,
//! either from an unsolicited notification or from a full-state query
//! reply. Numeric values are on the unit interval.

use std::fmt;

use crate::types::ColorMode;

/// A single property update.
///
/// # Examples
///
/// ```
/// use yeelight_lib::state::StateChange;
///
/// let change = StateChange::Brightness(0.5);
/// assert_eq!(change.property(), "brightness");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Light switched on (`true`) or off.
    Power(bool),
    /// Brightness in `[0, 1]`.
    Brightness(f64),
    /// Hue in `[0, 1]`.
    Hue(f64),
    /// Saturation in `[0, 1]`.
    Saturation(f64),
    /// Color temperature in `[0, 1]` of the model's Kelvin range.
    ColorTemperature(f64),
    /// Active color mode.
    ColorMode(ColorMode),
}

impl StateChange {
    /// Returns the application-facing property name.
    #[must_use]
    pub fn property(&self) -> &'static str {
        match self {
            Self::Power(_) => "power",
            Self::Brightness(_) => "brightness",
            Self::Hue(_) => "hue",
            Self::Saturation(_) => "saturation",
            Self::ColorTemperature(_) => "color_temperature",
            Self::ColorMode(_) => "color_mode",
        }
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Power(on) => write!(f, "power={on}"),
            Self::Brightness(v)
            | Self::Hue(v)
            | Self::Saturation(v)
            | Self::ColorTemperature(v) => write!(f, "{}={v:.3}", self.property()),
            Self::ColorMode(mode) => write!(f, "color_mode={mode}"),
        }
    }
}
