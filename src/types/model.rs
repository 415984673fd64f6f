// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device model variants.

use std::fmt;

/// Product line of a device, as reported by the device itself.
///
/// The model changes two things on the wire: the color temperature range
/// (see [`KelvinRange`](super::KelvinRange)) and whether color is set
/// through the background light (`bg_set_hsv`) or the main light
/// (`set_hsv`).
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::DeviceModel;
///
/// let model = DeviceModel::from("ceiling4");
/// assert_eq!(model, DeviceModel::Ceiling4);
/// assert!(model.uses_background_light());
///
/// let bulb = DeviceModel::from("color");
/// assert_eq!(bulb.as_str(), "color");
/// assert!(!bulb.uses_background_light());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceModel {
    /// The `ceiling4` ceiling light with an RGB background ring.
    Ceiling4,
    /// Any other model, kept verbatim.
    Other(String),
}

impl DeviceModel {
    /// Returns the model name as the device reports it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ceiling4 => "ceiling4",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` if color commands target the background light.
    #[must_use]
    pub fn uses_background_light(&self) -> bool {
        matches!(self, Self::Ceiling4)
    }
}

impl Default for DeviceModel {
    fn default() -> Self {
        Self::Other("color".to_string())
    }
}

impl From<&str> for DeviceModel {
    fn from(value: &str) -> Self {
        match value {
            "ceiling4" => Self::Ceiling4,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for DeviceModel {
    fn from(value: String) -> Self {
        if value == "ceiling4" {
            Self::Ceiling4
        } else {
            Self::Other(value)
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
