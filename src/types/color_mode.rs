// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Active color mode of a light.

use std::fmt;

/// Which channel currently drives the light output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// RGB or hue/saturation output.
    Color,
    /// White output at a color temperature.
    Temperature,
}

impl ColorMode {
    /// Wire code the device uses for color temperature mode.
    pub const TEMPERATURE_CODE: i64 = 2;

    /// Maps the device's numeric mode to a [`ColorMode`].
    ///
    /// Only code `2` is temperature mode; RGB (1), HSV (3) and anything
    /// unexpected are reported as color.
    #[must_use]
    pub fn from_wire(code: i64) -> Self {
        if code == Self::TEMPERATURE_CODE {
            Self::Temperature
        } else {
            Self::Color
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color => f.write_str("color"),
            Self::Temperature => f.write_str("temperature"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_code_two_is_temperature() {
        assert_eq!(ColorMode::from_wire(2), ColorMode::Temperature);
        assert_eq!(ColorMode::from_wire(1), ColorMode::Color);
        assert_eq!(ColorMode::from_wire(3), ColorMode::Color);
        assert_eq!(ColorMode::from_wire(0), ColorMode::Color);
    }

    #[test]
    fn display() {
        assert_eq!(ColorMode::Color.to_string(), "color");
        assert_eq!(ColorMode::Temperature.to_string(), "temperature");
    }
}
