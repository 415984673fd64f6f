// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between normalized values and device-native ranges.
//!
//! The application side works with values on the unit interval; the device
//! speaks Kelvin, 0-359 hue and 0-100 percentages. None of these helpers
//! clamp: a value outside its range maps to a value outside the other range.

use std::fmt;

use super::DeviceModel;

/// Device-native upper bound for hue.
pub const HUE_MAX: f64 = 359.0;

/// Device-native upper bound for saturation and brightness.
pub const PERCENT_MAX: f64 = 100.0;

/// Maps `value` from `[min, max]` onto the unit interval.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::normalize;
///
/// assert_eq!(normalize(4100.0, 1700.0, 6500.0), 0.5);
/// ```
#[must_use]
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    (value - min) / (max - min)
}

/// Maps a unit-interval `value` back onto `[min, max]`.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::denormalize;
///
/// assert_eq!(denormalize(0.0, 2700.0, 6000.0), 2700.0);
/// assert_eq!(denormalize(1.0, 2700.0, 6000.0), 6000.0);
/// ```
#[must_use]
pub fn denormalize(value: f64, min: f64, max: f64) -> f64 {
    min + value * (max - min)
}

/// Color temperature bounds of a device, in Kelvin.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::{DeviceModel, KelvinRange};
///
/// let range = KelvinRange::for_model(&DeviceModel::Ceiling4);
/// assert_eq!(range, KelvinRange::CEILING4);
/// assert_eq!(range.denormalize(0.0), 2700.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KelvinRange {
    min: u16,
    max: u16,
}

impl KelvinRange {
    /// Range used by the `ceiling4` ceiling light.
    pub const CEILING4: Self = Self {
        min: 2700,
        max: 6000,
    };

    /// Range used by every other model.
    pub const STANDARD: Self = Self {
        min: 1700,
        max: 6500,
    };

    /// Returns the range for a device model.
    ///
    /// This is the only place the model decides the Kelvin bounds, so the
    /// outbound and inbound paths always agree.
    #[must_use]
    pub fn for_model(model: &DeviceModel) -> Self {
        match model {
            DeviceModel::Ceiling4 => Self::CEILING4,
            DeviceModel::Other(_) => Self::STANDARD,
        }
    }

    /// Returns the lower bound in Kelvin.
    #[must_use]
    pub const fn min(&self) -> u16 {
        self.min
    }

    /// Returns the upper bound in Kelvin.
    #[must_use]
    pub const fn max(&self) -> u16 {
        self.max
    }

    /// Converts Kelvin to a unit-interval value.
    #[must_use]
    pub fn normalize(&self, kelvin: f64) -> f64 {
        normalize(kelvin, f64::from(self.min), f64::from(self.max))
    }

    /// Converts a unit-interval value to Kelvin.
    #[must_use]
    pub fn denormalize(&self, value: f64) -> f64 {
        denormalize(value, f64::from(self.min), f64::from(self.max))
    }
}

impl fmt::Display for KelvinRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K-{}K", self.min, self.max)
    }
}

/// Rounds a device-native value to the integer the wire expects.
///
/// Saturates at the `i64` limits only; ordinary out-of-range values are kept.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn to_wire_int(value: f64) -> i64 {
    value.round() as i64
}
