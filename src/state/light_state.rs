// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized light state tracking.

use crate::types::ColorMode;

use super::StateChange;

/// Last known state of a light, in normalized units.
///
/// Every field is `None` until the device reports it. Values are stored as
/// received; nothing is clamped.
///
/// # Examples
///
/// ```
/// use yeelight_lib::state::{LightState, StateChange};
///
/// let mut state = LightState::new();
/// assert!(state.apply(&StateChange::Power(true)));
/// assert_eq!(state.power(), Some(true));
///
/// // Same value again is not a change
/// assert!(!state.apply(&StateChange::Power(true)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightState {
    power: Option<bool>,
    brightness: Option<f64>,
    hue: Option<f64>,
    saturation: Option<f64>,
    color_temperature: Option<f64>,
    color_mode: Option<ColorMode>,
}

impl LightState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the light is on.
    #[must_use]
    pub fn power(&self) -> Option<bool> {
        self.power
    }

    /// Returns brightness in `[0, 1]`.
    #[must_use]
    pub fn brightness(&self) -> Option<f64> {
        self.brightness
    }

    /// Returns hue in `[0, 1]`.
    #[must_use]
    pub fn hue(&self) -> Option<f64> {
        self.hue
    }

    /// Returns saturation in `[0, 1]`.
    #[must_use]
    pub fn saturation(&self) -> Option<f64> {
        self.saturation
    }

    /// Returns color temperature in `[0, 1]`.
    #[must_use]
    pub fn color_temperature(&self) -> Option<f64> {
        self.color_temperature
    }

    /// Returns the active color mode.
    #[must_use]
    pub fn color_mode(&self) -> Option<ColorMode> {
        self.color_mode
    }

    /// Applies a change. Returns `true` if the stored value changed.
    #[allow(clippy::float_cmp)]
    pub fn apply(&mut self, change: &StateChange) -> bool {
        fn replace<T: PartialEq + Copy>(slot: &mut Option<T>, value: T) -> bool {
            let changed = *slot != Some(value);
            *slot = Some(value);
            changed
        }

        match *change {
            StateChange::Power(on) => replace(&mut self.power, on),
            StateChange::Brightness(v) => replace(&mut self.brightness, v),
            StateChange::Hue(v) => replace(&mut self.hue, v),
            StateChange::Saturation(v) => replace(&mut self.saturation, v),
            StateChange::ColorTemperature(v) => replace(&mut self.color_temperature, v),
            StateChange::ColorMode(mode) => replace(&mut self.color_mode, mode),
        }
    }
}
