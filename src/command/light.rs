// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light control commands.
//!
//! Constructors take normalized (unit-interval) values and convert them to
//! device units here, so callers never see Kelvin or 0-359 hue.

use serde_json::Value;

use crate::command::{Command, Transition};
use crate::types::{DeviceModel, HUE_MAX, KelvinRange, PERCENT_MAX, to_wire_int};

/// Command to switch the light on or off.
///
/// # Examples
///
/// ```
/// use yeelight_lib::command::{Command, PowerCommand};
///
/// let cmd = PowerCommand::new(false, Some(300));
/// assert_eq!(cmd.method(), "set_power");
/// assert_eq!(cmd.to_frame(), r#"{"id":1,"method":"set_power","params":["off","smooth",300]}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerCommand {
    on: bool,
    transition: Transition,
}

impl PowerCommand {
    /// Creates a power command; `duration_ms` defaults to 500.
    #[must_use]
    pub fn new(on: bool, duration_ms: Option<u32>) -> Self {
        Self {
            on,
            transition: Transition::from_duration(duration_ms),
        }
    }

    /// Returns the requested power state.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }
}

impl Command for PowerCommand {
    fn method(&self) -> &'static str {
        "set_power"
    }

    fn params(&self) -> Vec<Value> {
        let mut params = vec![Value::from(if self.on { "on" } else { "off" })];
        self.transition.push_params(&mut params);
        params
    }
}

/// Command to set brightness.
///
/// The device rejects a brightness of zero, so a request for 0 is sent as 1.
///
/// # Examples
///
/// ```
/// use yeelight_lib::command::{BrightnessCommand, Command};
///
/// assert_eq!(BrightnessCommand::from_normalized(0.75, None).level(), 75);
/// assert_eq!(BrightnessCommand::from_normalized(0.0, None).level(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessCommand {
    level: i64,
    transition: Transition,
}

impl BrightnessCommand {
    /// Creates a brightness command from a unit-interval value.
    #[must_use]
    pub fn from_normalized(brightness: f64, duration_ms: Option<u32>) -> Self {
        let level = match to_wire_int(brightness * PERCENT_MAX) {
            0 => 1,
            level => level,
        };
        Self {
            level,
            transition: Transition::from_duration(duration_ms),
        }
    }

    /// Returns the brightness percentage that will be sent.
    #[must_use]
    pub const fn level(&self) -> i64 {
        self.level
    }
}

impl Command for BrightnessCommand {
    fn method(&self) -> &'static str {
        "set_bright"
    }

    fn params(&self) -> Vec<Value> {
        let mut params = vec![Value::from(self.level)];
        self.transition.push_params(&mut params);
        params
    }
}

/// Command to set hue and saturation together.
///
/// The protocol has no hue-only or saturation-only setter, so both are
/// always sent. `ceiling4` lights take color on their background light.
///
/// # Examples
///
/// ```
/// use yeelight_lib::command::{Command, HsvCommand};
/// use yeelight_lib::types::DeviceModel;
///
/// let cmd = HsvCommand::from_normalized(0.5, 1.0, &DeviceModel::Ceiling4);
/// assert_eq!(cmd.method(), "bg_set_hsv");
/// assert_eq!(cmd.hue(), 180);
/// assert_eq!(cmd.saturation(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvCommand {
    hue: i64,
    saturation: i64,
    background: bool,
}

impl HsvCommand {
    /// Creates a command from unit-interval hue and saturation.
    #[must_use]
    pub fn from_normalized(hue: f64, saturation: f64, model: &DeviceModel) -> Self {
        Self {
            hue: to_wire_int(hue * HUE_MAX),
            saturation: to_wire_int(saturation * PERCENT_MAX),
            background: model.uses_background_light(),
        }
    }

    /// Returns the hue in degrees (0-359).
    #[must_use]
    pub const fn hue(&self) -> i64 {
        self.hue
    }

    /// Returns the saturation percentage (0-100).
    #[must_use]
    pub const fn saturation(&self) -> i64 {
        self.saturation
    }
}

impl Command for HsvCommand {
    fn method(&self) -> &'static str {
        if self.background {
            "bg_set_hsv"
        } else {
            "set_hsv"
        }
    }

    fn params(&self) -> Vec<Value> {
        let mut params = vec![Value::from(self.hue), Value::from(self.saturation)];
        Transition::default().push_params(&mut params);
        params
    }
}

/// Command to set white color temperature.
///
/// # Examples
///
/// ```
/// use yeelight_lib::command::{ColorTemperatureCommand, Command};
/// use yeelight_lib::types::DeviceModel;
///
/// let cmd = ColorTemperatureCommand::from_normalized(1.0, &DeviceModel::Ceiling4);
/// assert_eq!(cmd.kelvin(), 6000);
/// assert_eq!(cmd.to_frame(), r#"{"id":1,"method":"set_ct_abx","params":[6000,"smooth",500]}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTemperatureCommand {
    kelvin: i64,
}

impl ColorTemperatureCommand {
    /// Creates a command from a unit-interval value, using the model's range.
    #[must_use]
    pub fn from_normalized(temperature: f64, model: &DeviceModel) -> Self {
        let range = KelvinRange::for_model(model);
        Self {
            kelvin: to_wire_int(range.denormalize(temperature)),
        }
    }

    /// Returns the color temperature in Kelvin.
    #[must_use]
    pub const fn kelvin(&self) -> i64 {
        self.kelvin
    }
}

impl Command for ColorTemperatureCommand {
    fn method(&self) -> &'static str {
        "set_ct_abx"
    }

    fn params(&self) -> Vec<Value> {
        let mut params = vec![Value::from(self.kelvin)];
        Transition::default().push_params(&mut params);
        params
    }
}
