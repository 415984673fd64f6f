// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound message types and their mapping to state changes.
//!
//! Two message shapes carry state:
//!
//! ```text
//! {"method":"props","params":{"bright":"50"}}
//! {"id":1,"result":["on","100","2","4000","16711680","120","80"]}
//! ```
//!
//! Devices send numbers both as JSON numbers and as numeric strings, so all
//! numeric reads accept either.

use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::state::StateChange;
use crate::types::{ColorMode, DeviceModel, HUE_MAX, KelvinRange, PERCENT_MAX, PackedRgb};

/// Positions of each property in a full-state query reply.
///
/// This mirrors the order of `command::FULL_STATE_PROPERTIES` and the
/// firmware's reply ordering. The `rgb` slot is present but not mapped;
/// hue and saturation are read from their own slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotLayout {
    /// `"on"` or `"off"`.
    pub power: usize,
    /// Brightness 0-100.
    pub brightness: usize,
    /// Color mode code, `2` is temperature.
    pub color_mode: usize,
    /// Color temperature in Kelvin.
    pub color_temperature: usize,
    /// Packed RGB, unused.
    pub rgb: usize,
    /// Hue 0-359.
    pub hue: usize,
    /// Saturation 0-100.
    pub saturation: usize,
}

impl SnapshotLayout {
    /// Minimum number of elements a reply must have.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.saturation + 1
    }
}

/// Version 1 of the reply layout.
pub const SNAPSHOT_LAYOUT: SnapshotLayout = SnapshotLayout {
    power: 0,
    brightness: 1,
    color_mode: 2,
    color_temperature: 3,
    rgb: 4,
    hue: 5,
    saturation: 6,
};

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Unsolicited `props` notification; holds its `params` object.
    Notification(Map<String, Value>),
    /// Reply to a command; holds its `result` array.
    CommandResult(Vec<Value>),
}

impl InboundMessage {
    /// Builds a notification from a parsed `props` frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` is missing or not an object.
    pub fn notification(frame: Value) -> Result<Self, ParseError> {
        match take_field(frame, "params")? {
            Value::Object(params) => Ok(Self::Notification(params)),
            other => Err(ParseError::UnexpectedFormat(format!(
                "props params is not an object: {other}"
            ))),
        }
    }

    /// Builds a command result from a parsed reply frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `result` is missing or not an array.
    pub fn command_result(frame: Value) -> Result<Self, ParseError> {
        match take_field(frame, "result")? {
            Value::Array(values) => Ok(Self::CommandResult(values)),
            other => Err(ParseError::UnexpectedFormat(format!(
                "result is not an array: {other}"
            ))),
        }
    }

    /// Converts the message into normalized state changes for `model`.
    ///
    /// A plain `["ok"]` acknowledgment yields no changes.
    ///
    /// # Errors
    ///
    /// Returns an error if a known property has an unreadable value or a
    /// state reply is shorter than [`SNAPSHOT_LAYOUT`].
    pub fn to_state_changes(&self, model: &DeviceModel) -> Result<Vec<StateChange>, ParseError> {
        match self {
            Self::Notification(params) => notification_changes(params, model),
            Self::CommandResult(values) => snapshot_changes(values, model),
        }
    }
}

fn take_field(frame: Value, field: &str) -> Result<Value, ParseError> {
    match frame {
        Value::Object(mut object) => object
            .remove(field)
            .ok_or_else(|| ParseError::MissingField(field.to_string())),
        other => Err(ParseError::UnexpectedFormat(format!(
            "frame is not an object: {other}"
        ))),
    }
}

fn notification_changes(
    params: &Map<String, Value>,
    model: &DeviceModel,
) -> Result<Vec<StateChange>, ParseError> {
    let mut changes = Vec::with_capacity(params.len());

    for (key, value) in params {
        match key.as_str() {
            "power" => changes.push(StateChange::Power(is_on(value))),
            "bright" => changes.push(StateChange::Brightness(
                number(value, key)? / PERCENT_MAX,
            )),
            "ct" => changes.push(StateChange::ColorTemperature(
                KelvinRange::for_model(model).normalize(number(value, key)?),
            )),
            "rgb" => {
                let hsv = packed_rgb(value)?.to_hsv();
                changes.push(StateChange::Hue(hsv.hue().round() / HUE_MAX));
                changes.push(StateChange::Saturation(hsv.saturation()));
            }
            "hue" => changes.push(StateChange::Hue(number(value, key)? / HUE_MAX)),
            "sat" => changes.push(StateChange::Saturation(
                number(value, key)? / PERCENT_MAX,
            )),
            "color_mode" => changes.push(StateChange::ColorMode(color_mode(value))),
            other => tracing::trace!(property = %other, "Ignoring unmapped property"),
        }
    }

    Ok(changes)
}

fn snapshot_changes(values: &[Value], model: &DeviceModel) -> Result<Vec<StateChange>, ParseError> {
    if values.first().and_then(Value::as_str) == Some("ok") {
        return Ok(Vec::new());
    }

    let layout = SNAPSHOT_LAYOUT;
    if values.len() < layout.len() {
        return Err(ParseError::MissingField(format!(
            "state reply has {} values, expected {}",
            values.len(),
            layout.len()
        )));
    }

    let range = KelvinRange::for_model(model);
    Ok(vec![
        StateChange::Power(is_on(&values[layout.power])),
        StateChange::Brightness(number(&values[layout.brightness], "bright")? / PERCENT_MAX),
        StateChange::ColorMode(color_mode(&values[layout.color_mode])),
        StateChange::ColorTemperature(
            range.normalize(number(&values[layout.color_temperature], "ct")?),
        ),
        StateChange::Hue(number(&values[layout.hue], "hue")? / HUE_MAX),
        StateChange::Saturation(number(&values[layout.saturation], "sat")? / PERCENT_MAX),
    ])
}

fn is_on(value: &Value) -> bool {
    value.as_str() == Some("on")
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn color_mode(value: &Value) -> ColorMode {
    match number(value, "color_mode") {
        Ok(code) if code.fract() == 0.0 => ColorMode::from_wire(code as i64),
        _ => ColorMode::Color,
    }
}

#[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn packed_rgb(value: &Value) -> Result<PackedRgb, ParseError> {
    let raw = number(value, "rgb")?;
    if raw.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&raw) {
        return Err(ParseError::invalid_value("rgb", format!("{raw} is not a packed color")));
    }
    Ok(PackedRgb::new(raw as u32))
}

/// Reads a number sent either as a JSON number or as a numeric string.
fn number(value: &Value, field: &str) -> Result<f64, ParseError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ParseError::invalid_value(field, format!("{n} is not finite"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| ParseError::invalid_value(field, format!("{s:?}: {e}"))),
        other => Err(ParseError::invalid_value(
            field,
            format!("expected a number, got {other}"),
        )),
    }
}
