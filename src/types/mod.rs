// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types and color conversion.
//!
//! # Types
//!
//! - [`DeviceModel`] - Product line, selects Kelvin range and HSV method
//! - [`KelvinRange`] - Color temperature bounds of a model
//! - [`ColorMode`] - Color vs. white temperature output
//! - [`PackedRgb`] / [`Hsv`] - The device's `0xRRGGBB` color and its HSV form
//!
//! The free functions [`normalize`] and [`denormalize`] convert between
//! unit-interval values and device-native ranges.

mod codec;
mod color_mode;
mod hsv;
mod model;

pub use codec::{HUE_MAX, KelvinRange, PERCENT_MAX, denormalize, normalize};
pub(crate) use codec::to_wire_int;
pub use color_mode::ColorMode;
pub use hsv::{Hsv, PackedRgb};
pub use model::DeviceModel;
