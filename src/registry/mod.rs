// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of device connections.
//!
//! The [`DeviceRegistry`] is the application's entry point: it starts a
//! connection per registered device, forwards capability requests and
//! publishes every device's events on one bus.

mod device_registry;

pub use device_registry::DeviceRegistry;
