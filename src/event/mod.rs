// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events reported to the application.
//!
//! Each device connection publishes availability and property updates on a
//! shared [`EventBus`]. The bus is a tokio broadcast channel, so any number
//! of subscribers can follow every device.
//!
//! # Examples
//!
//! ```
//! use yeelight_lib::event::{DeviceEvent, DeviceId, EventBus};
//!
//! let bus = EventBus::new();
//! let _rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::available(DeviceId::new("bulb-1")));
//! ```

mod device_event;
mod device_id;
mod event_bus;

pub use device_event::{DeviceEvent, UNREACHABLE};
pub use device_id::DeviceId;
pub use event_bus::EventBus;
