// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Yeelight Lib - live LAN control connections to Yeelight lights.
//!
//! The library keeps one TCP connection per device, speaks the device's
//! line-delimited JSON protocol, and translates between device-native units
//! and normalized values in `[0, 1]`.
//!
//! # Supported Features
//!
//! - **Connection lifecycle**: connect, TCP keep-alive, acknowledgment
//!   timeout, fixed-delay reconnect after timeouts and resets
//! - **Light control**: power, brightness, hue/saturation (debounced),
//!   color temperature
//! - **State tracking**: property notifications and full-state query replies
//!   become [`StateChange`] events and a watchable [`LightState`]
//! - **Model handling**: the `ceiling4` Kelvin range and background-light
//!   color commands
//!
//! # Quick Start
//!
//! ```no_run
//! use yeelight_lib::{DeviceEvent, DeviceIdentity, DeviceRegistry};
//!
//! #[tokio::main]
//! async fn main() -> yeelight_lib::Result<()> {
//!     let registry = DeviceRegistry::new();
//!     let mut events = registry.subscribe();
//!
//!     let id = registry.register(DeviceIdentity::new("living-room", "192.168.1.40"))?;
//!
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             DeviceEvent::Available { .. } => {
//!                 registry.set_hue_saturation(&id, 0.33, 1.0).await?;
//!             }
//!             DeviceEvent::StateChanged { change, .. } => println!("{change}"),
//!             DeviceEvent::Unavailable { reason, .. } => println!("offline: {reason}"),
//!             _ => {}
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod connection;
pub mod error;
pub mod event;
pub mod protocol;
pub mod registry;
pub mod state;
pub mod types;

pub use command::{
    BrightnessCommand, ColorTemperatureCommand, Command, HsvCommand, PowerCommand, PropertyQuery,
};
pub use connection::{
    ConnectionManager, ConnectionSnapshot, ConnectionState, ConnectionTimings, DeviceIdentity,
    LightRequest,
};
pub use error::{ConnectionError, Error, ParseError, Result};
pub use event::{DeviceEvent, DeviceId, EventBus};
pub use registry::DeviceRegistry;
pub use state::{LightState, StateChange};
pub use types::{ColorMode, DeviceModel, KelvinRange};
