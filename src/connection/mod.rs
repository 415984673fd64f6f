// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device TCP connection lifecycle.
//!
//! A [`ConnectionManager`] owns one device's socket. Its state machine:
//!
//! ```text
//! Disconnected --connect--> Connecting --connected--> Connected
//!      ^                         |                        |
//!      +-------- error / close --+------------------------+
//! ```
//!
//! - On connect the device is reported available and, after
//!   [`ConnectionTimings::initial_query_delay`], its full state is queried.
//! - Every command arms an acknowledgment timer unless one is running. Any
//!   inbound traffic clears it; expiry counts as a connection error.
//! - Errors close the socket. Timeouts, resets and the synthetic command
//!   errors also schedule one reconnect after
//!   [`ConnectionTimings::reconnect_delay`].
//! - Every close reports the device unavailable.
//!
//! # Examples
//!
//! ```no_run
//! use yeelight_lib::connection::{
//!     ConnectionManager, ConnectionTimings, DeviceIdentity, LightRequest,
//! };
//! use yeelight_lib::event::EventBus;
//!
//! # async fn example() -> yeelight_lib::Result<()> {
//! let events = EventBus::new();
//! let identity = DeviceIdentity::new("bulb", "192.168.1.40");
//! let mut manager = ConnectionManager::spawn(identity, ConnectionTimings::default(), events);
//!
//! manager
//!     .request(LightRequest::Power { on: true, duration_ms: None })
//!     .await?;
//!
//! manager.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod actor;
mod config;
mod manager;
mod request;
mod state;
mod timer;

pub use config::{ConnectionTimings, DEFAULT_PORT, DeviceIdentity};
pub use manager::ConnectionManager;
pub(crate) use manager::ManagerHandle;
pub use request::LightRequest;
pub use state::{ConnectionSnapshot, ConnectionState};
