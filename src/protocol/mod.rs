// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound wire protocol.
//!
//! Devices talk line-delimited JSON over TCP. This module turns the raw
//! byte stream into [`InboundMessage`]s and those into
//! [`StateChange`](crate::state::StateChange)s.
//!
//! Outbound frames are built by [`crate::command`].
//!
//! # Examples
//!
//! ```
//! use yeelight_lib::protocol::Framer;
//! use yeelight_lib::state::StateChange;
//! use yeelight_lib::types::DeviceModel;
//!
//! let mut framer = Framer::new();
//! let messages = framer.push(b"{\"method\":\"props\",\"params\":{\"bright\":\"50\"}}\r\n");
//!
//! let message = messages.into_iter().next().unwrap().unwrap();
//! let changes = message.to_state_changes(&DeviceModel::default()).unwrap();
//! assert_eq!(changes, vec![StateChange::Brightness(0.5)]);
//! ```

mod framer;
mod message;

pub use framer::{ACK_LITERALS, Framer, decode_line};
pub use message::{InboundMessage, SNAPSHOT_LAYOUT, SnapshotLayout};
