// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection state reporting.

use std::fmt;

use crate::state::LightState;

/// Socket lifecycle of one device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No socket.
    #[default]
    Disconnected,
    /// A socket is dialing the device.
    Connecting,
    /// The socket is open.
    Connected,
}

impl ConnectionState {
    /// Returns `true` for [`ConnectionState::Connected`].
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// Point-in-time view of a device connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionSnapshot {
    /// Current socket state.
    pub state: ConnectionState,
    /// Whether a sent command is waiting for inbound traffic.
    pub ack_pending: bool,
    /// Whether a reconnect is scheduled.
    pub reconnect_pending: bool,
    /// Number of times the error path ran since the connection was created.
    pub errors_handled: u64,
    /// Last known light state.
    pub light: LightState,
}
