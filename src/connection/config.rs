// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection configuration types.

use std::fmt;
use std::time::Duration;

use crate::event::DeviceId;
use crate::types::DeviceModel;

/// LAN control port used by the devices.
pub const DEFAULT_PORT: u16 = 55443;

/// Who a connection talks to.
///
/// Fixed at registration; the connection never changes it.
///
/// # Examples
///
/// ```
/// use yeelight_lib::connection::DeviceIdentity;
/// use yeelight_lib::types::DeviceModel;
///
/// let identity = DeviceIdentity::new("0x0000000012345678", "192.168.1.40")
///     .with_model(DeviceModel::Ceiling4)
///     .with_friendly_name("Living Room");
///
/// assert_eq!(identity.port(), 55443);
/// assert_eq!(identity.socket_address(), "192.168.1.40:55443");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    id: DeviceId,
    address: String,
    port: u16,
    model: DeviceModel,
    friendly_name: Option<String>,
}

impl DeviceIdentity {
    /// Creates an identity on the default port with the default model.
    #[must_use]
    pub fn new(id: impl Into<DeviceId>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            port: DEFAULT_PORT,
            model: DeviceModel::default(),
            friendly_name: None,
        }
    }

    /// Sets the TCP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the device model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<DeviceModel>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets a name used in log output.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Returns the device ID.
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// Returns the host name or IP address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the TCP port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the device model.
    #[must_use]
    pub fn model(&self) -> &DeviceModel {
        &self.model
    }

    /// Returns the friendly name, if any.
    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        self.friendly_name.as_deref()
    }

    /// Returns `address:port` for dialing.
    #[must_use]
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.friendly_name {
            Some(name) => write!(f, "{name} ({})", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Delays that drive the connection state machine.
///
/// The defaults are the values the devices are tuned for. Tests shorten
/// them.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use yeelight_lib::connection::ConnectionTimings;
///
/// let timings = ConnectionTimings::default();
/// assert_eq!(timings.reconnect_delay, Duration::from_secs(6));
///
/// let fast = ConnectionTimings::new()
///     .with_initial_query_delay(Duration::from_millis(50))
///     .with_ack_timeout(Duration::from_millis(200));
/// assert_eq!(fast.ack_timeout, Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionTimings {
    /// Delay between connecting and sending the full-state query.
    pub initial_query_delay: Duration,
    /// How long a sent command may go without any inbound traffic. Also
    /// bounds a single socket write.
    pub ack_timeout: Duration,
    /// Delay before reconnecting after a recoverable error.
    pub reconnect_delay: Duration,
    /// Window in which hue and saturation requests are merged.
    pub hsv_debounce: Duration,
    /// TCP keep-alive idle time.
    pub keepalive: Duration,
}

impl ConnectionTimings {
    /// Creates timings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial query delay.
    #[must_use]
    pub fn with_initial_query_delay(mut self, delay: Duration) -> Self {
        self.initial_query_delay = delay;
        self
    }

    /// Sets the acknowledgment timeout.
    #[must_use]
    pub fn with_ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }

    /// Sets the reconnect delay.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Sets the hue/saturation debounce window.
    #[must_use]
    pub fn with_hsv_debounce(mut self, window: Duration) -> Self {
        self.hsv_debounce = window;
        self
    }

    /// Sets the keep-alive idle time.
    #[must_use]
    pub fn with_keepalive(mut self, idle: Duration) -> Self {
        self.keepalive = idle;
        self
    }
}

impl Default for ConnectionTimings {
    fn default() -> Self {
        Self {
            initial_query_delay: Duration::from_millis(4000),
            ack_timeout: Duration::from_millis(3000),
            reconnect_delay: Duration::from_millis(6000),
            hsv_debounce: Duration::from_millis(500),
            keepalive: Duration::from_secs(10),
        }
    }
}
