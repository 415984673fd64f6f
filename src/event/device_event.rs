// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use crate::state::{LightState, StateChange};

use super::DeviceId;

/// Reason attached to every [`DeviceEvent::Unavailable`] raised by a closed
/// connection.
pub const UNREACHABLE: &str = "unreachable";

/// Events emitted by the registry and the device connections.
///
/// # Examples
///
/// ```
/// use yeelight_lib::event::{DeviceEvent, DeviceId};
/// use yeelight_lib::state::{LightState, StateChange};
///
/// let id = DeviceId::new("bulb");
///
/// let online = DeviceEvent::available(id.clone());
/// assert!(online.is_availability());
///
/// let change = StateChange::Power(true);
/// let mut state = LightState::new();
/// state.apply(&change);
/// let update = DeviceEvent::state_changed(id, change, state);
/// assert!(update.is_state_change());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DeviceEvent {
    /// A device was added to the registry.
    DeviceAdded {
        /// The ID of the added device.
        device_id: DeviceId,
    },

    /// A device was removed from the registry.
    DeviceRemoved {
        /// The ID of the removed device.
        device_id: DeviceId,
    },

    /// The device's socket connected.
    Available {
        /// The ID of the device.
        device_id: DeviceId,
    },

    /// The device's socket closed.
    Unavailable {
        /// The ID of the device.
        device_id: DeviceId,
        /// Short fixed reason, see [`UNREACHABLE`].
        reason: String,
    },

    /// The device reported a property value.
    ///
    /// Emitted once per property, for notifications and for full-state
    /// query replies alike.
    StateChanged {
        /// The ID of the device.
        device_id: DeviceId,
        /// The reported value.
        change: StateChange,
        /// The device state after applying `change`.
        new_state: LightState,
    },
}

impl DeviceEvent {
    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::DeviceAdded { device_id }
            | Self::DeviceRemoved { device_id }
            | Self::Available { device_id }
            | Self::Unavailable { device_id, .. }
            | Self::StateChanged { device_id, .. } => device_id,
        }
    }

    /// Returns `true` if this is a registry lifecycle event (added/removed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::DeviceAdded { .. } | Self::DeviceRemoved { .. })
    }

    /// Returns `true` if this is an availability event.
    #[must_use]
    pub fn is_availability(&self) -> bool {
        matches!(self, Self::Available { .. } | Self::Unavailable { .. })
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Creates a device added event.
    #[must_use]
    pub fn device_added(device_id: DeviceId) -> Self {
        Self::DeviceAdded { device_id }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(device_id: DeviceId) -> Self {
        Self::DeviceRemoved { device_id }
    }

    /// Creates an available event.
    #[must_use]
    pub fn available(device_id: DeviceId) -> Self {
        Self::Available { device_id }
    }

    /// Creates an unavailable event.
    #[must_use]
    pub fn unavailable(device_id: DeviceId, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            device_id,
            reason: reason.into(),
        }
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(device_id: DeviceId, change: StateChange, new_state: LightState) -> Self {
        Self::StateChanged {
            device_id,
            change,
            new_state,
        }
    }
}
