// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device registry for coordinating multiple lights.

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};

use crate::connection::{
    ConnectionManager, ConnectionSnapshot, ConnectionTimings, DeviceIdentity, LightRequest,
    ManagerHandle,
};
use crate::error::{Error, Result};
use crate::event::{DeviceEvent, DeviceId, EventBus};
use crate::state::LightState;

/// Owns one [`ConnectionManager`] per registered device.
///
/// Registering a device starts its connection; unregistering it closes the
/// socket and cancels its timers. Dropping the registry stops every
/// connection.
///
/// # Examples
///
/// ```no_run
/// use yeelight_lib::connection::DeviceIdentity;
/// use yeelight_lib::registry::DeviceRegistry;
///
/// #[tokio::main]
/// async fn main() -> yeelight_lib::Result<()> {
///     let registry = DeviceRegistry::new();
///
///     let mut events = registry.subscribe();
///     tokio::spawn(async move {
///         while let Ok(event) = events.recv().await {
///             println!("Event: {event:?}");
///         }
///     });
///
///     let id = registry.register(
///         DeviceIdentity::new("0x0000000012345678", "192.168.1.40").with_model("ceiling4"),
///     )?;
///
///     registry.set_power(&id, true, None).await?;
///     registry.set_brightness(&id, 0.75, Some(1000)).await?;
///
///     registry.unregister(&id).await;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<DeviceId, ConnectionManager>>,
    event_bus: EventBus,
    timings: ConnectionTimings,
}

impl DeviceRegistry {
    /// Creates an empty registry with default timings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
            event_bus: EventBus::new(),
            timings: ConnectionTimings::default(),
        }
    }

    /// Creates an empty registry with a custom event bus capacity.
    #[must_use]
    pub fn with_capacity(event_capacity: usize) -> Self {
        Self {
            event_bus: EventBus::with_capacity(event_capacity),
            ..Self::new()
        }
    }

    /// Sets the timings used for devices registered from now on.
    #[must_use]
    pub fn with_timings(mut self, timings: ConnectionTimings) -> Self {
        self.timings = timings;
        self
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to the events of every device.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_bus.subscribe()
    }

    /// Returns the number of active event subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.event_bus.subscriber_count()
    }

    // =========================================================================
    // Device Management
    // =========================================================================

    /// Registers a device and starts connecting to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateDevice`] if the ID is already registered.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn register(&self, identity: DeviceIdentity) -> Result<DeviceId> {
        let device_id = identity.id().clone();
        let mut devices = self.devices.write();

        if devices.contains_key(&device_id) {
            return Err(Error::DuplicateDevice(device_id));
        }

        tracing::debug!(%device_id, address = %identity.socket_address(), "Registering device");
        self.event_bus
            .publish(DeviceEvent::device_added(device_id.clone()));

        let manager = ConnectionManager::spawn(identity, self.timings, self.event_bus.clone());
        devices.insert(device_id.clone(), manager);

        Ok(device_id)
    }

    /// Removes a device and stops its connection.
    ///
    /// Returns `true` if the device was registered.
    pub async fn unregister(&self, device_id: &DeviceId) -> bool {
        let removed = self.devices.write().remove(device_id);

        let Some(mut manager) = removed else {
            return false;
        };

        manager.shutdown().await;
        tracing::debug!(%device_id, "Device unregistered");
        self.event_bus
            .publish(DeviceEvent::device_removed(device_id.clone()));

        true
    }

    /// Returns the identity a device was registered with.
    #[must_use]
    pub fn identity(&self, device_id: &DeviceId) -> Option<DeviceIdentity> {
        self.devices
            .read()
            .get(device_id)
            .map(|m| m.identity().clone())
    }

    /// Returns the IDs of all registered devices.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.devices.read().keys().cloned().collect()
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns `true` if the device is registered.
    #[must_use]
    pub fn contains(&self, device_id: &DeviceId) -> bool {
        self.devices.read().contains_key(device_id)
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the last known light state of a device.
    #[must_use]
    pub fn light_state(&self, device_id: &DeviceId) -> Option<LightState> {
        self.devices
            .read()
            .get(device_id)
            .map(ConnectionManager::light_state)
    }

    /// Creates a watch receiver for a device's light state.
    #[must_use]
    pub fn watch_device(&self, device_id: &DeviceId) -> Option<watch::Receiver<LightState>> {
        self.devices
            .read()
            .get(device_id)
            .map(ConnectionManager::watch)
    }

    /// Returns the connection snapshot of a device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is not registered or its connection
    /// task has stopped.
    pub async fn connection_snapshot(&self, device_id: &DeviceId) -> Result<ConnectionSnapshot> {
        self.handle(device_id)?.snapshot().await
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Forwards a light change to a device.
    ///
    /// The request is queued; delivery problems surface as availability
    /// events, not as an error here.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is not registered or its connection
    /// task has stopped.
    pub async fn request(&self, device_id: &DeviceId, request: LightRequest) -> Result<()> {
        self.handle(device_id)?.request(request).await
    }

    /// Switches a device on or off.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn set_power(
        &self,
        device_id: &DeviceId,
        on: bool,
        duration_ms: Option<u32>,
    ) -> Result<()> {
        self.request(device_id, LightRequest::Power { on, duration_ms })
            .await
    }

    /// Sets the brightness, `value` in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn set_brightness(
        &self,
        device_id: &DeviceId,
        value: f64,
        duration_ms: Option<u32>,
    ) -> Result<()> {
        self.request(device_id, LightRequest::Brightness { value, duration_ms })
            .await
    }

    /// Sets the hue, `value` in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn set_hue(&self, device_id: &DeviceId, value: f64) -> Result<()> {
        self.request(device_id, LightRequest::Hue(value)).await
    }

    /// Sets the saturation, `value` in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn set_saturation(&self, device_id: &DeviceId, value: f64) -> Result<()> {
        self.request(device_id, LightRequest::Saturation(value))
            .await
    }

    /// Sets hue and saturation together.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn set_hue_saturation(
        &self,
        device_id: &DeviceId,
        hue: f64,
        saturation: f64,
    ) -> Result<()> {
        self.request(device_id, LightRequest::HueSaturation { hue, saturation })
            .await
    }

    /// Sets the color temperature, `value` in `[0, 1]` of the model's range.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn set_color_temperature(&self, device_id: &DeviceId, value: f64) -> Result<()> {
        self.request(device_id, LightRequest::ColorTemperature(value))
            .await
    }

    /// Queries the full state of a device.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn refresh(&self, device_id: &DeviceId) -> Result<()> {
        self.request(device_id, LightRequest::Refresh).await
    }

    /// Connects a device now if it is disconnected.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn reconnect(&self, device_id: &DeviceId) -> Result<()> {
        self.handle(device_id)?.reconnect().await
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Clones the control handle so the lock is released before awaiting.
    fn handle(&self, device_id: &DeviceId) -> Result<ManagerHandle> {
        self.devices
            .read()
            .get(device_id)
            .map(ConnectionManager::handle)
            .ok_or(Error::DeviceNotFound)
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
