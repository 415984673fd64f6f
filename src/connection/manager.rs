// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handle to a running device connection.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::event::EventBus;
use crate::state::LightState;

use super::actor::{ConnectionActor, Control};
use super::config::{ConnectionTimings, DeviceIdentity};
use super::request::LightRequest;
use super::state::ConnectionSnapshot;

const CONTROL_CHANNEL_CAPACITY: usize = 32;

/// Owner of one device connection.
///
/// Spawning the manager starts a task that connects to the device right
/// away and keeps reconnecting after recoverable failures. The task stops
/// on [`shutdown`](Self::shutdown), or once the manager and every handle
/// cloned from it are dropped. Either way the socket is closed and every
/// timer is cancelled.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct ConnectionManager {
    identity: DeviceIdentity,
    control_tx: mpsc::Sender<Control>,
    state_rx: watch::Receiver<LightState>,
    task: Option<JoinHandle<()>>,
}

impl ConnectionManager {
    /// Starts the connection task for `identity`.
    #[must_use]
    pub fn spawn(identity: DeviceIdentity, timings: ConnectionTimings, events: EventBus) -> Self {
        let (control_tx, control_rx) = mpsc::channel(CONTROL_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(LightState::new());

        let actor = ConnectionActor::new(identity.clone(), timings, events, state_tx, control_rx);
        let task = tokio::spawn(actor.run());

        Self {
            identity,
            control_tx,
            state_rx,
            task: Some(task),
        }
    }

    /// Returns the device identity.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Returns the last known light state.
    #[must_use]
    pub fn light_state(&self) -> LightState {
        *self.state_rx.borrow()
    }

    /// Subscribes to light state updates.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<LightState> {
        self.state_rx.clone()
    }

    /// Queues a light change.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelClosed`] if the connection task has stopped.
    pub async fn request(&self, request: LightRequest) -> Result<()> {
        self.handle().request(request).await
    }

    /// Connects now if the device is disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelClosed`] if the connection task has stopped.
    pub async fn reconnect(&self) -> Result<()> {
        self.handle().reconnect().await
    }

    /// Returns the current connection snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelClosed`] if the connection task has stopped.
    pub async fn snapshot(&self) -> Result<ConnectionSnapshot> {
        self.handle().snapshot().await
    }

    /// Stops the connection task and waits for it to finish.
    ///
    /// Calling it again is a no-op.
    pub async fn shutdown(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        let _ = self.control_tx.send(Control::Shutdown).await;
        if let Err(e) = task.await {
            tracing::warn!(device_id = %self.identity.id(), error = %e, "Connection task ended abnormally");
        }
    }

    /// Returns a sender usable without holding the manager.
    pub(crate) fn handle(&self) -> ManagerHandle {
        ManagerHandle {
            control_tx: self.control_tx.clone(),
        }
    }
}

/// Cloneable control sender, used by the registry so that no lock is held
/// across an await.
#[derive(Debug, Clone)]
pub(crate) struct ManagerHandle {
    control_tx: mpsc::Sender<Control>,
}

impl ManagerHandle {
    async fn send(&self, control: Control) -> Result<()> {
        self.control_tx
            .send(control)
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    pub async fn request(&self, request: LightRequest) -> Result<()> {
        self.send(Control::Request(request)).await
    }

    pub async fn reconnect(&self) -> Result<()> {
        self.send(Control::Connect).await
    }

    pub async fn snapshot(&self) -> Result<ConnectionSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Control::Inspect(tx)).await?;
        rx.await.map_err(|_| Error::ChannelClosed)
    }
}
