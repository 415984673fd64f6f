// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device connection task.
//!
//! One [`ConnectionActor`] owns everything mutable about a device
//! connection: the socket, the state flag, the timers and the last known
//! light state. Control requests, socket events and timer expiries all
//! arrive on channels and are handled one at a time, so two of them never
//! race.
//!
//! Socket events carry the generation of the socket that produced them.
//! Once a socket is closed its generation is retired and anything it still
//! delivers is dropped.

use std::io;
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::command::{
    BrightnessCommand, ColorTemperatureCommand, Command, FRAME_DELIMITER, HsvCommand,
    PowerCommand, PropertyQuery,
};
use crate::error::ConnectionError;
use crate::event::{DeviceEvent, EventBus, UNREACHABLE};
use crate::protocol::Framer;
use crate::state::LightState;

use super::config::{ConnectionTimings, DeviceIdentity};
use super::request::LightRequest;
use super::state::{ConnectionSnapshot, ConnectionState};
use super::timer::{Timer, TimerFired, TimerKind};

const READ_BUFFER_SIZE: usize = 4096;

/// Requests from the owning handle.
#[derive(Debug)]
pub(crate) enum Control {
    Connect,
    Request(LightRequest),
    Inspect(oneshot::Sender<ConnectionSnapshot>),
    Shutdown,
}

/// Events from the socket task.
#[derive(Debug)]
enum SocketEvent {
    Connected {
        generation: u64,
        writer: OwnedWriteHalf,
    },
    Failed {
        generation: u64,
        error: ConnectionError,
    },
    Data {
        generation: u64,
        chunk: Vec<u8>,
    },
    Closed {
        generation: u64,
    },
}

impl SocketEvent {
    fn generation(&self) -> u64 {
        match self {
            Self::Connected { generation, .. }
            | Self::Failed { generation, .. }
            | Self::Data { generation, .. }
            | Self::Closed { generation } => *generation,
        }
    }
}

/// A live socket: the reader task and, once connected, the write half.
struct Socket {
    task: JoinHandle<()>,
    writer: Option<OwnedWriteHalf>,
}

/// Hue and saturation collected during the debounce window.
#[derive(Debug, Default, Clone, Copy)]
struct PendingHsv {
    hue: Option<f64>,
    saturation: Option<f64>,
}

pub(crate) struct ConnectionActor {
    identity: DeviceIdentity,
    timings: ConnectionTimings,
    events: EventBus,
    state_tx: watch::Sender<LightState>,
    control_rx: mpsc::Receiver<Control>,
    socket_tx: mpsc::UnboundedSender<SocketEvent>,
    socket_rx: mpsc::UnboundedReceiver<SocketEvent>,
    timer_tx: mpsc::UnboundedSender<TimerFired>,
    timer_rx: mpsc::UnboundedReceiver<TimerFired>,

    state: ConnectionState,
    generation: u64,
    socket: Option<Socket>,
    framer: Framer,
    light: LightState,
    errors_handled: u64,
    /// Set while connect attempts come from the reconnect timer.
    retrying: bool,

    initial_query: Timer,
    ack: Timer,
    reconnect: Timer,
    hsv_debounce: Timer,
    pending_hsv: PendingHsv,
}

impl ConnectionActor {
    pub fn new(
        identity: DeviceIdentity,
        timings: ConnectionTimings,
        events: EventBus,
        state_tx: watch::Sender<LightState>,
        control_rx: mpsc::Receiver<Control>,
    ) -> Self {
        let (socket_tx, socket_rx) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();

        Self {
            identity,
            timings,
            events,
            state_tx,
            control_rx,
            socket_tx,
            socket_rx,
            timer_tx,
            timer_rx,
            state: ConnectionState::Disconnected,
            generation: 0,
            socket: None,
            framer: Framer::new(),
            light: LightState::new(),
            errors_handled: 0,
            retrying: false,
            initial_query: Timer::new(TimerKind::InitialQuery),
            ack: Timer::new(TimerKind::Ack),
            reconnect: Timer::new(TimerKind::Reconnect),
            hsv_debounce: Timer::new(TimerKind::HsvDebounce),
            pending_hsv: PendingHsv::default(),
        }
    }

    /// Runs until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        self.connect();

        loop {
            tokio::select! {
                control = self.control_rx.recv() => match control {
                    Some(Control::Shutdown) | None => break,
                    Some(control) => self.handle_control(control).await,
                },
                Some(event) = self.socket_rx.recv() => self.handle_socket_event(event),
                Some(fired) = self.timer_rx.recv() => self.handle_timer(fired).await,
            }
        }

        self.stop();
    }

    async fn handle_control(&mut self, control: Control) {
        match control {
            Control::Connect => self.connect(),
            Control::Request(request) => self.handle_request(request).await,
            Control::Inspect(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Control::Shutdown => {}
        }
    }

    fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            state: self.state,
            ack_pending: self.ack.is_pending(),
            reconnect_pending: self.reconnect.is_pending(),
            errors_handled: self.errors_handled,
            light: self.light,
        }
    }

    // ---- socket lifecycle ----

    fn connect(&mut self) {
        if self.socket.is_some() || self.state != ConnectionState::Disconnected {
            tracing::warn!(
                device_id = %self.identity.id(),
                state = %self.state,
                "Connect requested while a socket is still active"
            );
            return;
        }

        self.generation += 1;
        self.state = ConnectionState::Connecting;
        self.framer.reset();

        let address = self.identity.socket_address();
        tracing::info!(device_id = %self.identity, %address, "Connecting to device");

        let task = tokio::spawn(run_socket(
            self.generation,
            address,
            self.timings.keepalive,
            self.socket_tx.clone(),
        ));
        self.socket = Some(Socket { task, writer: None });
    }

    fn handle_socket_event(&mut self, event: SocketEvent) {
        if event.generation() != self.generation || self.socket.is_none() {
            tracing::trace!(
                device_id = %self.identity.id(),
                generation = event.generation(),
                "Dropping event from a retired socket"
            );
            return;
        }

        match event {
            SocketEvent::Connected { writer, .. } => self.on_connected(writer),
            SocketEvent::Failed { error, .. } => self.handle_error(error),
            SocketEvent::Data { chunk, .. } => self.on_data(&chunk),
            SocketEvent::Closed { .. } => {
                tracing::info!(device_id = %self.identity, "Device closed the connection");
                self.close_socket();
            }
        }
    }

    fn on_connected(&mut self, writer: OwnedWriteHalf) {
        if let Some(socket) = self.socket.as_mut() {
            socket.writer = Some(writer);
        }
        self.state = ConnectionState::Connected;
        self.retrying = false;

        tracing::info!(device_id = %self.identity, "Connected to device");
        self.events
            .publish(DeviceEvent::available(self.identity.id().clone()));

        self.initial_query
            .start(self.timings.initial_query_delay, &self.timer_tx);
    }

    /// Single entry point for every failure that ends a socket.
    fn handle_error(&mut self, error: ConnectionError) {
        self.errors_handled += 1;
        tracing::warn!(device_id = %self.identity, error = %error, "Connection error");

        self.close_socket();

        // A failed retry keeps the chain going, whatever the cause.
        let retry = error.should_reconnect()
            || (self.retrying && matches!(error, ConnectionError::Connect { .. }));

        if retry && !self.reconnect.is_pending() {
            tracing::info!(
                device_id = %self.identity.id(),
                delay_ms = duration_ms(self.timings.reconnect_delay),
                "Scheduling reconnect"
            );
            self.reconnect
                .start(self.timings.reconnect_delay, &self.timer_tx);
        }
    }

    /// Force-closes the socket and reports the device unreachable.
    fn close_socket(&mut self) {
        if let Some(socket) = self.socket.take() {
            socket.task.abort();
            drop(socket.writer);

            self.ack.cancel();
            self.initial_query.cancel();

            tracing::info!(device_id = %self.identity, "Device unavailable");
            self.events.publish(DeviceEvent::unavailable(
                self.identity.id().clone(),
                UNREACHABLE,
            ));
        }
        self.state = ConnectionState::Disconnected;
    }

    fn stop(&mut self) {
        tracing::debug!(device_id = %self.identity.id(), "Stopping connection task");
        self.initial_query.cancel();
        self.ack.cancel();
        self.reconnect.cancel();
        self.hsv_debounce.cancel();
        self.close_socket();
    }

    // ---- inbound ----

    fn on_data(&mut self, chunk: &[u8]) {
        if !self.state.is_connected() {
            tracing::debug!(
                device_id = %self.identity.id(),
                state = %self.state,
                "Ignoring data received before connect"
            );
            return;
        }

        self.ack.cancel();
        self.reconnect.cancel();

        for message in self.framer.push(chunk) {
            let changes = message
                .and_then(|message| message.to_state_changes(self.identity.model()));

            match changes {
                Ok(changes) => {
                    for change in changes {
                        tracing::debug!(device_id = %self.identity.id(), %change, "Property reported");
                        self.light.apply(&change);
                        self.events.publish(DeviceEvent::state_changed(
                            self.identity.id().clone(),
                            change,
                            self.light,
                        ));
                    }
                }
                Err(e) => {
                    tracing::warn!(device_id = %self.identity.id(), error = %e, "Dropping malformed message");
                }
            }
        }

        self.state_tx.send_if_modified(|state| {
            let changed = *state != self.light;
            *state = self.light;
            changed
        });
    }

    // ---- outbound ----

    async fn handle_request(&mut self, request: LightRequest) {
        let model = self.identity.model().clone();

        match request {
            LightRequest::Power { on, duration_ms } => {
                self.send(&PowerCommand::new(on, duration_ms)).await;
            }
            LightRequest::Brightness { value, duration_ms } => {
                self.send(&BrightnessCommand::from_normalized(value, duration_ms))
                    .await;
            }
            LightRequest::ColorTemperature(value) => {
                self.send(&ColorTemperatureCommand::from_normalized(value, &model))
                    .await;
            }
            LightRequest::Refresh => self.send(&PropertyQuery::full_state()).await,
            LightRequest::Hue(hue) => self.queue_hsv(Some(hue), None),
            LightRequest::Saturation(saturation) => self.queue_hsv(None, Some(saturation)),
            LightRequest::HueSaturation { hue, saturation } => {
                self.queue_hsv(Some(hue), Some(saturation));
            }
        }
    }

    fn queue_hsv(&mut self, hue: Option<f64>, saturation: Option<f64>) {
        if hue.is_some() {
            self.pending_hsv.hue = hue;
        }
        if saturation.is_some() {
            self.pending_hsv.saturation = saturation;
        }
        self.hsv_debounce.start(self.timings.hsv_debounce, &self.timer_tx);
    }

    async fn flush_hsv(&mut self) {
        let pending = std::mem::take(&mut self.pending_hsv);
        let hue = pending.hue.or(self.light.hue()).unwrap_or(0.0);
        let saturation = pending
            .saturation
            .or(self.light.saturation())
            .unwrap_or(0.0);

        let command = HsvCommand::from_normalized(hue, saturation, self.identity.model());
        self.send(&command).await;
    }

    /// Sends a command and arms the acknowledgment timer.
    async fn send(&mut self, command: &impl Command) {
        if !self.state.is_connected() {
            self.handle_error(ConnectionError::ConnectionBroken);
            return;
        }

        if let Err(e) = self.write_frame(&command.to_frame()).await {
            self.handle_error(ConnectionError::Io(e));
            return;
        }

        if !self.ack.is_pending() {
            self.ack.start(self.timings.ack_timeout, &self.timer_tx);
        }
    }

    async fn write_frame(&mut self, frame: &str) -> io::Result<()> {
        let limit = self.timings.ack_timeout;
        let Some(writer) = self.socket.as_mut().and_then(|s| s.writer.as_mut()) else {
            return Err(io::Error::from(io::ErrorKind::NotConnected));
        };

        tracing::debug!(device_id = %self.identity.id(), %frame, "Sending frame");
        write_with_deadline(
            writer,
            format!("{frame}{FRAME_DELIMITER}").as_bytes(),
            limit,
        )
        .await
    }

    // ---- timers ----

    async fn handle_timer(&mut self, fired: TimerFired) {
        let timer = match fired.kind {
            TimerKind::InitialQuery => &mut self.initial_query,
            TimerKind::Ack => &mut self.ack,
            TimerKind::Reconnect => &mut self.reconnect,
            TimerKind::HsvDebounce => &mut self.hsv_debounce,
        };
        if !timer.fire(fired.seq) {
            return;
        }

        match fired.kind {
            TimerKind::InitialQuery => {
                // Written directly: no acknowledgment timer for this one.
                if self.state.is_connected()
                    && let Err(e) = self.write_frame(&PropertyQuery::full_state().to_frame()).await
                {
                    self.handle_error(ConnectionError::Io(e));
                }
            }
            TimerKind::Ack => {
                if self.state.is_connected() {
                    self.handle_error(ConnectionError::CommandTimeout(duration_ms(
                        self.timings.ack_timeout,
                    )));
                }
            }
            TimerKind::Reconnect => {
                if self.state == ConnectionState::Disconnected {
                    self.retrying = true;
                    self.connect();
                }
            }
            TimerKind::HsvDebounce => self.flush_hsv().await,
        }
    }
}

/// Dials the device and forwards everything it sends.
async fn run_socket(
    generation: u64,
    address: String,
    keepalive: Duration,
    tx: mpsc::UnboundedSender<SocketEvent>,
) {
    let stream = match TcpStream::connect(&address).await {
        Ok(stream) => stream,
        Err(source) => {
            let _ = tx.send(SocketEvent::Failed {
                generation,
                error: ConnectionError::Connect { address, source },
            });
            return;
        }
    };

    if let Err(e) = enable_keepalive(&stream, keepalive) {
        tracing::warn!(%address, error = %e, "Failed to enable TCP keep-alive");
    }

    let (mut reader, writer) = stream.into_split();
    if tx.send(SocketEvent::Connected { generation, writer }).is_err() {
        return;
    }

    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let event = match reader.read(&mut buffer).await {
            Ok(0) => SocketEvent::Closed { generation },
            Ok(n) => SocketEvent::Data {
                generation,
                chunk: buffer[..n].to_vec(),
            },
            Err(e) => SocketEvent::Failed {
                generation,
                error: ConnectionError::Io(e),
            },
        };

        let last = !matches!(event, SocketEvent::Data { .. });
        if tx.send(event).is_err() || last {
            return;
        }
    }
}

/// Writes `bytes`, failing with `TimedOut` if the peer stops reading.
async fn write_with_deadline<W>(writer: &mut W, bytes: &[u8], limit: Duration) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    match tokio::time::timeout(limit, writer.write_all(bytes)).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::from(io::ErrorKind::TimedOut)),
    }
}

fn enable_keepalive(stream: &TcpStream, idle: Duration) -> io::Result<()> {
    SockRef::from(stream).set_tcp_keepalive(&TcpKeepalive::new().with_time(idle))
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
