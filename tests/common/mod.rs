// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process stand-in for a light, plus shared helpers.

#![allow(dead_code)]

use std::time::Duration;

use socket2::SockRef;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::broadcast;
use tokio::time::timeout;
use yeelight_lib::{
    ConnectionSnapshot, ConnectionTimings, DeviceEvent, DeviceId, DeviceIdentity, DeviceRegistry,
};

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(3);

/// The frame sent shortly after every connect.
pub const STATE_QUERY: &str =
    r#"{"id":1,"method":"get_prop","params":["power","bright","color_mode","ct","rgb","hue","sat"]}"#;

/// Timings short enough for tests. The acknowledgment timeout is long so
/// that it only fires in tests that wait for it.
pub fn fast_timings() -> ConnectionTimings {
    ConnectionTimings::new()
        .with_initial_query_delay(Duration::from_millis(20))
        .with_ack_timeout(Duration::from_secs(10))
        .with_reconnect_delay(Duration::from_millis(150))
        .with_hsv_debounce(Duration::from_millis(80))
}

/// Listens like a light on a random local port.
pub struct MockBulb {
    listener: TcpListener,
    port: u16,
}

impl MockBulb {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        Self { listener, port }
    }

    /// Listens on a port used earlier, as a rebooted light would.
    pub async fn start_on(port: u16) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", port)).await.unwrap();
        Self { listener, port }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn identity(&self, id: &str) -> DeviceIdentity {
        DeviceIdentity::new(id, "127.0.0.1").with_port(self.port)
    }

    /// Waits for the library to connect.
    pub async fn accept(&self) -> BulbConnection {
        let (stream, _) = timeout(WAIT, self.listener.accept())
            .await
            .expect("no connection attempt")
            .unwrap();
        let (reader, writer) = stream.into_split();
        BulbConnection {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Accepts a connection and aborts it with a reset.
    pub async fn accept_and_reset(&self) {
        let (stream, _) = timeout(WAIT, self.listener.accept())
            .await
            .expect("no connection attempt")
            .unwrap();
        SockRef::from(&stream).set_linger(Some(Duration::ZERO)).unwrap();
        drop(stream);
    }

    /// Returns `true` if no connection attempt arrives within `window`.
    pub async fn no_connection_within(&self, window: Duration) -> bool {
        timeout(window, self.listener.accept()).await.is_err()
    }
}

/// One accepted connection, seen from the light's side.
pub struct BulbConnection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl BulbConnection {
    /// Sends one frame followed by the line delimiter.
    pub async fn send(&mut self, frame: &str) {
        self.send_raw(format!("{frame}\r\n").as_bytes()).await;
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.unwrap();
        self.writer.flush().await.unwrap();
    }

    /// Reads the next frame, without its delimiter.
    pub async fn next_frame(&mut self) -> String {
        self.try_next_frame(WAIT).await.expect("no frame received")
    }

    /// Reads the next frame, or `None` on timeout or end of stream.
    pub async fn try_next_frame(&mut self, window: Duration) -> Option<String> {
        let mut line = String::new();
        match timeout(window, self.reader.read_line(&mut line)).await {
            Ok(Ok(n)) if n > 0 => Some(line.trim_end().to_string()),
            _ => None,
        }
    }

    /// Consumes the state query sent after connect.
    pub async fn expect_state_query(&mut self) {
        assert_eq!(self.next_frame().await, STATE_QUERY);
    }

    /// Returns `true` once the peer has closed the socket.
    pub async fn closed_by_peer(&mut self) -> bool {
        let mut line = String::new();
        matches!(
            timeout(WAIT, self.reader.read_line(&mut line)).await,
            Ok(Ok(0) | Err(_))
        )
    }
}

/// Waits for the first event matching `predicate`.
pub async fn wait_for_event<F>(
    events: &mut broadcast::Receiver<DeviceEvent>,
    mut predicate: F,
) -> DeviceEvent
where
    F: FnMut(&DeviceEvent) -> bool,
{
    timeout(WAIT, async {
        loop {
            let event = events.recv().await.unwrap();
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("event not received")
}

pub async fn wait_available(events: &mut broadcast::Receiver<DeviceEvent>) {
    wait_for_event(events, |e| matches!(e, DeviceEvent::Available { .. })).await;
}

pub async fn wait_unavailable(events: &mut broadcast::Receiver<DeviceEvent>) -> String {
    match wait_for_event(events, |e| matches!(e, DeviceEvent::Unavailable { .. })).await {
        DeviceEvent::Unavailable { reason, .. } => reason,
        _ => unreachable!(),
    }
}

/// Polls the connection snapshot until `predicate` holds.
pub async fn wait_for_snapshot<F>(
    registry: &DeviceRegistry,
    id: &DeviceId,
    mut predicate: F,
) -> ConnectionSnapshot
where
    F: FnMut(&ConnectionSnapshot) -> bool,
{
    timeout(WAIT, async {
        loop {
            let snapshot = registry.connection_snapshot(id).await.unwrap();
            if predicate(&snapshot) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("snapshot condition not reached")
}
