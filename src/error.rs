// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the library.
//!
//! Failures fall into two families:
//!
//! - [`ConnectionError`]: anything that ends a socket's life. Real transport
//!   failures and the synthetic conditions raised by the connection task
//!   (acknowledgment timeout, sending while disconnected) share this enum so
//!   that a single handler decides about closing and reconnecting.
//! - [`ParseError`]: an inbound frame that could not be understood. These are
//!   logged and dropped; they never affect the connection.

use std::io;

use thiserror::Error;

use crate::event::DeviceId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A connection level failure.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// An inbound message could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Device was not found in the registry.
    #[error("device not found")]
    DeviceNotFound,

    /// A device with the same identifier is already registered.
    #[error("device {0} is already registered")]
    DuplicateDevice(DeviceId),

    /// The device's connection task has stopped.
    #[error("connection task for the device is no longer running")]
    ChannelClosed,
}

/// Errors that close a device connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Establishing the TCP connection failed.
    #[error("failed to connect to {address}: {source}")]
    Connect {
        /// The `host:port` that was dialed.
        address: String,
        /// The underlying socket error.
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to an established socket failed.
    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    /// No inbound traffic arrived within the acknowledgment window after a
    /// command was written.
    #[error("no acknowledgement within {0} ms")]
    CommandTimeout(u64),

    /// A command was sent while the device was not connected.
    #[error("connection to device broken")]
    ConnectionBroken,
}

impl ConnectionError {
    /// Returns `true` if this failure should schedule a reconnect.
    ///
    /// Timeouts and resets usually mean the device was power-cycled or
    /// dropped off the network for a while, so they are retried. Other
    /// transport errors (refused, unreachable, ...) only close the socket.
    #[must_use]
    pub fn should_reconnect(&self) -> bool {
        match self {
            Self::Connect { source, .. } | Self::Io(source) => matches!(
                source.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::ConnectionReset
            ),
            Self::CommandTimeout(_) | Self::ConnectionBroken => true,
        }
    }
}

/// Errors related to parsing inbound device messages.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the message.
    #[error("missing field in message: {0}")]
    MissingField(String),

    /// Unexpected message format.
    #[error("unexpected message format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

impl ParseError {
    pub(crate) fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
