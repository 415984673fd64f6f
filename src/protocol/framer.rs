// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line framing of the inbound byte stream.
//!
//! Reads may split a frame or carry several, and a single line may hold
//! more than one JSON object back to back. [`Framer`] buffers bytes until a
//! `\n` arrives and hands each complete line to [`decode_line`].

use serde_json::{Deserializer, Value};

use crate::error::ParseError;

use super::InboundMessage;

/// Acknowledgment literals stripped before classification.
///
/// Firmware versions differ in whether they put a space after the comma.
pub const ACK_LITERALS: [&str; 2] = [
    r#"{"id":1,"result":["ok"]}"#,
    r#"{"id":1, "result":["ok"]}"#,
];

/// Bytes buffered without a delimiter before the buffer is discarded.
const MAX_PENDING_BYTES: usize = 64 * 1024;

/// Incremental decoder for one socket's inbound stream.
///
/// # Examples
///
/// ```
/// use yeelight_lib::protocol::{Framer, InboundMessage};
///
/// let mut framer = Framer::new();
///
/// assert!(framer.push(br#"{"method":"props","par"#).is_empty());
/// let messages = framer.push(b"ams\":{\"power\":\"on\"}}\r\n");
///
/// assert_eq!(messages.len(), 1);
/// assert!(matches!(messages[0], Ok(InboundMessage::Notification(_))));
/// ```
#[derive(Debug, Default)]
pub struct Framer {
    buffer: Vec<u8>,
}

impl Framer {
    /// Creates an empty framer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and decodes every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<InboundMessage, ParseError>> {
        self.buffer.extend_from_slice(chunk);

        let mut messages = Vec::new();
        while let Some(end) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            messages.extend(decode_line(&String::from_utf8_lossy(&line)));
        }

        if self.buffer.len() > MAX_PENDING_BYTES {
            tracing::warn!(
                bytes = self.buffer.len(),
                "Discarding oversized partial frame"
            );
            self.buffer.clear();
        }

        messages
    }

    /// Drops any partial frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Returns the number of buffered bytes not yet terminated by a delimiter.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Decodes one line of inbound text.
///
/// Acknowledgment literals and delimiters are removed first. What remains is
/// classified by substring: anything mentioning `props` is a notification,
/// otherwise anything mentioning `result` is a command result, and the rest
/// is dropped. Each JSON object on the line is decoded in order; the first
/// malformed one ends the line with an error.
#[must_use]
pub fn decode_line(line: &str) -> Vec<Result<InboundMessage, ParseError>> {
    let text = ACK_LITERALS
        .iter()
        .fold(line.to_string(), |text, ack| text.replace(ack, ""));
    let text = text.trim();

    if text.is_empty() {
        return Vec::new();
    }
    if !text.contains("props") && !text.contains("result") {
        tracing::debug!(frame = %text, "Discarding unrecognized frame");
        return Vec::new();
    }

    let mut messages = Vec::new();
    let mut stream = Deserializer::from_str(text).into_iter::<Value>();
    let mut start = 0;

    while let Some(next) = stream.next() {
        let end = stream.byte_offset();
        match next {
            Ok(value) => {
                if let Some(message) = classify(&text[start..end], value) {
                    messages.push(message);
                }
            }
            Err(e) => {
                messages.push(Err(ParseError::Json(e)));
                break;
            }
        }
        start = end;
    }

    messages
}

fn classify(raw: &str, value: Value) -> Option<Result<InboundMessage, ParseError>> {
    if raw.contains("props") {
        Some(InboundMessage::notification(value))
    } else if raw.contains("result") {
        Some(InboundMessage::command_result(value))
    } else {
        tracing::debug!(frame = %raw.trim(), "Discarding unrecognized frame");
        None
    }
}
