// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-flight timers owned by the connection task.
//!
//! A [`Timer`] sleeps on its own task and reports back through a channel
//! instead of running a callback, so the owner handles expiry on its own
//! task. Each start bumps a sequence number; a report carrying an older
//! number came from a cancelled or replaced sleep and is ignored.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Which timer expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerKind {
    InitialQuery,
    Ack,
    Reconnect,
    HsvDebounce,
}

/// Expiry report sent to the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimerFired {
    pub kind: TimerKind,
    pub seq: u64,
}

#[derive(Debug)]
pub(crate) struct Timer {
    kind: TimerKind,
    seq: u64,
    handle: Option<JoinHandle<()>>,
}

impl Timer {
    pub fn new(kind: TimerKind) -> Self {
        Self {
            kind,
            seq: 0,
            handle: None,
        }
    }

    /// Starts the timer, replacing any running one.
    pub fn start(&mut self, delay: Duration, tx: &mpsc::UnboundedSender<TimerFired>) {
        self.cancel();
        self.seq += 1;

        let fired = TimerFired {
            kind: self.kind,
            seq: self.seq,
        };
        let tx = tx.clone();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(fired);
        }));
    }

    /// Stops the timer. Safe to call when nothing is running.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// Accepts an expiry report. Returns `false` for a stale one.
    pub fn fire(&mut self, seq: u64) -> bool {
        if self.handle.is_some() && seq == self.seq {
            self.handle = None;
            true
        } else {
            false
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}
