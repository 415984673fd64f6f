// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`LightState`] holds the last known normalized values of a light, and
//! [`StateChange`] is a single property update applied to it.
//!
//! # Examples
//!
//! ```
//! use yeelight_lib::state::{LightState, StateChange};
//!
//! let mut state = LightState::new();
//! state.apply(&StateChange::Brightness(0.25));
//!
//! assert_eq!(state.brightness(), Some(0.25));
//! ```

mod light_state;
mod state_change;

pub use light_state::LightState;
pub use state_change::StateChange;
