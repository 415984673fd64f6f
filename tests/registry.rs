// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the device registry with several lights.

mod common;

use common::{MockBulb, fast_timings, wait_for_event};
use yeelight_lib::{DeviceEvent, DeviceId, DeviceRegistry, StateChange};

#[tokio::test]
async fn devices_are_independent() {
    let kitchen = MockBulb::start().await;
    let hall = MockBulb::start().await;
    let registry = DeviceRegistry::new().with_timings(fast_timings());
    let mut events = registry.subscribe();

    let kitchen_id = registry.register(kitchen.identity("kitchen")).unwrap();
    let hall_id = registry.register(hall.identity("hall")).unwrap();
    assert_eq!(registry.device_count(), 2);

    let mut kitchen_conn = kitchen.accept().await;
    let hall_conn = hall.accept().await;
    kitchen_conn.expect_state_query().await;

    // Losing one light leaves the other connected
    drop(hall_conn);
    let event = wait_for_event(&mut events, |e| matches!(e, DeviceEvent::Unavailable { .. })).await;
    assert_eq!(event.device_id(), &hall_id);

    kitchen_conn
        .send(r#"{"method":"props","params":{"power":"on"}}"#)
        .await;
    let event = wait_for_event(&mut events, DeviceEvent::is_state_change).await;
    assert_eq!(event.device_id(), &kitchen_id);

    assert_eq!(registry.light_state(&kitchen_id).unwrap().power(), Some(true));
    assert_eq!(registry.light_state(&hall_id).unwrap().power(), None);

    registry.set_power(&kitchen_id, false, None).await.unwrap();
    assert_eq!(
        kitchen_conn.next_frame().await,
        r#"{"id":1,"method":"set_power","params":["off","smooth",500]}"#
    );
}

#[tokio::test]
async fn events_carry_full_state() {
    let bulb = MockBulb::start().await;
    let registry = DeviceRegistry::new().with_timings(fast_timings());
    let mut events = registry.subscribe();

    let id = registry.register(bulb.identity("lamp")).unwrap();
    let mut conn = bulb.accept().await;

    conn.send(r#"{"method":"props","params":{"hue":"359"}}"#).await;
    conn.send(r#"{"method":"props","params":{"rgb":65280}}"#).await;

    let mut hues = Vec::new();
    while hues.len() < 2 {
        if let DeviceEvent::StateChanged {
            change: StateChange::Hue(hue),
            new_state,
            ..
        } = wait_for_event(&mut events, DeviceEvent::is_state_change).await
        {
            assert_eq!(new_state.hue(), Some(hue));
            hues.push(hue);
        }
    }

    assert_eq!(hues, vec![1.0, 120.0 / 359.0]);
    let state = registry.light_state(&id).unwrap();
    assert_eq!(state.saturation(), Some(1.0));
}

#[tokio::test]
async fn registry_lists_devices() {
    let registry = DeviceRegistry::with_capacity(16).with_timings(fast_timings());
    let bulb = MockBulb::start().await;

    registry.register(bulb.identity("b")).unwrap();
    registry.register(bulb.identity("a")).unwrap();

    let mut ids = registry.device_ids();
    ids.sort();
    assert_eq!(ids, vec![DeviceId::new("a"), DeviceId::new("b")]);
    assert_eq!(
        registry.identity(&DeviceId::new("a")).unwrap().port(),
        bulb.port()
    );

    assert!(registry.unregister(&DeviceId::new("a")).await);
    assert_eq!(registry.device_ids(), vec![DeviceId::new("b")]);
}
