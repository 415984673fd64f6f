// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the connection lifecycle against a mock light.

mod common;

use std::time::Duration;

use common::{
    MockBulb, WAIT, fast_timings, wait_available, wait_for_event, wait_for_snapshot,
    wait_unavailable,
};
use tokio::time::timeout;
use yeelight_lib::{
    ColorMode, ConnectionManager, ConnectionState, DeviceEvent, DeviceRegistry, Error, EventBus,
    LightRequest, StateChange,
};

// ============================================================================
// Connect and Close
// ============================================================================

mod connect_and_close {
    use super::*;

    #[tokio::test]
    async fn connect_reports_available_then_queries_state() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;

        let event = wait_for_event(&mut events, |e| matches!(e, DeviceEvent::Available { .. })).await;
        assert_eq!(event.device_id(), &id);
        conn.expect_state_query().await;

        let snapshot = registry.connection_snapshot(&id).await.unwrap();
        assert_eq!(snapshot.state, ConnectionState::Connected);
        assert!(!snapshot.ack_pending, "initial query must not arm the ack timer");
    }

    #[tokio::test]
    async fn close_reports_unreachable_without_reconnect() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        drop(conn);

        assert_eq!(wait_unavailable(&mut events).await, "unreachable");
        let snapshot = registry.connection_snapshot(&id).await.unwrap();
        assert_eq!(snapshot.state, ConnectionState::Disconnected);
        assert!(!snapshot.reconnect_pending);
        assert!(bulb.no_connection_within(Duration::from_millis(400)).await);
    }

    #[tokio::test]
    async fn refused_first_connect_is_not_retried() {
        let port = {
            let bulb = MockBulb::start().await;
            bulb.port()
        };
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry
            .register(yeelight_lib::DeviceIdentity::new("lamp", "127.0.0.1").with_port(port))
            .unwrap();

        wait_unavailable(&mut events).await;
        let snapshot = registry.connection_snapshot(&id).await.unwrap();
        assert_eq!(snapshot.state, ConnectionState::Disconnected);
        assert_eq!(snapshot.errors_handled, 1);
        assert!(!snapshot.reconnect_pending);
    }

    #[tokio::test]
    async fn refused_retry_keeps_retrying() {
        let bulb = MockBulb::start().await;
        let port = bulb.port();
        let timings = fast_timings().with_initial_query_delay(Duration::from_secs(1));
        let registry = DeviceRegistry::new().with_timings(timings);
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        bulb.accept_and_reset().await;
        drop(bulb);
        wait_unavailable(&mut events).await;

        // Several retries are refused while the light is rebooting
        tokio::time::sleep(Duration::from_millis(600)).await;
        let snapshot = registry.connection_snapshot(&id).await.unwrap();
        assert!(!snapshot.state.is_connected());
        assert!(snapshot.errors_handled >= 2);

        let bulb = MockBulb::start_on(port).await;
        let _conn = bulb.accept().await;
        wait_available(&mut events).await;

        let snapshot = wait_for_snapshot(&registry, &id, |s| s.state.is_connected()).await;
        assert!(!snapshot.reconnect_pending);
    }

    #[tokio::test]
    async fn manual_reconnect_after_close() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let conn = bulb.accept().await;
        wait_available(&mut events).await;
        drop(conn);
        wait_unavailable(&mut events).await;

        registry.reconnect(&id).await.unwrap();

        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;
    }

    #[tokio::test]
    async fn reconnect_while_connected_is_ignored() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let _conn = bulb.accept().await;
        wait_available(&mut events).await;

        registry.reconnect(&id).await.unwrap();

        assert!(bulb.no_connection_within(Duration::from_millis(200)).await);
        let snapshot = registry.connection_snapshot(&id).await.unwrap();
        assert_eq!(snapshot.state, ConnectionState::Connected);
    }

    #[tokio::test]
    async fn unregister_closes_socket() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        assert!(registry.unregister(&id).await);

        assert!(conn.closed_by_peer().await);
        wait_unavailable(&mut events).await;
        let removed = wait_for_event(&mut events, DeviceEvent::is_lifecycle).await;
        assert_eq!(removed, DeviceEvent::device_removed(id));
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let bulb = MockBulb::start().await;
        let mut manager =
            ConnectionManager::spawn(bulb.identity("lamp"), fast_timings(), EventBus::new());
        let _conn = bulb.accept().await;

        manager.shutdown().await;
        manager.shutdown().await;

        let result = manager.request(LightRequest::Refresh).await;
        assert!(matches!(result, Err(Error::ChannelClosed)));
    }
}

// ============================================================================
// Command Dispatch
// ============================================================================

mod command_dispatch {
    use super::*;

    #[tokio::test]
    async fn command_is_written_and_ack_clears_timer() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        registry.set_brightness(&id, 0.5, None).await.unwrap();
        assert_eq!(
            conn.next_frame().await,
            r#"{"id":1,"method":"set_bright","params":[50,"smooth",500]}"#
        );
        assert!(registry.connection_snapshot(&id).await.unwrap().ack_pending);

        conn.send(r#"{"id":1,"result":["ok"]}"#).await;

        let snapshot = wait_for_snapshot(&registry, &id, |s| !s.ack_pending).await;
        assert_eq!(snapshot.state, ConnectionState::Connected);
        assert_eq!(snapshot.errors_handled, 0);
    }

    #[tokio::test]
    async fn power_uses_requested_duration() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        registry.set_power(&id, false, Some(1200)).await.unwrap();
        assert_eq!(
            conn.next_frame().await,
            r#"{"id":1,"method":"set_power","params":["off","smooth",1200]}"#
        );

        registry.set_color_temperature(&id, 0.0).await.unwrap();
        assert_eq!(
            conn.next_frame().await,
            r#"{"id":1,"method":"set_ct_abx","params":[1700,"smooth",500]}"#
        );
    }

    #[tokio::test]
    async fn refresh_goes_through_send_path() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        registry.refresh(&id).await.unwrap();

        conn.expect_state_query().await;
        assert!(registry.connection_snapshot(&id).await.unwrap().ack_pending);
    }

    #[tokio::test]
    async fn inbound_data_clears_pending_reconnect() {
        let bulb = MockBulb::start().await;
        let timings = fast_timings().with_reconnect_delay(Duration::from_secs(30));
        let registry = DeviceRegistry::new().with_timings(timings);
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let conn = bulb.accept().await;
        wait_available(&mut events).await;
        drop(conn);
        wait_unavailable(&mut events).await;

        registry.set_power(&id, true, None).await.unwrap();
        assert!(registry.connection_snapshot(&id).await.unwrap().reconnect_pending);

        registry.reconnect(&id).await.unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;
        assert!(registry.connection_snapshot(&id).await.unwrap().reconnect_pending);

        conn.send(r#"{"method":"props","params":{"power":"on"}}"#).await;

        let snapshot = wait_for_snapshot(&registry, &id, |s| !s.reconnect_pending).await;
        assert_eq!(snapshot.state, ConnectionState::Connected);
        assert_eq!(snapshot.light.power(), Some(true));
    }

    #[tokio::test]
    async fn ack_timeout_closes_and_reconnects() {
        let bulb = MockBulb::start().await;
        let timings = fast_timings().with_ack_timeout(Duration::from_millis(200));
        let registry = DeviceRegistry::new().with_timings(timings);
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        registry.set_power(&id, true, None).await.unwrap();
        conn.next_frame().await;

        assert_eq!(wait_unavailable(&mut events).await, "unreachable");
        assert!(conn.closed_by_peer().await);

        let mut second = bulb.accept().await;
        wait_available(&mut events).await;
        second.expect_state_query().await;

        let snapshot = registry.connection_snapshot(&id).await.unwrap();
        assert_eq!(snapshot.errors_handled, 1);
        assert!(!snapshot.reconnect_pending);
    }

    #[tokio::test]
    async fn send_while_disconnected_schedules_one_reconnect() {
        let bulb = MockBulb::start().await;
        let timings = fast_timings().with_reconnect_delay(Duration::from_secs(30));
        let registry = DeviceRegistry::new().with_timings(timings);
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let conn = bulb.accept().await;
        wait_available(&mut events).await;
        drop(conn);
        wait_unavailable(&mut events).await;

        registry.set_power(&id, true, None).await.unwrap();
        let snapshot = registry.connection_snapshot(&id).await.unwrap();
        assert_eq!(snapshot.errors_handled, 1);
        assert!(snapshot.reconnect_pending);

        registry.set_brightness(&id, 0.3, None).await.unwrap();
        let snapshot = registry.connection_snapshot(&id).await.unwrap();
        assert_eq!(snapshot.errors_handled, 2);
        assert!(snapshot.reconnect_pending);
        assert!(!snapshot.ack_pending);
        assert_eq!(snapshot.state, ConnectionState::Disconnected);

        assert!(bulb.no_connection_within(Duration::from_millis(200)).await);
    }

    #[tokio::test]
    async fn broken_send_reconnects_after_delay() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let conn = bulb.accept().await;
        wait_available(&mut events).await;
        drop(conn);
        wait_unavailable(&mut events).await;

        registry.set_power(&id, true, None).await.unwrap();

        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;
    }
}

// ============================================================================
// Hue and Saturation
// ============================================================================

mod hue_saturation {
    use super::*;

    #[tokio::test]
    async fn nearby_changes_are_merged() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        registry.set_hue(&id, 0.5).await.unwrap();
        registry.set_saturation(&id, 0.25).await.unwrap();

        assert_eq!(
            conn.next_frame().await,
            r#"{"id":1,"method":"set_hsv","params":[180,25,"smooth",500]}"#
        );
        assert_eq!(conn.try_next_frame(Duration::from_millis(200)).await, None);
    }

    #[tokio::test]
    async fn ceiling4_sets_background_light() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry
            .register(bulb.identity("ceiling").with_model("ceiling4"))
            .unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        registry.set_hue_saturation(&id, 0.0, 1.0).await.unwrap();

        assert_eq!(
            conn.next_frame().await,
            r#"{"id":1,"method":"bg_set_hsv","params":[0,100,"smooth",500]}"#
        );
    }

    #[tokio::test]
    async fn missing_component_comes_from_last_known_state() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        conn.send(r#"{"method":"props","params":{"sat":40}}"#).await;
        wait_for_event(&mut events, DeviceEvent::is_state_change).await;

        registry.set_hue(&id, 1.0).await.unwrap();

        assert_eq!(
            conn.next_frame().await,
            r#"{"id":1,"method":"set_hsv","params":[359,40,"smooth",500]}"#
        );
    }
}

// ============================================================================
// Inbound State
// ============================================================================

mod inbound_state {
    use super::*;

    #[tokio::test]
    async fn notification_reports_normalized_value() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;

        conn.send(r#"{"method":"props","params":{"bright":"50"}}"#).await;

        let event = wait_for_event(&mut events, DeviceEvent::is_state_change).await;
        let DeviceEvent::StateChanged {
            change, new_state, ..
        } = event
        else {
            unreachable!();
        };
        assert_eq!(change, StateChange::Brightness(0.5));
        assert_eq!(new_state.brightness(), Some(0.5));
        assert_eq!(registry.light_state(&id).unwrap().brightness(), Some(0.5));
    }

    #[tokio::test]
    async fn state_reply_fills_every_property() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut watch = registry.watch_device(&id).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        conn.send(r#"{"id":1,"result":["off","20","1","4000","0","180","50"]}"#)
            .await;

        let state = *timeout(WAIT, watch.wait_for(|s| s.saturation().is_some()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(state.power(), Some(false));
        assert_eq!(state.brightness(), Some(0.2));
        assert_eq!(state.color_mode(), Some(ColorMode::Color));
        let ct = state.color_temperature().unwrap();
        assert!((ct - (4000.0 - 1700.0) / (6500.0 - 1700.0)).abs() < 1e-9);
        assert_eq!(state.hue(), Some(180.0 / 359.0));
        assert_eq!(state.saturation(), Some(0.5));
    }

    #[tokio::test]
    async fn ack_and_notification_in_one_frame() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        registry
            .register(bulb.identity("ceiling").with_model("ceiling4"))
            .unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;

        conn.send(r#"{"id":1, "result":["ok"]}{"method":"props","params":{"ct":"6000"}}"#)
            .await;

        let event = wait_for_event(&mut events, DeviceEvent::is_state_change).await;
        assert!(matches!(
            event,
            DeviceEvent::StateChanged {
                change: StateChange::ColorTemperature(v),
                ..
            } if (v - 1.0).abs() < 1e-9
        ));
    }

    #[tokio::test]
    async fn frame_split_across_writes() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;

        conn.send_raw(br#"{"method":"props","params":{"color"#).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        conn.send_raw(b"_mode\":2}}\r\n").await;

        let event = wait_for_event(&mut events, DeviceEvent::is_state_change).await;
        assert!(matches!(
            event,
            DeviceEvent::StateChanged {
                change: StateChange::ColorMode(ColorMode::Temperature),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn malformed_frame_changes_nothing() {
        let bulb = MockBulb::start().await;
        let registry = DeviceRegistry::new().with_timings(fast_timings());
        let mut events = registry.subscribe();

        let id = registry.register(bulb.identity("lamp")).unwrap();
        let mut conn = bulb.accept().await;
        wait_available(&mut events).await;
        conn.expect_state_query().await;

        conn.send(r#"{"method":"props","params":{"bright":"#).await;
        conn.send(r#"{"method":"props","params":{"power":"on"}}"#).await;

        let event = wait_for_event(&mut events, DeviceEvent::is_state_change).await;
        assert!(matches!(
            event,
            DeviceEvent::StateChanged {
                change: StateChange::Power(true),
                ..
            }
        ));

        let snapshot = registry.connection_snapshot(&id).await.unwrap();
        assert_eq!(snapshot.state, ConnectionState::Connected);
        assert_eq!(snapshot.errors_handled, 0);
        assert_eq!(snapshot.light.brightness(), None);
        assert_eq!(conn.try_next_frame(Duration::from_millis(100)).await, None);
    }
}
