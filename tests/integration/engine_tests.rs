//! End-to-end engine behaviour without the HTTP layer

#[cfg(test)]
mod tests {
    use crate::common::{PayloadFactory, SnapshotAssertions, TestService, wait_until};
    use serde_json::Value;
    use std::time::Duration;
    use wake_me_up::hub::{Subscription, Update};

    async fn next_update(sub: &mut Subscription) -> Update {
        tokio::time::timeout(Duration::from_secs(2), sub.recv())
            .await
            .expect("timed out waiting for an update")
            .expect("subscription closed")
    }

    /// Read updates until one satisfies `predicate`
    async fn update_where(sub: &mut Subscription, predicate: impl Fn(&Value) -> bool) -> Value {
        loop {
            let update = next_update(sub).await;
            let json: Value = serde_json::from_str(&update.body).unwrap();
            if predicate(&json) {
                return json;
            }
        }
    }

    #[tokio::test]
    async fn test_firing_alert_rings_until_acknowledged() {
        let service = TestService::start();
        let state = service.state.clone();
        let mut viewer = state.hub.register(None);

        state.store.ingest(PayloadFactory::firing(&["DiskFull"]));

        let json = update_where(&mut viewer, |j| j["hasUnacknowledged"] == true).await;
        let id = json["alerts"][0]["id"].as_str().unwrap().to_string();
        assert!(wait_until(|| state.alarm.is_looping()).await);
        assert!(wait_until(|| service.player.launches() >= 1).await);

        state.store.acknowledge(&id);

        let json = update_where(&mut viewer, |j| j["hasUnacknowledged"] == false).await;
        assert_eq!(json["alerts"][0]["isAcknowledged"], true);
        assert!(wait_until(|| !state.alarm.is_looping()).await);

        drop(viewer);
        service.stop().await;
    }

    #[tokio::test]
    async fn test_resolution_silences_alarm() {
        let service = TestService::start();
        let state = service.state.clone();

        state.store.ingest(PayloadFactory::firing(&["HighLatency"]));
        assert!(wait_until(|| state.alarm.is_looping()).await);

        let report = state.store.ingest(PayloadFactory::resolved(&["HighLatency"]));
        assert_eq!(report.resolved, 1);
        assert!(wait_until(|| !state.alarm.is_looping()).await);
        assert!(!state.store.has_unacknowledged_firing());

        service.stop().await;
    }

    #[tokio::test]
    async fn test_new_alert_after_acknowledge_restarts_alarm() {
        let service = TestService::start();
        let state = service.state.clone();

        state.store.ingest(PayloadFactory::firing(&["A"]));
        assert!(wait_until(|| state.alarm.is_looping()).await);
        for view in state.store.snapshot().alerts {
            state.store.acknowledge(&view.entry.id);
        }
        assert!(wait_until(|| !state.alarm.is_looping()).await);
        let launches = service.player.launches();

        state.store.ingest(PayloadFactory::firing(&["B"]));
        assert!(wait_until(|| state.alarm.is_looping()).await);
        assert!(wait_until(|| service.player.launches() > launches).await);

        service.stop().await;
    }

    #[tokio::test]
    async fn test_viewers_converge_on_final_state() {
        let service = TestService::start();
        let state = service.state.clone();
        let mut viewers: Vec<_> = (0..5).map(|_| state.hub.register(None)).collect();

        for i in 0..10 {
            state
                .store
                .ingest(PayloadFactory::firing(&[&format!("alert-{}", i)]));
        }

        let revision = state.store.revision();
        for viewer in &mut viewers {
            let mut last = next_update(viewer).await;
            while last.revision < revision {
                last = next_update(viewer).await;
            }
            let json: Value = serde_json::from_str(&last.body).unwrap();
            assert_eq!(json["alerts"].as_array().unwrap().len(), 10);
        }

        drop(viewers);
        service.stop().await;
    }

    #[tokio::test]
    async fn test_stalled_viewer_does_not_hold_back_others() {
        let config = wake_me_up::Config::from_yaml("hub:\n  buffer_size: 1\n").unwrap();
        let service = TestService::with_config(config);
        let state = service.state.clone();

        let stalled = state.hub.register(None);
        let mut active = state.hub.register(None);

        for i in 0..5 {
            state.store.ingest(PayloadFactory::firing(&[&format!("a{}", i)]));
            let expected = state.store.revision();
            loop {
                if next_update(&mut active).await.revision >= expected {
                    break;
                }
            }
        }

        assert_eq!(state.hub.subscriber_count().await, 1);
        drop(stalled);
        service.stop().await;
    }

    #[tokio::test]
    async fn test_clear_keeps_only_unacknowledged_firing() {
        let service = TestService::start();
        let store = service.state.store.clone();

        store.ingest(PayloadFactory::firing(&["keep", "ack", "gone"]));
        store.ingest(PayloadFactory::resolved(&["gone"]));
        let ack = store
            .snapshot()
            .alerts
            .into_iter()
            .find(|v| v.entry.alert.name() == Some("ack"))
            .unwrap();
        store.acknowledge(&ack.entry.id);

        let before = store.snapshot();
        before.assert_display_order();
        assert_eq!(before.names(), vec!["keep", "ack", "gone"]);

        assert_eq!(store.clear_acknowledged_and_resolved(), 2);
        let after = store.snapshot();
        assert_eq!(after.names(), vec!["keep"]);
        assert!(!store.is_acknowledged(&ack.entry.id));

        service.stop().await;
    }

    #[tokio::test]
    async fn test_ids_stay_unique_under_concurrent_ingest() {
        let service = TestService::start();
        let store = service.state.store.clone();

        let tasks: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                tokio::spawn(async move {
                    for i in 0..10 {
                        store.ingest(PayloadFactory::firing(&[&format!("t{}-{}", t, i)]));
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.alerts.len(), 80);
        snapshot.assert_unique_ids();
        snapshot.assert_display_order();

        service.stop().await;
    }
}
