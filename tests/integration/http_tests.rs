//! HTTP routes against an in-process service

#[cfg(test)]
mod tests {
    use crate::common::{PayloadFactory, TestService};
    use actix_web::http::StatusCode;
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::{test, web};
    use serde_json::{Value, json};
    use std::io::Write;
    use wake_me_up::config::Config;
    use wake_me_up::server::HttpServer;

    macro_rules! app {
        ($service:expr) => {
            test::init_service(HttpServer::create_app(web::Data::new(
                $service.state.clone(),
            )))
            .await
        };
    }

    #[actix_web::test]
    async fn test_webhook_ingests_alerts() {
        let service = TestService::start();
        let app = app!(service);

        let payload = PayloadFactory::firing(&["DiskFull", "HighLoad"]);
        let req = test::TestRequest::post()
            .uri("/webhook")
            .set_json(PayloadFactory::json(&payload))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("server").unwrap(), "wake-me-up");
        let body = test::read_body(resp).await;
        assert_eq!(body, "OK");
        assert_eq!(service.state.store.len(), 2);

        service.stop().await;
    }

    #[actix_web::test]
    async fn test_webhook_accepts_alertmanager_json() {
        let service = TestService::start();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/webhook")
            .set_json(json!({
                "version": "4",
                "groupKey": "{}:{alertname=\"InstanceDown\"}",
                "status": "firing",
                "receiver": "wake-me-up",
                "groupLabels": {"alertname": "InstanceDown"},
                "commonLabels": {"alertname": "InstanceDown"},
                "commonAnnotations": {},
                "externalURL": "http://alertmanager:9093",
                "truncatedAlerts": 0,
                "alerts": [{
                    "status": "firing",
                    "labels": {"alertname": "InstanceDown", "instance": "db-1"},
                    "annotations": {"summary": "db-1 down"},
                    "startsAt": "2024-03-01T10:00:00Z",
                    "endsAt": "0001-01-01T00:00:00Z",
                    "generatorURL": "http://prometheus:9090/graph",
                    "fingerprint": "a1b2c3"
                }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(service.state.store.has_unacknowledged_firing());

        service.stop().await;
    }

    #[actix_web::test]
    async fn test_webhook_rejects_malformed_json() {
        let service = TestService::start();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/webhook")
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload("{\"alerts\": [")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert!(service.state.store.is_empty());

        service.stop().await;
    }

    #[actix_web::test]
    async fn test_webhook_rejects_alert_without_start_time() {
        let service = TestService::start();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/webhook")
            .set_json(json!({"status": "firing", "alerts": [{"status": "firing"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        service.stop().await;
    }

    #[actix_web::test]
    async fn test_acknowledge_flow() {
        let service = TestService::start();
        let app = app!(service);
        service
            .state
            .store
            .ingest(PayloadFactory::firing(&["DiskFull"]));

        let req = test::TestRequest::get().uri("/status").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"hasUnacknowledged": true}));

        let req = test::TestRequest::get().uri("/api/alerts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["alerts"][0]["id"].as_str().unwrap().to_string();
        assert_eq!(body["alerts"][0]["isAcknowledged"], false);

        let req = test::TestRequest::post()
            .uri(&format!("/acknowledge?id={}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/status").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"hasUnacknowledged": false}));

        let req = test::TestRequest::get().uri("/api/alerts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["alerts"][0]["isAcknowledged"], true);
        assert_eq!(body["hasUnacknowledged"], false);

        service.stop().await;
    }

    #[actix_web::test]
    async fn test_acknowledge_requires_id() {
        let service = TestService::start();
        let app = app!(service);

        for uri in ["/acknowledge", "/acknowledge?id=", "/acknowledge?id=%20"] {
            let req = test::TestRequest::post().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }

        service.stop().await;
    }

    #[actix_web::test]
    async fn test_acknowledge_unknown_id_is_ok() {
        let service = TestService::start();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/acknowledge?id=no-such-alert")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        service.stop().await;
    }

    #[actix_web::test]
    async fn test_clear_reports_count() {
        let service = TestService::start();
        let app = app!(service);
        let store = service.state.store.clone();
        store.ingest(PayloadFactory::firing(&["A", "B"]));
        store.ingest(PayloadFactory::resolved(&["B"]));

        let req = test::TestRequest::post().uri("/clear").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "Cleared 1 alerts");
        assert_eq!(store.len(), 1);

        service.stop().await;
    }

    #[actix_web::test]
    async fn test_health_and_version() {
        let service = TestService::start();
        let app = app!(service);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["alerts"], 0);
        assert_eq!(body["alarm"]["looping"], false);
        assert_eq!(body["alarm"]["player"], "fake");

        let req = test::TestRequest::get().uri("/version").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["git_hash"].is_string());

        service.stop().await;
    }

    #[actix_web::test]
    async fn test_sound_missing_file_is_404() {
        let config = Config::from_yaml("alarm:\n  sound_file: /nonexistent/alarm.wav\n").unwrap();
        let service = TestService::with_config(config);
        let app = app!(service);

        let req = test::TestRequest::get().uri("/sound").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        service.stop().await;
    }

    #[actix_web::test]
    async fn test_sound_served_with_content_type() {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        file.write_all(b"ID3fake-mp3-bytes").unwrap();
        let yaml = format!("alarm:\n  sound_file: {}\n", file.path().display());
        let service = TestService::with_config(Config::from_yaml(&yaml).unwrap());
        let app = app!(service);

        let req = test::TestRequest::get().uri("/sound").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "audio/mpeg");
        let body = test::read_body(resp).await;
        assert_eq!(body, "ID3fake-mp3-bytes");

        service.stop().await;
    }
}
