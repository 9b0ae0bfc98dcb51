//! Configuration files on disk

#[cfg(test)]
mod tests {
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wake_me_up::AppError;
    use wake_me_up::config::Config;

    fn write(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_legacy_flat_config() {
        let file = write(
            r#"
listen_port: "9093"
log_level: "debug"
sound_effect_file_path: "sounds/siren.mp3"
"#,
        );

        let config = crate::assert_ok!(Config::from_file(file.path()).await);
        assert_eq!(config.server().port, 9093);
        assert_eq!(config.logging().level, "debug");
        assert_eq!(config.alarm().sound_file, "sounds/siren.mp3");
        assert_eq!(config.alerts().max_size, 100);
    }

    #[tokio::test]
    async fn test_full_config() {
        let file = write(
            r#"
server:
  host: 127.0.0.1
  port: 8181
  workers: 2
logging:
  level: warn
  json: true
alerts:
  max_size: 25
alarm:
  enabled: false
  sound_file: /srv/alarm.ogg
  interval_ms: 2500
  player: paplay
hub:
  buffer_size: 32
  ping_interval_secs: 10
  pong_timeout_secs: 15
"#,
        );

        let config = crate::assert_ok!(Config::from_file(file.path()).await);
        assert_eq!(config.server().address(), "127.0.0.1:8181");
        assert_eq!(config.server().workers, Some(2));
        assert!(config.logging().json);
        assert_eq!(config.alerts().max_size, 25);
        assert!(!config.alarm().enabled);
        assert_eq!(config.alarm().player.as_deref(), Some("paplay"));
        assert_eq!(config.hub().buffer_size, 32);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let file = write("hub:\n  ping_interval_secs: 60\n  pong_timeout_secs: 30\n");

        let err = crate::assert_err!(Config::from_file(file.path()).await);
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("pong_timeout_secs"));
    }

    #[tokio::test]
    async fn test_checked_config_prints_back() {
        let file = write("listen_port: 9000\n");
        let config = crate::assert_ok!(Config::from_file(file.path()).await);

        let yaml = crate::assert_ok!(config.to_yaml());
        let reparsed = crate::assert_ok!(Config::from_yaml(&yaml));
        assert_eq!(reparsed.server().port, 9000);
    }
}
