use snooze::config::{CONFIG_ENV, Config, LISTEN_ENV, ServerConfig};
use std::time::Duration;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8000");
    assert_eq!(cfg.server.bind_attempts, 5);
    assert_eq!(cfg.server.bind_retry_delay_ms, 2000);
    assert_eq!(cfg.server.max_request_bytes, 8192);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn test_config_from_yaml() {
    let yaml = r#"
server:
  listen_addr: "0.0.0.0:9000"
  bind_attempts: 3
  bind_retry_delay_ms: 100
logging:
  level: debug
"#;

    let cfg = Config::from_yaml(yaml).unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:9000");
    assert_eq!(cfg.server.bind_attempts, 3);
    assert_eq!(cfg.server.bind_retry_delay_ms, 100);
    // Unset fields keep their defaults
    assert_eq!(cfg.server.bind_retry_max_delay_ms, 16_000);
    assert_eq!(cfg.logging.level, "debug");
}

#[test]
fn test_config_from_yaml_rejects_bad_types() {
    let yaml = "server:\n  bind_attempts: many\n";
    assert!(Config::from_yaml(yaml).is_err());
}

#[test]
fn test_retry_delay_backoff_is_capped() {
    let cfg = ServerConfig {
        bind_retry_delay_ms: 100,
        bind_retry_max_delay_ms: 500,
        ..ServerConfig::default()
    };

    assert_eq!(cfg.retry_delay(1), Duration::from_millis(100));
    assert_eq!(cfg.retry_delay(2), Duration::from_millis(200));
    assert_eq!(cfg.retry_delay(3), Duration::from_millis(400));
    assert_eq!(cfg.retry_delay(4), Duration::from_millis(500));
    assert_eq!(cfg.retry_delay(80), Duration::from_millis(500));
}

// The only test touching the process environment, so nothing races on it.
#[test]
fn test_config_load_from_env() {
    let path = std::env::temp_dir().join(format!("snooze-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "server:\n  listen_addr: \"127.0.0.1:7000\"\n").unwrap();

    unsafe {
        std::env::remove_var(LISTEN_ENV);
        std::env::remove_var(CONFIG_ENV);
    }
    assert_eq!(Config::load().unwrap().server.listen_addr, "127.0.0.1:8000");

    unsafe {
        std::env::set_var(CONFIG_ENV, &path);
    }
    assert_eq!(Config::load().unwrap().server.listen_addr, "127.0.0.1:7000");

    unsafe {
        std::env::set_var(LISTEN_ENV, "0.0.0.0:3000");
    }
    assert_eq!(Config::load().unwrap().server.listen_addr, "0.0.0.0:3000");

    unsafe {
        std::env::set_var(CONFIG_ENV, path.with_extension("missing"));
    }
    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var(LISTEN_ENV);
        std::env::remove_var(CONFIG_ENV);
    }
    let _ = std::fs::remove_file(&path);
}
