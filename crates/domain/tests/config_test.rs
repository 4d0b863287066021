use ferrous_stub_domain::{CliOverrides, Config, ConfigError, ResolverConfig};
use std::time::Duration;

#[test]
fn test_config_default_values() {
    let config = Config::default();
    let resolver = &config.resolver;

    assert_eq!(resolver.servers, vec!["8.8.8.8", "1.1.1.1", "9.9.9.9"]);
    assert_eq!(resolver.timeout(), Duration::from_millis(5000));
    assert_eq!(resolver.cache_capacity, 32);
    assert_eq!(resolver.grace_period(), Duration::from_millis(50));
    assert_eq!(resolver.send_attempts, 10);
    assert_eq!(resolver.send_retry_delay(), Duration::from_millis(10));
    assert_eq!(resolver.inter_server_delay(), Duration::from_millis(1));
    assert_eq!(resolver.recv_poll_interval(), Duration::from_millis(5));
    assert_eq!(resolver.max_response_size, 512);
    assert!(resolver.use_system_resolver);
    assert!(!resolver.honor_ttl);
    assert!(!resolver.coalesce_inflight);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_empty_toml_gives_defaults() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config.resolver.cache_capacity, 32);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let toml_str = r#"
        [resolver]
        servers = ["192.168.1.1", "dns.example:5353"]
        timeout_ms = 1500
        honor_ttl = true

        [logging]
        level = "debug"
    "#;

    let config = Config::from_toml(toml_str).unwrap();

    assert_eq!(config.resolver.servers, vec!["192.168.1.1", "dns.example:5353"]);
    assert_eq!(config.resolver.timeout_ms, 1500);
    assert!(config.resolver.honor_ttl);
    assert_eq!(config.resolver.grace_period_ms, 50);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    let result = Config::from_toml("[resolver\ntimeout_ms = ");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_validate_rejects_zero_values() {
    let cases = [
        ResolverConfig {
            timeout_ms: 0,
            ..ResolverConfig::default()
        },
        ResolverConfig {
            cache_capacity: 0,
            ..ResolverConfig::default()
        },
        ResolverConfig {
            grace_period_ms: 0,
            ..ResolverConfig::default()
        },
        ResolverConfig {
            send_attempts: 0,
            ..ResolverConfig::default()
        },
    ];

    for resolver in cases {
        let config = Config {
            resolver,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }
}

#[test]
fn test_validate_rejects_bad_server() {
    let mut config = Config::default();
    config.resolver.servers.push("8.8.8.8:notaport".to_string());

    match config.validate() {
        Err(ConfigError::InvalidServer(server, _)) => assert_eq!(server, "8.8.8.8:notaport"),
        other => panic!("expected InvalidServer, got {:?}", other),
    }
}

#[test]
fn test_cli_overrides_win() {
    let path = std::env::temp_dir().join(format!("ferrous-stub-test-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "[resolver]\nservers = [\"10.0.0.1\"]\ntimeout_ms = 900\n",
    )
    .unwrap();

    let config = Config::load(
        path.to_str(),
        CliOverrides {
            servers: vec!["10.0.0.2".to_string()],
            timeout_ms: None,
            log_level: Some("trace".to_string()),
        },
    )
    .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.resolver.servers, vec!["10.0.0.2"]);
    assert_eq!(config.resolver.timeout_ms, 900);
    assert_eq!(config.logging.level, "trace");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = Config::load(Some("/nonexistent/ferrous-stub.toml"), CliOverrides::default());
    assert!(matches!(result, Err(ConfigError::FileRead(_, _))));
}

#[test]
fn test_save_and_reload() {
    let path = std::env::temp_dir().join(format!("ferrous-stub-save-{}.toml", std::process::id()));
    let path_str = path.to_str().unwrap();

    let mut config = Config::default();
    config.resolver.servers = vec!["[2001:db8::53]:53".to_string()];
    config.resolver.coalesce_inflight = true;
    config.save(path_str).unwrap();

    let reloaded = Config::from_file(path_str).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(reloaded.resolver.servers, config.resolver.servers);
    assert!(reloaded.resolver.coalesce_inflight);
}
