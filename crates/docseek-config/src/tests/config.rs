use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok, some};
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let _temp = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.service.host.as_str(), eq(crate::DEFAULT_HOST));
    assert_that!(config.service.port, eq(crate::DEFAULT_PORT));
    assert_that!(config.service.workers, eq(crate::DEFAULT_WORKERS));
    assert_that!(config.service.auto_start, eq(true));
    assert_that!(config.supervisor.max_health_attempts, eq(15));
    assert_that!(config.supervisor.probe_timeout_secs, eq(5));
    assert!(config.supervisor.start_wait().is_none());
    assert!(config.launch.executable.is_none());
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join(crate::CONFIG_FILENAME),
        r#"
            [service]
            port = 9100
            workers = 4
            auto_start = false

            [launch]
            interpreter = "/opt/python/bin/python3"
            entry_script = "backend/server.py"

            [timeouts]
            search_secs = 10
        "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.service.port, eq(9100));
    assert_that!(config.service.workers, eq(4));
    assert_that!(config.service.auto_start, eq(false));
    assert_that!(
        config.launch.interpreter.as_deref(),
        some(eq("/opt/python/bin/python3"))
    );
    assert_that!(config.launch.entry_script.as_str(), eq("backend/server.py"));
    assert_that!(config.timeouts.search_secs, eq(10));
    // Untouched sections keep their defaults
    assert_that!(config.timeouts.index_secs, eq(crate::DEFAULT_INDEX_TIMEOUT_SECS));
}

#[test]
#[serial]
fn given_missing_config_dir_when_load_then_dir_is_created() {
    // Given
    let temp = tempfile::TempDir::new().unwrap();
    let nested = temp.path().join("nested").join("docseek");
    let _guard = EnvGuard::set(crate::CONFIG_DIR_ENV, nested.to_str().unwrap());

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    assert!(nested.exists());
}

// =========================================================================
// Error Path Tests
// =========================================================================

#[test]
#[serial]
fn given_malformed_toml_when_load_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join(crate::CONFIG_FILENAME),
        "[service\nport = nope",
    )
    .unwrap();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_absolute_log_dir_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let mut config = Config::load().unwrap();
    config.logging.dir = String::from("/var/log/docseek");

    // When
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
fn given_zero_max_log_files_when_validate_then_error() {
    // Given
    let mut config = Config::default();
    config.logging.max_files = 0;

    // When
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

// =========================================================================
// Environment Override Tests
// =========================================================================

#[test]
#[serial]
fn given_env_overrides_when_load_then_env_wins_over_defaults() {
    // Given
    let _temp = setup_config_dir();
    let _port = EnvGuard::set("DOCSEEK_SERVICE_PORT", "9200");
    let _workers = EnvGuard::set("DOCSEEK_SERVICE_WORKERS", "3");
    let _auto = EnvGuard::set("DOCSEEK_SERVICE_AUTO_START", "0");
    let _interp = EnvGuard::set("DOCSEEK_INTERPRETER", "/usr/local/bin/python3");
    let _level = EnvGuard::set("DOCSEEK_LOG_LEVEL", "debug");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.service.port, eq(9200));
    assert_that!(config.service.workers, eq(3));
    assert_that!(config.service.auto_start, eq(false));
    assert_that!(
        config.launch.interpreter.as_deref(),
        some(eq("/usr/local/bin/python3"))
    );
    assert_that!(*config.logging.level, eq(log::LevelFilter::Debug));
}

#[test]
#[serial]
fn given_unparseable_env_port_when_load_then_default_kept() {
    // Given
    let _temp = setup_config_dir();
    let _port = EnvGuard::set("DOCSEEK_SERVICE_PORT", "not-a-port");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.service.port, eq(crate::DEFAULT_PORT));
}

#[test]
#[serial]
fn given_explicit_service_dir_when_service_dir_then_used_verbatim() {
    // Given
    let _temp = setup_config_dir();
    let _dir = EnvGuard::set("DOCSEEK_SERVICE_DIR", "/opt/docseek/service");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_eq!(
        config.service_dir().unwrap(),
        std::path::PathBuf::from("/opt/docseek/service")
    );
}

#[test]
#[serial]
fn given_start_wait_env_when_load_then_bound_is_set() {
    // Given
    let _temp = setup_config_dir();
    let _wait = EnvGuard::set("DOCSEEK_START_WAIT_SECS", "90");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.supervisor.start_wait_secs, some(eq(90)));
    assert_that!(config.validate(), ok(anything()));
}

#[test]
fn given_zero_start_wait_when_validate_then_error() {
    let mut config = Config::default();
    config.supervisor.start_wait_secs = Some(0);

    assert_that!(config.validate(), err(anything()));
}
