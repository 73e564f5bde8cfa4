use crate::service::{BUNDLED_EXECUTABLE, LaunchResolver, SERVICE_DIR_ENV, ServiceError};
use crate::tests::TEST_PORT;

use std::path::{Path, PathBuf};

use docseek_config::Config;
use googletest::assert_that;
use googletest::prelude::eq;
use tempfile::TempDir;

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
    std::fs::write(&path, b"").unwrap();
    path
}

fn resolver(service_dir: &Path) -> LaunchResolver {
    // Empty PATH so the host's interpreters never leak into a test
    LaunchResolver::new("127.0.0.1", TEST_PORT, service_dir)
        .with_search_path(Some(service_dir.join("no-such-bin").into_os_string()))
}

#[test]
fn given_configured_executable_when_resolve_then_used_with_host_port_workers() {
    // Given
    let service_dir = TempDir::new().unwrap();
    let resolver = resolver(service_dir.path())
        .with_workers(3)
        .with_executable(Some(PathBuf::from("/opt/docseek/bin/service")));

    // When
    let command = resolver.resolve().unwrap();

    // Then
    assert_eq!(command.program, PathBuf::from("/opt/docseek/bin/service"));
    assert_eq!(
        command.args,
        vec![
            "--host".to_string(),
            "127.0.0.1".to_string(),
            "--port".to_string(),
            TEST_PORT.to_string(),
            "--workers".to_string(),
            "3".to_string(),
        ]
    );
    assert_eq!(command.current_dir, service_dir.path().to_path_buf());
    assert_eq!(
        command.env,
        vec![(
            SERVICE_DIR_ENV.to_string(),
            service_dir.path().display().to_string()
        )]
    );
}

#[test]
fn given_bundled_executable_when_resolve_then_preferred_over_interpreter() {
    // Given
    let service_dir = TempDir::new().unwrap();
    let bundle_dir = TempDir::new().unwrap();
    let bundled = touch(bundle_dir.path(), BUNDLED_EXECUTABLE);
    let resolver = resolver(service_dir.path())
        .with_bundle_dir(Some(bundle_dir.path().to_path_buf()))
        .with_interpreter(Some(PathBuf::from("/usr/bin/python3")));

    // When
    let command = resolver.resolve().unwrap();

    // Then
    assert_eq!(command.program, bundled);
    assert_that!(command.args[0].as_str(), eq("--host"));
}

#[test]
fn given_no_bundle_when_resolve_then_configured_interpreter_runs_entry_script() {
    // Given
    let service_dir = TempDir::new().unwrap();
    let bundle_dir = TempDir::new().unwrap();
    let resolver = resolver(service_dir.path())
        .with_bundle_dir(Some(bundle_dir.path().to_path_buf()))
        .with_interpreter(Some(PathBuf::from("/usr/local/bin/python3.12")));

    // When
    let command = resolver.resolve().unwrap();

    // Then
    assert_eq!(command.program, PathBuf::from("/usr/local/bin/python3.12"));
    let script = service_dir.path().join("service/main.py");
    assert_that!(command.args[0], eq(&script.display().to_string()));
    assert_that!(command.args[1].as_str(), eq("--host"));
}

#[test]
fn given_interpreter_on_path_when_resolve_then_discovered() {
    // Given
    let service_dir = TempDir::new().unwrap();
    let bin_dir = TempDir::new().unwrap();
    let python = touch(bin_dir.path(), "python");
    let resolver = LaunchResolver::new("127.0.0.1", TEST_PORT, service_dir.path())
        .with_search_path(Some(bin_dir.path().as_os_str().to_owned()));

    // When
    let command = resolver.resolve().unwrap();

    // Then
    assert_eq!(command.program, python);
}

#[test]
fn given_python3_and_python_on_path_when_resolve_then_python3_wins() {
    // Given
    let service_dir = TempDir::new().unwrap();
    let bin_dir = TempDir::new().unwrap();
    touch(bin_dir.path(), "python");
    let python3 = touch(bin_dir.path(), "python3");
    let resolver = LaunchResolver::new("127.0.0.1", TEST_PORT, service_dir.path())
        .with_search_path(Some(bin_dir.path().as_os_str().to_owned()));

    // When
    let command = resolver.resolve().unwrap();

    // Then
    assert_eq!(command.program, python3);
}

#[test]
fn given_absolute_entry_script_when_resolve_then_not_joined() {
    // Given
    let service_dir = TempDir::new().unwrap();
    let resolver = resolver(service_dir.path())
        .with_interpreter(Some(PathBuf::from("python3")))
        .with_entry_script("/srv/docseek/run.py");

    // When
    let command = resolver.resolve().unwrap();

    // Then
    assert_that!(command.args[0].as_str(), eq("/srv/docseek/run.py"));
}

#[test]
fn given_nothing_launchable_when_resolve_then_spawn_failure() {
    // Given
    let service_dir = TempDir::new().unwrap();
    let resolver = resolver(service_dir.path());

    // When
    let result = resolver.resolve();

    // Then
    assert!(matches!(result, Err(ServiceError::SpawnFailure { .. })));
}

#[test]
fn given_config_when_from_config_then_service_settings_applied() {
    // Given
    let service_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.service.port = 9100;
    config.service.workers = 4;
    config.launch.executable = Some(String::from("/opt/docseek/bin/service"));

    // When
    let resolver = LaunchResolver::from_config(&config, service_dir.path().to_path_buf());
    let command = resolver.resolve().unwrap();

    // Then
    assert_that!(resolver.port(), eq(9100));
    assert!(command.args.windows(2).any(|w| w[0] == "--workers" && w[1] == "4"));
    assert!(command.args.windows(2).any(|w| w[0] == "--port" && w[1] == "9100"));
}
