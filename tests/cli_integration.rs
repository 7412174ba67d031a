//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

use lead_console::api::LeadStatus;
use lead_console::cli::{parse_args_from, Args, Command, LeadsCommand, UsersCommand};
use lead_console::config::Config;
use lead_console::listing::SortOrder;

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("lead-console")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert!(result.config.is_none());
    assert!(result.api_url.is_none());
    assert!(result.session_file.is_none());
    assert!(result.log_level.is_none());
    assert!(result.command.is_none());
    assert!(!result.help);
    assert!(!result.version);
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-c",
        "/etc/lead-console.json",
        "--api-url",
        "https://api.example.com",
        "--session-file",
        "/tmp/session.json",
        "--log-level",
        "debug",
        "leads",
        "list",
        "--sort",
        "oldest",
    ]))
    .unwrap();

    assert_eq!(result.config, Some(PathBuf::from("/etc/lead-console.json")));
    assert_eq!(result.api_url.as_deref(), Some("https://api.example.com"));
    assert_eq!(result.session_file, Some(PathBuf::from("/tmp/session.json")));
    assert_eq!(result.log_level.as_deref(), Some("debug"));
    assert_eq!(
        result.command,
        Some(Command::Leads(LeadsCommand::List {
            sort: SortOrder::Oldest,
            page: 1,
        }))
    );
}

#[test]
fn test_cli_lead_status_case_insensitive() {
    let result = parse_args_from(args(&["leads", "status", "42", "under-review"])).unwrap();
    assert_eq!(
        result.command,
        Some(Command::Leads(LeadsCommand::Status {
            id: "42".into(),
            status: LeadStatus::UnderReview,
        }))
    );
}

#[test]
fn test_cli_missing_arguments() {
    assert!(parse_args_from(args(&["leads"])).is_err());
    assert!(parse_args_from(args(&["leads", "status", "42"])).is_err());
    assert!(parse_args_from(args(&["users", "delete"])).is_err());
    assert!(parse_args_from(args(&["-u"])).is_err());
}

#[test]
fn test_cli_unknown_option() {
    assert!(parse_args_from(args(&["--port", "3000"])).is_err());
    assert!(parse_args_from(args(&["users", "list", "--all"])).is_err());
}

#[test]
fn test_cli_user_create_without_password() {
    let result = parse_args_from(args(&["users", "create", "ops"])).unwrap();
    assert!(matches!(
        result.command,
        Some(Command::Users(UsersCommand::Create { password: None, .. }))
    ));
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let json = r#"{
        "api": {
            "base_url": "https://leads.example.com",
            "connect_timeout_secs": 5
        },
        "session": {
            "file": "/var/lib/lead-console/session.json",
            "default_ttl": "12h"
        },
        "logging": {
            "level": "debug"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.api.base_url, "https://leads.example.com");
    assert_eq!(config.api.connect_timeout_secs, 5);
    assert_eq!(
        config.session.file,
        Some(PathBuf::from("/var/lib/lead-console/session.json"))
    );
    assert_eq!(config.session.default_ttl, "12h");
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_priority_cli_over_file() {
    let json = r#"{
        "api": { "base_url": "http://10.0.0.1:4000" },
        "logging": { "level": "info" }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        api_url: Some("http://192.168.1.1:4000".to_string()),
        log_level: Some("trace".to_string()),
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    assert_eq!(config.api.base_url, "http://192.168.1.1:4000");
    assert_eq!(config.logging.level, "trace");
}

#[test]
fn test_config_missing_file() {
    let args = Args {
        config: Some(PathBuf::from("/nonexistent/lead-console.json")),
        ..Args::default()
    };

    assert!(Config::load(&args).is_err());
}

#[test]
fn test_config_builds_api() {
    let dir = TempDir::new().unwrap();
    let args = Args {
        api_url: Some("http://127.0.0.1:4000".to_string()),
        session_file: Some(dir.path().join("session.json")),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    let api = config.admin_api(None).unwrap();

    let session = api.dispatcher().session();
    assert!(session.is_attached());
    assert!(!session.is_authenticated());

    session.set_token("tok", "1h");
    assert!(dir.path().join("session.json").exists());
}

// ============================================================================
// Configuration Serialization Tests
// ============================================================================

#[test]
fn test_config_roundtrip() {
    let original = Config::default();
    let json = serde_json::to_string(&original).unwrap();
    let loaded: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(original.api.base_url, loaded.api.base_url);
    assert_eq!(original.session.default_ttl, loaded.session.default_ttl);
}

#[test]
fn test_config_partial_deserialization() {
    let json = r#"{"session": {"default_ttl": "1d"}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.session.default_ttl, "1d");
    assert_eq!(config.api.base_url, "http://localhost:4000"); // Default
    assert_eq!(config.api.connect_timeout_secs, 10); // Default
}
