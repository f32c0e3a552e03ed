//! Configuration layering tests.

use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use toolsmith::ToolsmithConfig;

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn no_env() -> Option<config::Map<String, String>> {
    Some(config::Map::new())
}

#[test]
fn test_file_overrides_defaults() {
    let file = toml_file(
        r#"
[retry]
max_retries = 5

[quota]
daily_limit = 3
"#,
    );
    let config = ToolsmithConfig::load_from(&[], Some(file.path()), no_env()).unwrap();
    assert_eq!(config.retry().max_retries, 5);
    assert_eq!(config.retry().initial_delay_ms, 1000);
    assert_eq!(*config.quota().daily_limit(), Some(3));
}

#[test]
fn test_later_files_win() {
    let user = toml_file("[credits]\nstarting_balance = 50\n[local]\nux_delay_ms = 0\n");
    let project = toml_file("[credits]\nstarting_balance = 7\n");
    let config = ToolsmithConfig::load_from(
        &[user.path().to_path_buf(), project.path().to_path_buf()],
        None,
        no_env(),
    )
    .unwrap();
    assert_eq!(*config.credits().starting_balance(), 7);
    assert_eq!(*config.local().ux_delay_ms(), 0);
}

#[test]
fn test_environment_wins() {
    let file = toml_file("[remote]\nmodel = \"from-file\"\n");
    let env: config::Map<String, String> = [
        ("TOOLSMITH__REMOTE__MODEL".to_string(), "from-env".to_string()),
        ("TOOLSMITH__RETRY__MAX_RETRIES".to_string(), "1".to_string()),
    ]
    .into_iter()
    .collect();
    let config = ToolsmithConfig::load_from(&[], Some(file.path()), Some(env)).unwrap();
    assert_eq!(config.remote().model(), "from-env");
    assert_eq!(config.retry().max_retries, 1);
}

#[test]
fn test_missing_optional_file_is_ignored() {
    let missing = PathBuf::from("/nonexistent/toolsmith.toml");
    assert!(ToolsmithConfig::load_from(&[missing.clone()], None, no_env()).is_ok());
    assert!(ToolsmithConfig::load_from(&[], Some(&missing), no_env()).is_err());
}

#[test]
fn test_malformed_file_is_error() {
    let file = toml_file("[retry]\nmax_retries = \"many\"\n");
    let err = ToolsmithConfig::load_from(&[], Some(file.path()), no_env()).unwrap_err();
    assert!(err.to_string().contains("Configuration Error"));
}

#[test]
fn test_pipeline_config() {
    let file = toml_file("[local]\nux_delay_ms = 250\n");
    let config = ToolsmithConfig::load_from(&[], Some(file.path()), no_env()).unwrap();
    let pipeline = config.pipeline_config();
    assert_eq!(pipeline.local_ux_delay.as_millis(), 250);
    assert_eq!(pipeline.retry, *config.retry());
}
