use std::{collections::HashMap, fs, path::PathBuf};

use covershelf_config::{
    ConfigLoadError, CoverConfig, CoverConfigLoader, CoverConfigSource,
    loader::{CONFIG_JSON_ENV, CONFIG_PATH_ENV, COVER_ROOT_ENV},
};
use tempfile::tempdir;

fn loader_with(
    dir: &std::path::Path,
    vars: &[(&str, String)],
) -> CoverConfigLoader {
    let env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    CoverConfigLoader::new()
        .without_dotenv()
        .with_search_dir(dir)
        .with_env(move |key| env.get(key).cloned())
}

#[test]
fn falls_back_to_defaults_when_nothing_is_configured() {
    let dir = tempdir().unwrap();
    let load = loader_with(dir.path(), &[]).load().unwrap();

    assert_eq!(load.source, CoverConfigSource::Default);
    assert_eq!(load.config, CoverConfig::default());
    assert!(!load.cover_root_overridden);
}

#[test]
fn reads_partial_toml_from_the_search_dir() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("covershelf.toml");
    fs::write(&file, "cover_root = \"/srv/covers\"\njpeg_quality = 80\n")
        .unwrap();

    let load = loader_with(dir.path(), &[]).load().unwrap();

    assert_eq!(load.source, CoverConfigSource::File(file));
    assert_eq!(load.config.cover_root, PathBuf::from("/srv/covers"));
    assert_eq!(load.config.jpeg_quality, 80);
    assert_eq!(load.config.http_timeout_secs, 30);
}

#[test]
fn env_path_beats_inline_json_and_default_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("covershelf.toml"), "jpeg_quality = 10\n")
        .unwrap();
    let explicit = dir.path().join("explicit.json");
    fs::write(&explicit, r#"{"resize_concurrency": 3}"#).unwrap();

    let load = loader_with(
        dir.path(),
        &[
            (CONFIG_PATH_ENV, explicit.display().to_string()),
            (CONFIG_JSON_ENV, r#"{"jpeg_quality": 50}"#.to_string()),
        ],
    )
    .load()
    .unwrap();

    assert_eq!(load.source, CoverConfigSource::EnvPath(explicit));
    assert_eq!(load.config.resize_concurrency, Some(3));
    assert_eq!(load.config.jpeg_quality, 92);
}

#[test]
fn inline_json_beats_default_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("covershelf.toml"), "jpeg_quality = 10\n")
        .unwrap();

    let load = loader_with(
        dir.path(),
        &[(CONFIG_JSON_ENV, r#"{"proxy_ttl_secs": 60}"#.to_string())],
    )
    .load()
    .unwrap();

    assert_eq!(load.source, CoverConfigSource::EnvInline);
    assert_eq!(load.config.proxy_ttl_secs, 60);
    assert_eq!(load.config.jpeg_quality, 92);
}

#[test]
fn blank_env_values_are_ignored() {
    let dir = tempdir().unwrap();
    let load = loader_with(
        dir.path(),
        &[
            (CONFIG_PATH_ENV, "  ".to_string()),
            (COVER_ROOT_ENV, String::new()),
        ],
    )
    .load()
    .unwrap();

    assert_eq!(load.source, CoverConfigSource::Default);
    assert!(!load.cover_root_overridden);
}

#[test]
fn cover_root_env_overrides_any_source() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("covershelf.toml"), "cover_root = \"/a\"\n")
        .unwrap();

    let load =
        loader_with(dir.path(), &[(COVER_ROOT_ENV, "/b".to_string())])
            .load()
            .unwrap();

    assert_eq!(load.config.cover_root, PathBuf::from("/b"));
    assert!(load.cover_root_overridden);
}

#[test]
fn extensionless_files_try_toml_then_json() {
    let dir = tempdir().unwrap();
    let toml_file = dir.path().join("toml-config");
    fs::write(&toml_file, "jpeg_quality = 70\n").unwrap();
    let json_file = dir.path().join("json-config");
    fs::write(&json_file, r#"{"jpeg_quality": 71}"#).unwrap();

    let from_toml = CoverConfigLoader::load_from_file(&toml_file).unwrap();
    let from_json = CoverConfigLoader::load_from_file(&json_file).unwrap();

    assert_eq!(from_toml.jpeg_quality, 70);
    assert_eq!(from_json.jpeg_quality, 71);

    let err = CoverConfigLoader::parse_from_str("{{ nope", "inline")
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Unrecognized { .. }));
}

#[test]
fn missing_or_malformed_files_are_errors() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let err = loader_with(
        dir.path(),
        &[(CONFIG_PATH_ENV, missing.display().to_string())],
    )
    .load()
    .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Read { .. }), "{err}");

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();
    let err = CoverConfigLoader::load_from_file(&bad).unwrap_err();
    assert!(matches!(err, ConfigLoadError::Json { .. }), "{err}");
}

#[test]
fn invalid_values_fail_validation() {
    let dir = tempdir().unwrap();
    let err = loader_with(
        dir.path(),
        &[(CONFIG_JSON_ENV, r#"{"jpeg_quality": 0}"#.to_string())],
    )
    .load()
    .unwrap_err();

    assert!(matches!(err, ConfigLoadError::Invalid(_)), "{err}");
}
