use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_sieve_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("SIEVE_API_KEY");
        env::remove_var("GOOGLE_API_KEY");
        env::remove_var("SIEVE_CORPUS_DIR");
        env::remove_var("SIEVE_CORPUS_EXTENSION");
        env::remove_var("SIEVE_TOP_K");
        env::remove_var("SIEVE_SIMILARITY_THRESHOLD");
        env::remove_var("SIEVE_MAX_CONCURRENCY");
        env::remove_var("SIEVE_EMBED_TIMEOUT_SECS");
        env::remove_var("SIEVE_SCORING_TIMEOUT_SECS");
        env::remove_var("SIEVE_EMBEDDING_MODEL");
        env::remove_var("SIEVE_EMBEDDING_DIM");
        env::remove_var("SIEVE_SCORING_MODEL");
        env::remove_var("SIEVE_API_BASE_URL");
        env::remove_var("SIEVE_CACHE_CAPACITY");
        env::remove_var("SIEVE_CACHE_PATH");
        env::remove_var("SIEVE_MAX_EMBED_CHARS");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.api_key.is_blank());
    assert_eq!(config.corpus_dir, PathBuf::from("./database"));
    assert_eq!(config.corpus_extension, "pdf");
    assert_eq!(config.top_k, 3);
    assert!((config.similarity_threshold - 0.70).abs() < f32::EPSILON);
    assert_eq!(config.max_concurrency, 4);
    assert_eq!(config.embedding_model, "models/text-embedding-004");
    assert_eq!(config.embedding_dim, 768);
    assert!(config.cache_path.is_none());
}

#[test]
fn test_api_key_debug_is_redacted() {
    let key = ApiKey::new("AIza-super-secret");
    let debug = format!("{:?}", key);
    assert!(!debug.contains("super-secret"));
    assert_eq!(debug, "ApiKey(***)");

    let config = Config {
        api_key: key,
        ..Default::default()
    };
    assert!(!format!("{:?}", config).contains("super-secret"));
}

#[test]
#[serial]
fn test_from_env_missing_api_key() {
    clear_sieve_env();

    let err = Config::from_env().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingEnvVar {
            name: "SIEVE_API_KEY"
        }
    ));
}

#[test]
#[serial]
fn test_from_env_blank_api_key() {
    clear_sieve_env();

    with_env_vars(&[("SIEVE_API_KEY", "   ")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_google_api_key_fallback() {
    clear_sieve_env();

    with_env_vars(&[("GOOGLE_API_KEY", "g-key")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.api_key.expose(), "g-key");
    });
}

#[test]
#[serial]
fn test_from_env_sieve_key_takes_precedence() {
    clear_sieve_env();

    with_env_vars(
        &[("GOOGLE_API_KEY", "g-key"), ("SIEVE_API_KEY", "s-key")],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.api_key.expose(), "s-key");
        },
    );
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_sieve_env();

    with_env_vars(&[("SIEVE_API_KEY", "k")], || {
        let config = Config::from_env().expect("should parse with defaults");
        assert_eq!(config.top_k, 3);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.embed_timeout, Duration::from_secs(30));
        assert_eq!(config.scoring_timeout, Duration::from_secs(120));
    });
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_sieve_env();

    with_env_vars(
        &[
            ("SIEVE_API_KEY", "k"),
            ("SIEVE_CORPUS_DIR", "/srv/proposals"),
            ("SIEVE_TOP_K", "5"),
            ("SIEVE_SIMILARITY_THRESHOLD", "0.85"),
            ("SIEVE_MAX_CONCURRENCY", "1"),
            ("SIEVE_EMBED_TIMEOUT_SECS", "5"),
            ("SIEVE_CACHE_PATH", "/tmp/sieve-cache.json"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.corpus_dir, PathBuf::from("/srv/proposals"));
            assert_eq!(config.top_k, 5);
            assert!((config.similarity_threshold - 0.85).abs() < f32::EPSILON);
            assert_eq!(config.max_concurrency, 1);
            assert_eq!(config.embed_timeout, Duration::from_secs(5));
            assert_eq!(
                config.cache_path,
                Some(PathBuf::from("/tmp/sieve-cache.json"))
            );
        },
    );
}

#[test]
#[serial]
fn test_from_env_invalid_top_k() {
    clear_sieve_env();

    with_env_vars(&[("SIEVE_API_KEY", "k"), ("SIEVE_TOP_K", "three")], || {
        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue { name, value, .. } => {
                assert_eq!(name, "SIEVE_TOP_K");
                assert_eq!(value, "three");
            }
            other => panic!("unexpected error: {other}"),
        }
    });
}

#[test]
#[serial]
fn test_from_env_empty_cache_path_is_none() {
    clear_sieve_env();

    with_env_vars(&[("SIEVE_API_KEY", "k"), ("SIEVE_CACHE_PATH", "  ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.cache_path.is_none());
    });
}

#[test]
fn test_validate_ok_for_testing_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_testing(dir.path());
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_missing_corpus_dir_is_allowed() {
    let config = Config::for_testing("/definitely/not/here");
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_blank_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        api_key: ApiKey::default(),
        ..Config::for_testing(dir.path())
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidSetting {
            field: "api_key",
            ..
        })
    ));
}

#[test]
fn test_validate_corpus_not_a_directory() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = Config::for_testing(file.path());
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_zero_top_k() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        top_k: 0,
        ..Config::for_testing(dir.path())
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidSetting { field: "top_k", .. })
    ));
}

#[test]
fn test_validate_threshold_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        similarity_threshold: 1.5,
        ..Config::for_testing(dir.path())
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_zero_concurrency() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        max_concurrency: 0,
        ..Config::for_testing(dir.path())
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_cache_path_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        cache_path: Some(dir.path().to_path_buf()),
        ..Config::for_testing(dir.path())
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidSetting {
            field: "cache_path",
            ..
        })
    ));
}

#[test]
fn test_with_corpus_dir() {
    let config = Config::default().with_corpus_dir("/tmp/corpus");
    assert_eq!(config.corpus_dir, PathBuf::from("/tmp/corpus"));
}
