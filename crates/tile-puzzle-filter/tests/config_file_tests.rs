//! Integration tests for JSON configuration files layered under env overrides.

use std::fs;
use std::path::PathBuf;

use tile_puzzle_core::{AdjacencyRule, PuzzleConfig};
use tile_puzzle_filter::{
    ENV_ADJACENCY, ENV_BLACK_SLOT, ENV_COLS, ENV_CONFIG_FILE, ENV_ROWS, FilterError,
    config_from_env, load_config_file,
};

fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "tile-puzzle-{}-{name}.json",
        std::process::id()
    ));
    fs::write(&path, contents).expect("config file should be writable");
    path
}

#[test]
fn config_file_tests_file_is_loaded_and_env_overrides_it() {
    let path = write_config(
        "layered",
        r#"{"rows": 3, "cols": 5, "black_slot": true, "adjacency": "row-wrap"}"#,
    );

    // Safety:
    // - The other test in this binary never reads the env.
    // - Variables are removed before returning.
    unsafe {
        for key in [ENV_ROWS, ENV_COLS, ENV_BLACK_SLOT, ENV_ADJACENCY] {
            std::env::remove_var(key);
        }
        std::env::set_var(ENV_CONFIG_FILE, &path);
    }
    let config = config_from_env().expect("file config should load");
    assert_eq!(
        config,
        PuzzleConfig::new(3, 5, true)
            .expect("config should be valid")
            .with_adjacency(AdjacencyRule::RowWrap)
    );

    unsafe {
        std::env::set_var(ENV_COLS, "7");
        std::env::set_var(ENV_BLACK_SLOT, "no");
    }
    let config = config_from_env().expect("overrides should apply");
    assert_eq!(config.rows, 3, "file value survives");
    assert_eq!(config.cols, 7, "env value wins");
    assert!(!config.black_slot);
    assert_eq!(config.adjacency, AdjacencyRule::RowWrap);

    let missing = path.with_extension("missing");
    unsafe { std::env::set_var(ENV_CONFIG_FILE, &missing) };
    assert!(matches!(
        config_from_env(),
        Err(FilterError::ConfigFile { path, .. }) if path == missing
    ));

    unsafe {
        for key in [ENV_CONFIG_FILE, ENV_COLS, ENV_BLACK_SLOT] {
            std::env::remove_var(key);
        }
    }
    fs::remove_file(&path).expect("config file should be removable");
}

#[test]
fn config_file_tests_malformed_file_is_a_config_error() {
    let path = write_config("malformed", r#"{"rows": 4, "shape": "hex"}"#);

    let result = load_config_file(&path);

    assert!(matches!(result, Err(FilterError::Config(_))));
    fs::remove_file(&path).expect("config file should be removable");
}
