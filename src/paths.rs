//! XDG-compliant path resolution for configuration files.
//!
//! Config and `.env` files are looked up in an explicit override, the current
//! directory and the XDG config directory, in that order.

use anyhow::{Result, bail};
use std::env;
use std::path::{Path, PathBuf};

use crate::constants::config::{APP_DIR, CONFIG_FILE, CONFIG_PATH_ENV, LOCAL_CONFIG_FILE};

/// Find the config file.
/// Priority:
/// 1. `GITAPI_CONFIG` from environment (if set, it must exist)
/// 2. Current directory/gitapi.toml
/// 3. XDG_CONFIG_HOME/gitapi/config.toml (if XDG_CONFIG_HOME is set)
/// 4. ~/.config/gitapi/config.toml
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(&config_path);
        if path.exists() {
            return Ok(path);
        }
        bail!("{} points to a missing file: {}", CONFIG_PATH_ENV, config_path);
    }

    if let Ok(current_dir) = env::current_dir() {
        let local = current_dir.join(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Ok(local);
        }
    }

    for dir in config_dirs() {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    bail!(
        "No config file found. Create {} or set {}",
        default_config_path().display(),
        CONFIG_PATH_ENV
    )
}

/// Where the config file is expected when none exists yet.
pub fn default_config_path() -> PathBuf {
    config_dirs()
        .into_iter()
        .next()
        .map(|dir| dir.join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
}

/// Application config directories, most specific first.
fn config_dirs() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.is_empty()
    {
        candidates.push(PathBuf::from(xdg_config_home).join(APP_DIR));
    }
    if let Some(home) = dirs::home_dir() {
        let default = home.join(".config").join(APP_DIR);
        if !candidates.contains(&default) {
            candidates.push(default);
        }
    }
    candidates
}

/// Load `.env` files into the process environment.
///
/// The current directory wins; the directory of `config_path` (when given)
/// fills in variables not already set.
pub fn load_env_file(config_path: Option<&Path>) {
    let local = PathBuf::from(".env");
    if local.exists() {
        let _ = dotenv::from_path(&local);
    }

    if let Some(dir) = config_path.and_then(Path::parent) {
        let beside_config = dir.join(".env");
        if beside_config.exists() && beside_config != local {
            let _ = dotenv::from_path(&beside_config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_find_config_file_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, "").unwrap();

        unsafe {
            env::set_var(CONFIG_PATH_ENV, &config_path);
        }
        let found = find_config_file();
        unsafe {
            env::remove_var(CONFIG_PATH_ENV);
        }

        assert_eq!(found.unwrap(), config_path);
    }

    #[test]
    #[serial]
    fn test_find_config_file_env_override_missing_file() {
        unsafe {
            env::set_var(CONFIG_PATH_ENV, "/nonexistent/gitapi.toml");
        }
        let err = find_config_file().unwrap_err();
        unsafe {
            env::remove_var(CONFIG_PATH_ENV);
        }

        assert!(err.to_string().contains("points to a missing file"));
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_xdg_home() {
        let work_dir = TempDir::new().unwrap();
        let xdg_dir = TempDir::new().unwrap();
        let app_dir = xdg_dir.path().join(APP_DIR);
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(app_dir.join(CONFIG_FILE), "").unwrap();

        let original_dir = env::current_dir().unwrap();
        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        env::set_current_dir(work_dir.path()).unwrap();
        unsafe {
            env::remove_var(CONFIG_PATH_ENV);
            env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
        }

        let from_xdg = find_config_file();
        fs::write(work_dir.path().join(LOCAL_CONFIG_FILE), "").unwrap();
        let from_cwd = find_config_file();

        env::set_current_dir(&original_dir).unwrap();
        unsafe {
            match original_xdg {
                Some(xdg) => env::set_var("XDG_CONFIG_HOME", xdg),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        assert_eq!(from_xdg.unwrap(), app_dir.join(CONFIG_FILE));
        assert_eq!(
            from_cwd.unwrap().file_name().unwrap(),
            LOCAL_CONFIG_FILE
        );
    }

    #[test]
    #[serial]
    fn test_default_config_path_uses_xdg_home() {
        let original_xdg = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "/tmp/xdg");
        }

        let path = default_config_path();

        unsafe {
            match original_xdg {
                Some(xdg) => env::set_var("XDG_CONFIG_HOME", xdg),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
        assert_eq!(path, PathBuf::from("/tmp/xdg/gitapi/config.toml"));
    }

    #[test]
    #[serial]
    fn test_load_env_file_beside_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".env"), "GITAPI_PATHS_TEST=loaded").unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);

        unsafe {
            env::remove_var("GITAPI_PATHS_TEST");
        }
        load_env_file(Some(&config_path));

        assert_eq!(env::var("GITAPI_PATHS_TEST").unwrap(), "loaded");
        unsafe {
            env::remove_var("GITAPI_PATHS_TEST");
        }
    }

    #[test]
    #[serial]
    fn test_load_env_file_handles_missing_file() {
        let work_dir = TempDir::new().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(work_dir.path()).unwrap();
        unsafe {
            env::remove_var("GITAPI_PATHS_TEST");
        }

        load_env_file(Some(&work_dir.path().join(CONFIG_FILE)));
        let loaded = env::var("GITAPI_PATHS_TEST");

        env::set_current_dir(&original_dir).unwrap();
        assert!(loaded.is_err());
    }

    #[test]
    #[serial]
    fn test_load_env_file_current_directory_wins() {
        let work_dir = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();
        fs::write(work_dir.path().join(".env"), "GITAPI_PATHS_TEST=local").unwrap();
        fs::write(config_dir.path().join(".env"), "GITAPI_PATHS_TEST=beside").unwrap();

        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(work_dir.path()).unwrap();
        unsafe {
            env::remove_var("GITAPI_PATHS_TEST");
        }

        load_env_file(Some(&config_dir.path().join(CONFIG_FILE)));
        let loaded = env::var("GITAPI_PATHS_TEST");

        env::set_current_dir(&original_dir).unwrap();
        unsafe {
            env::remove_var("GITAPI_PATHS_TEST");
        }
        assert_eq!(loaded.unwrap(), "local");
    }
}
