//! floatlink.kdl の発見ロジック
//!
//! 環境変数 → 上方向探索 → グローバル設定の順に探す。

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 設定ファイル名
pub const CONFIG_FILENAME: &str = "floatlink.kdl";

/// 設定ファイルを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "FLOATLINK_CONFIG_PATH";

/// floatlink.kdl を探す
///
/// 検索順序:
/// 1. FLOATLINK_CONFIG_PATH 環境変数
/// 2. カレントディレクトリから上方向探索
/// 3. ~/.config/floatlink/floatlink.kdl
#[tracing::instrument]
pub fn find_config() -> Result<PathBuf> {
    if let Ok(path_str) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(&path_str);
        debug!(env_path = %path_str, "Checking FLOATLINK_CONFIG_PATH");
        if path.exists() {
            info!(config_path = %path.display(), "Found config from environment variable");
            return Ok(path);
        }
        warn!(env_path = %path_str, "FLOATLINK_CONFIG_PATH is set but file does not exist");
    }

    let start_dir = std::env::current_dir()?;
    if let Some(path) = find_config_from(&start_dir) {
        return Ok(path);
    }

    if let Some(global) = global_config_path().filter(|p| p.exists()) {
        info!(config_path = %global.display(), "Using global config");
        return Ok(global);
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// 指定ディレクトリから上方向に floatlink.kdl を探す
pub fn find_config_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    debug!(start_dir = %start_dir.display(), "Searching for {}", CONFIG_FILENAME);

    loop {
        let config_file = current.join(CONFIG_FILENAME);
        if config_file.exists() {
            info!(config_path = %config_file.display(), "Found config file");
            return Some(config_file);
        }

        if !current.pop() {
            break;
        }
    }

    debug!("Config file not found");
    None
}

/// ~/.config/floatlink/floatlink.kdl
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("floatlink").join(CONFIG_FILENAME))
}

/// 設定ファイルのあるディレクトリ (state の置き場所)
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}
