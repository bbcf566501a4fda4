//! floatlink の設定
//!
//! floatlink.kdl の発見とパース。

pub mod discovery;
pub mod error;
pub mod model;
pub mod parser;

pub use discovery::{CONFIG_FILENAME, CONFIG_PATH_ENV, find_config, find_config_from, project_root};
pub use error::*;
pub use model::{Config, EndpointOverride, ProviderConfig, TOKEN_ENV};
pub use parser::{parse_config, parse_config_file};

use std::path::{Path, PathBuf};

/// 読み込んだ設定とその場所
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: Config,
}

impl LoadedConfig {
    /// state を置くディレクトリ
    pub fn root(&self) -> &Path {
        project_root(&self.path).unwrap_or_else(|| Path::new("."))
    }
}

/// 設定ファイルを探して読み込む
pub fn load_config() -> Result<LoadedConfig> {
    let path = find_config()?;
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<LoadedConfig> {
    let config = parse_config_file(path)?;
    tracing::debug!(
        config_path = %path.display(),
        associations = config.associations.len(),
        "Loaded config"
    );
    Ok(LoadedConfig {
        path: path.to_path_buf(),
        config,
    })
}
