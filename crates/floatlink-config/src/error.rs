use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "設定ファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリとその親ディレクトリ: floatlink.kdl\n\
        - ~/.config/floatlink/floatlink.kdl\n\
        または FLOATLINK_CONFIG_PATH 環境変数で直接指定できます"
    )]
    ConfigFileNotFound,

    #[error("KDL パースエラー: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("不正な設定: {0}")]
    InvalidConfig(String),

    #[error("association '{name}' に {field} が必要です")]
    MissingField { name: String, field: &'static str },

    #[error("association '{0}' が重複しています")]
    DuplicateAssociation(String),

    #[error("floating-ip '{floating_ip}' が association '{first}' と '{second}' で重複しています")]
    DuplicateFloatingIp {
        floating_ip: String,
        first: String,
        second: String,
    },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
