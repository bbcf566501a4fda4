//! floatlink.kdl の設定モデル

use floatlink_cloud::DesiredAssociation;
use std::collections::BTreeMap;

/// トークンのフォールバック先の環境変数
pub const TOKEN_ENV: &str = "OS_TOKEN";

/// floatlink.kdl 全体
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub project: Option<String>,
    pub provider: ProviderConfig,
    pub associations: Vec<DesiredAssociation>,
}

impl Config {
    pub fn association(&self, name: &str) -> Option<&DesiredAssociation> {
        self.associations.iter().find(|a| a.name == name)
    }
}

/// `provider "openstack" { ... }` ブロック
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: String,
    pub region: Option<String>,
    pub token: Option<String>,
    pub token_env: Option<String>,
    pub network_endpoint: Option<String>,
    pub load_balancer_endpoint: Option<String>,
    pub use_octavia: bool,
    /// リージョンごとのエンドポイント上書き
    pub endpoints: BTreeMap<String, EndpointOverride>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: "openstack".to_string(),
            region: None,
            token: None,
            token_env: None,
            network_endpoint: None,
            load_balancer_endpoint: None,
            use_octavia: false,
            endpoints: BTreeMap::new(),
        }
    }
}

impl ProviderConfig {
    /// token → token-env が指す環境変数 → OS_TOKEN の順で解決
    pub fn resolve_token(&self) -> Option<String> {
        if let Some(token) = self.token.as_ref().filter(|t| !t.is_empty()) {
            return Some(token.clone());
        }

        let from_env = |name: &str| std::env::var(name).ok().filter(|t| !t.is_empty());

        if let Some(token) = self.token_env.as_deref().and_then(from_env) {
            return Some(token);
        }
        from_env(TOKEN_ENV)
    }
}

/// `endpoint "RegionTwo" network="..." load-balancer="..."`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointOverride {
    pub network: Option<String>,
    pub load_balancer: Option<String>,
}
