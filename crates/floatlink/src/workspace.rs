//! 設定ファイルからプロバイダーと state を組み立てる

use floatlink_cloud::{ProviderContext, StateManager};
use floatlink_config::{LoadedConfig, ProviderConfig};
use floatlink_openstack::{OpenStackCatalog, OpenStackConfig, RegionEndpoints};
use std::sync::Arc;

pub struct Workspace {
    pub loaded: LoadedConfig,
    pub ctx: ProviderContext,
}

impl Workspace {
    pub fn open() -> anyhow::Result<Self> {
        let loaded = floatlink_config::load_config()?;
        let ctx = provider_context(&loaded.config.provider)?;

        tracing::debug!(
            config_path = %loaded.path.display(),
            provider = ?ctx,
            "Opened workspace"
        );
        Ok(Self { loaded, ctx })
    }

    /// state は設定ファイルと同じディレクトリの .floatlink/ に置く
    pub fn state_manager(&self) -> StateManager {
        StateManager::new(self.loaded.root())
    }
}

fn provider_context(provider: &ProviderConfig) -> anyhow::Result<ProviderContext> {
    let config = OpenStackConfig {
        token: provider.resolve_token().unwrap_or_default(),
        network_endpoint: provider.network_endpoint.clone(),
        load_balancer_endpoint: provider.load_balancer_endpoint.clone(),
        use_octavia: provider.use_octavia,
        regions: provider
            .endpoints
            .iter()
            .map(|(region, e)| {
                (
                    region.clone(),
                    RegionEndpoints {
                        network: e.network.clone(),
                        load_balancer: e.load_balancer.clone(),
                    },
                )
            })
            .collect(),
    };
    let catalog = OpenStackCatalog::new(config)?;

    let mut ctx = ProviderContext::new(Arc::new(catalog));
    if let Some(region) = &provider.region {
        ctx = ctx.with_default_region(region.clone());
    }
    Ok(ctx)
}
