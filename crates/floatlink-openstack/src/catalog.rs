//! OpenStack service catalog
//!
//! Maps a region to its Neutron and load balancer endpoints and builds a
//! fresh client handle per request.

use crate::error::{OpenStackError, Result};
use crate::lbaas::{LbaasFlavor, LoadBalancerClient};
use crate::neutron::NeutronClient;
use async_trait::async_trait;
use floatlink_cloud::{LoadBalancerLookup, NetworkingApi, ServiceCatalog};
use std::collections::HashMap;
use std::sync::Arc;

const USER_AGENT: &str = concat!("floatlink/", env!("CARGO_PKG_VERSION"));

/// Endpoint overrides for a single region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionEndpoints {
    pub network: Option<String>,
    pub load_balancer: Option<String>,
}

/// Connection settings for an OpenStack cloud
#[derive(Debug, Clone, Default)]
pub struct OpenStackConfig {
    /// Pre-issued Keystone token sent as `X-Auth-Token`
    pub token: String,
    pub network_endpoint: Option<String>,
    pub load_balancer_endpoint: Option<String>,
    pub use_octavia: bool,
    pub regions: HashMap<String, RegionEndpoints>,
}

impl OpenStackConfig {
    pub fn network_endpoint_for(&self, region: &str) -> Option<&str> {
        self.regions
            .get(region)
            .and_then(|r| r.network.as_deref())
            .or(self.network_endpoint.as_deref())
    }

    /// neutron-lbaas is served by Neutron itself, so the network endpoint
    /// stands in when no load balancer endpoint is configured.
    pub fn load_balancer_endpoint_for(&self, region: &str) -> Option<&str> {
        let explicit = self
            .regions
            .get(region)
            .and_then(|r| r.load_balancer.as_deref())
            .or(self.load_balancer_endpoint.as_deref());

        match (explicit, self.use_octavia) {
            (Some(endpoint), _) => Some(endpoint),
            (None, false) => self.network_endpoint_for(region),
            (None, true) => None,
        }
    }
}

/// OpenStack implementation of [`ServiceCatalog`]
pub struct OpenStackCatalog {
    config: OpenStackConfig,
    http: reqwest::Client,
}

impl OpenStackCatalog {
    pub fn new(config: OpenStackConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(OpenStackError::MissingToken);
        }

        // Requests carry no client timeout
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { config, http })
    }

    pub fn neutron(&self, region: &str) -> Result<NeutronClient> {
        let endpoint = self.config.network_endpoint_for(region).ok_or_else(|| {
            OpenStackError::MissingEndpoint {
                service: "network",
                region: region.to_string(),
            }
        })?;

        tracing::debug!(region = %region, endpoint = %endpoint, "Building Neutron client");
        NeutronClient::new(self.http.clone(), endpoint, &self.config.token)
    }

    pub fn load_balancer(&self, region: &str) -> Result<LoadBalancerClient> {
        let endpoint = self
            .config
            .load_balancer_endpoint_for(region)
            .ok_or_else(|| OpenStackError::MissingEndpoint {
                service: "load-balancer",
                region: region.to_string(),
            })?;
        let flavor = LbaasFlavor::from_octavia_flag(self.config.use_octavia);

        tracing::debug!(
            region = %region,
            endpoint = %endpoint,
            flavor = ?flavor,
            "Building load balancer client"
        );
        LoadBalancerClient::new(self.http.clone(), endpoint, &self.config.token, flavor)
    }
}

#[async_trait]
impl ServiceCatalog for OpenStackCatalog {
    fn name(&self) -> &str {
        "openstack"
    }

    async fn networking(&self, region: &str) -> floatlink_cloud::Result<Arc<dyn NetworkingApi>> {
        Ok(Arc::new(self.neutron(region)?))
    }

    async fn load_balancers(
        &self,
        region: &str,
    ) -> floatlink_cloud::Result<Arc<dyn LoadBalancerLookup>> {
        Ok(Arc::new(self.load_balancer(region)?))
    }
}

impl std::fmt::Debug for OpenStackCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenStackCatalog")
            .field("network_endpoint", &self.config.network_endpoint)
            .field("load_balancer_endpoint", &self.config.load_balancer_endpoint)
            .field("use_octavia", &self.config.use_octavia)
            .finish_non_exhaustive()
    }
}
