//! Load balancer API client
//!
//! Speaks either Octavia (`/v2/lbaas`) or the legacy neutron-lbaas extension
//! (`/v2.0/lbaas`). The response shapes are the same.

use crate::client::ApiClient;
use crate::error::Result;
use async_trait::async_trait;
use floatlink_cloud::{LoadBalancer, LoadBalancerLookup};
use serde::Deserialize;

/// Which load balancer API an endpoint serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LbaasFlavor {
    #[default]
    Octavia,
    Neutron,
}

impl LbaasFlavor {
    pub fn from_octavia_flag(use_octavia: bool) -> Self {
        if use_octavia {
            LbaasFlavor::Octavia
        } else {
            LbaasFlavor::Neutron
        }
    }

    fn service(&self) -> &'static str {
        match self {
            LbaasFlavor::Octavia => "octavia",
            LbaasFlavor::Neutron => "neutron-lbaas",
        }
    }

    fn collection_path(&self) -> &'static [&'static str] {
        match self {
            LbaasFlavor::Octavia => &["v2", "lbaas", "loadbalancers"],
            LbaasFlavor::Neutron => &["v2.0", "lbaas", "loadbalancers"],
        }
    }
}

/// Load balancer API client
#[derive(Clone)]
pub struct LoadBalancerClient {
    api: ApiClient,
    flavor: LbaasFlavor,
}

impl LoadBalancerClient {
    pub fn new(
        client: reqwest::Client,
        endpoint: &str,
        token: &str,
        flavor: LbaasFlavor,
    ) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(client, flavor.service(), endpoint, token)?,
            flavor,
        })
    }

    pub async fn load_balancers_by_vip_port(&self, port_id: &str) -> Result<Vec<LoadBalancer>> {
        let lbs: Vec<ApiLoadBalancer> = self
            .api
            .list_all(
                self.flavor.collection_path(),
                &[("vip_port_id", port_id)],
                "loadbalancers",
            )
            .await?;

        tracing::debug!(
            service = self.flavor.service(),
            port_id = %port_id,
            count = lbs.len(),
            "Listed load balancers"
        );

        Ok(lbs.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LoadBalancerLookup for LoadBalancerClient {
    async fn list_by_vip_port(&self, port_id: &str) -> floatlink_cloud::Result<Vec<LoadBalancer>> {
        Ok(self.load_balancers_by_vip_port(port_id).await?)
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiLoadBalancer {
    id: String,
    #[serde(default)]
    vip_port_id: String,
    #[serde(default)]
    vip_address: String,
}

impl From<ApiLoadBalancer> for LoadBalancer {
    fn from(lb: ApiLoadBalancer) -> Self {
        LoadBalancer {
            id: lb.id,
            vip_port_id: lb.vip_port_id,
            vip_address: lb.vip_address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_paths() {
        assert_eq!(
            LbaasFlavor::from_octavia_flag(true).collection_path().join("/"),
            "v2/lbaas/loadbalancers"
        );
        assert_eq!(
            LbaasFlavor::from_octavia_flag(false).collection_path().join("/"),
            "v2.0/lbaas/loadbalancers"
        );
    }
}
