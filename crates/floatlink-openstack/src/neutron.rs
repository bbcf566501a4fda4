//! Neutron networking API client
//!
//! Ports and floating IPs (`/v2.0/ports`, `/v2.0/floatingips`).

use crate::client::ApiClient;
use crate::error::Result;
use async_trait::async_trait;
use floatlink_cloud::{
    CloudError, FixedIp, FloatingIp, FloatingIpLookup, FloatingIpUpdate, Lookup, Port,
    PortLookup, single_match,
};
use serde::{Deserialize, Serialize};

/// Neutron API client
#[derive(Clone)]
pub struct NeutronClient {
    api: ApiClient,
}

impl NeutronClient {
    pub fn new(client: reqwest::Client, endpoint: &str, token: &str) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(client, "neutron", endpoint, token)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.api.endpoint()
    }

    pub async fn port(&self, port_id: &str) -> Result<Port> {
        let response: PortResponse = self.api.get(&["v2.0", "ports", port_id]).await?;
        Ok(response.port.into())
    }

    /// List floating IPs holding `address`
    pub async fn floating_ips_by_address(&self, address: &str) -> Result<Vec<FloatingIp>> {
        let fips: Vec<ApiFloatingIp> = self
            .api
            .list_all(
                &["v2.0", "floatingips"],
                &[("floating_ip_address", address)],
                "floatingips",
            )
            .await?;
        Ok(fips.into_iter().map(Into::into).collect())
    }

    pub async fn floating_ip(&self, id: &str) -> Result<Option<FloatingIp>> {
        let response: Option<FloatingIpResponse> = self
            .api
            .get_optional(&["v2.0", "floatingips", id])
            .await?;
        Ok(response.map(|r| r.floatingip.into()))
    }

    pub async fn update(&self, id: &str, update: &FloatingIpUpdate) -> Result<FloatingIp> {
        let body = UpdateFloatingIpRequest {
            floatingip: UpdateFloatingIpBody {
                port_id: update.port_id.as_deref(),
                fixed_ip_address: update.fixed_ip.as_deref(),
            },
        };

        let response: FloatingIpResponse = self
            .api
            .put(&["v2.0", "floatingips", id], &body)
            .await?;
        Ok(response.floatingip.into())
    }
}

#[async_trait]
impl PortLookup for NeutronClient {
    async fn get_port(&self, port_id: &str) -> floatlink_cloud::Result<Port> {
        Ok(self.port(port_id).await?)
    }
}

#[async_trait]
impl FloatingIpLookup for NeutronClient {
    async fn resolve_id_by_address(&self, address: &str) -> floatlink_cloud::Result<String> {
        let ids = self
            .floating_ips_by_address(address)
            .await?
            .into_iter()
            .map(|f| f.id)
            .collect();
        single_match(address, ids)
    }

    async fn get_floating_ip(&self, id: &str) -> floatlink_cloud::Result<Lookup<FloatingIp>> {
        match self.floating_ip(id).await {
            Ok(Some(fip)) => Ok(Lookup::Found(fip)),
            Ok(None) => Ok(Lookup::Gone),
            Err(e) => Err(CloudError::from(e)),
        }
    }

    async fn update_floating_ip(
        &self,
        id: &str,
        update: &FloatingIpUpdate,
    ) -> floatlink_cloud::Result<FloatingIp> {
        Ok(self.update(id, update).await?)
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct PortResponse {
    port: ApiPort,
}

#[derive(Debug, Deserialize)]
struct ApiPort {
    id: String,
    #[serde(default)]
    fixed_ips: Vec<ApiFixedIp>,
}

#[derive(Debug, Deserialize)]
struct ApiFixedIp {
    ip_address: String,
    subnet_id: Option<String>,
}

impl From<ApiPort> for Port {
    fn from(p: ApiPort) -> Self {
        Port {
            id: p.id,
            fixed_ips: p
                .fixed_ips
                .into_iter()
                .map(|ip| FixedIp {
                    ip_address: ip.ip_address,
                    subnet_id: ip.subnet_id,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FloatingIpResponse {
    floatingip: ApiFloatingIp,
}

#[derive(Debug, Deserialize)]
struct ApiFloatingIp {
    id: String,
    floating_ip_address: String,
    port_id: Option<String>,
    fixed_ip_address: Option<String>,
    status: Option<String>,
    floating_network_id: Option<String>,
    router_id: Option<String>,
}

impl From<ApiFloatingIp> for FloatingIp {
    fn from(f: ApiFloatingIp) -> Self {
        FloatingIp {
            id: f.id,
            address: f.floating_ip_address,
            port_id: f.port_id,
            fixed_ip: f.fixed_ip_address,
            status: f.status,
            floating_network_id: f.floating_network_id,
            router_id: f.router_id,
        }
    }
}

#[derive(Debug, Serialize)]
struct UpdateFloatingIpRequest<'a> {
    floatingip: UpdateFloatingIpBody<'a>,
}

/// `port_id` is always sent: `null` clears the association
#[derive(Debug, Serialize)]
struct UpdateFloatingIpBody<'a> {
    port_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_ip_address: Option<&'a str>,
}
