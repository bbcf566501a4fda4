//! Remote service seams
//!
//! The associator only talks to the network through these traits. The
//! OpenStack implementations live in `floatlink-openstack`; tests plug in
//! in-memory fakes.

use crate::error::Result;
use crate::model::{FloatingIp, FloatingIpUpdate, LoadBalancer, Lookup, Port};
use async_trait::async_trait;

#[async_trait]
pub trait PortLookup: Send + Sync {
    /// Fetch a port. A missing port is an error with status 404.
    async fn get_port(&self, port_id: &str) -> Result<Port>;
}

#[async_trait]
pub trait LoadBalancerLookup: Send + Sync {
    /// List every load balancer whose VIP is bound to `port_id`
    async fn list_by_vip_port(&self, port_id: &str) -> Result<Vec<LoadBalancer>>;
}

#[async_trait]
pub trait FloatingIpLookup: Send + Sync {
    /// Map a public address to the id of the single floating IP holding it
    async fn resolve_id_by_address(&self, address: &str) -> Result<String>;

    async fn get_floating_ip(&self, id: &str) -> Result<Lookup<FloatingIp>>;

    async fn update_floating_ip(&self, id: &str, update: &FloatingIpUpdate)
    -> Result<FloatingIp>;
}

/// A networking client: ports and floating IPs share one endpoint
pub trait NetworkingApi: PortLookup + FloatingIpLookup {}

impl<T: PortLookup + FloatingIpLookup> NetworkingApi for T {}
