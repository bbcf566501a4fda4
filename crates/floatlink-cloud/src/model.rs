//! Network resource model
//!
//! Only the attributes the association needs are modelled. Everything here is
//! read from the remote services, except [`FloatingIpUpdate`], which is the
//! patch sent back.

use serde::{Deserialize, Serialize};

/// A publicly routable address that can be bound to a port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingIp {
    pub id: String,

    /// Public address
    pub address: String,

    /// Port the address is currently bound to
    pub port_id: Option<String>,

    /// Private address on the port that receives the NAT traffic
    pub fixed_ip: Option<String>,

    pub status: Option<String>,

    pub floating_network_id: Option<String>,

    pub router_id: Option<String>,
}

impl FloatingIp {
    pub fn is_associated(&self) -> bool {
        self.port_id.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// A virtual network attachment point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,

    /// Fixed IPs in the order the port service returns them
    pub fixed_ips: Vec<FixedIp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIp {
    pub ip_address: String,
    pub subnet_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: String,
    pub vip_port_id: String,
    pub vip_address: String,
}

/// Patch applied to a floating IP
///
/// `port_id: None` clears the binding. `fixed_ip: None` leaves the choice to
/// the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloatingIpUpdate {
    pub port_id: Option<String>,
    pub fixed_ip: Option<String>,
}

impl FloatingIpUpdate {
    /// Bind to `port_id`. An empty `fixed_ip` is not sent.
    pub fn associate(port_id: impl Into<String>, fixed_ip: impl Into<String>) -> Self {
        let fixed_ip = fixed_ip.into();
        Self {
            port_id: Some(port_id.into()),
            fixed_ip: (!fixed_ip.is_empty()).then_some(fixed_ip),
        }
    }

    pub fn disassociate() -> Self {
        Self {
            port_id: None,
            fixed_ip: None,
        }
    }
}

/// Outcome of a lookup that may legitimately find nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    /// The remote resource no longer exists
    Gone,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Gone => None,
        }
    }
}

/// Result of a successful associate call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Durable identity, the floating IP id
    pub id: String,
    pub port_id: String,
    /// Fixed IP sent with the update, empty when none could be derived
    pub fixed_ip: String,
}

/// Observed view of an association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationView {
    pub floating_ip_address: String,
    pub port_id: Option<String>,
    pub region: String,
}
