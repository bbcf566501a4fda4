//! Floating IP ⇄ port association
//!
//! Three remote steps: read the port, optionally list load balancers, update
//! the floating IP. The update is the only mutating call and always runs last,
//! so a failure earlier in [`FloatingIpAssociator::associate`] leaves remote
//! state untouched.

use crate::error::{CloudError, Result, ResultExt};
use crate::lookup::{FloatingIpLookup, LoadBalancerLookup, NetworkingApi, PortLookup};
use crate::model::{Association, AssociationView, FloatingIpUpdate, Lookup};
use crate::provider::ServiceCatalog;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrates association calls for one region
pub struct FloatingIpAssociator<'a> {
    catalog: &'a dyn ServiceCatalog,
    networking: Arc<dyn NetworkingApi>,
    region: String,
}

impl<'a> FloatingIpAssociator<'a> {
    /// Build the networking client for `region`
    pub async fn connect(catalog: &'a dyn ServiceCatalog, region: &str) -> Result<Self> {
        let networking = catalog
            .networking(region)
            .await
            .with_context(|| "Error creating OpenStack network client")?;

        Ok(Self {
            catalog,
            networking,
            region: region.to_string(),
        })
    }

    /// Bind a floating IP (id or address) to a port
    pub async fn associate(&self, floating_ip_ref: &str, port_id: &str) -> Result<Association> {
        let fip_id = self
            .resolve_floating_ip(floating_ip_ref)
            .await
            .with_context(|| "Unable to get ID of floating IP")?;

        let fixed_ip = self.fixed_ip_for_port(port_id).await?;

        let update = FloatingIpUpdate::associate(port_id, fixed_ip.clone());
        debug!(floating_ip_id = %fip_id, ?update, "Floating IP associate options");

        self.networking
            .update_floating_ip(&fip_id, &update)
            .await
            .with_context(|| {
                format!(
                    "Error associating floating IP {} to port {}",
                    fip_id, port_id
                )
            })?;

        info!(
            floating_ip_id = %fip_id,
            port_id = %port_id,
            "Created association between floating IP and port"
        );

        Ok(Association {
            id: fip_id,
            port_id: port_id.to_string(),
            fixed_ip,
        })
    }

    /// Observe the current association, or `Gone` when the floating IP is missing
    pub async fn refresh(&self, association_id: &str) -> Result<Lookup<AssociationView>> {
        let fip = self
            .networking
            .get_floating_ip(association_id)
            .await
            .with_context(|| format!("Error getting floating IP {}", association_id))?;

        let fip = match fip {
            Lookup::Found(fip) => fip,
            Lookup::Gone => {
                debug!(floating_ip_id = %association_id, "Floating IP not found");
                return Ok(Lookup::Gone);
            }
        };

        debug!(floating_ip_id = %association_id, ?fip, "Retrieved floating IP");

        Ok(Lookup::Found(AssociationView {
            floating_ip_address: fip.address,
            port_id: fip.port_id.filter(|p| !p.is_empty()),
            region: self.region.clone(),
        }))
    }

    /// Clear the port binding. `port_id` only feeds the error message.
    pub async fn disassociate(&self, association_id: &str, port_id: &str) -> Result<()> {
        let update = FloatingIpUpdate::disassociate();
        debug!(floating_ip_id = %association_id, ?update, "Floating IP disassociate options");

        self.networking
            .update_floating_ip(association_id, &update)
            .await
            .with_context(|| {
                format!(
                    "Error disassociating floating IP {} from port {}",
                    association_id, port_id
                )
            })?;

        Ok(())
    }

    async fn resolve_floating_ip(&self, floating_ip_ref: &str) -> Result<String> {
        if floating_ip_ref.parse::<IpAddr>().is_err() {
            return Ok(floating_ip_ref.to_string());
        }
        self.networking
            .resolve_id_by_address(floating_ip_ref)
            .await
    }

    /// Fixed IP of the port, falling back to a load balancer VIP bound to it
    async fn fixed_ip_for_port(&self, port_id: &str) -> Result<String> {
        let port = self
            .networking
            .get_port(port_id)
            .await
            .with_context(|| format!("Unable to get port {}", port_id))?;

        if let Some(first) = port.fixed_ips.first() {
            debug!(port_id = %port_id, fixed_ip = %first.ip_address, "Fixed IP taken from port");
            return Ok(first.ip_address.clone());
        }

        let load_balancers = self
            .catalog
            .load_balancers(&self.region)
            .await
            .with_context(|| "Error creating OpenStack load balancer client")?;

        let matches = load_balancers
            .list_by_vip_port(port_id)
            .await
            .with_context(|| "Error listing load balancers")?;

        match matches.as_slice() {
            [lb] => {
                debug!(
                    port_id = %port_id,
                    load_balancer_id = %lb.id,
                    fixed_ip = %lb.vip_address,
                    "Fixed IP taken from load balancer"
                );
                Ok(lb.vip_address.clone())
            }
            other => {
                debug!(
                    port_id = %port_id,
                    matches = other.len(),
                    "No single load balancer for port, leaving fixed IP empty"
                );
                Ok(String::new())
            }
        }
    }
}

/// Reject an address reference that matched zero or several floating IPs
pub fn single_match(address: &str, mut ids: Vec<String>) -> Result<String> {
    match ids.len() {
        0 => Err(CloudError::Resolution {
            reference: address.to_string(),
            reason: format!("there are no floating IPs with {} IP", address),
        }),
        1 => Ok(ids.remove(0)),
        _ => Err(CloudError::Resolution {
            reference: address.to_string(),
            reason: format!("there are more than one floating IP with {} IP", address),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_match() {
        assert_eq!(
            single_match("203.0.113.9", vec!["fip-1".to_string()]).unwrap(),
            "fip-1"
        );

        let err = single_match("203.0.113.9", Vec::new()).unwrap_err();
        assert!(matches!(err, CloudError::Resolution { .. }));

        let err = single_match("203.0.113.9", vec!["a".to_string(), "b".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("more than one"));
    }
}
