use async_trait::async_trait;
use floatlink_cloud::{
    CloudError, FixedIp, FloatingIp, FloatingIpLookup, FloatingIpUpdate, LoadBalancer,
    LoadBalancerLookup, Lookup, NetworkingApi, Port, PortLookup, ProviderContext, Result,
    ServiceCatalog, single_match,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    ports: HashMap<String, Port>,
    load_balancers: Vec<LoadBalancer>,
    floating_ips: HashMap<String, FloatingIp>,
    updates: Vec<(String, FloatingIpUpdate)>,
    lb_clients_built: usize,
    lb_list_calls: usize,
    reject_updates: bool,
    fail_reads: bool,
}

/// In-memory floating IP, port and load balancer services
#[derive(Clone, Default)]
pub struct FakeCloud {
    inner: Arc<Mutex<Inner>>,
}

#[allow(dead_code)]
impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(self, id: &str, fixed_ips: &[&str]) -> Self {
        let port = Port {
            id: id.to_string(),
            fixed_ips: fixed_ips
                .iter()
                .map(|ip| FixedIp {
                    ip_address: ip.to_string(),
                    subnet_id: Some("subnet-1".to_string()),
                })
                .collect(),
        };
        self.inner.lock().unwrap().ports.insert(id.to_string(), port);
        self
    }

    pub fn with_load_balancer(self, id: &str, vip_port_id: &str, vip_address: &str) -> Self {
        self.inner.lock().unwrap().load_balancers.push(LoadBalancer {
            id: id.to_string(),
            vip_port_id: vip_port_id.to_string(),
            vip_address: vip_address.to_string(),
        });
        self
    }

    pub fn with_floating_ip(self, id: &str, address: &str) -> Self {
        self.inner.lock().unwrap().floating_ips.insert(
            id.to_string(),
            FloatingIp {
                id: id.to_string(),
                address: address.to_string(),
                port_id: None,
                fixed_ip: None,
                status: Some("DOWN".to_string()),
                floating_network_id: Some("public".to_string()),
                router_id: None,
            },
        );
        self
    }

    pub fn rejecting_updates(self) -> Self {
        self.inner.lock().unwrap().reject_updates = true;
        self
    }

    /// Updates still succeed, reads by id answer 500
    pub fn failing_reads(self) -> Self {
        self.inner.lock().unwrap().fail_reads = true;
        self
    }

    pub fn context(&self) -> ProviderContext {
        ProviderContext::new(Arc::new(self.clone())).with_default_region("RegionOne")
    }

    pub fn floating_ip(&self, id: &str) -> Option<FloatingIp> {
        self.inner.lock().unwrap().floating_ips.get(id).cloned()
    }

    pub fn remove_floating_ip(&self, id: &str) {
        self.inner.lock().unwrap().floating_ips.remove(id);
    }

    pub fn updates(&self) -> Vec<(String, FloatingIpUpdate)> {
        self.inner.lock().unwrap().updates.clone()
    }

    pub fn lb_clients_built(&self) -> usize {
        self.inner.lock().unwrap().lb_clients_built
    }

    pub fn lb_list_calls(&self) -> usize {
        self.inner.lock().unwrap().lb_list_calls
    }
}

#[async_trait]
impl PortLookup for FakeCloud {
    async fn get_port(&self, port_id: &str) -> Result<Port> {
        self.inner
            .lock()
            .unwrap()
            .ports
            .get(port_id)
            .cloned()
            .ok_or_else(|| CloudError::not_found(format!("Port {} could not be found.", port_id)))
    }
}

#[async_trait]
impl LoadBalancerLookup for FakeCloud {
    async fn list_by_vip_port(&self, port_id: &str) -> Result<Vec<LoadBalancer>> {
        let mut inner = self.inner.lock().unwrap();
        inner.lb_list_calls += 1;
        Ok(inner
            .load_balancers
            .iter()
            .filter(|lb| lb.vip_port_id == port_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FloatingIpLookup for FakeCloud {
    async fn resolve_id_by_address(&self, address: &str) -> Result<String> {
        let ids = self
            .inner
            .lock()
            .unwrap()
            .floating_ips
            .values()
            .filter(|f| f.address == address)
            .map(|f| f.id.clone())
            .collect();
        single_match(address, ids)
    }

    async fn get_floating_ip(&self, id: &str) -> Result<Lookup<FloatingIp>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_reads {
            return Err(CloudError::remote(Some(500), "Request Failed: internal server error"));
        }
        Ok(match inner.floating_ips.get(id) {
            Some(fip) => Lookup::Found(fip.clone()),
            None => Lookup::Gone,
        })
    }

    async fn update_floating_ip(
        &self,
        id: &str,
        update: &FloatingIpUpdate,
    ) -> Result<FloatingIp> {
        let mut inner = self.inner.lock().unwrap();
        if inner.reject_updates {
            return Err(CloudError::remote(Some(409), "Cannot associate floating IP"));
        }
        inner.updates.push((id.to_string(), update.clone()));

        let fip = inner
            .floating_ips
            .get_mut(id)
            .ok_or_else(|| CloudError::not_found(format!("Floating IP {} could not be found", id)))?;
        fip.port_id = update.port_id.clone();
        fip.fixed_ip = match &update.port_id {
            Some(_) => update.fixed_ip.clone(),
            None => None,
        };
        fip.status = Some(if fip.port_id.is_some() { "ACTIVE" } else { "DOWN" }.to_string());
        Ok(fip.clone())
    }
}

#[async_trait]
impl ServiceCatalog for FakeCloud {
    fn name(&self) -> &str {
        "fake"
    }

    async fn networking(&self, _region: &str) -> Result<Arc<dyn NetworkingApi>> {
        Ok(Arc::new(self.clone()))
    }

    async fn load_balancers(&self, _region: &str) -> Result<Arc<dyn LoadBalancerLookup>> {
        self.inner.lock().unwrap().lb_clients_built += 1;
        Ok(Arc::new(self.clone()))
    }
}
