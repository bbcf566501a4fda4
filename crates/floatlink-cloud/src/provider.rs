//! Provider context
//!
//! Replaces the global provider configuration with an explicit value handed to
//! every lifecycle call.

use crate::error::Result;
use crate::lookup::{LoadBalancerLookup, NetworkingApi};
use async_trait::async_trait;
use std::sync::Arc;

/// Environment variable consulted when no region is configured
pub const REGION_ENV: &str = "OS_REGION_NAME";

/// Builds client handles for a region
///
/// Handles are constructed per operation and dropped afterwards.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// Returns the provider name (e.g., "openstack")
    fn name(&self) -> &str;

    async fn networking(&self, region: &str) -> Result<Arc<dyn NetworkingApi>>;

    async fn load_balancers(&self, region: &str) -> Result<Arc<dyn LoadBalancerLookup>>;
}

/// Supplies the effective region for a call
pub trait RegionResolver {
    fn resolve_region(&self, requested: Option<&str>) -> String;
}

/// Shared configuration for lifecycle calls
#[derive(Clone)]
pub struct ProviderContext {
    catalog: Arc<dyn ServiceCatalog>,
    default_region: Option<String>,
}

impl ProviderContext {
    pub fn new(catalog: Arc<dyn ServiceCatalog>) -> Self {
        Self {
            catalog,
            default_region: None,
        }
    }

    pub fn with_default_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        self.default_region = (!region.is_empty()).then_some(region);
        self
    }

    pub fn catalog(&self) -> &dyn ServiceCatalog {
        self.catalog.as_ref()
    }

    pub fn default_region(&self) -> Option<&str> {
        self.default_region.as_deref()
    }
}

impl RegionResolver for ProviderContext {
    /// Explicit region, then the provider default, then `OS_REGION_NAME`
    fn resolve_region(&self, requested: Option<&str>) -> String {
        if let Some(region) = requested.filter(|r| !r.is_empty()) {
            return region.to_string();
        }
        if let Some(region) = &self.default_region {
            return region.clone();
        }
        std::env::var(REGION_ENV).unwrap_or_default()
    }
}

impl std::fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderContext")
            .field("catalog", &self.catalog.name())
            .field("default_region", &self.default_region)
            .finish()
    }
}
