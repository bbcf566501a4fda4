//! OpenStack provider for floatlink
//!
//! Implements the floatlink service traits against the Neutron networking API
//! and the Octavia (or neutron-lbaas) load balancer API.
//!
//! # Requirements
//!
//! - A pre-issued Keystone token (`OS_TOKEN` or the provider block)
//! - The Neutron endpoint URL, and the load balancer endpoint for Octavia
//!
//! # Example
//!
//! ```ignore
//! use floatlink_openstack::{OpenStackCatalog, OpenStackConfig};
//! use floatlink_cloud::{FloatingIpAssociator, ProviderContext};
//! use std::sync::Arc;
//!
//! let catalog = OpenStackCatalog::new(OpenStackConfig {
//!     token: std::env::var("OS_TOKEN")?,
//!     network_endpoint: Some("https://neutron.example:9696".into()),
//!     load_balancer_endpoint: Some("https://octavia.example:9876".into()),
//!     use_octavia: true,
//!     ..Default::default()
//! })?;
//!
//! let assoc = FloatingIpAssociator::connect(&catalog, "RegionOne").await?;
//! let association = assoc.associate("203.0.113.9", "port-id").await?;
//! ```

mod client;
pub mod catalog;
pub mod error;
pub mod lbaas;
pub mod neutron;

pub use catalog::{OpenStackCatalog, OpenStackConfig, RegionEndpoints};
pub use error::{OpenStackError, Result};
pub use lbaas::{LbaasFlavor, LoadBalancerClient};
pub use neutron::NeutronClient;
