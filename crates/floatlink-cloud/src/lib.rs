//! floatlink cloud core
//!
//! Associates a floating IP with a network port, or through the port with the
//! virtual IP of a load balancer, as a create/read/delete resource.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  floatlink CLI                   │
//! │        (associate / show / plan / apply)         │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                floatlink-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │   resource: create / read / delete        │   │
//! │  │   FloatingIpAssociator                    │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ Plan / Apply │  │  State Mgmt  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │ trait ServiceCatalog / PortLookup / ...
//! ┌───────▼──────────────┐
//! │ floatlink-openstack   │
//! │ (Neutron, Octavia)    │
//! └──────────────────────┘
//! ```

pub mod action;
pub mod associator;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod resource;
pub mod state;

// Re-exports
pub use action::{
    Action, ActionType, ApplyResult, DesiredAssociation, Plan, PlanSummary, apply, plan,
    refresh_state,
};
pub use associator::{FloatingIpAssociator, single_match};
pub use error::{CloudError, Result, ResultExt};
pub use lookup::{FloatingIpLookup, LoadBalancerLookup, NetworkingApi, PortLookup};
pub use model::{
    Association, AssociationView, FixedIp, FloatingIp, FloatingIpUpdate, LoadBalancer, Lookup,
    Port,
};
pub use provider::{ProviderContext, REGION_ENV, RegionResolver, ServiceCatalog};
pub use resource::AssociationState;
pub use state::{StateFile, StateLock, StateManager};
