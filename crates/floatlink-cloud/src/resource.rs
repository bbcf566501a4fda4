//! Resource lifecycle for `floating-ip-association`
//!
//! Create/Read/Delete entry points over a typed tracked state. Every field is
//! ForceNew: changing any of them means delete then create, see
//! [`crate::action`].

use crate::associator::FloatingIpAssociator;
use crate::error::{CloudError, Result};
use crate::model::Lookup;
use crate::provider::{ProviderContext, RegionResolver};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Resource type name carried in apply logs
pub const RESOURCE_TYPE: &str = "floating-ip-association";

/// Tracked state of one association
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationState {
    /// Floating IP id. `None` when nothing is tracked remotely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Floating IP id or address as configured, replaced by the address on read
    pub floating_ip: String,

    pub port_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Fixed IP sent at creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_ip: Option<String>,
}

impl AssociationState {
    pub fn new(floating_ip: impl Into<String>, port_id: impl Into<String>) -> Self {
        Self {
            floating_ip: floating_ip.into(),
            port_id: port_id.into(),
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region.filter(|r| !r.is_empty());
        self
    }

    /// Passthrough import: the bare floating IP id, filled in by [`read`]
    pub fn imported(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    fn require_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| CloudError::StateError("association has no id".to_string()))
    }
}

/// Associate, store the identity, then read back
///
/// When only the read back fails, `state.id` stays set.
pub async fn create(state: &mut AssociationState, ctx: &ProviderContext) -> Result<()> {
    let region = ctx.resolve_region(state.region.as_deref());
    let associator = FloatingIpAssociator::connect(ctx.catalog(), &region).await?;

    let association = associator
        .associate(&state.floating_ip, &state.port_id)
        .await?;

    state.id = Some(association.id);
    state.fixed_ip = (!association.fixed_ip.is_empty()).then_some(association.fixed_ip);

    read(state, ctx).await
}

/// Refresh tracked state. A vanished floating IP clears `id`.
pub async fn read(state: &mut AssociationState, ctx: &ProviderContext) -> Result<()> {
    let id = state.require_id()?.to_string();
    let region = ctx.resolve_region(state.region.as_deref());
    let associator = FloatingIpAssociator::connect(ctx.catalog(), &region).await?;

    match associator.refresh(&id).await? {
        Lookup::Found(view) => {
            state.floating_ip = view.floating_ip_address;
            state.port_id = view.port_id.unwrap_or_default();
            state.region = Some(view.region).filter(|r| !r.is_empty());
        }
        Lookup::Gone => {
            warn!(floating_ip_id = %id, "Floating IP is gone, removing association from state");
            state.id = None;
        }
    }

    Ok(())
}

/// Clear the floating IP's port binding and forget the id
pub async fn delete(state: &mut AssociationState, ctx: &ProviderContext) -> Result<()> {
    let Some(id) = state.id.clone() else {
        debug!("Association has no id, nothing to delete");
        return Ok(());
    };

    let region = ctx.resolve_region(state.region.as_deref());
    let associator = FloatingIpAssociator::connect(ctx.catalog(), &region).await?;
    associator.disassociate(&id, &state.port_id).await?;

    state.id = None;
    Ok(())
}

/// Import by floating IP id
pub async fn import(
    id: impl Into<String>,
    region: Option<String>,
    ctx: &ProviderContext,
) -> Result<Lookup<AssociationState>> {
    let mut state = AssociationState::imported(id).with_region(region);
    read(&mut state, ctx).await?;

    if state.exists() {
        Ok(Lookup::Found(state))
    } else {
        Ok(Lookup::Gone)
    }
}
