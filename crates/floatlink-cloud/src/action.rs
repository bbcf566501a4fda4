//! Plan and apply for declared associations

use crate::provider::{ProviderContext, RegionResolver};
use crate::resource::{self, AssociationState, RESOURCE_TYPE};
use crate::state::StateFile;
use serde::{Deserialize, Serialize};

/// An association as declared in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredAssociation {
    pub name: String,

    /// Floating IP id or address
    pub floating_ip: String,

    pub port_id: String,

    pub region: Option<String>,
}

impl DesiredAssociation {
    fn to_state(&self) -> AssociationState {
        AssociationState::new(&self.floating_ip, &self.port_id).with_region(self.region.clone())
    }
}

/// A planned step for one association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// `<type>-<name>`, used in logs and apply reports
    pub id: String,

    pub action_type: ActionType,

    /// Configured association name
    pub name: String,

    pub description: String,

    /// Attributes forcing a Replace
    pub changed: Vec<&'static str>,

    /// Tracked floating IP released by a Delete or Replace
    pub floating_ip_id: Option<String>,
}

impl Action {
    fn new(action_type: ActionType, name: &str, description: String) -> Self {
        Self {
            id: format!("{}-{}", action_type, name),
            action_type,
            name: name.to_string(),
            description,
            changed: Vec::new(),
            floating_ip_id: None,
        }
    }
}

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Create,
    /// Delete then create, every attribute forces a new association
    Replace,
    Delete,
    NoOp,
}

impl ActionType {
    /// Clears a tracked port binding
    fn releases(self) -> bool {
        matches!(self, ActionType::Delete | ActionType::Replace)
    }

    /// Binds a declared floating IP
    fn binds(self) -> bool {
        matches!(self, ActionType::Create | ActionType::Replace)
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Replace => write!(f, "replace"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Outcome of [`apply`]
#[derive(Debug, Clone, Default)]
pub struct ApplyResult {
    pub succeeded: Vec<ActionResult>,

    pub failed: Vec<ActionResult>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ApplyResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, action: &Action, outcome: Result<String, String>) {
        match outcome {
            Ok(message) => {
                tracing::info!(resource = RESOURCE_TYPE, action = %action.id, "{}", message);
                self.succeeded.push(ActionResult {
                    action_id: action.id.clone(),
                    message,
                });
            }
            Err(error) => {
                tracing::warn!(
                    resource = RESOURCE_TYPE,
                    action = %action.id,
                    %error,
                    "Action failed"
                );
                self.failed.push(ActionResult {
                    action_id: action.id.clone(),
                    message: error,
                });
            }
        }
    }
}

/// Report line for one action, the error text when it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub action_id: String,

    pub message: String,
}

/// Ordered actions, releases ahead of binds
#[derive(Debug, Clone)]
pub struct Plan {
    pub actions: Vec<Action>,

    pub has_changes: bool,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        let has_changes = actions.iter().any(|a| a.action_type != ActionType::NoOp);
        Self {
            actions,
            has_changes,
        }
    }

    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            replace: self.actions_by_type(ActionType::Replace).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            no_change: self.actions_by_type(ActionType::NoOp).len(),
        }
    }
}

/// Action counts per type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub create: usize,
    pub replace: usize,
    pub delete: usize,
    pub no_change: usize,
}

/// Attributes of `current` that differ from `desired`
fn changed_fields(
    desired: &DesiredAssociation,
    current: &AssociationState,
    regions: &dyn RegionResolver,
) -> Vec<&'static str> {
    let mut changed = Vec::new();

    // Read replaces the configured reference with the address, so an id still matches
    let same_fip = desired.floating_ip == current.floating_ip
        || current.id.as_deref() == Some(desired.floating_ip.as_str());
    if !same_fip {
        changed.push("floating_ip");
    }
    if desired.port_id != current.port_id {
        changed.push("port_id");
    }
    if regions.resolve_region(desired.region.as_deref())
        != regions.resolve_region(current.region.as_deref())
    {
        changed.push("region");
    }

    changed
}

/// Compare declared associations against refreshed state
///
/// Deletes are listed first since [`apply`] releases before it binds.
pub fn plan(
    desired: &[DesiredAssociation],
    state: &StateFile,
    regions: &dyn RegionResolver,
) -> Plan {
    let mut actions = Vec::new();

    for (name, current) in &state.associations {
        if desired.iter().any(|d| &d.name == name) {
            continue;
        }
        let mut a = Action::new(
            ActionType::Delete,
            name,
            format!(
                "Disassociate floating IP {} from port {}",
                current.floating_ip, current.port_id
            ),
        );
        a.floating_ip_id = current.id.clone();
        actions.push(a);
    }

    for want in desired {
        match state.get(&want.name).filter(|s| s.exists()) {
            None => actions.push(Action::new(
                ActionType::Create,
                &want.name,
                format!(
                    "Associate floating IP {} with port {}",
                    want.floating_ip, want.port_id
                ),
            )),
            Some(current) => {
                let changed = changed_fields(want, current, regions);
                if changed.is_empty() {
                    actions.push(Action::new(
                        ActionType::NoOp,
                        &want.name,
                        format!("Association {} is up to date", want.name),
                    ));
                } else {
                    let mut a = Action::new(
                        ActionType::Replace,
                        &want.name,
                        format!(
                            "Re-associate floating IP {} with port {}",
                            want.floating_ip, want.port_id
                        ),
                    );
                    a.changed = changed;
                    a.floating_ip_id = current.id.clone();
                    actions.push(a);
                }
            }
        }
    }

    Plan::new(actions)
}

/// Refresh every tracked association, dropping those whose floating IP is gone
///
/// Returns the names that were dropped.
pub async fn refresh_state(
    state: &mut StateFile,
    ctx: &ProviderContext,
) -> crate::error::Result<Vec<String>> {
    let mut dropped = Vec::new();
    let names: Vec<String> = state.associations.keys().cloned().collect();

    for name in names {
        let Some(mut current) = state.get(&name).cloned() else {
            continue;
        };
        if current.exists() {
            resource::read(&mut current, ctx).await?;
        }
        if current.exists() {
            state.set(name, current);
        } else {
            state.remove(&name);
            dropped.push(name);
        }
    }

    Ok(dropped)
}

/// Apply the planned actions, recording every outcome in `state`
///
/// Every release (Delete, and the first half of Replace) runs before any
/// bind, so a floating IP moving between association names ends up bound.
/// A failed action does not stop the remaining ones, but a Replace whose
/// release failed is not bound again.
pub async fn apply(
    plan: &Plan,
    desired: &[DesiredAssociation],
    state: &mut StateFile,
    ctx: &ProviderContext,
) -> ApplyResult {
    let mut result = ApplyResult::default();
    let start = std::time::Instant::now();
    let mut held = Vec::new();

    for action in plan.actions.iter().filter(|a| a.action_type.releases()) {
        let outcome = delete_one(&action.name, state, ctx).await;
        match action.action_type {
            ActionType::Replace if outcome.is_ok() => {}
            ActionType::Replace => {
                held.push(action.name.as_str());
                result.record(action, outcome);
            }
            _ => result.record(action, outcome),
        }
    }

    for action in plan.actions.iter().filter(|a| a.action_type.binds()) {
        if held.contains(&action.name.as_str()) {
            continue;
        }
        let outcome = match desired.iter().find(|d| d.name == action.name) {
            Some(want) => create_one(want, state, ctx).await,
            None => Err(format!("association {} is not declared", action.name)),
        };
        result.record(action, outcome);
    }

    result.duration_ms = start.elapsed().as_millis() as u64;
    result
}

/// Bind and track. State keeps the id whenever the bind went through,
/// even if the read back failed.
async fn create_one(
    want: &DesiredAssociation,
    state: &mut StateFile,
    ctx: &ProviderContext,
) -> Result<String, String> {
    let mut tracked = want.to_state();
    let outcome = resource::create(&mut tracked, ctx).await;

    let id = tracked.id.clone().unwrap_or_default();
    if tracked.exists() {
        state.set(want.name.clone(), tracked);
    }
    outcome.map_err(|e| e.to_string())?;

    Ok(format!("Associated {} (floating IP {})", want.name, id))
}

async fn delete_one(
    name: &str,
    state: &mut StateFile,
    ctx: &ProviderContext,
) -> Result<String, String> {
    let Some(mut tracked) = state.get(name).cloned() else {
        return Ok(format!("{} is not tracked", name));
    };

    resource::delete(&mut tracked, ctx)
        .await
        .map_err(|e| e.to_string())?;

    state.remove(name);
    Ok(format!(
        "Disassociated {} (port {})",
        name, tracked.port_id
    ))
}
