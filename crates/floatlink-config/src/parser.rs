//! floatlink.kdl パーサー

use crate::error::{ConfigError, Result};
use crate::model::{Config, EndpointOverride, ProviderConfig};
use floatlink_cloud::DesiredAssociation;
use kdl::{KdlDocument, KdlNode};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// KDLファイルを Config にパース
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// KDL文字列を Config にパース
pub fn parse_config(content: &str) -> Result<Config> {
    let doc: KdlDocument = content.parse()?;

    let mut config = Config::default();
    let mut provider_seen = false;

    for node in doc.nodes() {
        match node.name().value() {
            "project" => {
                config.project = first_string(node);
            }
            "provider" => {
                if provider_seen {
                    return Err(ConfigError::InvalidConfig(
                        "provider ノードは1つだけ指定できます".to_string(),
                    ));
                }
                config.provider = parse_provider(node)?;
                provider_seen = true;
            }
            "association" => {
                config.associations.push(parse_association(node)?);
            }
            other => {
                tracing::debug!(node = %other, "Skipping unknown node");
            }
        }
    }

    validate(&config)?;
    Ok(config)
}

fn parse_provider(node: &KdlNode) -> Result<ProviderConfig> {
    let mut provider = ProviderConfig::default();

    if let Some(kind) = first_string(node) {
        if kind != "openstack" {
            return Err(ConfigError::InvalidConfig(format!(
                "未対応の provider です: {}",
                kind
            )));
        }
        provider.kind = kind;
    }

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "region" => provider.region = first_string(child),
                "token" => provider.token = first_string(child),
                "token-env" => provider.token_env = first_string(child),
                "network-endpoint" => provider.network_endpoint = first_string(child),
                "load-balancer-endpoint" => provider.load_balancer_endpoint = first_string(child),
                "use-octavia" => {
                    provider.use_octavia = child
                        .entries()
                        .first()
                        .and_then(|e| e.value().as_bool())
                        .unwrap_or(true);
                }
                "endpoint" => {
                    let region = first_string(child).ok_or_else(|| {
                        ConfigError::InvalidConfig(
                            "endpoint にはリージョン名が必要です".to_string(),
                        )
                    })?;
                    provider.endpoints.insert(region, parse_endpoint_override(child));
                }
                _ => {}
            }
        }
    }

    Ok(provider)
}

fn parse_endpoint_override(node: &KdlNode) -> EndpointOverride {
    let mut endpoints = EndpointOverride::default();

    for entry in node.entries() {
        if let Some(name) = entry.name() {
            let value = entry.value().as_string().map(|s| s.to_string());
            match name.value() {
                "network" => endpoints.network = value,
                "load-balancer" => endpoints.load_balancer = value,
                _ => {}
            }
        }
    }

    endpoints
}

fn parse_association(node: &KdlNode) -> Result<DesiredAssociation> {
    let name = first_string(node).ok_or_else(|| {
        ConfigError::InvalidConfig("association には名前が必要です".to_string())
    })?;

    let mut floating_ip = None;
    let mut port_id = None;
    let mut region = None;

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "floating-ip" => floating_ip = first_string(child),
                "port-id" => port_id = first_string(child),
                "region" => region = first_string(child),
                _ => {}
            }
        }
    }

    let floating_ip = floating_ip
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingField {
            name: name.clone(),
            field: "floating-ip",
        })?;
    let port_id = port_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingField {
            name: name.clone(),
            field: "port-id",
        })?;

    Ok(DesiredAssociation {
        name,
        floating_ip,
        port_id,
        region: region.filter(|r| !r.is_empty()),
    })
}

fn validate(config: &Config) -> Result<()> {
    let mut names = HashSet::new();
    let mut floating_ips: HashMap<&str, &str> = HashMap::new();
    for assoc in &config.associations {
        if !names.insert(assoc.name.as_str()) {
            return Err(ConfigError::DuplicateAssociation(assoc.name.clone()));
        }
        // 1 つのフローティング IP は 1 つのポートにしか付かない
        let previous = floating_ips.insert(assoc.floating_ip.as_str(), assoc.name.as_str());
        if let Some(first) = previous {
            return Err(ConfigError::DuplicateFloatingIp {
                floating_ip: assoc.floating_ip.clone(),
                first: first.to_string(),
                second: assoc.name.clone(),
            });
        }
    }

    let provider = &config.provider;
    let has_network = provider.network_endpoint.is_some()
        || provider.endpoints.values().any(|e| e.network.is_some());
    if !has_network {
        return Err(ConfigError::InvalidConfig(
            "provider に network-endpoint が必要です".to_string(),
        ));
    }

    Ok(())
}

fn first_string(node: &KdlNode) -> Option<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}
