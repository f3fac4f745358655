//! Assembling whole configurations from command-line spec lists.

use passage_config::{ChainConfig, Config, HopConfig};
use passage_metadata::Metadata;
use passage_registry::ComponentIndex;

use crate::node::{build_node_config, expand_hosts, CompiledNode};
use crate::service::{build_service_config, CompiledService};
use crate::subres::{apply_hop_policies, apply_service_policies};
use crate::{norm, selector, Result};

/// Build one configuration graph from the command-line spec lists.
///
/// Every node spec becomes one hop (`hop-<i>`) of a single synthesized
/// chain (`chain-0`), with its address list expanded into sibling nodes;
/// every service spec becomes one service (`service-<i>`) wired to that
/// chain.  Cross-cutting policies referenced from the specs are
/// materialized as named top-level entities as they are encountered, so
/// the returned graph resolves all of its own references.
///
/// Construction is single-threaded and single-pass; generated names count
/// up from the current collection sizes.  The first error aborts the
/// whole build, and no partial configuration is ever returned.
pub fn build_config<S1, S2>(
    service_specs: &[S1],
    node_specs: &[S2],
    index: &dyn ComponentIndex,
) -> Result<Config>
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    let mut cfg = Config::default();

    let mut chain = if node_specs.is_empty() {
        None
    } else {
        Some(ChainConfig {
            name: "chain-0".to_string(),
            hops: Vec::new(),
        })
    };

    for (i, spec) in node_specs.iter().enumerate() {
        let url = norm::normalize_spec(spec.as_ref())?;
        let CompiledNode {
            node: template,
            mut metadata,
        } = build_node_config(&url, index)?;

        let mut hop = HopConfig {
            name: format!("hop-{}", i),
            selector: selector::resolve_selector(&mut metadata),
            ..Default::default()
        };
        apply_hop_policies(&mut cfg, &mut hop, &mut metadata);
        hop.nodes = expand_hosts(&template, &metadata);

        if let Some(chain) = chain.as_mut() {
            chain.hops.push(hop);
        }
    }

    let chain_name = chain.as_ref().map(|c| c.name.clone());
    if let Some(chain) = chain {
        cfg.chains.push(chain);
    }

    for (i, spec) in service_specs.iter().enumerate() {
        let url = norm::normalize_spec(spec.as_ref())?;
        let CompiledService {
            service: mut svc,
            mut metadata,
        } = build_service_config(&url, index)?;
        svc.name = format!("service-{}", i);

        if let Some(chain_name) = &chain_name {
            // Reverse tunnels dial out through the chain to listen, so the
            // reference belongs to the listener; everyone else relays
            // requests through it from the handler.
            if svc.listener.kind == "rtcp" || svc.listener.kind == "rudp" {
                svc.listener.chain = chain_name.clone();
            } else {
                svc.handler.chain = chain_name.clone();
            }
        }

        apply_service_policies(&mut cfg, &mut svc, &mut metadata);
        distribute_metadata(&mut svc, metadata);
        cfg.services.push(svc);
    }

    Ok(cfg)
}

/// Hand every component of a finished service its own copy of the
/// surviving options.
///
/// This runs after the last extraction step, so consumed keys are gone
/// from all three maps at once, and no map is shared between components.
fn distribute_metadata(svc: &mut passage_config::ServiceConfig, metadata: Metadata) {
    svc.handler.metadata = metadata.clone();
    svc.listener.metadata = metadata.clone();
    svc.metadata = metadata;
}
