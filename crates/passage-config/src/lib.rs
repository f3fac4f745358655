//! Declarative configuration graph for passage.
//!
//! # Overview
//!
//! A [`Config`] describes everything a passage process should run: the
//! services it listens on, the chains its outbound connections are relayed
//! through, and a set of named cross-cutting policies (bypass lists, DNS
//! resolvers, static host mappings, rate limiters, admission controls,
//! authenticators) that services and chain hops refer to *by name*.
//!
//! The graph is plain data.  It is produced in one pass by the spec
//! compiler (or deserialized from a config document), never mutated after
//! construction, and handed once to the layer that instantiates live
//! components from it.  References between entities are string names, not
//! ownership edges; the producer guarantees that every name resolves within
//! the same graph.
//!
//! Field names serialize in the camelCase form used by the config
//! documents, and empty or absent fields are omitted from output.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

mod chain;
mod common;
mod policy;
mod service;

pub use chain::{ChainConfig, ConnectorConfig, DialerConfig, HopConfig, NodeConfig, SockOptsConfig};
pub use common::{AuthConfig, SelectorConfig, TlsConfig};
pub use policy::{
    AdmissionConfig, AutherConfig, BypassConfig, HostMappingConfig, HostsConfig, LimiterConfig,
    NameserverConfig, RateLimiterConfig, ResolverConfig, CONN_LIMIT_KEY, GLOBAL_LIMIT_KEY,
};
pub use service::{ForwarderConfig, HandlerConfig, ListenerConfig, ServiceConfig};

use serde::{Deserialize, Serialize};

/// Serde helpers shared by the config types.
pub(crate) mod ser {
    /// True for a zero i32; used to omit unset counters from output.
    pub(crate) fn i32_is_zero(v: &i32) -> bool {
        *v == 0
    }
    /// True for a zero u32; used to omit unset socket marks from output.
    pub(crate) fn u32_is_zero(v: &u32) -> bool {
        *v == 0
    }
    /// True for false; used to omit unset flags from output.
    pub(crate) fn bool_is_false(v: &bool) -> bool {
        !*v
    }
}

/// A complete passage configuration.
///
/// Collections keep insertion order, which is also the order entity names
/// were generated in; nothing afterward depends on that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// The services to listen on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceConfig>,
    /// The chains available for relaying outbound connections.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chains: Vec<ChainConfig>,
    /// Named authenticators.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authers: Vec<AutherConfig>,
    /// Named admission controls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admissions: Vec<AdmissionConfig>,
    /// Named bypass lists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bypasses: Vec<BypassConfig>,
    /// Named DNS resolvers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resolvers: Vec<ResolverConfig>,
    /// Named static host mappings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<HostsConfig>,
    /// Named traffic limiters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub limiters: Vec<LimiterConfig>,
    /// Logging settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
    /// Profiling endpoint settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiling: Option<ProfilingConfig>,
    /// Web API endpoint settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiConfig>,
    /// Metrics endpoint settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsConfig>,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// Minimum level to emit (`trace`, `debug`, `info`, `warn`, `error`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub level: String,
    /// Output format (`text` or `json`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    /// Where log output goes (`stderr`, `stdout`, `none`, or a file path).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
}

/// Profiling endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilingConfig {
    /// Address the profiling server listens on.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub addr: String,
}

/// Web API endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Address the API server listens on.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub addr: String,
    /// Path prefix for every API route.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path_prefix: String,
    /// Whether to log API accesses.
    #[serde(default, skip_serializing_if = "ser::bool_is_false")]
    pub access_log: bool,
    /// Inline credentials guarding the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// Name of an auther entity guarding the API.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auther: String,
}

/// Metrics endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsConfig {
    /// Address the metrics server listens on.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub addr: String,
    /// Path the metrics are exported under.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}
