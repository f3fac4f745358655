//! Named cross-cutting policy entities.
//!
//! Each of these is an independently named, reusable entity living in a
//! top-level collection of the [`Config`](crate::Config); services, hops,
//! and nodes refer to one by its name.

use serde::{Deserialize, Serialize};

use crate::common::AuthConfig;
use crate::ser;

/// Scope tag for a rate-limit rule that applies to a service as a whole.
pub const GLOBAL_LIMIT_KEY: &str = "$";

/// Scope tag for a rate-limit rule that applies to each connection.
pub const CONN_LIMIT_KEY: &str = "$$";

/// A named set of credentials accepted by handlers or listeners.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutherConfig {
    /// Unique name of the auther within the configuration.
    pub name: String,
    /// The accepted credential pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auths: Vec<AuthConfig>,
}

/// A named allow/deny matcher list gating whether an incoming connection
/// is served at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionConfig {
    /// Unique name of the admission control within the configuration.
    pub name: String,
    /// When true the matchers are an allow-list; otherwise a deny-list.
    #[serde(default, skip_serializing_if = "ser::bool_is_false")]
    pub whitelist: bool,
    /// Address/CIDR matcher strings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matchers: Vec<String>,
}

/// A named allow/deny matcher list gating whether a request is relayed or
/// connected to directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BypassConfig {
    /// Unique name of the bypass within the configuration.
    pub name: String,
    /// When true the matchers are an allow-list; otherwise a deny-list.
    #[serde(default, skip_serializing_if = "ser::bool_is_false")]
    pub whitelist: bool,
    /// Host/CIDR matcher strings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matchers: Vec<String>,
}

/// A named DNS resolver: an ordered list of nameservers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Unique name of the resolver within the configuration.
    pub name: String,
    /// The nameservers, tried in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<NameserverConfig>,
}

/// One nameserver inside a [`ResolverConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameserverConfig {
    /// Nameserver address (`1.1.1.1`, `tls://8.8.8.8`, ...).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub addr: String,
    /// Name of a chain lookups are relayed through.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chain: String,
    /// Preferred address family for answers (`ipv4` or `ipv6`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefer: String,
    /// Hostname to verify when the nameserver speaks TLS.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
}

/// A named set of static hostname→IP mappings consulted before DNS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostsConfig {
    /// Unique name of the mapping set within the configuration.
    pub name: String,
    /// The mappings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<HostMappingConfig>,
}

/// One static hostname→IP mapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMappingConfig {
    /// The hostname being mapped.
    pub hostname: String,
    /// The IP it resolves to.
    pub ip: String,
}

/// A named traffic limiter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimiterConfig {
    /// Unique name of the limiter within the configuration.
    pub name: String,
    /// Rate-limit rules, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<RateLimiterConfig>,
}

/// Rate-limit rules for a [`LimiterConfig`].
///
/// Each rule is a whitespace-separated `scope input output` string, where
/// scope is [`GLOBAL_LIMIT_KEY`] or [`CONN_LIMIT_KEY`] and the rates use
/// unit suffixes (`1mb`, `512kb`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimiterConfig {
    /// The rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub limits: Vec<String>,
}
