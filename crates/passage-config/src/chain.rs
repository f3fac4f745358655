//! Chains, hops, and the nodes inside them.

use passage_metadata::Metadata;
use serde::{Deserialize, Serialize};

use crate::common::{AuthConfig, SelectorConfig, TlsConfig};
use crate::ser;

/// An ordered sequence of proxy layers an outbound connection is relayed
/// through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// Unique name of the chain within the configuration.
    pub name: String,
    /// The hops, in traversal order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hops: Vec<HopConfig>,
}

/// A named group of candidate next-nodes plus the policies used when
/// relaying through one of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HopConfig {
    /// Unique name of the hop within the configuration.
    pub name: String,
    /// Network interface (name or address) to bind outbound sockets to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub interface: String,
    /// Socket options for connections made through this hop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sockopts: Option<SockOptsConfig>,
    /// Load-balancing policy across `nodes`; absent means the runtime
    /// picks its own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<SelectorConfig>,
    /// Name of the bypass entity consulted before relaying.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bypass: String,
    /// Name of the resolver entity used for target hostnames.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resolver: String,
    /// Name of the static host-mapping entity.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hosts: String,
    /// Candidate nodes for this hop.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeConfig>,
}

/// One egress target: an address plus the session (connector) and
/// transport (dialer) behavior used to reach it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    /// Unique name of the node within its hop.
    pub name: String,
    /// Address to dial, as `host:port`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub addr: String,
    /// Network interface (name or address) to bind the dial to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub interface: String,
    /// Name of a bypass entity applying to this node only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bypass: String,
    /// Name of a resolver entity applying to this node only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resolver: String,
    /// Name of a host-mapping entity applying to this node only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hosts: String,
    /// Protocol-level session establishment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<ConnectorConfig>,
    /// Transport-level connection establishment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialer: Option<DialerConfig>,
}

/// Protocol-level session establishment for a node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    /// Connector type (`http`, `socks5`, `relay`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Credentials presented at the session layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// Options the core does not interpret.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// Transport-level connection establishment for a node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialerConfig {
    /// Dialer type (`tcp`, `tls`, `wss`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Credentials presented at the transport layer (ssh-family dialers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// TLS settings, when the transport is encrypted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
    /// Options the core does not interpret.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// Socket options applied to connections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SockOptsConfig {
    /// SO_MARK value for outbound sockets (Linux).
    #[serde(default, skip_serializing_if = "ser::u32_is_zero")]
    pub mark: u32,
}
