//! Services: ingress endpoints and their handler/listener pairs.

use passage_metadata::Metadata;
use serde::{Deserialize, Serialize};

use crate::chain::{NodeConfig, SockOptsConfig};
use crate::common::{AuthConfig, SelectorConfig, TlsConfig};
use crate::ser;

/// One ingress endpoint: an address to listen on, the transport that
/// accepts connections (listener) and the protocol that processes requests
/// on them (handler).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Unique name of the service within the configuration.
    pub name: String,
    /// Address to listen on, as `host:port` (`:port` binds all interfaces).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub addr: String,
    /// Network interface (name or address) to bind to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub interface: String,
    /// Socket options for accepted connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sockopts: Option<SockOptsConfig>,
    /// Name of the admission entity gating incoming connections.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admission: String,
    /// Name of the bypass entity consulted before forwarding.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bypass: String,
    /// Name of the resolver entity used for request targets.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resolver: String,
    /// Name of the static host-mapping entity.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hosts: String,
    /// Name of the traffic-limiter entity applied to this service.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub limiter: String,
    /// Protocol-level request processing.
    pub handler: HandlerConfig,
    /// Transport-level accept.
    pub listener: ListenerConfig,
    /// Static pass-through targets, present only for forward-mode services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarder: Option<ForwarderConfig>,
    /// Options the core does not interpret.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// Protocol-level request processing for a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerConfig {
    /// Handler type (`http`, `socks5`, `auto`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// How many times a failed relay attempt is retried.
    #[serde(default, skip_serializing_if = "ser::i32_is_zero")]
    pub retries: i32,
    /// Name of the chain outbound connections are relayed through.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chain: String,
    /// Credentials required at the session layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// Options the core does not interpret.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// Transport-level accept for a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerConfig {
    /// Listener type (`tcp`, `tls`, `rtcp`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Name of the chain a reverse-tunnel listener connects out through.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chain: String,
    /// Credentials required at the transport layer (ssh-family listeners).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// TLS settings; a listener needs a certificate to offer TLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
    /// Options the core does not interpret.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// Static pass-through targets for a forward-mode service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwarderConfig {
    /// The target nodes requests are relayed to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeConfig>,
    /// Load-balancing policy across the targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<SelectorConfig>,
}
