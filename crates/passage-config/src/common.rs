//! Config types shared between chain nodes and services.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ser;

/// A username/password pair.
///
/// Depending on the protocol these credentials apply at the session layer
/// (connector/handler) or at the transport layer (dialer/listener); the
/// compiler places them where the protocol expects them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// The username.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    /// The password; may be empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

/// TLS settings for a dialer or listener.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsConfig {
    /// Path to the certificate file.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cert_file: String,
    /// Path to the private-key file.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key_file: String,
    /// Path to the CA bundle used to verify the peer.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca_file: String,
    /// Whether the client side verifies the server certificate.
    ///
    /// Only meaningful on the dialer side; a listener always presents its
    /// own certificate.
    #[serde(default, skip_serializing_if = "ser::bool_is_false")]
    pub secure: bool,
    /// Server name sent in SNI and checked during verification.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server_name: String,
}

/// The policy governing which node within a hop is chosen, and how node
/// failures demote a node temporarily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorConfig {
    /// Balancing strategy (`round`, `rand`, `fifo`).
    pub strategy: String,
    /// How many consecutive failures mark a node as failed.
    pub max_fails: i32,
    /// How long a failed node stays out of rotation.
    #[serde(with = "humantime_serde")]
    pub fail_timeout: Duration,
}
