//! Read-only component-name lookups used while compiling passage
//! configurations.
//!
//! The runtime keeps one registry per component kind, mapping protocol
//! names to factories.  The spec compiler never instantiates anything, but
//! it does need to ask "is this name registered?" so that an omitted or
//! mistyped scheme segment can fall back to a sensible default instead of
//! producing a dangling type name.  That question is the whole interface
//! here: [`ComponentIndex::exists`].  The compiler takes the capability as
//! a trait object, so tests can substitute a [`StaticIndex`] with exactly
//! the names they want registered.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// The kinds of components the runtime keeps registries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ComponentKind {
    /// Protocol-level request processing on the service side.
    Handler,
    /// Transport-level accept on the service side.
    Listener,
    /// Protocol-level session establishment on the node side.
    Connector,
    /// Transport-level connection establishment on the node side.
    Dialer,
}

/// A read-only answer to "is this component name registered?".
pub trait ComponentIndex {
    /// Return true if a component named `name` is registered under `kind`.
    fn exists(&self, kind: ComponentKind, name: &str) -> bool;
}

/// Handler names the runtime registers.
static HANDLERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "auto", "http", "http2", "socks4", "socks", "socks5", "ss", "ssu", "sni", "relay",
        "forward", "tcp", "udp", "rtcp", "rudp", "dns", "sshd", "red", "tun", "tap",
    ]
    .iter()
    .copied()
    .collect()
});

/// Listener names the runtime registers.
static LISTENERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "tcp", "udp", "rtcp", "rudp", "tls", "mtls", "ws", "mws", "wss", "mwss", "kcp", "quic",
        "h2", "h2c", "http3", "ssh", "sshd", "dns", "red", "tun", "tap", "ftcp",
    ]
    .iter()
    .copied()
    .collect()
});

/// Connector names the runtime registers.
static CONNECTORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "http", "http2", "socks4", "socks", "socks5", "ss", "ssu", "relay", "forward", "sni",
        "sshd", "dns",
    ]
    .iter()
    .copied()
    .collect()
});

/// Dialer names the runtime registers.
static DIALERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "tcp", "udp", "tls", "mtls", "ws", "mws", "wss", "mwss", "kcp", "quic", "h2", "h2c",
        "http3", "ssh", "sshd", "ftcp",
    ]
    .iter()
    .copied()
    .collect()
});

/// The component names built into the runtime.
///
/// This is the default capability handed to the compiler by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinIndex;

impl ComponentIndex for BuiltinIndex {
    fn exists(&self, kind: ComponentKind, name: &str) -> bool {
        let table = match kind {
            ComponentKind::Handler => &*HANDLERS,
            ComponentKind::Listener => &*LISTENERS,
            ComponentKind::Connector => &*CONNECTORS,
            ComponentKind::Dialer => &*DIALERS,
        };
        table.contains(name)
    }
}

/// An explicit in-memory index, for tests and embedders that register
/// their own component sets.
#[derive(Debug, Clone, Default)]
pub struct StaticIndex {
    /// The registered (kind, name) pairs.
    entries: HashSet<(ComponentKind, String)>,
}

impl StaticIndex {
    /// Return a new index with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` under `kind`.
    pub fn insert(&mut self, kind: ComponentKind, name: impl Into<String>) -> &mut Self {
        self.entries.insert((kind, name.into()));
        self
    }
}

impl ComponentIndex for StaticIndex {
    fn exists(&self, kind: ComponentKind, name: &str) -> bool {
        self.entries.contains(&(kind, name.to_string()))
    }
}
