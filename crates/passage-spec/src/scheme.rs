//! Splitting compound schemes and resolving component types.

use passage_registry::{ComponentIndex, ComponentKind};
use tracing::debug;

use crate::{Error, Result};

/// Split a scheme into its session-level and transport-level role names.
///
/// One segment names both roles (`socks5` → `socks5`/`socks5`); two
/// segments name the session role then the transport role (`socks5+tls` →
/// `socks5`/`tls`).  More than two segments is rejected as
/// [`Error::InvalidScheme`].
pub fn split_scheme(scheme: &str) -> Result<(String, String)> {
    let segments: Vec<&str> = scheme.split('+').collect();
    match segments.as_slice() {
        [one] => Ok((one.to_string(), one.to_string())),
        [session, transport] => Ok((session.to_string(), transport.to_string())),
        _ => Err(Error::InvalidScheme(scheme.to_string())),
    }
}

/// Resolve a service scheme into registered handler and listener types.
///
/// An unregistered handler name falls back to the auto-detecting `auto`
/// handler; an unregistered listener name falls back to `tcp`, or to `udp`
/// when the handler is the UDP-only `ssu`.  This lets the transport half of
/// a compound scheme be omitted whenever the default is unambiguous.
pub fn resolve_service_types(
    scheme: &str,
    index: &dyn ComponentIndex,
) -> Result<(String, String)> {
    let (mut handler, mut listener) = split_scheme(scheme)?;

    if !index.exists(ComponentKind::Handler, &handler) {
        debug!("unknown handler {:?}, using \"auto\"", handler);
        handler = "auto".to_string();
    }
    if !index.exists(ComponentKind::Listener, &listener) {
        let fallback = if handler == "ssu" { "udp" } else { "tcp" };
        debug!("unknown listener {:?}, using {:?}", listener, fallback);
        listener = fallback.to_string();
    }

    Ok((handler, listener))
}

/// Resolve a node scheme into registered connector and dialer types.
///
/// The fallbacks mirror [`resolve_service_types`]: connector → `http`,
/// dialer → `tcp` (`udp` under an `ssu` connector).
pub fn resolve_node_types(scheme: &str, index: &dyn ComponentIndex) -> Result<(String, String)> {
    let (mut connector, mut dialer) = split_scheme(scheme)?;

    if !index.exists(ComponentKind::Connector, &connector) {
        debug!("unknown connector {:?}, using \"http\"", connector);
        connector = "http".to_string();
    }
    if !index.exists(ComponentKind::Dialer, &dialer) {
        let fallback = if connector == "ssu" { "udp" } else { "tcp" };
        debug!("unknown dialer {:?}, using {:?}", dialer, fallback);
        dialer = fallback.to_string();
    }

    Ok((connector, dialer))
}
