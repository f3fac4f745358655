//! Compiling a spec URL into services.

use passage_config::{ForwarderConfig, HandlerConfig, ListenerConfig, NodeConfig, ServiceConfig};
use passage_metadata::Metadata;
use passage_registry::ComponentIndex;
use url::Url;

use crate::norm::{host_port, query_metadata};
use crate::{auth, scheme, selector, tls, Result};

/// Listener types whose matching handler can forward traffic directly,
/// without a generic `forward` handler in between.
const DIRECT_FORWARD_LISTENERS: &[&str] = &["tcp", "udp", "rtcp", "rudp", "tun", "tap", "dns"];

/// The output of [`build_service_config`]: a service plus the options that
/// were not consumed while compiling it.
///
/// Service-level policies are still going to be extracted from the
/// metadata during assembly; only then does each component (handler,
/// listener, service) receive its own copy of what survives.
#[derive(Debug, Clone)]
pub struct CompiledService {
    /// The service, with empty component metadata.
    pub service: ServiceConfig,
    /// Options not consumed by service compilation.
    pub metadata: Metadata,
}

/// Compile a normalized spec URL into a service.
///
/// The scheme resolves to handler and listener types (with registry
/// fallbacks).  A non-empty URL path switches the service to forward
/// mode: the path is a comma-separated target list, and unless the
/// handler was explicitly `relay`, its type is overridden to relay
/// directly at the listener's level where possible.  Credentials and
/// listener TLS come from the userinfo and query options; for the ssh
/// family, credentials move from the handler to the listener, which is
/// where those protocols verify them.
pub fn build_service_config(url: &Url, index: &dyn ComponentIndex) -> Result<CompiledService> {
    let (mut handler_type, listener_type) = scheme::resolve_service_types(url.scheme(), index)?;

    let mut svc = ServiceConfig {
        addr: host_port(url),
        ..Default::default()
    };

    // Forward mode: the path carries a pass-through target list.
    let remotes = url.path().trim_matches('/').to_string();
    if !remotes.is_empty() {
        let mut forwarder = ForwarderConfig::default();
        for (i, addr) in remotes.split(',').enumerate() {
            forwarder.nodes.push(NodeConfig {
                name: format!("target-{}", i),
                addr: addr.to_string(),
                ..Default::default()
            });
        }
        svc.forwarder = Some(forwarder);

        if handler_type != "relay" {
            handler_type = if DIRECT_FORWARD_LISTENERS.contains(&listener_type.as_str()) {
                listener_type.clone()
            } else {
                "forward".to_string()
            };
        }
    }

    let mut md = query_metadata(url);
    let auth = auth::resolve_auth(url, &mut md)?;
    let tls = tls::resolve_service_tls(&mut md);

    // A comma-joined `dns` option becomes a structured list.
    let dns = md.get_string("dns");
    if !dns.is_empty() {
        let servers: Vec<String> = dns.split(',').map(str::to_string).collect();
        md.set("dns", serde_json::json!(servers));
    }

    if let Some(forwarder) = svc.forwarder.as_mut() {
        forwarder.selector = selector::resolve_selector(&mut md);
    }

    svc.handler = HandlerConfig {
        kind: handler_type,
        auth,
        ..Default::default()
    };
    svc.listener = ListenerConfig {
        kind: listener_type,
        tls,
        ..Default::default()
    };

    if svc.listener.kind == "ssh" || svc.listener.kind == "sshd" {
        svc.listener.auth = svc.handler.auth.take();
    }

    Ok(CompiledService {
        service: svc,
        metadata: md,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::normalize_spec;
    use passage_registry::BuiltinIndex;

    /// Compile one spec against the builtin component index.
    fn compile(spec: &str) -> CompiledService {
        let url = normalize_spec(spec).unwrap();
        build_service_config(&url, &BuiltinIndex).unwrap()
    }

    #[test]
    fn plain_socks5_service() {
        let compiled = compile("socks5://user:pass@:1080");
        let svc = &compiled.service;

        assert_eq!(svc.addr, ":1080");
        assert_eq!(svc.handler.kind, "socks5");
        assert_eq!(svc.listener.kind, "tcp");
        assert_eq!(svc.handler.auth.as_ref().unwrap().username, "user");
        assert!(svc.forwarder.is_none());
    }

    #[test]
    fn https_matches_its_compound_form() {
        let a = compile("https://:8443?cert=/c.pem");
        let b = compile("http+tls://:8443?cert=/c.pem");
        assert_eq!(a.service.handler.kind, b.service.handler.kind);
        assert_eq!(a.service.listener.kind, b.service.listener.kind);
    }

    #[test]
    fn forward_mode_uses_the_listener_type_directly() {
        let compiled = compile("tcp://:8080/192.168.1.1:80,192.168.1.2:80");
        let svc = &compiled.service;

        assert_eq!(svc.handler.kind, "tcp");
        assert_eq!(svc.listener.kind, "tcp");
        let forwarder = svc.forwarder.as_ref().unwrap();
        assert_eq!(forwarder.nodes.len(), 2);
        assert_eq!(forwarder.nodes[0].name, "target-0");
        assert_eq!(forwarder.nodes[0].addr, "192.168.1.1:80");
        assert_eq!(forwarder.nodes[1].addr, "192.168.1.2:80");
    }

    #[test]
    fn forward_mode_falls_back_to_the_forward_handler() {
        let compiled = compile("http+wss://:8443/backend:80");
        assert_eq!(compiled.service.handler.kind, "forward");
        assert_eq!(compiled.service.listener.kind, "wss");
    }

    #[test]
    fn relay_handler_is_never_overridden() {
        let compiled = compile("relay+tcp://:8421/backend:80");
        assert_eq!(compiled.service.handler.kind, "relay");
        assert!(compiled.service.forwarder.is_some());
    }

    #[test]
    fn forwarder_gets_the_selector() {
        let compiled = compile("tcp://:8080/a:1,b:1?strategy=rand&maxFails=2");
        let forwarder = compiled.service.forwarder.as_ref().unwrap();
        let sel = forwarder.selector.as_ref().unwrap();
        assert_eq!(sel.strategy, "rand");
        assert_eq!(sel.max_fails, 2);
        assert!(!compiled.metadata.contains("strategy"));
    }

    #[test]
    fn plain_service_has_no_selector_extraction() {
        let compiled = compile("socks5://:1080?strategy=rand");
        assert!(compiled.service.forwarder.is_none());
        // Without a forwarder nothing consumes the key.
        assert!(compiled.metadata.contains("strategy"));
    }

    #[test]
    fn listener_tls_requires_a_certificate() {
        let with = compile("http+tls://:8443?cert=/c.pem&key=/k.pem");
        assert!(with.service.listener.tls.is_some());

        let without = compile("http+tls://:8443");
        assert!(without.service.listener.tls.is_none());
    }

    #[test]
    fn sshd_moves_auth_to_the_listener() {
        let compiled = compile("sshd://admin:secret@:2222");
        let svc = &compiled.service;

        assert!(svc.handler.auth.is_none());
        assert_eq!(svc.listener.kind, "sshd");
        assert_eq!(svc.listener.auth.as_ref().unwrap().username, "admin");
        assert_eq!(svc.listener.auth.as_ref().unwrap().password, "secret");
    }

    #[test]
    fn dns_option_becomes_a_list() {
        let compiled = compile("dns://:53?dns=1.1.1.1,8.8.8.8");
        let value = compiled.metadata.get("dns").unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn unconsumed_options_survive() {
        let compiled = compile("socks5://:1080?cert=/c.pem&custom=hello");
        assert!(!compiled.metadata.contains("cert"));
        assert_eq!(compiled.metadata.get_str("custom"), Some("hello"));
    }
}
