//! Materializing named policy entities out of spec options.
//!
//! Several option keys (`bypass`, `resolver`, `hosts`, `admission`, the
//! `limiter.rate.*` family) do not configure the component they appear on;
//! they *create* a new named top-level entity and leave a back-reference
//! behind.  Each extractor here follows the same shape: read the trigger
//! key(s), parse the value, append a new entity named `kind-<count>` to
//! the configuration collection, delete the consumed keys, and return the
//! generated name for the caller to store in its reference field.  An
//! absent or empty trigger key skips the subsystem entirely.

use passage_config::{
    AdmissionConfig, BypassConfig, Config, HopConfig, HostMappingConfig, HostsConfig,
    LimiterConfig, NameserverConfig, RateLimiterConfig, ResolverConfig, ServiceConfig,
    SockOptsConfig, CONN_LIMIT_KEY, GLOBAL_LIMIT_KEY,
};
use passage_metadata::Metadata;

/// Parse an allow/deny list value: a leading `~` flips it to a whitelist,
/// and the rest is comma-split into matchers with empty segments dropped.
fn matcher_list(value: &str) -> (bool, Vec<String>) {
    let (whitelist, rest) = match value.strip_prefix('~') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let matchers = rest
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (whitelist, matchers)
}

/// Materialize a bypass entity from the `bypass` key.
fn extract_bypass(cfg: &mut Config, md: &mut Metadata) -> Option<String> {
    let value = md.get_string("bypass");
    if value.is_empty() {
        return None;
    }
    let (whitelist, matchers) = matcher_list(&value);
    let name = format!("bypass-{}", cfg.bypasses.len());
    cfg.bypasses.push(BypassConfig {
        name: name.clone(),
        whitelist,
        matchers,
    });
    md.remove("bypass");
    Some(name)
}

/// Materialize an admission entity from the `admission` key.
fn extract_admission(cfg: &mut Config, md: &mut Metadata) -> Option<String> {
    let value = md.get_string("admission");
    if value.is_empty() {
        return None;
    }
    let (whitelist, matchers) = matcher_list(&value);
    let name = format!("admission-{}", cfg.admissions.len());
    cfg.admissions.push(AdmissionConfig {
        name: name.clone(),
        whitelist,
        matchers,
    });
    md.remove("admission");
    Some(name)
}

/// Materialize a resolver entity from the `resolver` key.
///
/// In service context (`with_prefer`), a `prefer` option is attached to
/// every nameserver; the `prefer` key itself stays in the metadata.
fn extract_resolver(cfg: &mut Config, md: &mut Metadata, with_prefer: bool) -> Option<String> {
    let value = md.get_string("resolver");
    if value.is_empty() {
        return None;
    }
    let prefer = if with_prefer {
        md.get_string("prefer")
    } else {
        String::new()
    };
    let nameservers = value
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|addr| NameserverConfig {
            addr: addr.to_string(),
            prefer: prefer.clone(),
            ..Default::default()
        })
        .collect();
    let name = format!("resolver-{}", cfg.resolvers.len());
    cfg.resolvers.push(ResolverConfig {
        name: name.clone(),
        nameservers,
    });
    md.remove("resolver");
    Some(name)
}

/// Materialize a host-mapping entity from the `hosts` key.
///
/// Each comma-separated entry is a `hostname:ip` pair split on the first
/// colon; entries without a colon are silently dropped.
fn extract_hosts(cfg: &mut Config, md: &mut Metadata) -> Option<String> {
    let value = md.get_string("hosts");
    if value.is_empty() {
        return None;
    }
    let mappings: Vec<HostMappingConfig> = value
        .split(',')
        .filter_map(|entry| {
            let (hostname, ip) = entry.split_once(':')?;
            Some(HostMappingConfig {
                hostname: hostname.to_string(),
                ip: ip.to_string(),
            })
        })
        .collect();
    let name = format!("hosts-{}", cfg.hosts.len());
    cfg.hosts.push(HostsConfig {
        name: name.clone(),
        mappings,
    });
    md.remove("hosts");
    Some(name)
}

/// Materialize a traffic limiter from the `limiter.rate.*` keys.
///
/// Creation is triggered by an inbound rate (global or per-connection);
/// the outbound companions are optional and ride along in the same rule.
fn extract_limiter(cfg: &mut Config, md: &mut Metadata) -> Option<String> {
    let input = md.get_string("limiter.rate.in");
    let output = md.get_string("limiter.rate.out");
    let conn_input = md.get_string("limiter.rate.conn.in");
    let conn_output = md.get_string("limiter.rate.conn.out");
    if input.is_empty() && conn_input.is_empty() {
        return None;
    }

    let mut limits = Vec::new();
    if !input.is_empty() {
        limits.push(format!("{} {} {}", GLOBAL_LIMIT_KEY, input, output));
    }
    if !conn_input.is_empty() {
        limits.push(format!("{} {} {}", CONN_LIMIT_KEY, conn_input, conn_output));
    }

    let name = format!("limiter-{}", cfg.limiters.len());
    cfg.limiters.push(LimiterConfig {
        name: name.clone(),
        rate: Some(RateLimiterConfig { limits }),
    });
    md.remove("limiter.rate.in");
    md.remove("limiter.rate.out");
    md.remove("limiter.rate.conn.in");
    md.remove("limiter.rate.conn.out");
    Some(name)
}

/// Extract the hop-level policies out of a node's remaining options:
/// bypass, resolver, hosts, plus the `interface` and `so_mark` overrides.
pub fn apply_hop_policies(cfg: &mut Config, hop: &mut HopConfig, md: &mut Metadata) {
    if let Some(name) = extract_bypass(cfg, md) {
        hop.bypass = name;
    }
    if let Some(name) = extract_resolver(cfg, md, false) {
        hop.resolver = name;
    }
    if let Some(name) = extract_hosts(cfg, md) {
        hop.hosts = name;
    }

    let interface = md.get_string("interface");
    if !interface.is_empty() {
        hop.interface = interface;
        md.remove("interface");
    }
    let mark = md.get_int("so_mark");
    if mark > 0 {
        hop.sockopts = Some(SockOptsConfig { mark: mark as u32 });
        md.remove("so_mark");
    }
}

/// Extract the service-level policies out of a service's remaining
/// options: retries, admission, bypass, resolver, hosts, and the rate
/// limiter.
pub fn apply_service_policies(cfg: &mut Config, svc: &mut ServiceConfig, md: &mut Metadata) {
    let retries = md.get_int("retries");
    if retries > 0 {
        svc.handler.retries = retries as i32;
        md.remove("retries");
    }

    if let Some(name) = extract_admission(cfg, md) {
        svc.admission = name;
    }
    if let Some(name) = extract_bypass(cfg, md) {
        svc.bypass = name;
    }
    if let Some(name) = extract_resolver(cfg, md, true) {
        svc.resolver = name;
    }
    if let Some(name) = extract_hosts(cfg, md) {
        svc.hosts = name;
    }
    if let Some(name) = extract_limiter(cfg, md) {
        svc.limiter = name;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// A map built from string pairs.
    fn md(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn bypass_whitelist_flip() {
        let mut cfg = Config::default();
        let mut hop = HopConfig::default();
        let mut m = md(&[("bypass", "~1.2.3.0/24,10.0.0.0/8")]);
        apply_hop_policies(&mut cfg, &mut hop, &mut m);

        assert_eq!(hop.bypass, "bypass-0");
        assert_eq!(cfg.bypasses.len(), 1);
        assert!(cfg.bypasses[0].whitelist);
        assert_eq!(cfg.bypasses[0].matchers, vec!["1.2.3.0/24", "10.0.0.0/8"]);
        assert!(!m.contains("bypass"));
    }

    #[test]
    fn blacklist_is_the_default_reading() {
        let mut cfg = Config::default();
        let mut hop = HopConfig::default();
        let mut m = md(&[("bypass", "192.168.0.0/16")]);
        apply_hop_policies(&mut cfg, &mut hop, &mut m);
        assert!(!cfg.bypasses[0].whitelist);
    }

    #[test]
    fn names_count_per_collection() {
        let mut cfg = Config::default();
        let mut m = md(&[("bypass", "a")]);
        let mut hop = HopConfig::default();
        apply_hop_policies(&mut cfg, &mut hop, &mut m);

        let mut svc = ServiceConfig::default();
        let mut m = md(&[("bypass", "b"), ("admission", "c")]);
        apply_service_policies(&mut cfg, &mut svc, &mut m);

        assert_eq!(cfg.bypasses[0].name, "bypass-0");
        assert_eq!(cfg.bypasses[1].name, "bypass-1");
        assert_eq!(svc.bypass, "bypass-1");
        assert_eq!(svc.admission, "admission-0");
    }

    #[test]
    fn hosts_drop_malformed_pairs() {
        let mut cfg = Config::default();
        let mut svc = ServiceConfig::default();
        let mut m = md(&[("hosts", "db:10.0.0.2,garbage,www:10.0.0.3")]);
        apply_service_policies(&mut cfg, &mut svc, &mut m);

        let mappings = &cfg.hosts[0].mappings;
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].hostname, "db");
        assert_eq!(mappings[0].ip, "10.0.0.2");
        assert_eq!(mappings[1].hostname, "www");
        assert!(!m.contains("hosts"));
    }

    #[test]
    fn resolver_attaches_prefer_in_service_context() {
        let mut cfg = Config::default();
        let mut svc = ServiceConfig::default();
        let mut m = md(&[("resolver", "1.1.1.1,8.8.8.8"), ("prefer", "ipv6")]);
        apply_service_policies(&mut cfg, &mut svc, &mut m);

        let ns = &cfg.resolvers[0].nameservers;
        assert_eq!(ns.len(), 2);
        assert_eq!(ns[0].addr, "1.1.1.1");
        assert_eq!(ns[0].prefer, "ipv6");
        assert_eq!(ns[1].prefer, "ipv6");
        // `prefer` itself is not consumed.
        assert!(m.contains("prefer"));
    }

    #[test]
    fn hop_resolver_has_no_prefer() {
        let mut cfg = Config::default();
        let mut hop = HopConfig::default();
        let mut m = md(&[("resolver", "1.1.1.1"), ("prefer", "ipv6")]);
        apply_hop_policies(&mut cfg, &mut hop, &mut m);
        assert_eq!(cfg.resolvers[0].nameservers[0].prefer, "");
    }

    #[test]
    fn limiter_needs_an_inbound_rate() {
        let mut cfg = Config::default();
        let mut svc = ServiceConfig::default();
        let mut m = md(&[("limiter.rate.out", "1mb")]);
        apply_service_policies(&mut cfg, &mut svc, &mut m);
        assert!(cfg.limiters.is_empty());
        assert_eq!(svc.limiter, "");
        // Not consumed when no limiter was created.
        assert!(m.contains("limiter.rate.out"));
    }

    #[test]
    fn limiter_pairs_rates_into_rules() {
        let mut cfg = Config::default();
        let mut svc = ServiceConfig::default();
        let mut m = md(&[
            ("limiter.rate.in", "10mb"),
            ("limiter.rate.out", "1mb"),
            ("limiter.rate.conn.in", "512kb"),
        ]);
        apply_service_policies(&mut cfg, &mut svc, &mut m);

        assert_eq!(svc.limiter, "limiter-0");
        let rate = cfg.limiters[0].rate.as_ref().unwrap();
        assert_eq!(rate.limits[0], "$ 10mb 1mb");
        assert_eq!(rate.limits[1], "$$ 512kb ");
        assert!(m.is_empty());
    }

    #[test]
    fn interface_and_so_mark_move_to_the_hop() {
        let mut cfg = Config::default();
        let mut hop = HopConfig::default();
        let mut m = md(&[("interface", "eth0"), ("so_mark", "100")]);
        apply_hop_policies(&mut cfg, &mut hop, &mut m);

        assert_eq!(hop.interface, "eth0");
        assert_eq!(hop.sockopts.as_ref().unwrap().mark, 100);
        assert!(m.is_empty());
    }

    #[test]
    fn retries_lift_out_of_metadata() {
        let mut cfg = Config::default();
        let mut svc = ServiceConfig::default();
        let mut m = md(&[("retries", "3")]);
        apply_service_policies(&mut cfg, &mut svc, &mut m);
        assert_eq!(svc.handler.retries, 3);
        assert!(m.is_empty());
    }

    #[test]
    fn empty_triggers_create_nothing() {
        let mut cfg = Config::default();
        let mut svc = ServiceConfig::default();
        let mut m = md(&[("bypass", ""), ("unrelated", "x")]);
        apply_service_policies(&mut cfg, &mut svc, &mut m);
        assert!(cfg.bypasses.is_empty());
        assert!(m.contains("unrelated"));
    }
}
