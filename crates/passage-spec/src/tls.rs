//! Resolving TLS settings from spec options.
//!
//! The node (dialer) and service (listener) sides read the same file-path
//! aliases but differ in when TLS counts as "configured": a listener needs
//! a certificate to offer TLS at all, while a dialer can be asked to
//! verify or encrypt without supplying any material of its own.

use passage_config::TlsConfig;
use passage_metadata::Metadata;
use url::Url;

use crate::norm::hostname;

/// The alias pairs for the TLS file paths; the first-listed alias wins.
const FILE_KEYS: &[(&str, &str)] = &[("certFile", "cert"), ("keyFile", "key"), ("caFile", "ca")];

/// Read one aliased option, preferring the primary spelling.
fn aliased(md: &Metadata, primary: &str, alias: &str) -> String {
    let v = md.get_string(primary);
    if !v.is_empty() {
        v
    } else {
        md.get_string(alias)
    }
}

/// Resolve listener-side TLS settings for a service.
///
/// All six file-path keys are deleted unconditionally.  Returns `None`
/// unless a certificate file was supplied: server TLS requires one.
pub fn resolve_service_tls(md: &mut Metadata) -> Option<TlsConfig> {
    let cert_file = aliased(md, "certFile", "cert");
    let key_file = aliased(md, "keyFile", "key");
    let ca_file = aliased(md, "caFile", "ca");
    for (primary, alias) in FILE_KEYS {
        md.remove(primary);
        md.remove(alias);
    }

    if cert_file.is_empty() {
        return None;
    }
    Some(TlsConfig {
        cert_file,
        key_file,
        ca_file,
        ..Default::default()
    })
}

/// Resolve dialer-side TLS settings for a node.
///
/// Besides the file paths, the node side reads `secure` (verify the server
/// certificate) and `serverName` (defaulting to the URL hostname); those
/// keys are deleted too.  Returns `None` unless `secure` is set or a
/// certificate or CA path is present: bare intent to verify is enough to
/// enable client TLS.
pub fn resolve_node_tls(url: &Url, md: &mut Metadata) -> Option<TlsConfig> {
    let cert_file = aliased(md, "certFile", "cert");
    let key_file = aliased(md, "keyFile", "key");
    let ca_file = aliased(md, "caFile", "ca");
    let secure = md.get_bool("secure");
    let mut server_name = md.get_string("serverName");
    if server_name.is_empty() {
        server_name = hostname(url);
    }
    for (primary, alias) in FILE_KEYS {
        md.remove(primary);
        md.remove(alias);
    }
    md.remove("secure");
    md.remove("serverName");

    if !secure && cert_file.is_empty() && ca_file.is_empty() {
        return None;
    }
    Some(TlsConfig {
        cert_file,
        key_file,
        ca_file,
        secure,
        server_name,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::normalize_spec;

    /// A map built from string pairs.
    fn md(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn service_requires_certificate() {
        let mut m = md(&[("key", "/k.pem"), ("ca", "/ca.pem")]);
        assert!(resolve_service_tls(&mut m).is_none());
        // Consumed regardless of outcome.
        assert!(m.is_empty());

        let mut m = md(&[("cert", "/c.pem"), ("key", "/k.pem")]);
        let tls = resolve_service_tls(&mut m).unwrap();
        assert_eq!(tls.cert_file, "/c.pem");
        assert_eq!(tls.key_file, "/k.pem");
        assert!(m.is_empty());
    }

    #[test]
    fn first_listed_alias_wins() {
        let mut m = md(&[("certFile", "/primary.pem"), ("cert", "/alias.pem")]);
        let tls = resolve_service_tls(&mut m).unwrap();
        assert_eq!(tls.cert_file, "/primary.pem");
    }

    #[test]
    fn node_tls_from_bare_intent() {
        let url = normalize_spec("http+tls://proxy.example.com:443").unwrap();
        let mut m = md(&[("secure", "true")]);
        let tls = resolve_node_tls(&url, &mut m).unwrap();
        assert!(tls.secure);
        assert_eq!(tls.server_name, "proxy.example.com");
        assert!(m.is_empty());
    }

    #[test]
    fn node_tls_from_ca_only() {
        let url = normalize_spec("http+tls://proxy.example.com:443").unwrap();
        let mut m = md(&[("ca", "/ca.pem")]);
        let tls = resolve_node_tls(&url, &mut m).unwrap();
        assert_eq!(tls.ca_file, "/ca.pem");
        assert!(!tls.secure);
    }

    #[test]
    fn node_tls_absent_without_intent() {
        let url = normalize_spec("http+tls://proxy.example.com:443").unwrap();
        let mut m = md(&[("serverName", "other.example.com")]);
        assert!(resolve_node_tls(&url, &mut m).is_none());
        assert!(m.is_empty());
    }

    #[test]
    fn explicit_server_name_wins() {
        let url = normalize_spec("http+tls://proxy.example.com:443").unwrap();
        let mut m = md(&[("secure", "1"), ("serverName", "other.example.com")]);
        let tls = resolve_node_tls(&url, &mut m).unwrap();
        assert_eq!(tls.server_name, "other.example.com");
    }
}
