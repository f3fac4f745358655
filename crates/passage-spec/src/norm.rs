//! Turning raw command-line tokens into structured URLs.

use passage_metadata::Metadata;
use url::Url;

use crate::{Error, Result};

/// Normalize a raw specification string into a URL.
///
/// A bare `host:port` or `:port` form gets a synthetic `auto://` scheme so
/// it parses as a URL with an inferred-scheme sentinel.  The convenience
/// scheme `https` is rewritten to its compound form `http+tls`, so
/// `https://` behaves as "http over a TLS transport".
///
/// Fails with [`Error::InvalidSpec`] on empty or blank input, and with the
/// underlying parse error if the string is not a URL.  No further
/// validation happens here.
pub fn normalize_spec(spec: &str) -> Result<Url> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(Error::InvalidSpec);
    }

    let spec = if spec.starts_with(':') || !spec.contains("://") {
        format!("auto://{}", spec)
    } else {
        spec.to_string()
    };

    let url = Url::parse(&spec)?;
    if url.scheme() == "https" {
        // `http+tls` is not a "special" scheme, so the parsed URL cannot
        // be rewritten in place; re-parse with the scheme replaced.
        let rest = spec.splitn(2, "://").nth(1).unwrap_or("");
        return Ok(Url::parse(&format!("http+tls://{}", rest))?);
    }

    Ok(url)
}

/// Collect the URL query into an option map, keeping the first value
/// listed for each key.
pub(crate) fn query_metadata(url: &Url) -> Metadata {
    let mut md = Metadata::new();
    for (k, v) in url.query_pairs() {
        md.set_once(k.to_string(), v.to_string());
    }
    md
}

/// The `host:port` address of a URL, or just the host when no port was
/// given.  IPv6 hosts keep their brackets.
pub(crate) fn host_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// The bare hostname of a URL: no port, no IPv6 brackets.
pub(crate) fn hostname(url: &Url) -> String {
    match url.host() {
        Some(url::Host::Ipv6(ip)) => ip.to_string(),
        Some(host) => host.to_string(),
        None => String::new(),
    }
}
