//! Resolving credentials from userinfo and the `auth` option.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use passage_config::AuthConfig;
use passage_metadata::Metadata;
use url::Url;

use crate::Result;

/// Derive an optional username/password pair for a spec URL.
///
/// URL userinfo is read first.  If an `auth` option is present, it is
/// decoded as standard base64 into `user:pass` and *overrides* the
/// userinfo; a decode failure is an error.  The `auth` key is deleted
/// whether or not it produced an override.
pub fn resolve_auth(url: &Url, md: &mut Metadata) -> Result<Option<AuthConfig>> {
    let mut auth = None;
    if !url.username().is_empty() || url.password().is_some() {
        auth = Some(AuthConfig {
            username: url.username().to_string(),
            password: url.password().unwrap_or("").to_string(),
        });
    }

    let encoded = md.get_string("auth");
    if !encoded.is_empty() {
        auth = Some(decode_auth(&encoded)?);
    }
    md.remove("auth");

    Ok(auth)
}

/// Decode a base64 `user:pass` credential value.
///
/// The split is on the first colon; with no colon the whole value is the
/// username and the password is empty.
fn decode_auth(encoded: &str) -> Result<AuthConfig> {
    let bytes = STANDARD.decode(encoded)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(match text.split_once(':') {
        Some((user, pass)) => AuthConfig {
            username: user.to_string(),
            password: pass.to_string(),
        },
        None => AuthConfig {
            username: text.to_string(),
            password: String::new(),
        },
    })
}
