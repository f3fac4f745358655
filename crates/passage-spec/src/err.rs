//! Declare an error type for passage-spec.

use thiserror::Error;

/// An error produced while compiling a proxy specification.
///
/// Compilation is fail-fast: the first error aborts the invocation, and
/// the caller is expected to report it and terminate startup.  Malformed
/// *options* (a hosts mapping without a colon, an out-of-range counter)
/// are not errors; they are dropped or defaulted.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The specification string was empty or blank.
    #[error("invalid spec")]
    InvalidSpec,

    /// A node specification was structurally malformed.
    #[error("invalid node")]
    InvalidNode,

    /// A scheme had more than two `+`-separated segments, so it cannot be
    /// split into a session role and a transport role.
    #[error("unsupported scheme {0:?}")]
    InvalidScheme(String),

    /// The specification did not parse as a URL.
    #[error("malformed spec: {0}")]
    Url(#[from] url::ParseError),

    /// An `auth` option was not valid base64.
    #[error("malformed auth option: {0}")]
    InvalidAuth(#[from] base64::DecodeError),
}

/// A Result type for the passage_spec crate.
pub type Result<T> = std::result::Result<T, Error>;
