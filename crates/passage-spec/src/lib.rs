//! Compiles URL-style proxy specifications into passage configuration
//! graphs.
//!
//! # Overview
//!
//! On the command line, a whole proxy service or chain node fits in one
//! compact string:
//!
//! ```text
//! socks5+tls://user:pass@:1080?bypass=10.0.0.0/8&limiter.rate.in=1mb
//! ```
//!
//! This crate is the compiler for that little language.  It normalizes the
//! raw string into a URL, splits the compound scheme into a session role
//! and a transport role, applies protocol-aware fallbacks for names the
//! runtime does not know, resolves credentials and TLS settings out of the
//! query options, materializes cross-cutting policies (bypass lists,
//! resolvers, host mappings, limiters, admission controls) as named
//! top-level entities, and wires everything into one internally consistent
//! [`Config`](passage_config::Config).  Every option a subsystem consumes
//! is deleted from the generic metadata in the same step, so nothing leaks
//! into the options a component later receives.
//!
//! The compiler performs no I/O and touches no live component: its only
//! view of the runtime is the read-only
//! [`ComponentIndex`](passage_registry::ComponentIndex) used to decide
//! fallbacks.  Compilation is synchronous and fail-fast; the first error
//! aborts the whole invocation and no partial configuration is returned.
//!
//! The main entry point is [`build_config`]; the per-spec compilers
//! [`build_service_config`] and [`build_node_config`] are exposed for
//! callers that drive assembly themselves.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

mod assemble;
mod auth;
mod err;
mod node;
mod norm;
mod scheme;
mod selector;
mod service;
mod subres;
mod tls;

pub use assemble::build_config;
pub use auth::resolve_auth;
pub use err::{Error, Result};
pub use node::{build_node_config, expand_hosts, CompiledNode};
pub use norm::normalize_spec;
pub use scheme::{resolve_node_types, resolve_service_types, split_scheme};
pub use selector::resolve_selector;
pub use service::{build_service_config, CompiledService};
pub use subres::{apply_hop_policies, apply_service_policies};
pub use tls::{resolve_node_tls, resolve_service_tls};
