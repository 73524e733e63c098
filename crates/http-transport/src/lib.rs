//! HTTP transport adapter for the sign-up domain.
//!
//! Implements the [`signup::Transport`] trait with `reqwest` against a single
//! backend origin. Every descriptor shape the domain accepts is normalized by
//! [`signup::TransportCall`] first; this crate only turns a normalized call
//! into a wire request and maps the response back.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL resolution, cookie handling, multipart encoding,
//! timeouts, and JSON decoding live here. The [`signup`] crate sees only
//! [`signup::Transport`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `TransportConfig`, origin validation |
//! | [`client`] | `HttpTransport` |

pub mod client;
pub mod config;

pub use client::HttpTransport;
pub use config::{TransportConfig, DEFAULT_TIMEOUT};
