//! Remote transport implementations.
//!
//! The engine only depends on the `RemoteStore` trait; the HTTP
//! implementation is feature-gated so the default build stays free of
//! network dependencies.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpRemote;
