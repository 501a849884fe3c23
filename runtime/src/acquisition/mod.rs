//! Plain HTTP acquisition for the static-page and JSON sources.
//!
//! No browser involved. The rendered-page sources go through
//! [`crate::renderer`] instead.

pub mod http_client;
