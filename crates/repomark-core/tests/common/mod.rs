//! Shared test support.

pub mod stub_source;
