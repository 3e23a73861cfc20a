//! Infrastructure Layer
//!
//! Cache implementations and the Postgres history source.

pub mod artifact_cache;
pub mod postgres;
pub mod ttl_cache;
