//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Caller identity resolution from request headers
//! - Durable key-value store capability (remote and in-memory backends)

pub mod client;
pub mod store;
