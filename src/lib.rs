//! Mediateca: a content-catalog service.
//!
//! Clients create, read, update and delete scheduled media records through
//! an HTTP API. All reads and writes flow through a TTL-bounded
//! read-through cache in front of the persistent store.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
