//! Persistence layer for the bank operations backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the referential fan-out that
//!   runs when branches, terminals, users or security events are deleted

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
