//! Domain layer for the Bank Operations backend.
//!
//! This crate contains:
//! - Domain models (branches, ATMs, POS terminals, monitored systems,
//!   tickets, security events, alerts, reports, users, audit log)
//! - Business logic services (authorization policy, lifecycle transitions,
//!   audit entry building)

pub mod models;
pub mod services;
