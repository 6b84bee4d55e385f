//! Shared utilities and common types for the Bank Operations backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (session token generation, hashing)
//! - Password hashing with Argon2id
//! - Common validation logic
//! - Pagination types

pub mod crypto;
pub mod pagination;
pub mod password;
pub mod validation;
