//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, constant-time comparison)
//! - Password hashing (Argon2id)
//! - Symmetric access/refresh tokens (AES-256-GCM)
//! - Request metadata extraction for HTTP headers and gRPC metadata

pub mod client;
pub mod crypto;
pub mod password;
pub mod token;
