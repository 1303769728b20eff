//! Outbound adapters implementing domain ports.
//!
//! - **credential**: HMAC-signed credential issuing and verification
//! - **password**: salted SHA-256 password hashing
//! - **persistence**: PostgreSQL identity and resource stores via Diesel

pub mod credential;
pub mod password;
pub mod persistence;
