//! Inbound adapters translating HTTP requests into domain calls.

pub mod http;
