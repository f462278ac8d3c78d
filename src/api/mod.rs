// src/api/mod.rs
//! Remote service access

pub mod client;

pub use client::{resume_content_type, ApiClient};
