//! Senji Core - Shared domain types for the admin console.
//!
//! This crate provides the types used across the Senji console components:
//! - `admin` - Console library (API client, auth, forms, status updates)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. Backend wire quirks (`_id` vs `id`, numbers sent as strings) are
//! handled by the adapter in `senji-admin`, never here.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, sizes and variants, products, categories, orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
