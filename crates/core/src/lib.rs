//! Vitrina Core - Shared domain types.
//!
//! This crate provides the types used across all Vitrina components:
//! - `storefront` - Cart and favorites state managers, Supabase client
//! - `cli` - Command-line storefront client
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no HTTP
//! clients, no persistence. Cart mutations and totals live here so they can
//! be tested without any runtime; the storefront crate wraps them with
//! persistence and notifications.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, emails, products, cart lines, favorites, users

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
