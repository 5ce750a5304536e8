//! Vitrina storefront library.
//!
//! Client-side state for a small online store: a locally persisted cart,
//! server-backed favorites for the signed-in user, a cached catalog and the
//! WhatsApp checkout deep link. Hosts wire everything through
//! [`state::AppState`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod supabase;
