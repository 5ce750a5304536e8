//! Core types for Vitrina.
//!
//! This module provides type-safe wrappers for the storefront domain.

pub mod cart;
pub mod email;
pub mod favorite;
pub mod id;
pub mod price;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine};
pub use email::{Email, EmailError};
pub use favorite::Favorite;
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{Category, CategoryParseError, Product};
pub use user::User;
