//! Client-side models that are not part of the shared core types.

pub mod identity;
pub mod session;

pub use identity::Identity;
pub use session::{StoredSession, keys};
