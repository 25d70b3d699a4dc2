//! Shared value types for the creation registry: identities, digests,
//! records and the per-call host context.

pub mod content_hash;
pub mod creation;
pub mod principal;

pub use content_hash::*;
pub use creation::*;
pub use principal::*;
