//! Creation Registry
//!
//! Ledger of creative works keyed by a caller-chosen creation id. A creation
//! is registered once, after which only its creator may edit the title,
//! description and category. Creator, content hash and registration height
//! never change. Caller identity and block height are supplied by the host
//! with every call through [`CallContext`].

pub mod errors;
pub mod registry;

pub use atelier_types::{
    BlockHeight, CallContext, ContentHash, CreationDetails, CreationId, CreationRecord,
    CreationRegistration, Principal,
};
pub use errors::*;
pub use registry::CreationRegistry;
