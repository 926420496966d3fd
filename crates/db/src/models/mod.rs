//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create/update DTOs where the repository takes more than a couple
//!   of scalar arguments
//!
//! Response serialization uses camelCase field names to match the wire
//! contract.

pub mod comment;
pub mod history;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;
