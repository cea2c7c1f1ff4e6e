//! # Domain Module
//!
//! Core types for gateway admission: values, records, errors and the pure
//! rules that bind them.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
