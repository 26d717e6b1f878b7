//! # Domain Module
//!
//! Core domain types: log structures, log identity, log list, errors.

pub mod entities;
pub mod errors;
pub mod loglist;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use loglist::*;
pub use value_objects::*;
