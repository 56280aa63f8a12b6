//! Core record types, code lists, field encoders and validation.
//!
//! This module provides the input model for VeriFactu records
//! (invoice, cancellation, software descriptor, chain link) and the
//! encoders that turn typed values into AEAT leaf text.

mod builder;
mod codes;
pub mod countries;
mod error;
pub mod format;
mod types;
mod validation;

pub use builder::*;
pub use codes::*;
pub use error::*;
pub use types::*;
pub use validation::*;
