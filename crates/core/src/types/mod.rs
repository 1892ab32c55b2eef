//! Core types for the customer registry.
//!
//! This module provides type-safe wrappers for the domain concepts.

pub mod address;
pub mod customer;
pub mod id;
pub mod postal_code;

pub use address::Address;
pub use customer::{Customer, CustomerDraft, CustomerName, CustomerNameError};
pub use id::*;
pub use postal_code::{PostalCode, PostalCodeError};
