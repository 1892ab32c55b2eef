//! Customer Registry Core - Shared domain types.
//!
//! This crate provides the types shared by every customer registry component:
//! - `server` - The HTTP service (customers CRUD with CEP resolution)
//! - `cli` - Command-line tools for migrations and lookups
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Postal codes, addresses, customers and their IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
