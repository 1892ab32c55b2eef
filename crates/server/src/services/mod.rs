//! Business logic services for the registry.
//!
//! # Services
//!
//! - `customers` - Customer CRUD with cache-aside address resolution
//! - `lookup` - The postal code lookup seam the customer service resolves misses through

pub mod customers;
pub mod lookup;

pub use customers::{CustomerInput, CustomerService, CustomerServiceError};
pub use lookup::{LookupError, PostalCodeLookup};
