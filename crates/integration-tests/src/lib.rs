//! Integration tests for the customer registry.
//!
//! The tests in `tests/` talk to a running server over HTTP and are
//! `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database and start the server
//! cargo run -p customer-registry-cli -- migrate
//! cargo run -p customer-registry-server
//!
//! # Run integration tests (REGISTRY_BASE_URL defaults to http://localhost:8080)
//! cargo test -p customer-registry-integration-tests -- --ignored
//! ```
//!
//! The customer tests resolve real postal codes, so the server needs to reach
//! `ViaCEP` unless the codes are already cached.
