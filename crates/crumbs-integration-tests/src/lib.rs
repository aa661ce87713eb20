//! Integration test crate for the payout pipeline.
//!
//! This crate has no library code. Its tests resolve whole cycles through
//! the public engine API against hand-built snapshots and fake
//! collaborators.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p crumbs-integration-tests
//! ```
