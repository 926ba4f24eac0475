//! psylink-links
//!
//! The test-link collection: minting, one-time use, status changes and the
//! bulk append the batch importer writes through.

pub mod error;
pub mod store;

pub use store::LinkStore;
