//! # Hello Test Utilities
//!
//! Shared test utilities for the Hello Service.
//!
//! This crate provides:
//! - Server test harness (`TestHelloServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hello_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestHelloServer::spawn_default().await?;
//!     let body = reqwest::get(format!("{}/", server.url())).await?.text().await?;
//!
//!     assert!(body.contains("hello"));
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
