//! Hello Service Library
//!
//! A deliberately small HTTP responder used to demonstrate GitOps
//! deployments across several Kubernetes clusters:
//!
//! - `GET /` answers with a fixed greeting
//! - `GET /cluster` reports which service instance and which cluster served
//!   the request, so a deployment can be traced back to its target
//!
//! # Architecture
//!
//! ```text
//! config.rs -> routes/mod.rs -> handlers/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `handlers` - HTTP request handlers
//! - `routes` - Axum router setup

pub mod config;
pub mod handlers;
pub mod routes;
