//! HTTP request handlers.

mod cluster;
mod greeting;

pub use cluster::cluster_identity;
pub use greeting::hello;
